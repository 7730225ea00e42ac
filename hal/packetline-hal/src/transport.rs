//! Byte transport abstractions
//!
//! Split into receive and transmit halves the way serial peripherals are,
//! so code that only sends (an encoder, a reply channel) asks for no more
//! than the transmit half.

/// Transport receiver
///
/// Receive half of a byte channel. Both methods must return promptly: the
/// protocol is polled, and a blocking read stalls the caller's main loop.
pub trait TransportRx {
    /// Error type for receive operations
    type Error;

    /// Number of bytes that can be read right now without blocking
    ///
    /// Implementations that can only tell "some" from "none" may report 1.
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Read a single byte
    ///
    /// Only called after [`bytes_available`](Self::bytes_available) reported
    /// data, so implementations may treat an empty channel as an error.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;
}

/// Transport transmitter
pub trait TransportTx {
    /// Error type for transmit operations
    type Error;

    /// Write all of `data`
    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error>;

    /// Write a single byte
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write(&[byte])
    }

    /// Flush any buffered data
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Combined transport
///
/// For channels that provide both directions on a single peripheral.
pub trait Transport: TransportRx + TransportTx {}

// Blanket implementation
impl<T: TransportRx + TransportTx> Transport for T {}

impl<T: TransportRx + ?Sized> TransportRx for &mut T {
    type Error = T::Error;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        T::bytes_available(self)
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        T::read_byte(self)
    }
}

impl<T: TransportTx + ?Sized> TransportTx for &mut T {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        T::write(self, data)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        T::write_byte(self, byte)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        T::flush(self)
    }
}
