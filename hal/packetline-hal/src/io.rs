//! embedded-io adapter
//!
//! Wraps any blocking `embedded_io` peripheral that can report read
//! readiness, so chip HAL UARTs work as a transport without glue code.

use embedded_io::{Read, ReadExactError, ReadReady, Write};

use crate::transport::{TransportRx, TransportTx};

/// Transport over an `embedded_io` peripheral
///
/// `ReadReady` only answers "is anything there", so
/// [`bytes_available`](TransportRx::bytes_available) reports 0 or 1 and the
/// receiver re-checks after every byte.
#[derive(Debug)]
pub struct IoTransport<T> {
    inner: T,
}

impl<T> IoTransport<T> {
    /// Wrap a peripheral
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped peripheral
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the wrapped peripheral
    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the peripheral
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read + ReadReady> TransportRx for IoTransport<T> {
    type Error = ReadExactError<T::Error>;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        let ready = self.inner.read_ready().map_err(ReadExactError::Other)?;
        Ok(usize::from(ready))
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf)?;
        Ok(buf[0])
    }
}

impl<T: Write> TransportTx for IoTransport<T> {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.inner.write_all(data)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_io::{ErrorKind, ErrorType};

    /// Serial port stub: serves `input`, records output
    struct FakeSerial {
        input: &'static [u8],
        output: heapless::Vec<u8, 32>,
    }

    impl ErrorType for FakeSerial {
        type Error = ErrorKind;
    }

    impl Read for FakeSerial {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = buf.len().min(self.input.len());
            buf[..n].copy_from_slice(&self.input[..n]);
            self.input = &self.input[n..];
            Ok(n)
        }
    }

    impl ReadReady for FakeSerial {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(!self.input.is_empty())
        }
    }

    impl Write for FakeSerial {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            self.output
                .extend_from_slice(buf)
                .map_err(|_| ErrorKind::OutOfMemory)?;
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[test]
    fn test_reads_until_not_ready() {
        let mut transport = IoTransport::new(FakeSerial {
            input: b"<a>",
            output: heapless::Vec::new(),
        });

        let mut seen = heapless::Vec::<u8, 8>::new();
        while transport.bytes_available().unwrap() > 0 {
            seen.push(transport.read_byte().unwrap()).unwrap();
        }

        assert_eq!(&seen[..], b"<a>");
        assert!(matches!(
            transport.read_byte(),
            Err(ReadExactError::UnexpectedEof)
        ));
    }

    #[test]
    fn test_write_passes_through() {
        let mut transport = IoTransport::new(FakeSerial {
            input: b"",
            output: heapless::Vec::new(),
        });

        transport.write_byte(b'<').unwrap();
        transport.write(b"ok").unwrap();
        transport.write_byte(b'>').unwrap();
        transport.flush().unwrap();

        assert_eq!(&transport.inner().output[..], b"<ok>");
    }
}
