//! In-memory transport
//!
//! A loopback-style transport backed by fixed-capacity buffers. Bytes queued
//! with [`MemoryTransport::push_rx`] are handed to the reader in order, and
//! everything written is collected for inspection. Used for host testing and
//! for bridging to channels that deliver data in chunks.

use heapless::{Deque, Vec};

use crate::transport::{TransportRx, TransportTx};

/// Errors from the in-memory transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MemoryError {
    /// Read attempted with nothing queued
    Empty,
    /// Buffer has no room for the data
    Full,
}

/// Fixed-capacity in-memory transport
///
/// `N` bounds both the receive queue and the transmit log.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport<const N: usize = 256> {
    rx: Deque<u8, N>,
    tx: Vec<u8, N>,
}

impl<const N: usize> MemoryTransport<N> {
    /// Create an empty transport
    pub const fn new() -> Self {
        Self {
            rx: Deque::new(),
            tx: Vec::new(),
        }
    }

    /// Queue bytes for the reader
    ///
    /// Either all of `data` is queued or none of it is.
    pub fn push_rx(&mut self, data: &[u8]) -> Result<(), MemoryError> {
        if self.rx.capacity() - self.rx.len() < data.len() {
            return Err(MemoryError::Full);
        }
        for &byte in data {
            self.rx.push_back(byte).map_err(|_| MemoryError::Full)?;
        }
        Ok(())
    }

    /// Bytes queued but not yet read
    pub fn rx_pending(&self) -> usize {
        self.rx.len()
    }

    /// Everything written so far
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Forget everything written so far
    pub fn clear_written(&mut self) {
        self.tx.clear();
    }

    /// Take the transmit log, leaving it empty
    pub fn take_written(&mut self) -> Vec<u8, N> {
        core::mem::take(&mut self.tx)
    }

    /// Move everything written into the receive queue
    ///
    /// Turns the transport into a loopback: what one framer sends, the same
    /// (or another) framer receives on its next poll.
    pub fn loop_back(&mut self) -> Result<(), MemoryError> {
        let written = self.take_written();
        self.push_rx(&written)
    }
}

impl<const N: usize> TransportRx for MemoryTransport<N> {
    type Error = MemoryError;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(self.rx.len())
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(MemoryError::Empty)
    }
}

impl<const N: usize> TransportTx for MemoryTransport<N> {
    type Error = MemoryError;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.tx
            .extend_from_slice(data)
            .map_err(|_| MemoryError::Full)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.tx.push(byte).map_err(|_| MemoryError::Full)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_in_order() {
        let mut transport = MemoryTransport::<8>::new();
        transport.push_rx(b"abc").unwrap();

        assert_eq!(transport.bytes_available(), Ok(3));
        assert_eq!(transport.read_byte(), Ok(b'a'));
        assert_eq!(transport.read_byte(), Ok(b'b'));
        assert_eq!(transport.read_byte(), Ok(b'c'));
        assert_eq!(transport.bytes_available(), Ok(0));
        assert_eq!(transport.read_byte(), Err(MemoryError::Empty));
    }

    #[test]
    fn test_push_rx_is_all_or_nothing() {
        let mut transport = MemoryTransport::<4>::new();
        transport.push_rx(b"ab").unwrap();

        assert_eq!(transport.push_rx(b"cde"), Err(MemoryError::Full));
        assert_eq!(transport.rx_pending(), 2);
    }

    #[test]
    fn test_write_collects_output() {
        let mut transport = MemoryTransport::<8>::new();
        transport.write_byte(b'<').unwrap();
        transport.write(b"hi").unwrap();
        transport.write_byte(b'>').unwrap();

        assert_eq!(transport.written(), b"<hi>");
        assert_eq!(transport.write(b"too long"), Err(MemoryError::Full));
    }

    #[test]
    fn test_loop_back_moves_output_to_input() {
        let mut transport = MemoryTransport::<8>::new();
        transport.write(b"<x>").unwrap();
        transport.loop_back().unwrap();

        assert!(transport.written().is_empty());
        assert_eq!(transport.rx_pending(), 3);
        assert_eq!(transport.read_byte(), Ok(b'<'));
    }

    #[test]
    fn test_mut_ref_forwards() {
        fn drain<R: TransportRx>(mut rx: R) -> usize {
            let mut count = 0;
            while let Ok(n) = rx.bytes_available() {
                if n == 0 || rx.read_byte().is_err() {
                    break;
                }
                count += 1;
            }
            count
        }

        let mut transport = MemoryTransport::<8>::new();
        transport.push_rx(b"1234").unwrap();

        assert_eq!(drain(&mut transport), 4);
        assert_eq!(transport.rx_pending(), 0);
    }
}
