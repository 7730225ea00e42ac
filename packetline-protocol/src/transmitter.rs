//! Frame encoder
//!
//! Writes `START param (DELIM param)* END` straight to the transport, one
//! piece at a time, so no intermediate frame buffer is needed and no size
//! bound applies. Payload bytes are not escaped: a parameter containing a
//! control byte will be misread by the peer.

use core::fmt;

use packetline_hal::TransportTx;

use crate::config::{ConfigError, FramerConfig};

/// Errors that can occur while encoding a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Payload would not fit a receive buffer of the same configuration
    PayloadTooLarge { len: usize, capacity: usize },
    /// More parameters than a receiver would surface
    TooManyParameters { count: usize, max: usize },
    /// Output buffer too small for the encoded frame
    BufferTooSmall { needed: usize, available: usize },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::PayloadTooLarge { len, capacity } => write!(
                f,
                "payload of {} bytes too large for configured capacity {}",
                len, capacity
            ),
            EncodeError::TooManyParameters { count, max } => {
                write!(f, "{} parameters exceed the maximum of {}", count, max)
            }
            EncodeError::BufferTooSmall { needed, available } => write!(
                f,
                "frame needs {} bytes, buffer holds {}",
                needed, available
            ),
        }
    }
}

/// Payload length of `params` joined by single delimiter bytes
pub fn payload_len<T: AsRef<[u8]>>(params: &[T]) -> usize {
    let bytes: usize = params.iter().map(|p| p.as_ref().len()).sum();
    bytes + params.len().saturating_sub(1)
}

/// Frame encoder
///
/// Stateless apart from its configuration. Sends are never limited by
/// `buffer_capacity` or `max_parameters`: a peer with smaller limits
/// truncates or clamps on its side. Use [`check`](Self::check) first to
/// refuse frames such a peer would cut short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transmitter {
    config: FramerConfig,
}

impl Transmitter {
    /// Create a transmitter
    pub fn new(config: FramerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Transmitter for a configuration validated elsewhere
    pub(crate) const fn from_validated(config: FramerConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Size of the encoded frame for `params`, markers included
    ///
    /// Zero for an empty list, which encodes to nothing.
    pub fn encoded_len<T: AsRef<[u8]>>(&self, params: &[T]) -> usize {
        if params.is_empty() {
            0
        } else {
            payload_len(params) + 2
        }
    }

    /// Check that `params` would reach a peer with this configuration intact
    ///
    /// Fails if the peer would clamp the parameter list or overflow its
    /// receive buffer. Sending does not call this.
    pub fn check<T: AsRef<[u8]>>(&self, params: &[T]) -> Result<(), EncodeError> {
        if params.len() > self.config.max_parameters {
            return Err(EncodeError::TooManyParameters {
                count: params.len(),
                max: self.config.max_parameters,
            });
        }
        let len = payload_len(params);
        if len > self.config.buffer_capacity {
            return Err(EncodeError::PayloadTooLarge {
                len,
                capacity: self.config.buffer_capacity,
            });
        }
        Ok(())
    }

    /// Encode `params` into `buf`
    ///
    /// Returns the number of bytes written. Like the send methods, this
    /// applies no capacity or parameter limit; only `buf` bounds the frame.
    pub fn encode_into<T: AsRef<[u8]>>(
        &self,
        params: &[T],
        buf: &mut [u8],
    ) -> Result<usize, EncodeError> {
        if params.is_empty() {
            return Ok(0);
        }

        let needed = self.encoded_len(params);
        if buf.len() < needed {
            return Err(EncodeError::BufferTooSmall {
                needed,
                available: buf.len(),
            });
        }

        buf[0] = self.config.start_marker;
        let mut pos = 1;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                buf[pos] = self.config.delimiter;
                pos += 1;
            }
            let bytes = param.as_ref();
            buf[pos..pos + bytes.len()].copy_from_slice(bytes);
            pos += bytes.len();
        }
        buf[pos] = self.config.end_marker;

        Ok(pos + 1)
    }

    /// Send `bytes` as the whole payload of one frame
    ///
    /// The bytes are written unmodified and the transport is flushed after
    /// the END marker. An empty payload sends nothing.
    pub fn send_raw<W>(&self, tx: &mut W, bytes: &[u8]) -> Result<(), W::Error>
    where
        W: TransportTx + ?Sized,
    {
        if bytes.is_empty() {
            return Ok(());
        }

        tx.write_byte(self.config.start_marker)?;
        tx.write(bytes)?;
        tx.write_byte(self.config.end_marker)?;
        tx.flush()?;

        trace!("Sent raw frame of {} bytes", bytes.len());
        Ok(())
    }

    /// Send `params` as one delimited frame
    ///
    /// Parameters are written one at a time, then the transport is flushed.
    /// An empty list sends nothing.
    pub fn send_parameters<W, T>(&self, tx: &mut W, params: &[T]) -> Result<(), W::Error>
    where
        W: TransportTx + ?Sized,
        T: AsRef<[u8]>,
    {
        if params.is_empty() {
            return Ok(());
        }

        tx.write_byte(self.config.start_marker)?;
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                tx.write_byte(self.config.delimiter)?;
            }
            tx.write(param.as_ref())?;
        }
        tx.write_byte(self.config.end_marker)?;
        tx.flush()?;

        trace!("Sent frame with {} parameters", params.len());
        Ok(())
    }
}
