//! Framer configuration
//!
//! Marker bytes, buffer limits and the overflow policy, fixed when a
//! receiver, transmitter or framer is constructed.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default frame-open marker
pub const DEFAULT_START_MARKER: u8 = b'<';

/// Default frame-close marker
pub const DEFAULT_END_MARKER: u8 = b'>';

/// Default parameter separator
pub const DEFAULT_DELIMITER: u8 = b'|';

/// Default receive buffer size in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 256;

/// Default number of parameters surfaced per packet
pub const DEFAULT_MAX_PARAMETERS: usize = 10;

/// What to do with a frame whose payload did not fit the receive buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum OverflowPolicy {
    /// Dispatch whatever fit; the tail of the frame is missing
    #[default]
    Dispatch,
    /// Drop the frame at its end marker without dispatching
    Discard,
}

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Start marker, end marker and delimiter are not pairwise distinct
    MarkersNotDistinct,
    /// Buffer capacity is zero
    ZeroCapacity,
    /// Maximum parameter count is zero
    ZeroParameters,
    /// Buffer capacity exceeds the backing storage
    CapacityExceedsStorage { requested: usize, available: usize },
    /// Parameter count exceeds the available parameter slots
    ParametersExceedStorage { requested: usize, available: usize },
    /// Persisted configuration could not be decoded
    Deserialize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MarkersNotDistinct => {
                f.write_str("start marker, end marker and delimiter must be distinct")
            }
            ConfigError::ZeroCapacity => f.write_str("buffer capacity must be at least 1"),
            ConfigError::ZeroParameters => f.write_str("max parameters must be at least 1"),
            ConfigError::CapacityExceedsStorage {
                requested,
                available,
            } => write!(
                f,
                "buffer capacity {} exceeds storage of {} bytes",
                requested, available
            ),
            ConfigError::ParametersExceedStorage {
                requested,
                available,
            } => write!(
                f,
                "max parameters {} exceeds {} parameter slots",
                requested, available
            ),
            ConfigError::Deserialize => f.write_str("invalid persisted configuration"),
        }
    }
}

/// Framing configuration
///
/// The three control bytes must be pairwise distinct. Payload bytes are sent
/// unescaped, so a payload byte equal to any of them is indistinguishable
/// from the control byte on the wire; see [`is_reserved`](Self::is_reserved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FramerConfig {
    /// Frame-open sentinel byte
    pub start_marker: u8,
    /// Frame-close sentinel byte
    pub end_marker: u8,
    /// Parameter-separator byte
    pub delimiter: u8,
    /// Max raw payload bytes retained per frame
    pub buffer_capacity: usize,
    /// Max parameter views surfaced per dispatch
    pub max_parameters: usize,
    /// Handling of frames that overflowed the buffer
    pub overflow_policy: OverflowPolicy,
}

impl Default for FramerConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FramerConfig {
    /// ASCII defaults: `<`, `>`, `|`, 256 bytes, 10 parameters
    pub const fn new() -> Self {
        Self {
            start_marker: DEFAULT_START_MARKER,
            end_marker: DEFAULT_END_MARKER,
            delimiter: DEFAULT_DELIMITER,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_parameters: DEFAULT_MAX_PARAMETERS,
            overflow_policy: OverflowPolicy::Dispatch,
        }
    }

    /// Replace the three control bytes
    pub const fn with_markers(mut self, start: u8, end: u8, delimiter: u8) -> Self {
        self.start_marker = start;
        self.end_marker = end;
        self.delimiter = delimiter;
        self
    }

    /// Set the receive buffer capacity
    pub const fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Set the maximum parameter count
    pub const fn with_max_parameters(mut self, max: usize) -> Self {
        self.max_parameters = max;
        self
    }

    /// Set the overflow policy
    pub const fn with_overflow_policy(mut self, policy: OverflowPolicy) -> Self {
        self.overflow_policy = policy;
        self
    }

    /// Check the configuration on its own terms
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.start_marker == self.end_marker
            || self.start_marker == self.delimiter
            || self.end_marker == self.delimiter
        {
            return Err(ConfigError::MarkersNotDistinct);
        }
        if self.buffer_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if self.max_parameters == 0 {
            return Err(ConfigError::ZeroParameters);
        }
        Ok(())
    }

    /// Check the configuration against `storage` bytes and `slots` parameters
    pub fn validate_for(&self, storage: usize, slots: usize) -> Result<(), ConfigError> {
        self.validate()?;
        if self.buffer_capacity > storage {
            return Err(ConfigError::CapacityExceedsStorage {
                requested: self.buffer_capacity,
                available: storage,
            });
        }
        if self.max_parameters > slots {
            return Err(ConfigError::ParametersExceedStorage {
                requested: self.max_parameters,
                available: slots,
            });
        }
        Ok(())
    }

    /// Whether `byte` collides with a control byte
    ///
    /// Such a byte cannot be carried inside a payload or parameter.
    pub fn is_reserved(&self, byte: u8) -> bool {
        byte == self.start_marker || byte == self.end_marker || byte == self.delimiter
    }

    /// Load a configuration stored as postcard binary data
    ///
    /// The decoded value is validated before it is returned.
    #[cfg(feature = "serde")]
    pub fn from_postcard(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        config.validate()?;
        Ok(config)
    }

    /// Store this configuration as postcard binary data
    ///
    /// Returns the used part of `buf`, or `None` if it is too small.
    #[cfg(feature = "serde")]
    pub fn to_postcard<'a>(&self, buf: &'a mut [u8]) -> Option<&'a mut [u8]> {
        postcard::to_slice(self, buf).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = FramerConfig::default();
        assert_eq!(config.start_marker, b'<');
        assert_eq!(config.end_marker, b'>');
        assert_eq!(config.delimiter, b'|');
        assert_eq!(config.overflow_policy, OverflowPolicy::Dispatch);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_rejects_shared_markers() {
        let same_start_end = FramerConfig::new().with_markers(b'#', b'#', b',');
        let same_start_delim = FramerConfig::new().with_markers(b'#', b';', b'#');
        let same_end_delim = FramerConfig::new().with_markers(b'[', b']', b']');

        for config in [same_start_end, same_start_delim, same_end_delim] {
            assert_eq!(config.validate(), Err(ConfigError::MarkersNotDistinct));
        }
    }

    #[test]
    fn test_rejects_zero_limits() {
        assert_eq!(
            FramerConfig::new().with_buffer_capacity(0).validate(),
            Err(ConfigError::ZeroCapacity)
        );
        assert_eq!(
            FramerConfig::new().with_max_parameters(0).validate(),
            Err(ConfigError::ZeroParameters)
        );
    }

    #[test]
    fn test_validate_for_storage() {
        let config = FramerConfig::new().with_buffer_capacity(64).with_max_parameters(4);

        assert_eq!(config.validate_for(64, 4), Ok(()));
        assert_eq!(
            config.validate_for(32, 4),
            Err(ConfigError::CapacityExceedsStorage {
                requested: 64,
                available: 32
            })
        );
        assert_eq!(
            config.validate_for(64, 2),
            Err(ConfigError::ParametersExceedStorage {
                requested: 4,
                available: 2
            })
        );
    }

    #[test]
    fn test_is_reserved() {
        let config = FramerConfig::new();
        assert!(config.is_reserved(b'<'));
        assert!(config.is_reserved(b'>'));
        assert!(config.is_reserved(b'|'));
        assert!(!config.is_reserved(b'A'));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_persistence() {
        let config = FramerConfig::new()
            .with_markers(0x02, 0x03, 0x1F)
            .with_buffer_capacity(128)
            .with_overflow_policy(OverflowPolicy::Discard);

        let mut buf = [0u8; 32];
        let stored = config.to_postcard(&mut buf).unwrap();
        let loaded = FramerConfig::from_postcard(stored).unwrap();

        assert_eq!(loaded, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_rejects_invalid() {
        let config = FramerConfig::new().with_markers(b'x', b'x', b'|');
        let mut buf = [0u8; 32];
        let stored = config.to_postcard(&mut buf).unwrap();

        assert_eq!(
            FramerConfig::from_postcard(stored),
            Err(ConfigError::MarkersNotDistinct)
        );
        assert_eq!(
            FramerConfig::from_postcard(&[0xFF]),
            Err(ConfigError::Deserialize)
        );
    }
}
