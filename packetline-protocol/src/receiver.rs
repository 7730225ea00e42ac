//! Receive state machine
//!
//! Frames are collected one byte at a time:
//! - START marker: (re)open a frame, discarding any partial one
//! - END marker: close the open frame and hand it on
//! - anything else: append to the open frame, or ignore it when idle
//!
//! Payload bytes past the buffer capacity are dropped and latch the
//! overflow flag until the next START marker.

use heapless::Vec;
use packetline_hal::{Transport, TransportRx, TransportTx};

use crate::config::{ConfigError, FramerConfig, OverflowPolicy, DEFAULT_BUFFER_CAPACITY};
use crate::decode::{count_parameters, split_parameters};
use crate::packet::{Packet, PacketHandler, Responder, Unbound};
use crate::transmitter::Transmitter;

/// Receiver states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveState {
    /// Waiting for a START marker
    Idle,
    /// Collecting payload bytes
    Receiving,
}

/// Running counters, saturating at `u32::MAX`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ReceiveStats {
    /// Frames closed by an END marker and handed on
    pub frames_completed: u32,
    /// Partial frames abandoned because a new START marker arrived
    pub frames_restarted: u32,
    /// Overflowed frames dropped under [`OverflowPolicy::Discard`]
    pub frames_dropped: u32,
    /// Frames that overflowed the buffer
    pub overflows: u32,
    /// Dispatches whose parameter list was clamped
    pub parameters_clamped: u32,
    /// Bytes ignored outside a frame, stray END markers included
    pub stray_bytes: u32,
}

/// Outcome of one [`Receiver::poll`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollSummary {
    /// Bytes pulled from the transport
    pub bytes_read: usize,
    /// Handler invocations
    pub packets_dispatched: usize,
}

/// Frame receiver
///
/// `N` is the size of the backing buffer; the configured
/// `buffer_capacity` may use all or part of it.
#[derive(Debug, Clone)]
pub struct Receiver<const N: usize = DEFAULT_BUFFER_CAPACITY> {
    config: FramerConfig,
    state: ReceiveState,
    buffer: Vec<u8, N>,
    overflowed: bool,
    stats: ReceiveStats,
}

impl<const N: usize> Receiver<N> {
    /// Create a receiver
    ///
    /// Fails if the configuration is invalid or its buffer capacity exceeds
    /// `N`.
    pub fn new(config: FramerConfig) -> Result<Self, ConfigError> {
        config.validate_for(N, usize::MAX)?;
        Ok(Self {
            config,
            state: ReceiveState::Idle,
            buffer: Vec::new(),
            overflowed: false,
            stats: ReceiveStats::default(),
        })
    }

    /// Active configuration
    pub fn config(&self) -> &FramerConfig {
        &self.config
    }

    /// Current state
    pub fn state(&self) -> ReceiveState {
        self.state
    }

    /// Whether the current (or last) frame overflowed the buffer
    ///
    /// Reading the flag does not clear it; only the next START marker does.
    pub fn overflow(&self) -> bool {
        self.overflowed
    }

    /// Payload bytes held for the open frame
    pub fn buffered(&self) -> usize {
        match self.state {
            ReceiveState::Idle => 0,
            ReceiveState::Receiving => self.buffer.len(),
        }
    }

    /// Counters since construction
    pub fn stats(&self) -> &ReceiveStats {
        &self.stats
    }

    /// Abandon any open frame and clear the overflow flag
    pub fn reset(&mut self) {
        self.state = ReceiveState::Idle;
        self.buffer.clear();
        self.overflowed = false;
    }

    fn begin_frame(&mut self) {
        self.buffer.clear();
        self.overflowed = false;
        self.state = ReceiveState::Receiving;
    }

    /// Feed a single byte
    ///
    /// Returns the completed frame's payload when this byte is an END marker
    /// closing a frame that should be dispatched. The slice borrows the
    /// receive buffer and is overwritten by the next frame.
    pub fn feed(&mut self, byte: u8) -> Option<&[u8]> {
        if byte == self.config.start_marker {
            if self.state == ReceiveState::Receiving {
                debug!(
                    "Frame restarted, discarding {} buffered bytes",
                    self.buffer.len()
                );
                self.stats.frames_restarted = self.stats.frames_restarted.saturating_add(1);
            }
            self.begin_frame();
            return None;
        }

        match self.state {
            ReceiveState::Idle => {
                // Outside a frame; stray END markers land here too
                self.stats.stray_bytes = self.stats.stray_bytes.saturating_add(1);
                None
            }
            ReceiveState::Receiving if byte == self.config.end_marker => {
                self.state = ReceiveState::Idle;

                if self.overflowed && self.config.overflow_policy == OverflowPolicy::Discard {
                    warn!("Dropping overflowed frame ({} bytes kept)", self.buffer.len());
                    self.stats.frames_dropped = self.stats.frames_dropped.saturating_add(1);
                    return None;
                }

                self.stats.frames_completed = self.stats.frames_completed.saturating_add(1);
                Some(self.buffer.as_slice())
            }
            ReceiveState::Receiving => {
                let has_room = self.buffer.len() < self.config.buffer_capacity;
                if !has_room || self.buffer.push(byte).is_err() {
                    if !self.overflowed {
                        warn!(
                            "Receive buffer overflow at {} bytes",
                            self.config.buffer_capacity
                        );
                        self.stats.overflows = self.stats.overflows.saturating_add(1);
                    }
                    self.overflowed = true;
                }
                None
            }
        }
    }

    /// Feed a byte and hand a completed frame to `handler`
    ///
    /// The frame is split into at most `min(max_parameters, P)` parameters.
    /// The handler's [`Responder`] writes to `tx`, if given. Without a
    /// handler, completed frames are consumed silently. Returns true if the
    /// handler was invoked.
    pub fn feed_and_dispatch<const P: usize, T, H>(
        &mut self,
        byte: u8,
        tx: Option<&mut T>,
        handler: Option<&mut H>,
    ) -> bool
    where
        T: TransportTx + ?Sized,
        H: PacketHandler<T> + ?Sized,
    {
        let config = self.config;

        let Some(frame) = self.feed(byte) else {
            return false;
        };
        let Some(handler) = handler else {
            return false;
        };

        // Parameters borrow the buffer; they must be gone before stats update
        let clamped = {
            let params = split_parameters::<P>(frame, config.delimiter, config.max_parameters);
            let total = count_parameters(frame, config.delimiter);
            let clamped = total > params.len();
            if clamped {
                debug!("Clamped {} parameters to {}", total, params.len());
            }

            trace!("Dispatching packet with {} parameters", params.len());
            let mut responder = Responder::new(Transmitter::from_validated(config), tx);
            handler.on_packet(&Packet::new(&params, clamped), &mut responder);
            clamped
        };

        if clamped {
            self.stats.parameters_clamped = self.stats.parameters_clamped.saturating_add(1);
        }
        true
    }

    /// Feed a chunk of bytes, dispatching every frame it completes
    ///
    /// There is no transport to reply through, so the handler's responder
    /// is unbound. Returns the number of handler invocations.
    pub fn feed_bytes<const P: usize, H>(&mut self, bytes: &[u8], mut handler: Option<&mut H>) -> usize
    where
        H: PacketHandler<Unbound> + ?Sized,
    {
        let mut dispatched = 0;
        for &byte in bytes {
            if self.feed_and_dispatch::<P, Unbound, H>(byte, None, handler.as_deref_mut()) {
                dispatched += 1;
            }
        }
        dispatched
    }

    /// Drain every byte the transport has available
    ///
    /// Never waits for data: bytes are read only while the transport reports
    /// them available. Handlers reply through the same transport. A read
    /// failure ends the poll and is returned; the receiver keeps its state,
    /// so the next poll continues the open frame.
    pub fn poll<const P: usize, R, H>(
        &mut self,
        transport: &mut R,
        mut handler: Option<&mut H>,
    ) -> Result<PollSummary, <R as TransportRx>::Error>
    where
        R: Transport + ?Sized,
        H: PacketHandler<R> + ?Sized,
    {
        let mut summary = PollSummary::default();

        loop {
            let available = transport.bytes_available()?;
            if available == 0 {
                break;
            }

            for _ in 0..available {
                let byte = match transport.read_byte() {
                    Ok(byte) => byte,
                    Err(e) => {
                        warn!("Transport read failed after {} bytes", summary.bytes_read);
                        return Err(e);
                    }
                };
                summary.bytes_read += 1;

                if self.feed_and_dispatch::<P, R, H>(
                    byte,
                    Some(&mut *transport),
                    handler.as_deref_mut(),
                ) {
                    summary.packets_dispatched += 1;
                }
            }
        }

        Ok(summary)
    }
}
