//! Framer: receiver and transmitter over one borrowed transport
//!
//! Typical main loop:
//!
//! ```
//! use packetline_hal::MemoryTransport;
//! use packetline_protocol::{handler_fn, FramerConfig, Packet, PacketSerial};
//!
//! let mut serial = MemoryTransport::<64>::new();
//! serial.push_rx(b"<MOVE|10|20>").unwrap();
//!
//! let mut moves = 0;
//! let handler = handler_fn(|packet: &Packet<'_>| {
//!     if packet.command() == Some(&b"MOVE"[..]) {
//!         moves += packet.len();
//!     }
//! });
//!
//! let mut framer: PacketSerial<'_, _, _> =
//!     PacketSerial::with_handler(FramerConfig::new(), handler).unwrap();
//! framer.set_transport(&mut serial);
//!
//! framer.update().unwrap();
//! if framer.overflow() {
//!     // tell the sender its frame was truncated
//! }
//! framer.send_parameters(&["OK"]).unwrap();
//! # drop(framer);
//! # assert_eq!(moves, 3);
//! # assert_eq!(serial.written(), b"<OK>");
//! ```

use packetline_hal::{Transport, TransportRx, TransportTx};

use crate::config::{ConfigError, FramerConfig, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_PARAMETERS};
use crate::packet::PacketHandler;
use crate::receiver::{PollSummary, ReceiveState, ReceiveStats, Receiver};
use crate::transmitter::Transmitter;

/// Framer with the ASCII defaults: `<`, `>`, `|`, 256 bytes, 10 parameters
pub type PacketSerial<'t, T, H> = Framer<'t, T, H, DEFAULT_BUFFER_CAPACITY, DEFAULT_MAX_PARAMETERS>;

/// Packet framer
///
/// `N` sizes the receive buffer and `P` the parameter list handed to the
/// handler. The transport is borrowed, never owned: it can be bound,
/// replaced or taken back between polls. Without a transport, polling and
/// sending do nothing; without a handler, completed frames are dropped.
/// Handlers reply through their [`Responder`](crate::Responder), which
/// writes to the bound transport.
#[derive(Debug)]
pub struct Framer<
    't,
    T: ?Sized,
    H,
    const N: usize = DEFAULT_BUFFER_CAPACITY,
    const P: usize = DEFAULT_MAX_PARAMETERS,
> {
    receiver: Receiver<N>,
    transmitter: Transmitter,
    transport: Option<&'t mut T>,
    handler: Option<H>,
}

impl<'t, T, H, const N: usize, const P: usize> Framer<'t, T, H, N, P>
where
    T: Transport + ?Sized,
    H: PacketHandler<T>,
{
    /// Create a framer with no transport and no handler
    pub fn new(config: FramerConfig) -> Result<Self, ConfigError> {
        config.validate_for(N, P)?;
        Ok(Self {
            receiver: Receiver::new(config)?,
            transmitter: Transmitter::new(config)?,
            transport: None,
            handler: None,
        })
    }

    /// Create a framer that dispatches to `handler`
    pub fn with_handler(config: FramerConfig, handler: H) -> Result<Self, ConfigError> {
        let mut framer = Self::new(config)?;
        framer.handler = Some(handler);
        Ok(framer)
    }

    /// Active configuration
    pub fn config(&self) -> &FramerConfig {
        self.receiver.config()
    }

    /// Bind a transport, returning the previous one
    pub fn set_transport(&mut self, transport: &'t mut T) -> Option<&'t mut T> {
        self.transport.replace(transport)
    }

    /// Unbind and return the transport
    pub fn take_transport(&mut self) -> Option<&'t mut T> {
        self.transport.take()
    }

    /// The bound transport
    ///
    /// Reading from or writing to it directly can desynchronise the
    /// protocol; the framer never had exclusive use of the channel anyway.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_deref()
    }

    /// The bound transport, mutably
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_deref_mut()
    }

    /// Install a handler, returning the previous one
    pub fn set_handler(&mut self, handler: H) -> Option<H> {
        self.handler.replace(handler)
    }

    /// Remove and return the handler
    pub fn take_handler(&mut self) -> Option<H> {
        self.handler.take()
    }

    /// The installed handler
    pub fn handler(&self) -> Option<&H> {
        self.handler.as_ref()
    }

    /// The installed handler, mutably
    pub fn handler_mut(&mut self) -> Option<&mut H> {
        self.handler.as_mut()
    }

    /// Service the transport
    ///
    /// Call this often, ideally once per main-loop iteration. Drains every
    /// available byte and dispatches each completed frame before returning.
    pub fn update(&mut self) -> Result<PollSummary, <T as TransportRx>::Error> {
        let Some(transport) = self.transport.as_deref_mut() else {
            return Ok(PollSummary::default());
        };
        self.receiver
            .poll::<P, T, H>(transport, self.handler.as_mut())
    }

    /// Whether the receive buffer overflowed
    ///
    /// Check it right after [`update`](Self::update). The flag stays set
    /// until the next START marker arrives, not until it is read.
    pub fn overflow(&self) -> bool {
        self.receiver.overflow()
    }

    /// Receiver state
    pub fn state(&self) -> ReceiveState {
        self.receiver.state()
    }

    /// Receive counters
    pub fn stats(&self) -> &ReceiveStats {
        self.receiver.stats()
    }

    /// Abandon any partial frame
    pub fn reset(&mut self) {
        self.receiver.reset();
    }

    /// The receive half
    pub fn receiver(&self) -> &Receiver<N> {
        &self.receiver
    }

    /// The transmit half
    pub fn transmitter(&self) -> &Transmitter {
        &self.transmitter
    }

    /// Send `bytes` as one raw frame
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<(), <T as TransportTx>::Error> {
        match self.transport.as_deref_mut() {
            Some(transport) => self.transmitter.send_raw(transport, bytes),
            None => Ok(()),
        }
    }

    /// Send `params` as one delimited frame
    pub fn send_parameters<S: AsRef<[u8]>>(
        &mut self,
        params: &[S],
    ) -> Result<(), <T as TransportTx>::Error> {
        match self.transport.as_deref_mut() {
            Some(transport) => self.transmitter.send_parameters(transport, params),
            None => Ok(()),
        }
    }
}
