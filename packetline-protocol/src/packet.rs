//! Decoded packets and packet handlers
//!
//! A [`Packet`] is a borrowed view of one frame's parameters. It is only
//! valid for the duration of the handler call: the receive buffer it points
//! into is reused by the next frame. Handlers copy whatever they need to
//! keep.
//!
//! Alongside the packet, a handler gets a [`Responder`] writing to the
//! transport the packet arrived on, so it can answer in place.

use core::convert::Infallible;
use core::str::FromStr;

use packetline_hal::TransportTx;

use crate::transmitter::Transmitter;

/// Parameters of one received frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Packet<'a> {
    params: &'a [&'a [u8]],
    clamped: bool,
}

impl<'a> Packet<'a> {
    /// Wrap a parameter list
    ///
    /// `clamped` records that the frame carried more parameters than were
    /// surfaced.
    pub fn new(params: &'a [&'a [u8]], clamped: bool) -> Self {
        Self { params, clamped }
    }

    /// Number of parameters
    ///
    /// Always at least 1 for packets produced by a receiver.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True if there are no parameters
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// All parameters in order
    pub fn params(&self) -> &'a [&'a [u8]] {
        self.params
    }

    /// Parameter at `index`
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.params.get(index).copied()
    }

    /// Iterate over the parameters
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        self.params.iter().copied()
    }

    /// First parameter, conventionally the command name
    pub fn command(&self) -> Option<&'a [u8]> {
        self.get(0)
    }

    /// Parameters after the command
    pub fn args(&self) -> &'a [&'a [u8]] {
        self.params.get(1..).unwrap_or(&[])
    }

    /// Parameter at `index` as UTF-8 text
    pub fn str(&self, index: usize) -> Option<&'a str> {
        self.get(index).and_then(|p| core::str::from_utf8(p).ok())
    }

    /// Parse the parameter at `index`
    ///
    /// Returns `None` if the parameter is missing, not UTF-8, or does not
    /// parse as `T`.
    pub fn parse<T: FromStr>(&self, index: usize) -> Option<T> {
        self.str(index).and_then(|s| s.parse().ok())
    }

    /// Whether parameters were dropped to respect the configured maximum
    pub fn was_clamped(&self) -> bool {
        self.clamped
    }
}

impl<'a> IntoIterator for &Packet<'a> {
    type Item = &'a [u8];
    type IntoIter = core::iter::Copied<core::slice::Iter<'a, &'a [u8]>>;

    fn into_iter(self) -> Self::IntoIter {
        self.params.iter().copied()
    }
}

/// Reply channel for the packet being handled
///
/// Sends go through the same transport the packet was read from, encoded
/// with the receiving side's configuration. When the receiver was fed
/// without a transport, sends do nothing and succeed.
#[derive(Debug)]
pub struct Responder<'r, T: ?Sized> {
    transmitter: Transmitter,
    tx: Option<&'r mut T>,
}

impl<'r, T: TransportTx + ?Sized> Responder<'r, T> {
    /// Reply through `tx`, or nowhere if it is `None`
    pub fn new(transmitter: Transmitter, tx: Option<&'r mut T>) -> Self {
        Self { transmitter, tx }
    }

    /// Whether replies reach a transport
    pub fn is_bound(&self) -> bool {
        self.tx.is_some()
    }

    /// Encoder used for replies
    pub fn transmitter(&self) -> &Transmitter {
        &self.transmitter
    }

    /// Send `bytes` as one raw frame
    pub fn send_raw(&mut self, bytes: &[u8]) -> Result<(), T::Error> {
        match self.tx.as_deref_mut() {
            Some(tx) => self.transmitter.send_raw(tx, bytes),
            None => Ok(()),
        }
    }

    /// Send `params` as one delimited frame
    pub fn send_parameters<S: AsRef<[u8]>>(&mut self, params: &[S]) -> Result<(), T::Error> {
        match self.tx.as_deref_mut() {
            Some(tx) => self.transmitter.send_parameters(tx, params),
            None => Ok(()),
        }
    }
}

/// Reply target of a receiver fed bytes directly
///
/// Uninhabited: a [`Responder`] over it never holds a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unbound {}

impl TransportTx for Unbound {
    type Error = Infallible;

    fn write(&mut self, _data: &[u8]) -> Result<(), Self::Error> {
        match *self {}
    }
}

/// Receives decoded packets
///
/// Invoked synchronously from the receiver's poll. The packet borrows the
/// receive buffer, so it cannot be stored past the call. `T` is the
/// transport replies are written to; handlers that never reply can
/// implement the trait for every `T`.
pub trait PacketHandler<T: ?Sized> {
    /// Handle one packet
    fn on_packet(&mut self, packet: &Packet<'_>, responder: &mut Responder<'_, T>);
}

impl<T: ?Sized, H: PacketHandler<T> + ?Sized> PacketHandler<T> for &mut H {
    fn on_packet(&mut self, packet: &Packet<'_>, responder: &mut Responder<'_, T>) {
        H::on_packet(self, packet, responder)
    }
}

/// Handler backed by a closure, see [`handler_fn`]
#[derive(Debug, Clone, Copy)]
pub struct HandlerFn<F> {
    f: F,
}

/// Use a closure as a [`PacketHandler`] that never replies
///
/// ```
/// use packetline_protocol::{handler_fn, Packet};
///
/// let mut moves = 0;
/// let mut handler = handler_fn(|packet: &Packet<'_>| {
///     if packet.command() == Some(&b"MOVE"[..]) {
///         moves += 1;
///     }
/// });
/// # let _ = &mut handler;
/// ```
pub fn handler_fn<F>(f: F) -> HandlerFn<F>
where
    F: FnMut(&Packet<'_>),
{
    HandlerFn { f }
}

impl<F, T: ?Sized> PacketHandler<T> for HandlerFn<F>
where
    F: FnMut(&Packet<'_>),
{
    fn on_packet(&mut self, packet: &Packet<'_>, _responder: &mut Responder<'_, T>) {
        (self.f)(packet)
    }
}
