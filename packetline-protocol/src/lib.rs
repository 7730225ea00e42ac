//! Packetline framing protocol
//!
//! Turns a polled byte transport into discrete packets of delimited
//! parameters, and encodes parameter lists back into the same wire format.
//! The default dialect is plain ASCII, readable in a serial monitor:
//!
//! ```text
//! ┌───────┬───────┬───────┬─────┬───────┬─────┐
//! │ START │ PARAM │ DELIM │ ... │ PARAM │ END │
//! │ '<'   │ bytes │ '|'   │     │ bytes │ '>' │
//! └───────┴───────┴───────┴─────┴───────┴─────┘
//!
//! <MOVE|10|20>  =>  ["MOVE", "10", "20"]
//! ```
//!
//! A START marker always opens a fresh frame, discarding a partial one. An
//! END marker outside a frame is ignored. Payload bytes beyond the buffer
//! capacity are dropped and latch an overflow flag that the application can
//! poll; the truncated frame is still dispatched unless
//! [`OverflowPolicy::Discard`] is configured.
//!
//! There is no escaping, checksum, acknowledgement or retransmission. A
//! payload byte equal to a marker or the delimiter is read as that control
//! byte, so such bytes must not appear in parameters
//! (see [`FramerConfig::is_reserved`]).
//!
//! Everything is driven from [`Framer::update`] (or [`Receiver::poll`]),
//! which drains the bytes the transport has ready and returns without
//! blocking. Handlers run inside that call and receive parameter views into
//! the receive buffer, valid only until they return, together with a
//! [`Responder`] for replying on the same transport.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

#[macro_use]
mod fmt;

pub mod config;
pub mod decode;
pub mod framer;
pub mod packet;
pub mod receiver;
pub mod transmitter;

#[cfg(test)]
mod testing;

pub use config::{ConfigError, FramerConfig, OverflowPolicy};
pub use decode::{count_parameters, split_parameters};
pub use framer::{Framer, PacketSerial};
pub use packet::{handler_fn, HandlerFn, Packet, PacketHandler, Responder, Unbound};
pub use receiver::{PollSummary, ReceiveState, ReceiveStats, Receiver};
pub use transmitter::{payload_len, EncodeError, Transmitter};
