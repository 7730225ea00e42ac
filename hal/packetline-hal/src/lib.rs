//! Packetline Hardware Abstraction Layer
//!
//! This crate defines the byte transport traits the framing protocol runs
//! on. A transport is anything that can report how many bytes are waiting,
//! hand them out one at a time without blocking, and accept outbound bytes:
//! a UART, a USB CDC endpoint, a socket, or an in-memory buffer in tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  packetline-protocol (Framer)           │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  packetline-hal (this crate - traits)   │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ MemoryTrans-  │       │  IoTransport  │
//! │ port (host)   │       │ (embedded-io) │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`transport::TransportRx`] - Non-blocking receive half
//! - [`transport::TransportTx`] - Transmit half
//! - [`transport::Transport`] - Both halves on one peripheral

#![no_std]
#![deny(unsafe_code)]

#[cfg(feature = "embedded-io")]
pub mod io;
pub mod memory;
pub mod transport;

// Re-export key traits at crate root for convenience
#[cfg(feature = "embedded-io")]
pub use io::IoTransport;
pub use memory::{MemoryError, MemoryTransport};
pub use transport::{Transport, TransportRx, TransportTx};
