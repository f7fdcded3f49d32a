// ============================================
// File: crates/keylink-transport/src/lib.rs
// ============================================
//! # Keylink Transport - Byte-Stream I/O Layer
//!
//! ## Creation Reason
//! Provides the byte-channel abstraction the handshake runs over. The
//! session only ever needs two operations on the channel: read exactly
//! N bytes, write exactly N bytes. Everything below that (TCP, serial
//! line discipline, in-memory pipes) is an implementation detail.
//!
//! ## Main Functionality
//!
//! ### Modules
//! - [`traits`]: `Transport` trait definition
//! - [`stream`]: Generic implementation over any async byte stream
//! - [`tcp`]: TCP connect/accept helpers
//! - [`mock`]: Scripted transport for failure-path testing
//! - [`error`]: Transport-specific error types
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               keylink-cli                           │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   keylink-core         keylink-transport           │
//! │                        You are here ◄──            │
//! │         │                     │                    │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             keylink-common                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract
//! The handshake requires exact-length atomic reads and writes with no
//! interleaving of other traffic on the same channel. Framing, parity,
//! and baud-rate concerns belong to whatever sits behind the stream,
//! never to the session.
//!
//! ## ⚠️ Important Note for Next Developer
//! - A short read (channel closed before the buffer filled) MUST surface
//!   as `ShortRead`, never as a zero-padded buffer
//! - Always use the trait in consumers for testability
//!
//! ## Last Modified
//! v0.1.0 - Initial transport layer implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod mock;
pub mod stream;
pub mod tcp;
pub mod traits;

// Re-export primary types
pub use error::{Result, TransportError};
pub use mock::{MockTransport, ReadStep};
pub use stream::{loopback_pair, StreamTransport};
pub use tcp::TcpTransport;
pub use traits::Transport;
