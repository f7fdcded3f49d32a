// ============================================
// File: crates/keylink-transport/src/traits.rs
// ============================================
//! # Transport Traits
//!
//! ## Creation Reason
//! Defines the abstract interface the handshake session uses to talk to
//! its byte channel, enabling testability and flexibility in
//! implementation choices.
//!
//! ## Main Functionality
//! - `Transport`: exact-length, point-to-point byte channel interface
//!
//! ## Design Philosophy
//! - Traits enable mock implementations for testing
//! - Async-first design with `async_trait`
//! - `&mut self` everywhere: the channel is exclusively owned by one
//!   session for the duration of the exchange
//!
//! ## ⚠️ Important Note for Next Developer
//! - `read_exact` and `write_all` are all-or-error; partial progress
//!   never escapes to the caller
//! - Implementations decide nothing about ordering or timing; that is
//!   the session's job
//!
//! ## Last Modified
//! v0.1.0 - Initial trait definitions

use async_trait::async_trait;

use crate::error::Result;

// ============================================
// Transport Trait
// ============================================

/// Abstract interface for a point-to-point byte channel.
///
/// # Purpose
/// The handshake exchanges two fixed-size binary values over a channel
/// that may be slow or partially buffered. This trait reduces the
/// channel to the only two operations the session needs.
///
/// # Blocking Semantics
/// Both operations complete fully or fail; `read_exact` awaits until the
/// buffer is filled (or the channel closes/errors), `write_all` awaits
/// until every byte is flushed. There is no timeout at this layer - the
/// caller wraps operations in its own deadline if it wants one.
///
/// # Example
/// ```ignore
/// async fn swap_keys<T: Transport>(link: &mut T, ours: &[u8; 32]) -> Result<[u8; 32]> {
///     let mut theirs = [0u8; 32];
///     link.read_exact(&mut theirs).await?;
///     link.write_all(ours).await?;
///     Ok(theirs)
/// }
/// ```
#[async_trait]
pub trait Transport: Send {
    /// Reads exactly `buf.len()` bytes from the channel.
    ///
    /// # Errors
    /// - `ShortRead` if the channel closes before the buffer fills
    /// - `ReadFailed` / `Io` on channel errors
    /// - `ShuttingDown` if the transport was already shut down
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Writes all of `buf` to the channel and flushes it.
    ///
    /// # Errors
    /// - `WriteFailed` / `Io` on channel errors
    /// - `ShuttingDown` if the transport was already shut down
    async fn write_all(&mut self, buf: &[u8]) -> Result<()>;

    /// Gracefully closes the channel.
    ///
    /// After shutdown, all operations return `ShuttingDown`.
    ///
    /// # Errors
    /// Returns error if the close itself fails.
    async fn shutdown(&mut self) -> Result<()>;

    /// Returns `true` if the channel is still usable.
    fn is_active(&self) -> bool;
}
