// ============================================
// File: crates/keylink-transport/src/error.rs
// ============================================
//! # Transport Error Types
//!
//! ## Creation Reason
//! Defines error types specific to the byte-channel layer: connection
//! setup, exact-length read/write failures, and shutdown.
//!
//! ## Main Functionality
//! - `TransportError`: Primary error enum for transport operations
//! - Error conversion from system errors
//! - Categorization of retryable vs fatal errors
//!
//! ## Error Categories
//! 1. **Connection Errors**: Connect/accept failures, bad addresses
//! 2. **Channel Errors**: Read/write failures, short reads, timeouts
//! 3. **Configuration Errors**: Invalid settings
//! 4. **System Errors**: Wrapped I/O errors
//!
//! ## ⚠️ Important Note for Next Developer
//! - `ShortRead` is the only acceptable outcome for a channel that
//!   closes mid-key; never let a truncated buffer escape as data
//! - A failed handshake attempt is not retried here; retry policy
//!   belongs to the caller (fresh session, fresh keys)
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use std::io;

use thiserror::Error;

use keylink_common::error::CommonError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

// ============================================
// TransportError
// ============================================

/// Transport layer error types.
///
/// # Categories
/// - **Connection**: Setup and teardown errors
/// - **Channel**: Errors on the established byte channel
/// - **Config**: Configuration and address errors
#[derive(Error, Debug)]
pub enum TransportError {
    // ========================================
    // Connection Errors
    // ========================================

    /// Failed to connect to the peer endpoint.
    #[error("Failed to connect to {addr}: {reason}")]
    ConnectFailed {
        /// Address we tried to reach
        addr: String,
        /// Why connecting failed
        reason: String,
    },

    /// Failed to accept an inbound connection.
    #[error("Failed to accept on {addr}: {reason}")]
    AcceptFailed {
        /// Address we were listening on
        addr: String,
        /// Why accepting failed
        reason: String,
    },

    /// The address string could not be parsed.
    #[error("Invalid address: {addr}")]
    InvalidAddress {
        /// The invalid address string
        addr: String,
    },

    // ========================================
    // Channel Errors
    // ========================================

    /// Read operation failed.
    #[error("Read failed: {reason}")]
    ReadFailed {
        /// Why the read failed
        reason: String,
    },

    /// Write operation failed.
    #[error("Write failed: {reason}")]
    WriteFailed {
        /// Why the write failed
        reason: String,
    },

    /// The channel closed before an exact-length read completed.
    #[error("Channel closed early: expected {expected} bytes, got {got}")]
    ShortRead {
        /// Bytes the caller asked for
        expected: usize,
        /// Bytes delivered before the channel closed
        got: usize,
    },

    /// Operation timed out.
    #[error("Operation timed out: {operation}")]
    Timeout {
        /// What operation timed out
        operation: String,
    },

    /// The transport has been shut down.
    #[error("Transport is shut down")]
    ShuttingDown,

    // ========================================
    // Configuration Errors
    // ========================================

    /// Invalid configuration.
    #[error("Invalid configuration: {field} - {reason}")]
    InvalidConfig {
        /// Configuration field name
        field: String,
        /// Why it's invalid
        reason: String,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// I/O error from the system.
    #[error("I/O error: {context}")]
    Io {
        /// What was happening when the error occurred
        context: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Error from common crate.
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl TransportError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates a `ConnectFailed` error.
    pub fn connect_failed(addr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConnectFailed {
            addr: addr.into(),
            reason: reason.into(),
        }
    }

    /// Creates an `AcceptFailed` error.
    pub fn accept_failed(addr: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::AcceptFailed {
            addr: addr.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `ShortRead` error.
    #[must_use]
    pub const fn short_read(expected: usize, got: usize) -> Self {
        Self::ShortRead { expected, got }
    }

    /// Creates a `Timeout` error.
    pub fn timeout(operation: impl Into<String>) -> Self {
        Self::Timeout {
            operation: operation.into(),
        }
    }

    /// Creates an `Io` error with context.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates an `InvalidConfig` error.
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if a fresh handshake attempt might succeed.
    ///
    /// The session itself never retries; this informs the caller's
    /// own retry policy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::ConnectFailed { .. } | Self::AcceptFailed { .. } => true,
            Self::Io { source, .. } => matches!(
                source.kind(),
                io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted | io::ErrorKind::TimedOut
            ),
            _ => false,
        }
    }

    /// Returns `true` if this error occurred on an established channel.
    #[must_use]
    pub const fn is_channel_error(&self) -> bool {
        matches!(
            self,
            Self::ReadFailed { .. }
                | Self::WriteFailed { .. }
                | Self::ShortRead { .. }
                | Self::Timeout { .. }
        )
    }
}

// ============================================
// Error Conversions
// ============================================

impl From<io::Error> for TransportError {
    fn from(err: io::Error) -> Self {
        Self::Io {
            context: "unspecified I/O operation".into(),
            source: err,
        }
    }
}

// ============================================
// Tests
// ============================================
