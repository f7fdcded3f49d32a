// ============================================
// File: crates/keylink-core/src/error.rs
// ============================================
//! # Core Error Types
//!
//! ## Creation Reason
//! Defines error types for key generation, shared-secret derivation,
//! and the handshake session.
//!
//! ## Main Functionality
//! - `CoreError`: Primary error enum for core operations
//! - Classification of crypto vs transport failures
//!
//! ## Error Categories
//! 1. **Crypto Errors**: Entropy unavailable, degenerate peer key
//! 2. **Transport Errors**: Wrapped channel failures
//! 3. **Configuration Errors**: Wrapped validation failures
//!
//! ## ⚠️ Important Note for Next Developer
//! - NEVER include key material in error messages
//! - Every error is fatal for the attempt: the caller's retry policy
//!   is a fresh session with a fresh keypair
//!
//! ## Last Modified
//! v0.1.0 - Initial error definitions

use thiserror::Error;

use keylink_common::error::CommonError;
use keylink_transport::error::TransportError;

// ============================================
// Result Type Alias
// ============================================

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

// ============================================
// CoreError
// ============================================

/// Core error types for key agreement and handshake operations.
///
/// # Security Note
/// Error messages are designed to be informative for debugging
/// without revealing sensitive information like key material.
#[derive(Error, Debug)]
pub enum CoreError {
    // ========================================
    // Cryptographic Errors
    // ========================================

    /// The secure random source could not supply key material.
    ///
    /// Fatal and non-retryable: a session without entropy cannot
    /// proceed safely. Raised before any I/O happens.
    #[error("Entropy source unavailable: {reason}")]
    EntropyUnavailable {
        /// Why the random source failed
        reason: String,
    },

    /// The peer's public key is a low-order or identity point.
    ///
    /// Scalar multiplication against such a point yields a degenerate
    /// shared secret regardless of our private key.
    #[error("Malformed peer key: {reason}")]
    MalformedPeerKey {
        /// What made the key degenerate
        reason: String,
    },

    // ========================================
    // Wrapped Errors
    // ========================================

    /// Error from the transport layer.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Error from common crate (validation, state).
    #[error(transparent)]
    Common(#[from] CommonError),
}

impl CoreError {
    // ========================================
    // Convenience Constructors
    // ========================================

    /// Creates an `EntropyUnavailable` error.
    pub fn entropy_unavailable(reason: impl Into<String>) -> Self {
        Self::EntropyUnavailable {
            reason: reason.into(),
        }
    }

    /// Creates a `MalformedPeerKey` error.
    pub fn malformed_peer_key(reason: impl Into<String>) -> Self {
        Self::MalformedPeerKey {
            reason: reason.into(),
        }
    }

    // ========================================
    // Error Classification
    // ========================================

    /// Returns `true` if this is a cryptographic error.
    ///
    /// Crypto errors might indicate an attack or a broken environment.
    #[must_use]
    pub const fn is_crypto_error(&self) -> bool {
        matches!(
            self,
            Self::EntropyUnavailable { .. } | Self::MalformedPeerKey { .. }
        )
    }

    /// Returns `true` if this error might indicate an attack.
    ///
    /// These errors warrant additional logging/monitoring.
    #[must_use]
    pub const fn is_suspicious(&self) -> bool {
        matches!(self, Self::MalformedPeerKey { .. })
    }

    /// Returns `true` if a fresh handshake attempt might succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            Self::Common(e) => e.is_retryable(),
            Self::EntropyUnavailable { .. } | Self::MalformedPeerKey { .. } => false,
        }
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::entropy_unavailable("os rng failed");
        assert!(err.to_string().contains("os rng failed"));

        let err = CoreError::malformed_peer_key("identity point");
        assert!(err.to_string().contains("identity point"));
    }

    #[test]
    fn test_error_classification() {
        let entropy = CoreError::entropy_unavailable("closed");
        assert!(entropy.is_crypto_error());
        assert!(!entropy.is_suspicious());
        assert!(!entropy.is_retryable());

        let peer = CoreError::malformed_peer_key("low-order point");
        assert!(peer.is_crypto_error());
        assert!(peer.is_suspicious());

        let transport: CoreError = TransportError::timeout("read peer key").into();
        assert!(!transport.is_crypto_error());
        assert!(transport.is_retryable());
    }

    #[test]
    fn test_common_error_conversion() {
        let common = CommonError::invalid_input("settle_delay", "too long");
        let core: CoreError = common.into();
        assert!(matches!(core, CoreError::Common(_)));
    }
}
