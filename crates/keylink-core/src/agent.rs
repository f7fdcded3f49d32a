// ============================================
// File: crates/keylink-core/src/agent.rs
// ============================================
//! # Key Agent
//!
//! ## Creation Reason
//! Owns the cryptographic half of the handshake: producing the local
//! keypair and performing the Diffie-Hellman derivation against the
//! peer's public key.
//!
//! ## Main Functionality
//! - `KeyAgent`: key generation and shared-secret derivation
//! - Contributory-behavior check on the DH output
//!
//! ## Derivation Flow
//! ```text
//! Local                                          Peer
//!   │                                              │
//!   │  generate_keypair()                          │
//!   │  ├─ private = clamp(random 32 bytes)         │
//!   │  └─ public  = X25519(private, basepoint)     │
//!   │                                              │
//!   │  ◄───── peer_public (32 raw bytes) ───────── │
//!   │                                              │
//!   │  derive_shared(keypair, peer_public)         │
//!   │  └─ secret = X25519(private, peer_public)    │
//!   │                                              │
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - `derive_shared` must stay a pure function of its two inputs
//! - Neither input key may be logged or persisted here
//! - The low-order rejection is a deliberate strengthening over the
//!   original permissive behavior; see DESIGN.md before changing it
//!
//! ## Last Modified
//! v0.1.0 - Initial key agent implementation

use tracing::{debug, warn};

use crate::crypto::keys::{KeyPair, PublicKey, SharedSecret};
use crate::crypto::provider::CryptoProvider;
use crate::error::{CoreError, Result};

// ============================================
// KeyAgent
// ============================================

/// Produces one local keypair per handshake and performs the DH
/// scalar multiplication.
///
/// # Example
/// ```
/// use keylink_core::{DalekProvider, KeyAgent};
///
/// let agent = KeyAgent::new(DalekProvider::new());
/// let keypair = agent.generate_keypair().unwrap();
/// // keypair.public now crosses the transport; the private half never does.
/// ```
pub struct KeyAgent<P: CryptoProvider> {
    /// Injected scalar-multiplication capability
    provider: P,
    /// Reject peer keys that produce an all-zero DH output
    reject_low_order: bool,
}

impl<P: CryptoProvider> KeyAgent<P> {
    /// Creates a new agent with low-order rejection enabled.
    #[must_use]
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            reject_low_order: true,
        }
    }

    /// Enables or disables rejection of low-order peer keys.
    ///
    /// Disabling restores the original permissive behavior: any 32
    /// bytes are accepted and a degenerate all-zero secret may result.
    #[must_use]
    pub fn with_low_order_rejection(mut self, enabled: bool) -> Self {
        self.reject_low_order = enabled;
        self
    }

    /// Generates a fresh local keypair.
    ///
    /// # Errors
    /// `EntropyUnavailable` if the provider's random source fails.
    /// This aborts the session before any I/O - a session without
    /// entropy cannot proceed safely.
    pub fn generate_keypair(&self) -> Result<KeyPair> {
        self.provider.generate_keypair()
    }

    /// Derives the shared secret from the local private key and the
    /// peer's public key.
    ///
    /// Pure function of its two inputs: identical inputs always yield
    /// the identical 32-byte output.
    ///
    /// # Errors
    /// `MalformedPeerKey` if low-order rejection is enabled and the DH
    /// output is all zeros (the peer sent the identity or another
    /// low-order point).
    pub fn derive_shared(&self, keypair: &KeyPair, peer_public: &PublicKey) -> Result<SharedSecret> {
        let raw = self
            .provider
            .scalar_multiply(keypair.private().as_bytes(), peer_public.as_bytes());
        let secret = SharedSecret::from_bytes(raw);

        if secret.is_zero() {
            if self.reject_low_order {
                warn!("peer supplied a low-order or identity point, rejecting");
                return Err(CoreError::malformed_peer_key(
                    "low-order or identity point (all-zero shared secret)",
                ));
            }
            // Permissive mode: surface the degenerate secret rather
            // than crashing, matching the original behavior.
            warn!("non-contributory exchange accepted (low-order rejection disabled)");
        }

        debug!("shared secret derived");
        Ok(secret)
    }
}

// ============================================
// Tests
// ============================================
