// ============================================
// File: crates/keylink-core/src/crypto/keys.rs
// ============================================
//! # Cryptographic Key Types
//!
//! ## Creation Reason
//! Defines key types for the handshake with proper security properties
//! (Zeroize on drop, constant-time comparison, redacted Debug).
//!
//! ## Main Functionality
//! - `PrivateKey`: clamped X25519 scalar, never leaves this crate's API
//! - `PublicKey`: 32-byte curve point, freely shareable
//! - `KeyPair`: one session's local keys
//! - `SharedSecret`: the DH output both sides derive
//!
//! ## Key Lifecycle
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  KeyPair (per-session)                                     │
//! │  ├─ Generated fresh for each handshake                     │
//! │  ├─ Public half crosses the transport                      │
//! │  └─ Private half is zeroed when the session ends           │
//! │                                                            │
//! │  SharedSecret (per-session)                                │
//! │  ├─ Derived once, handed to the caller                     │
//! │  └─ Zeroed on drop; caller must not retain copies          │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL secret types MUST implement Zeroize
//! - Private keys and secrets must NEVER be logged or serialized
//! - Use constant-time comparison for secret equality
//!
//! ## Last Modified
//! v0.1.0 - Initial key type definitions

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::{SHARED_SECRET_SIZE, X25519_KEY_SIZE};
use keylink_common::error::CommonError;

// ============================================
// PrivateKey
// ============================================

/// Local X25519 private scalar.
///
/// # Security
/// - Clamped per Curve25519 convention at generation time
/// - Zeroed on drop
/// - `Debug` never prints the scalar
/// - No `Display`, no serde: the scalar stays in process memory
pub struct PrivateKey([u8; X25519_KEY_SIZE]);

impl PrivateKey {
    /// Wraps raw scalar bytes.
    ///
    /// The caller is responsible for clamping; `DalekProvider` clamps
    /// before constructing one of these.
    #[must_use]
    pub(crate) fn from_bytes(bytes: [u8; X25519_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw scalar bytes.
    ///
    /// # Security Warning
    /// For use by the scalar-multiplication provider only. Do not copy
    /// the bytes into logs, buffers, or other long-lived storage.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; X25519_KEY_SIZE] {
        &self.0
    }
}

impl Zeroize for PrivateKey {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

impl Drop for PrivateKey {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print private key material
        write!(f, "PrivateKey([REDACTED])")
    }
}

// ============================================
// PublicKey
// ============================================

/// X25519 public key: a 32-byte point on Curve25519.
///
/// Safe to share; this is exactly what crosses the transport. No
/// validation is applied at construction - any 32 bytes received from
/// the peer are accepted verbatim, and degenerate points are caught at
/// derivation time by the contributory-behavior check.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; X25519_KEY_SIZE]);

impl PublicKey {
    /// Creates a public key from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; X25519_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw point bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; X25519_KEY_SIZE] {
        &self.0
    }

    /// Returns the raw point bytes (owned).
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; X25519_KEY_SIZE] {
        self.0
    }
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = CommonError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; X25519_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CommonError::invalid_length(X25519_KEY_SIZE, bytes.len()))?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Show truncated hex for debugging
        write!(
            f,
            "PublicKey({:02x}{:02x}{:02x}{:02x}...)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

// ============================================
// KeyPair
// ============================================

/// One session's local X25519 keys.
///
/// # Invariant
/// `public` is always the base-point scalar multiplication of
/// `private`; `CryptoProvider::generate_keypair` is the only
/// constructor, so the invariant cannot be broken from outside.
///
/// # Lifecycle
/// Generated once per handshake and owned by the session for its
/// duration. Not `Clone`: there is never a second copy of the private
/// scalar.
pub struct KeyPair {
    /// Public half, transmitted to the peer.
    pub public: PublicKey,
    /// Private half, consumed by shared-secret derivation.
    private: PrivateKey,
}

impl KeyPair {
    /// Assembles a keypair. Provider-internal.
    pub(crate) fn new(public: PublicKey, private: PrivateKey) -> Self {
        Self { public, private }
    }

    /// Returns the private scalar, for derivation only.
    pub(crate) fn private(&self) -> &PrivateKey {
        &self.private
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("public", &self.public)
            .finish_non_exhaustive()
    }
}

// ============================================
// SharedSecret
// ============================================

/// The 32-byte Diffie-Hellman output.
///
/// # Purpose
/// Used directly as the session's symmetric key material - the protocol
/// applies no further hashing or key derivation.
///
/// # Security
/// - Zeroed on drop
/// - Constant-time equality
/// - `Debug` never prints the bytes
/// - `to_hex` exists for operator diagnostics only; a matching hex dump
///   on both ends is NOT key confirmation
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SharedSecret([u8; SHARED_SECRET_SIZE]);

impl SharedSecret {
    /// Wraps the raw DH output.
    #[must_use]
    pub(crate) fn from_bytes(bytes: [u8; SHARED_SECRET_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the raw secret bytes.
    ///
    /// # Security Warning
    /// Handle the returned reference carefully. Do not log or store the
    /// key material in unprotected storage.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SHARED_SECRET_SIZE] {
        &self.0
    }

    /// Hex-encodes the secret for operator display.
    ///
    /// # Security Warning
    /// Diagnostic use only. Never write the result to logs or disk.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Returns `true` if every byte of the secret is zero.
    ///
    /// An all-zero DH output means the peer supplied a low-order or
    /// identity point (non-contributory exchange).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.ct_eq(&[0u8; SHARED_SECRET_SIZE]).into()
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Never print key material
        write!(f, "SharedSecret([REDACTED])")
    }
}

// Constant-time equality comparison
impl PartialEq for SharedSecret {
    fn eq(&self, other: &Self) -> bool {
        self.0.ct_eq(&other.0).into()
    }
}

impl Eq for SharedSecret {}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_key_from_slice() {
        let bytes = [0x42u8; 32];
        let key = PublicKey::try_from(&bytes[..]).unwrap();
        assert_eq!(key.as_bytes(), &bytes);

        let short = [0u8; 16];
        assert!(PublicKey::try_from(&short[..]).is_err());
    }

    #[test]
    fn test_public_key_display_is_hex() {
        let key = PublicKey::from_bytes([0xAB; 32]);
        assert_eq!(key.to_string(), "ab".repeat(32));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let private = PrivateKey::from_bytes([0x77; 32]);
        assert_eq!(format!("{private:?}"), "PrivateKey([REDACTED])");

        let secret = SharedSecret::from_bytes([0x13; 32]);
        assert_eq!(format!("{secret:?}"), "SharedSecret([REDACTED])");

        let pair = KeyPair::new(PublicKey::from_bytes([1; 32]), PrivateKey::from_bytes([2; 32]));
        let debug = format!("{pair:?}");
        assert!(debug.contains("public"));
        assert!(!debug.contains("private"));
    }

    #[test]
    fn test_shared_secret_equality() {
        let a = SharedSecret::from_bytes([0x10; 32]);
        let b = SharedSecret::from_bytes([0x10; 32]);
        let c = SharedSecret::from_bytes([0x11; 32]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_shared_secret_zero_detection() {
        assert!(SharedSecret::from_bytes([0u8; 32]).is_zero());
        assert!(!SharedSecret::from_bytes([1u8; 32]).is_zero());
    }
}
