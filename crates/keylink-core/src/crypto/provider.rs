// ============================================
// File: crates/keylink-core/src/crypto/provider.rs
// ============================================
//! # Crypto Provider
//!
//! ## Creation Reason
//! The handshake consumes scalar multiplication as a capability rather
//! than binding to a particular library, so the session logic can be
//! tested against a deterministic stub and the backend can be swapped
//! without touching protocol code.
//!
//! ## Main Functionality
//! - `CryptoProvider`: trait for key generation and scalar multiplication
//! - `DalekProvider`: production implementation over x25519-dalek
//!
//! ## ⚠️ Important Note for Next Developer
//! - `scalar_multiply` must be constant-time; x25519-dalek is, and any
//!   replacement backend must be too
//! - Clamping happens at generation AND inside the dalek `x25519`
//!   function; the double clamp is idempotent by construction
//!
//! ## Last Modified
//! v0.1.0 - Initial provider implementation

use rand_core::{OsRng, RngCore};
use tracing::debug;
use x25519_dalek::x25519;

use super::keys::{KeyPair, PrivateKey, PublicKey};
use super::{X25519_BASEPOINT, X25519_KEY_SIZE};
use crate::error::{CoreError, Result};

// ============================================
// CryptoProvider Trait
// ============================================

/// Injected scalar-multiplication capability.
///
/// # Purpose
/// Abstracts the X25519 primitive so that:
/// - The handshake has no static dependency on a particular backend
/// - Tests can supply deterministic scalars
/// - Hardware-backed implementations can slot in later
///
/// # Contract
/// Implementations must follow standard Curve25519/X25519 conventions:
/// scalar clamping, base point u = 9, constant-time multiplication.
pub trait CryptoProvider: Send + Sync {
    /// Generates a fresh keypair from a secure random scalar.
    ///
    /// # Errors
    /// `EntropyUnavailable` if the random source cannot supply key
    /// material. Fatal and non-retryable; raised before any I/O.
    fn generate_keypair(&self) -> Result<KeyPair>;

    /// Computes `scalar * point` on Curve25519.
    ///
    /// Pure function of its inputs: identical inputs always produce
    /// identical output, independent of call order or prior state.
    fn scalar_multiply(
        &self,
        scalar: &[u8; X25519_KEY_SIZE],
        point: &[u8; X25519_KEY_SIZE],
    ) -> [u8; X25519_KEY_SIZE];
}

// ============================================
// DalekProvider
// ============================================

/// Production provider backed by `x25519-dalek`.
///
/// # Example
/// ```
/// use keylink_core::crypto::provider::{CryptoProvider, DalekProvider};
/// use keylink_core::crypto::X25519_BASEPOINT;
///
/// let provider = DalekProvider::new();
/// let keypair = provider.generate_keypair().unwrap();
/// println!("local public key: {}", keypair.public);
///
/// // Deriving a public key is a base-point multiplication.
/// let public = provider.scalar_multiply(&[0x77; 32], &X25519_BASEPOINT);
/// assert_ne!(&public, &[0u8; 32]);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct DalekProvider;

impl DalekProvider {
    /// Creates a new provider.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CryptoProvider for DalekProvider {
    fn generate_keypair(&self) -> Result<KeyPair> {
        let mut scalar = [0u8; X25519_KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut scalar)
            .map_err(|e| CoreError::entropy_unavailable(e.to_string()))?;
        clamp_scalar(&mut scalar);

        let public = x25519(scalar, X25519_BASEPOINT);
        debug!("generated fresh X25519 keypair");

        Ok(KeyPair::new(
            PublicKey::from_bytes(public),
            PrivateKey::from_bytes(scalar),
        ))
    }

    fn scalar_multiply(
        &self,
        scalar: &[u8; X25519_KEY_SIZE],
        point: &[u8; X25519_KEY_SIZE],
    ) -> [u8; X25519_KEY_SIZE] {
        x25519(*scalar, *point)
    }
}

// ============================================
// Scalar Clamping
// ============================================

/// Clamps a raw random value into a valid Curve25519 scalar.
///
/// Clears the low 3 bits, clears the top bit, sets bit 254
/// (RFC 7748 §5 decodeScalar25519).
fn clamp_scalar(scalar: &mut [u8; X25519_KEY_SIZE]) {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
}

// ============================================
// Test Provider
// ============================================

/// Deterministic provider fed with scripted scalars. Test-only.
#[cfg(test)]
pub(crate) struct FixedProvider {
    scalars: std::sync::Mutex<std::collections::VecDeque<[u8; X25519_KEY_SIZE]>>,
}

#[cfg(test)]
impl FixedProvider {
    pub(crate) fn new(scalars: Vec<[u8; X25519_KEY_SIZE]>) -> Self {
        Self {
            scalars: std::sync::Mutex::new(scalars.into()),
        }
    }
}

#[cfg(test)]
impl CryptoProvider for FixedProvider {
    fn generate_keypair(&self) -> Result<KeyPair> {
        let mut scalar = self
            .scalars
            .lock()
            .expect("scalar script lock")
            .pop_front()
            .ok_or_else(|| CoreError::entropy_unavailable("scalar script exhausted"))?;
        clamp_scalar(&mut scalar);
        let public = x25519(scalar, X25519_BASEPOINT);
        Ok(KeyPair::new(
            PublicKey::from_bytes(public),
            PrivateKey::from_bytes(scalar),
        ))
    }

    fn scalar_multiply(
        &self,
        scalar: &[u8; X25519_KEY_SIZE],
        point: &[u8; X25519_KEY_SIZE],
    ) -> [u8; X25519_KEY_SIZE] {
        x25519(*scalar, *point)
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use x25519_dalek::{PublicKey as DalekPublic, StaticSecret};

    /// RFC 7748 §6.1 Alice/Bob test vector.
    const ALICE_PRIVATE: [u8; 32] = [
        0x77, 0x07, 0x6d, 0x0a, 0x73, 0x18, 0xa5, 0x7d, 0x3c, 0x16, 0xc1, 0x72, 0x51, 0xb2, 0x66,
        0x45, 0xdf, 0x4c, 0x2f, 0x87, 0xeb, 0xc0, 0x99, 0x2a, 0xb1, 0x77, 0xfb, 0xa5, 0x1d, 0xb9,
        0x2c, 0x2a,
    ];
    const ALICE_PUBLIC: [u8; 32] = [
        0x85, 0x20, 0xf0, 0x09, 0x89, 0x30, 0xa7, 0x54, 0x74, 0x8b, 0x7d, 0xdc, 0xb4, 0x3e, 0xf7,
        0x5a, 0x0d, 0xbf, 0x3a, 0x0d, 0x26, 0x38, 0x1a, 0xf4, 0xeb, 0xa4, 0xa9, 0x8e, 0xaa, 0x9b,
        0x4e, 0x6a,
    ];
    const BOB_PRIVATE: [u8; 32] = [
        0x5d, 0xab, 0x08, 0x7e, 0x62, 0x4a, 0x8a, 0x4b, 0x79, 0xe1, 0x7f, 0x8b, 0x83, 0x80, 0x0e,
        0xe6, 0x6f, 0x3b, 0xb1, 0x29, 0x26, 0x18, 0xb6, 0xfd, 0x1c, 0x2f, 0x8b, 0x27, 0xff, 0x88,
        0xe0, 0xeb,
    ];
    const BOB_PUBLIC: [u8; 32] = [
        0xde, 0x9e, 0xdb, 0x7d, 0x7b, 0x7d, 0xc1, 0xb4, 0xd3, 0x5b, 0x61, 0xc2, 0xec, 0xe4, 0x35,
        0x37, 0x3f, 0x83, 0x43, 0xc8, 0x5b, 0x78, 0x67, 0x4d, 0xad, 0xfc, 0x7e, 0x14, 0x6f, 0x88,
        0x2b, 0x4f,
    ];
    const SHARED: [u8; 32] = [
        0x4a, 0x5d, 0x9d, 0x5b, 0xa4, 0xce, 0x2d, 0xe1, 0x72, 0x8e, 0x3b, 0xf4, 0x80, 0x35, 0x0f,
        0x25, 0xe0, 0x7e, 0x21, 0xc9, 0x47, 0xd1, 0x9e, 0x33, 0x76, 0xf0, 0x9b, 0x3c, 0x1e, 0x16,
        0x17, 0x42,
    ];

    #[test]
    fn test_rfc7748_public_key_derivation() {
        let provider = DalekProvider::new();

        let alice_public = provider.scalar_multiply(&ALICE_PRIVATE, &X25519_BASEPOINT);
        assert_eq!(alice_public, ALICE_PUBLIC);

        let bob_public = provider.scalar_multiply(&BOB_PRIVATE, &X25519_BASEPOINT);
        assert_eq!(bob_public, BOB_PUBLIC);
    }

    #[test]
    fn test_rfc7748_shared_secret() {
        let provider = DalekProvider::new();

        let alice_shared = provider.scalar_multiply(&ALICE_PRIVATE, &BOB_PUBLIC);
        let bob_shared = provider.scalar_multiply(&BOB_PRIVATE, &ALICE_PUBLIC);

        assert_eq!(alice_shared, SHARED);
        assert_eq!(bob_shared, SHARED);
    }

    #[test]
    fn test_matches_static_secret_path() {
        // Cross-check the raw x25519() path against the StaticSecret
        // API of the same library.
        let provider = DalekProvider::new();

        let secret = StaticSecret::from(ALICE_PRIVATE);
        let public = DalekPublic::from(&secret);

        let ours = provider.scalar_multiply(&ALICE_PRIVATE, &X25519_BASEPOINT);
        assert_eq!(&ours, public.as_bytes());
    }

    #[test]
    fn test_generated_public_is_basepoint_multiple() {
        let provider = DalekProvider::new();
        let keypair = provider.generate_keypair().unwrap();

        let recomputed =
            provider.scalar_multiply(keypair.private().as_bytes(), &X25519_BASEPOINT);
        assert_eq!(&recomputed, keypair.public.as_bytes());
    }

    #[test]
    fn test_generated_scalar_is_clamped() {
        let provider = DalekProvider::new();
        let keypair = provider.generate_keypair().unwrap();
        let scalar = keypair.private().as_bytes();

        assert_eq!(scalar[0] & 7, 0);
        assert_eq!(scalar[31] & 128, 0);
        assert_eq!(scalar[31] & 64, 64);
    }

    #[test]
    fn test_clamp_of_zero_scalar() {
        // 32 zero bytes clamp to 2^254: only bit 254 set.
        let mut scalar = [0u8; 32];
        clamp_scalar(&mut scalar);

        let mut expected = [0u8; 32];
        expected[31] = 64;
        assert_eq!(scalar, expected);
    }

    #[test]
    fn test_fixed_provider_is_deterministic() {
        let provider = FixedProvider::new(vec![ALICE_PRIVATE, ALICE_PRIVATE]);

        let a = provider.generate_keypair().unwrap();
        let b = provider.generate_keypair().unwrap();
        assert_eq!(a.public.as_bytes(), b.public.as_bytes());
        assert_eq!(a.public.as_bytes(), &ALICE_PUBLIC);
    }

    #[test]
    fn test_fixed_provider_exhaustion_is_entropy_failure() {
        let provider = FixedProvider::new(vec![]);
        let err = provider.generate_keypair().unwrap_err();
        assert!(matches!(err, CoreError::EntropyUnavailable { .. }));
    }
}
