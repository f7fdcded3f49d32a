// ============================================
// File: crates/keylink-core/src/crypto/mod.rs
// ============================================
//! # Cryptography Module
//!
//! ## Creation Reason
//! Centralizes the key types and the injected scalar-multiplication
//! capability for the keylink handshake, using audited RustCrypto
//! implementations.
//!
//! ## Main Functionality
//!
//! ### Submodules
//! - [`keys`]: Key and secret types with zeroization discipline
//! - [`provider`]: `CryptoProvider` trait and the x25519-dalek backend
//!
//! ## Cryptographic Design
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │  local_private  = clamp(32 random bytes)                   │
//! │  local_public   = X25519(local_private, basepoint)         │
//! │                                                            │
//! │  ── exchange raw 32-byte publics over the transport ──     │
//! │                                                            │
//! │  shared_secret  = X25519(local_private, peer_public)       │
//! │                                                            │
//! │  Both sides derive the same 32 bytes (DH commutativity).   │
//! │  The raw DH output IS the session key material; no KDF.    │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL implementations use RustCrypto (audited)
//! - NEVER roll your own curve arithmetic
//! - ALL sensitive types implement Zeroize
//!
//! ## Last Modified
//! v0.1.0 - Initial crypto implementation

pub mod keys;
pub mod provider;

// Re-export primary types at module level
pub use keys::{KeyPair, PrivateKey, PublicKey, SharedSecret};
pub use provider::{CryptoProvider, DalekProvider};

// ============================================
// Constants
// ============================================

/// Size of an X25519 public key in bytes.
pub const X25519_KEY_SIZE: usize = 32;

/// Size of the derived shared secret in bytes.
pub const SHARED_SECRET_SIZE: usize = 32;

/// The Curve25519 base point (u = 9), as wire bytes.
pub const X25519_BASEPOINT: [u8; X25519_KEY_SIZE] = x25519_dalek::X25519_BASEPOINT_BYTES;
