// ============================================
// File: crates/keylink-core/src/lib.rs
// ============================================
//! # Keylink Core - Key Agreement & Handshake Library
//!
//! ## Creation Reason
//! Provides the cryptographic key agreement and the one-shot handshake
//! session that exchanges raw X25519 public keys with a peer over a
//! byte channel. This crate is the security backbone of the system.
//!
//! ## Main Functionality
//!
//! ### Crypto Module ([`crypto`])
//! - Key types (`KeyPair`, `PublicKey`, `PrivateKey`, `SharedSecret`)
//! - `CryptoProvider`: injected scalar-multiplication capability
//! - `DalekProvider`: production X25519 implementation
//!
//! ### Agent Module ([`agent`])
//! - `KeyAgent`: key generation and shared-secret derivation
//!
//! ### Session Module ([`session`])
//! - `HandshakeSession`: one-shot exchange state machine
//! - `SessionConfig`: role, settle delay, I/O deadline
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │               keylink-cli                           │
//! │                    │                                │
//! │         ┌──────────┴──────────┐                    │
//! │         ▼                     ▼                    │
//! │   keylink-core  ◄──    keylink-transport           │
//! │   You are here        │                            │
//! │         │             │                            │
//! │         └──────────┬──────────┘                    │
//! │                    ▼                               │
//! │             keylink-common                         │
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! ## Security Guarantees
//! - **Key agreement**: X25519 over Curve25519, audited RustCrypto code
//! - **Forward secrecy discipline**: one keypair per session, consumed once
//! - **Memory hygiene**: private keys and secrets zeroed on drop
//!
//! ## ⚠️ Important Note for Next Developer
//! - ALL cryptographic code uses audited RustCrypto implementations
//! - NEVER implement custom curve arithmetic here
//! - NEVER log or serialize private keys or shared secrets
//! - The exchange is anonymous DH: no identity binding, no key
//!   confirmation. Do not present the derived secret as authenticated.
//!
//! ## Last Modified
//! v0.1.0 - Initial implementation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod crypto;
pub mod error;
pub mod session;

// Re-export commonly used items
pub use agent::KeyAgent;
pub use crypto::provider::{CryptoProvider, DalekProvider};
pub use crypto::{KeyPair, PrivateKey, PublicKey, SharedSecret};
pub use error::{CoreError, Result};
pub use session::{HandshakeSession, SessionConfig, SessionState};
