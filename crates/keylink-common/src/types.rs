// ============================================
// File: crates/keylink-common/src/types.rs
// ============================================
//! # Core Type Definitions
//!
//! ## Creation Reason
//! Centralizes fundamental type definitions used throughout the keylink
//! handshake, ensuring type safety and consistent representations.
//!
//! ## Main Functionality
//! - `ExchangeRole`: Which side of the key exchange this endpoint plays
//! - String parsing and serialization implementations
//!
//! ## Main Logical Flow
//! 1. The role is chosen out-of-band (configuration or CLI flag)
//! 2. The handshake session uses it to order its two transport operations
//! 3. The two endpoints of a link must hold mirrored roles
//!
//! ## ⚠️ Important Note for Next Developer
//! - There is no role negotiation on the wire; if both ends hold the
//!   same role the exchange deadlocks (both read) or interleaves
//!   (both write). Keep role assignment explicit in deployment docs.
//!
//! ## Last Modified
//! v0.1.0 - Initial type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CommonError;

// ============================================
// ExchangeRole
// ============================================

/// Which side of the public-key exchange this endpoint plays.
///
/// # Purpose
/// The handshake performs exactly one read and one write of 32 bytes.
/// The order of those operations is fixed per endpoint and must be
/// mirrored by the peer: one side reads first, the other writes first.
///
/// # Example
/// ```
/// use keylink_common::ExchangeRole;
///
/// let role: ExchangeRole = "read-first".parse().unwrap();
/// assert_eq!(role, ExchangeRole::ReadFirst);
/// assert_eq!(role.peer(), ExchangeRole::WriteFirst);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExchangeRole {
    /// Read the peer's public key before sending our own.
    ///
    /// This is the role of an endpoint talking to a device that
    /// transmits as soon as its link comes up.
    ReadFirst,
    /// Send our public key before reading the peer's.
    WriteFirst,
}

impl ExchangeRole {
    /// Returns the role the peer must hold for the exchange to complete.
    #[must_use]
    pub const fn peer(self) -> Self {
        match self {
            Self::ReadFirst => Self::WriteFirst,
            Self::WriteFirst => Self::ReadFirst,
        }
    }

    /// Returns the kebab-case name used in configuration and CLI flags.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadFirst => "read-first",
            Self::WriteFirst => "write-first",
        }
    }
}

impl Default for ExchangeRole {
    fn default() -> Self {
        Self::ReadFirst
    }
}

impl fmt::Display for ExchangeRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExchangeRole {
    type Err = CommonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-first" => Ok(Self::ReadFirst),
            "write-first" => Ok(Self::WriteFirst),
            other => Err(CommonError::invalid_input(
                "role",
                format!("unknown role '{other}', expected 'read-first' or 'write-first'"),
            )),
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
    fn test_role_parse_roundtrip() {
        for role in [ExchangeRole::ReadFirst, ExchangeRole::WriteFirst] {
            let parsed: ExchangeRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_parse_rejects_unknown() {
        let result = "sideways".parse::<ExchangeRole>();
        assert!(matches!(result, Err(CommonError::InvalidInput { .. })));
    }

    #[test]
    fn test_role_peer_is_mirrored() {
        assert_eq!(ExchangeRole::ReadFirst.peer(), ExchangeRole::WriteFirst);
        assert_eq!(ExchangeRole::WriteFirst.peer(), ExchangeRole::ReadFirst);
        assert_eq!(ExchangeRole::ReadFirst.peer().peer(), ExchangeRole::ReadFirst);
    }

    #[test]
    fn test_role_serde_kebab_case() {
        let json = serde_json::to_string(&ExchangeRole::WriteFirst).unwrap();
        assert_eq!(json, "\"write-first\"");

        let role: ExchangeRole = serde_json::from_str("\"read-first\"").unwrap();
        assert_eq!(role, ExchangeRole::ReadFirst);
    }
}
