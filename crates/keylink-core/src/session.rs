// ============================================
// File: crates/keylink-core/src/session.rs
// ============================================
//! # Handshake Session
//!
//! ## Creation Reason
//! Drives one complete public-key exchange over a transport: generate
//! a keypair, swap raw 32-byte public keys in role order, derive the
//! shared secret, close the channel.
//!
//! ## Main Functionality
//! - `SessionConfig`: role, settle delay, I/O deadline, peer-key policy
//! - `SessionState`: linear progress marker for the one-shot exchange
//! - `HandshakeSession`: consuming state machine over a `Transport`
//!
//! ## Exchange Flow (read-first role)
//! ```text
//! ┌──────────┐   settle    ┌──────────────┐   read 32B   ┌─────────────────┐
//! │  Start   │────────────►│ KeyGenerated │─────────────►│ PeerKeyReceived │
//! └──────────┘   + keygen  └──────────────┘              └────────┬────────┘
//!                                                        write 32B│
//!                          ┌──────────┐    derive     ┌───────────▼──────┐
//!                          │ Complete │◄──────────────│  LocalKeySent    │
//!                          └──────────┘               └──────────────────┘
//! ```
//! The write-first role performs the same steps with the read and
//! write legs swapped.
//!
//! ## ⚠️ Important Note for Next Developer
//! - `run` consumes the session: one keypair, one exchange, no reuse
//! - Any failure after key generation leaves the keypair to be zeroed
//!   on drop; there is no partial-result recovery
//! - The two roles must stay exact mirrors or paired sessions deadlock
//!
//! ## Last Modified
//! v0.1.0 - Initial session implementation

use std::fmt;
use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use keylink_common::error::CommonError;
use keylink_common::types::ExchangeRole;
use keylink_transport::error::TransportError;
use keylink_transport::traits::Transport;

use crate::agent::KeyAgent;
use crate::crypto::keys::{PublicKey, SharedSecret};
use crate::crypto::provider::CryptoProvider;
use crate::crypto::X25519_KEY_SIZE;
use crate::error::Result;

// ============================================
// Constants
// ============================================

/// Upper bound on the configured settle delay.
///
/// The delay exists to let a freshly opened device channel stabilize;
/// anything past this is a configuration mistake, not a slow device.
pub const MAX_SETTLE_DELAY: Duration = Duration::from_secs(60);

// ============================================
// SessionState
// ============================================

/// Progress marker for the one-shot exchange.
///
/// States advance strictly forward; a session never returns to an
/// earlier state. The order of `PeerKeyReceived` and `LocalKeySent`
/// depends on the configured role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, nothing done yet.
    Start,
    /// Local keypair generated, no I/O yet.
    KeyGenerated,
    /// Peer's 32 key bytes fully read.
    PeerKeyReceived,
    /// Local public key fully written.
    LocalKeySent,
    /// Shared secret derived; the session is finished.
    Complete,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Start => "start",
            Self::KeyGenerated => "key-generated",
            Self::PeerKeyReceived => "peer-key-received",
            Self::LocalKeySent => "local-key-sent",
            Self::Complete => "complete",
        };
        write!(f, "{label}")
    }
}

// ============================================
// SessionConfig
// ============================================

/// Handshake session configuration.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use keylink_common::ExchangeRole;
/// use keylink_core::SessionConfig;
///
/// let config = SessionConfig::new()
///     .with_role(ExchangeRole::WriteFirst)
///     .with_settle_delay(Duration::from_secs(2))
///     .with_io_timeout(Some(Duration::from_secs(10)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Which leg of the exchange runs first on this side.
    pub role: ExchangeRole,
    /// Pause after opening the channel, before any I/O.
    ///
    /// Serial-attached peers need a moment after the port opens (the
    /// device may reset on connect); network peers run this at zero.
    pub settle_delay: Duration,
    /// Deadline applied to each individual read and write leg.
    ///
    /// `None` means wait indefinitely, matching a plain blocking
    /// channel.
    pub io_timeout: Option<Duration>,
    /// Reject peer keys that yield an all-zero shared secret.
    pub reject_low_order: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            role: ExchangeRole::default(),
            settle_delay: Duration::ZERO,
            io_timeout: None,
            reject_low_order: true,
        }
    }
}

impl SessionConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets which leg of the exchange runs first.
    #[must_use]
    pub fn with_role(mut self, role: ExchangeRole) -> Self {
        self.role = role;
        self
    }

    /// Sets the post-open settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Sets the per-operation I/O deadline.
    #[must_use]
    pub fn with_io_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.io_timeout = timeout;
        self
    }

    /// Enables or disables low-order peer-key rejection.
    #[must_use]
    pub fn with_low_order_rejection(mut self, enabled: bool) -> Self {
        self.reject_low_order = enabled;
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    /// `InvalidInput` if the settle delay exceeds [`MAX_SETTLE_DELAY`]
    /// or the I/O timeout is set to zero.
    pub fn validate(&self) -> std::result::Result<(), CommonError> {
        if self.settle_delay > MAX_SETTLE_DELAY {
            return Err(CommonError::invalid_input(
                "settle_delay",
                format!(
                    "must not exceed {}s, got {}s",
                    MAX_SETTLE_DELAY.as_secs(),
                    self.settle_delay.as_secs()
                ),
            ));
        }
        if let Some(timeout) = self.io_timeout {
            if timeout.is_zero() {
                return Err(CommonError::invalid_input(
                    "io_timeout",
                    "must be positive; use None to wait indefinitely",
                ));
            }
        }
        Ok(())
    }
}

// ============================================
// HandshakeSession
// ============================================

/// One-shot public-key exchange over a transport.
///
/// # Lifecycle
/// Construct with a provider, an open transport, and a config, then
/// call [`run`](Self::run) exactly once. The session owns the
/// transport and closes it on the way out, success or failure aside.
///
/// # Example
/// ```no_run
/// use keylink_core::{DalekProvider, HandshakeSession, SessionConfig};
/// use keylink_transport::TcpTransport;
///
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let transport = TcpTransport::connect("192.168.0.10:4040").await?;
/// let session = HandshakeSession::new(
///     DalekProvider::new(),
///     transport,
///     SessionConfig::new(),
/// );
/// let secret = session.run().await?;
/// println!("shared secret: {}", secret.to_hex());
/// # Ok(())
/// # }
/// ```
pub struct HandshakeSession<P: CryptoProvider, T: Transport> {
    agent: KeyAgent<P>,
    transport: T,
    config: SessionConfig,
    state: SessionState,
}

impl<P: CryptoProvider, T: Transport> HandshakeSession<P, T> {
    /// Creates a session over an already-open transport.
    #[must_use]
    pub fn new(provider: P, transport: T, config: SessionConfig) -> Self {
        let agent = KeyAgent::new(provider).with_low_order_rejection(config.reject_low_order);
        Self {
            agent,
            transport,
            config,
            state: SessionState::Start,
        }
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Runs the exchange to completion and returns the shared secret.
    ///
    /// Consumes the session: each exchange uses a fresh keypair, and
    /// the transport is shut down before returning, on the failure
    /// path too. A shutdown failure is logged and swallowed - it never
    /// masks the exchange outcome.
    ///
    /// # Errors
    /// - `Common` if the configuration fails validation
    /// - `EntropyUnavailable` if keypair generation fails
    /// - `Transport` on any read/write failure, short read, or deadline
    /// - `MalformedPeerKey` if the peer key is degenerate and rejection
    ///   is enabled
    pub async fn run(mut self) -> Result<SharedSecret> {
        let result = self.exchange().await;

        // Best-effort close on both paths: a close error never masks
        // the exchange outcome.
        if let Err(e) = self.transport.shutdown().await {
            warn!(error = %e, "transport shutdown failed");
        }

        result
    }

    /// Drives the exchange itself; `run` handles transport teardown.
    async fn exchange(&mut self) -> Result<SharedSecret> {
        self.config.validate()?;

        info!(
            role = %self.config.role,
            settle_ms = self.config.settle_delay.as_millis() as u64,
            "starting key exchange"
        );

        if !self.config.settle_delay.is_zero() {
            debug!("waiting for channel to settle");
            tokio::time::sleep(self.config.settle_delay).await;
        }

        let keypair = self.agent.generate_keypair()?;
        self.state = SessionState::KeyGenerated;
        debug!(state = %self.state, "local keypair ready");

        let deadline = self.config.io_timeout;
        let peer_public = match self.config.role {
            ExchangeRole::ReadFirst => {
                let peer = read_peer_key(&mut self.transport, deadline).await?;
                self.state = SessionState::PeerKeyReceived;
                debug!(state = %self.state, peer_key = %peer, "peer key received");

                write_local_key(&mut self.transport, &keypair.public, deadline).await?;
                self.state = SessionState::LocalKeySent;
                debug!(state = %self.state, "local key sent");
                peer
            }
            ExchangeRole::WriteFirst => {
                write_local_key(&mut self.transport, &keypair.public, deadline).await?;
                self.state = SessionState::LocalKeySent;
                debug!(state = %self.state, "local key sent");

                let peer = read_peer_key(&mut self.transport, deadline).await?;
                self.state = SessionState::PeerKeyReceived;
                debug!(state = %self.state, peer_key = %peer, "peer key received");
                peer
            }
        };

        let secret = self.agent.derive_shared(&keypair, &peer_public)?;
        self.state = SessionState::Complete;
        info!(state = %self.state, "key exchange complete");

        Ok(secret)
    }
}

// ============================================
// I/O Legs
// ============================================

/// Reads the peer's 32 raw key bytes.
async fn read_peer_key<T: Transport>(
    transport: &mut T,
    deadline: Option<Duration>,
) -> Result<PublicKey> {
    let mut buf = [0u8; X25519_KEY_SIZE];
    with_deadline("read peer key", deadline, transport.read_exact(&mut buf)).await?;
    Ok(PublicKey::from_bytes(buf))
}

/// Writes the local public key's 32 raw bytes.
async fn write_local_key<T: Transport>(
    transport: &mut T,
    public: &PublicKey,
    deadline: Option<Duration>,
) -> Result<()> {
    with_deadline(
        "write local key",
        deadline,
        transport.write_all(public.as_bytes()),
    )
    .await?;
    Ok(())
}

/// Applies the optional per-operation deadline to a transport future.
async fn with_deadline<F, O>(
    operation: &'static str,
    deadline: Option<Duration>,
    fut: F,
) -> keylink_transport::error::Result<O>
where
    F: Future<Output = keylink_transport::error::Result<O>>,
{
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::timeout(operation)),
        },
        None => fut.await,
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::provider::{DalekProvider, FixedProvider};
    use crate::crypto::X25519_BASEPOINT;
    use crate::error::CoreError;
    use keylink_transport::mock::{MockTransport, ReadStep};
    use keylink_transport::stream::loopback_pair;

    fn config(role: ExchangeRole) -> SessionConfig {
        SessionConfig::new().with_role(role)
    }

    /// Mock wrapper that records whether `shutdown` was attempted,
    /// observable after the session consumes the transport.
    struct TrackedLink {
        inner: MockTransport,
        closed: std::sync::Arc<std::sync::atomic::AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Transport for TrackedLink {
        async fn read_exact(
            &mut self,
            buf: &mut [u8],
        ) -> keylink_transport::error::Result<()> {
            self.inner.read_exact(buf).await
        }

        async fn write_all(&mut self, buf: &[u8]) -> keylink_transport::error::Result<()> {
            self.inner.write_all(buf).await
        }

        async fn shutdown(&mut self) -> keylink_transport::error::Result<()> {
            self.closed.store(true, std::sync::atomic::Ordering::SeqCst);
            self.inner.shutdown().await
        }

        fn is_active(&self) -> bool {
            self.inner.is_active()
        }
    }

    #[test]
    fn test_config_validation() {
        assert!(SessionConfig::new().validate().is_ok());

        let slow = SessionConfig::new().with_settle_delay(Duration::from_secs(120));
        assert!(slow.validate().is_err());

        let zero = SessionConfig::new().with_io_timeout(Some(Duration::ZERO));
        assert!(zero.validate().is_err());

        let sane = SessionConfig::new()
            .with_settle_delay(Duration::from_secs(2))
            .with_io_timeout(Some(Duration::from_secs(10)));
        assert!(sane.validate().is_ok());
    }

    #[tokio::test]
    async fn test_loopback_exchange_derives_matching_secrets() {
        let (left, right) = loopback_pair(64);

        let reader = HandshakeSession::new(
            DalekProvider::new(),
            left,
            config(ExchangeRole::ReadFirst),
        );
        let writer = HandshakeSession::new(
            DalekProvider::new(),
            right,
            config(ExchangeRole::WriteFirst),
        );

        let (a, b) = tokio::join!(reader.run(), writer.run());
        let a = a.unwrap();
        let b = b.unwrap();
        assert_eq!(a, b);
        assert!(!a.is_zero());
    }

    #[tokio::test]
    async fn test_mirrored_roles_also_pair() {
        // Same exchange with the roles assigned the other way around.
        let (left, right) = loopback_pair(64);

        let writer = HandshakeSession::new(
            DalekProvider::new(),
            left,
            config(ExchangeRole::WriteFirst),
        );
        let reader = HandshakeSession::new(
            DalekProvider::new(),
            right,
            config(ExchangeRole::ReadFirst),
        );

        let (a, b) = tokio::join!(writer.run(), reader.run());
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[tokio::test]
    async fn test_written_bytes_are_exactly_local_public_key() {
        // Mirror the clamping applied at generation to predict the
        // public key the session must put on the wire.
        let mut scalar = [0x42u8; 32];
        scalar[0] &= 248;
        scalar[31] &= 127;
        scalar[31] |= 64;
        let expected_public = DalekProvider::new().scalar_multiply(&scalar, &X25519_BASEPOINT);

        let mut link = MockTransport::new();
        link.script_read(ReadStep::Deliver(vec![0x09; 32]));

        // Drive the legs directly so the transport stays reachable for
        // the write assertion after the exchange.
        let agent = KeyAgent::new(FixedProvider::new(vec![scalar]));
        let keypair = agent.generate_keypair().unwrap();
        let peer = read_peer_key(&mut link, None).await.unwrap();
        write_local_key(&mut link, &keypair.public, None).await.unwrap();

        assert_eq!(link.take_written(), expected_public.to_vec());

        let secret = agent.derive_shared(&keypair, &peer).unwrap();
        assert!(!secret.is_zero());
    }

    #[tokio::test]
    async fn test_peer_close_mid_key_is_short_read() {
        let mut link = MockTransport::new();
        link.script_read(ReadStep::Deliver(vec![0x55; 10]));
        link.script_read(ReadStep::Close);

        let session = HandshakeSession::new(
            DalekProvider::new(),
            link,
            config(ExchangeRole::ReadFirst),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Transport(TransportError::ShortRead { expected: 32, got: 10 })
        ));
    }

    #[tokio::test]
    async fn test_silent_peer_hits_io_timeout() {
        let mut link = MockTransport::new();
        link.script_read(ReadStep::Stall);

        let session = HandshakeSession::new(
            DalekProvider::new(),
            link,
            config(ExchangeRole::ReadFirst).with_io_timeout(Some(Duration::from_millis(20))),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Transport(TransportError::Timeout { .. })
        ));
    }

    #[tokio::test]
    async fn test_zero_peer_key_fails_the_session() {
        let mut link = MockTransport::new();
        link.script_read(ReadStep::Deliver(vec![0u8; 32]));

        let session = HandshakeSession::new(
            DalekProvider::new(),
            link,
            config(ExchangeRole::ReadFirst),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, CoreError::MalformedPeerKey { .. }));
    }

    #[tokio::test]
    async fn test_zero_peer_key_allowed_when_permissive() {
        let mut link = MockTransport::new();
        link.script_read(ReadStep::Deliver(vec![0u8; 32]));

        let session = HandshakeSession::new(
            DalekProvider::new(),
            link,
            config(ExchangeRole::ReadFirst).with_low_order_rejection(false),
        );
        let secret = session.run().await.unwrap();
        assert!(secret.is_zero());
    }

    #[tokio::test]
    async fn test_write_failure_fails_the_session() {
        let mut link = MockTransport::new();
        link.fail_next_write("device unplugged");

        let session = HandshakeSession::new(
            DalekProvider::new(),
            link,
            config(ExchangeRole::WriteFirst),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Transport(TransportError::WriteFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_transport_closed_on_success_and_failure() {
        use std::sync::atomic::{AtomicBool, Ordering};
        use std::sync::Arc;

        // Success path: the transport is shut down after derivation.
        let mut inner = MockTransport::new();
        inner.script_read(ReadStep::Deliver(vec![0x09; 32]));
        let closed = Arc::new(AtomicBool::new(false));
        let link = TrackedLink {
            inner,
            closed: Arc::clone(&closed),
        };
        let session =
            HandshakeSession::new(DalekProvider::new(), link, config(ExchangeRole::ReadFirst));
        session.run().await.unwrap();
        assert!(closed.load(Ordering::SeqCst));

        // Failure path: an aborted exchange still attempts a graceful
        // close before surfacing the error.
        let mut inner = MockTransport::new();
        inner.script_read(ReadStep::Close);
        let closed = Arc::new(AtomicBool::new(false));
        let link = TrackedLink {
            inner,
            closed: Arc::clone(&closed),
        };
        let session =
            HandshakeSession::new(DalekProvider::new(), link, config(ExchangeRole::ReadFirst));
        assert!(session.run().await.is_err());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_io() {
        // A stalled read script proves no I/O is attempted: the session
        // would hang if validation did not fail first.
        let mut link = MockTransport::new();
        link.script_read(ReadStep::Stall);

        let session = HandshakeSession::new(
            DalekProvider::new(),
            link,
            config(ExchangeRole::ReadFirst).with_io_timeout(Some(Duration::ZERO)),
        );
        let err = session.run().await.unwrap_err();
        assert!(matches!(err, CoreError::Common(_)));
    }

    #[tokio::test]
    async fn test_settle_delay_is_observed() {
        tokio::time::pause();

        let (left, right) = loopback_pair(64);
        let reader = HandshakeSession::new(
            DalekProvider::new(),
            left,
            config(ExchangeRole::ReadFirst).with_settle_delay(Duration::from_secs(2)),
        );
        let writer = HandshakeSession::new(
            DalekProvider::new(),
            right,
            config(ExchangeRole::WriteFirst).with_settle_delay(Duration::from_secs(2)),
        );

        let start = tokio::time::Instant::now();
        let (a, b) = tokio::join!(reader.run(), writer.run());
        assert_eq!(a.unwrap(), b.unwrap());
        assert!(start.elapsed() >= Duration::from_secs(2));
    }
}
