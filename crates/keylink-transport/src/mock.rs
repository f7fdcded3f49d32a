// ============================================
// File: crates/keylink-transport/src/mock.rs
// ============================================
//! # Mock Transport Implementation
//!
//! ## Creation Reason
//! Provides a scripted transport for testing failure paths that are
//! awkward to provoke on a real channel: early close mid-key, write
//! errors, a peer that never transmits.
//!
//! ## Main Functionality
//! - Scripted read sequence (deliver, stall, close, fail)
//! - Captured writes for verification
//! - No network or device required
//!
//! ## Usage in Tests
//! ```
//! use keylink_transport::{MockTransport, ReadStep, Transport};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut link = MockTransport::new();
//! link.script_read(ReadStep::Deliver(vec![0x42; 32]));
//!
//! let mut buf = [0u8; 32];
//! link.read_exact(&mut buf).await.unwrap();
//! assert_eq!(buf, [0x42; 32]);
//! # }
//! ```
//!
//! ## ⚠️ Important Note for Next Developer
//! - This is for testing only - do not use in production
//! - An exhausted script behaves like a closed channel
//!
//! ## Last Modified
//! v0.1.0 - Initial mock implementation

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Result, TransportError};
use crate::traits::Transport;

// ============================================
// ReadStep
// ============================================

/// One scripted event on the mock channel's read side.
#[derive(Debug, Clone)]
pub enum ReadStep {
    /// Deliver these bytes to the reader.
    Deliver(Vec<u8>),
    /// Close the channel (reads observe a short read).
    Close,
    /// Fail the read with the given reason.
    Fail(String),
    /// Never complete; the read hangs until a caller-side deadline fires.
    Stall,
}

// ============================================
// MockTransport
// ============================================

/// Scripted transport for testing.
///
/// # Features
/// - Deterministic read sequence
/// - Captured writes for assertion
/// - Injectable write failure
pub struct MockTransport {
    /// Scripted read events, consumed front to back
    script: Mutex<VecDeque<ReadStep>>,
    /// Bytes delivered but not yet consumed by a read
    pending: Mutex<Vec<u8>>,
    /// Everything written through the transport
    written: Mutex<Vec<u8>>,
    /// When set, the next write fails with this reason
    write_failure: Mutex<Option<String>>,
    /// Whether the transport is still open
    active: Mutex<bool>,
}

impl MockTransport {
    /// Creates a new mock transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            pending: Mutex::new(Vec::new()),
            written: Mutex::new(Vec::new()),
            write_failure: Mutex::new(None),
            active: Mutex::new(true),
        }
    }

    /// Appends a step to the read script.
    pub fn script_read(&mut self, step: ReadStep) {
        self.script.lock().push_back(step);
    }

    /// Makes the next write fail with the given reason.
    pub fn fail_next_write(&mut self, reason: impl Into<String>) {
        *self.write_failure.lock() = Some(reason.into());
    }

    /// Takes all bytes written so far.
    pub fn take_written(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.written.lock())
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        if !*self.active.lock() {
            return Err(TransportError::ShuttingDown);
        }

        let expected = buf.len();
        let mut filled = 0;
        loop {
            // Drain pending bytes first.
            {
                let mut pending = self.pending.lock();
                let take = pending.len().min(expected - filled);
                buf[filled..filled + take].copy_from_slice(&pending[..take]);
                pending.drain(..take);
                filled += take;
            }
            if filled == expected {
                return Ok(());
            }

            let step = self.script.lock().pop_front();
            match step {
                Some(ReadStep::Deliver(bytes)) => {
                    self.pending.lock().extend_from_slice(&bytes);
                }
                Some(ReadStep::Fail(reason)) => {
                    return Err(TransportError::ReadFailed { reason });
                }
                Some(ReadStep::Stall) => {
                    // Park forever; only a caller-side timeout gets out.
                    std::future::pending::<()>().await;
                }
                // Script exhaustion and Close both look like a closed
                // channel to the reader.
                Some(ReadStep::Close) | None => {
                    return Err(TransportError::short_read(expected, filled));
                }
            }
        }
    }

    async fn write_all(&mut self, buf: &[u8]) -> Result<()> {
        if !*self.active.lock() {
            return Err(TransportError::ShuttingDown);
        }
        if let Some(reason) = self.write_failure.lock().take() {
            return Err(TransportError::WriteFailed { reason });
        }
        self.written.lock().extend_from_slice(buf);
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        *self.active.lock() = false;
        Ok(())
    }

    fn is_active(&self) -> bool {
        *self.active.lock()
    }
}

// ============================================
// Tests
// ============================================
