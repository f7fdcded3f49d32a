// ============================================
// File: crates/keylink-transport/src/tcp.rs
// ============================================
//! # TCP Transport Helpers
//!
//! ## Creation Reason
//! Provides the production byte channel: a TCP connection to the peer
//! endpoint, wrapped in `StreamTransport`. One side dials out, the
//! other accepts a single inbound connection.
//!
//! ## Main Functionality
//! - `TcpTransport::connect`: dial a peer
//! - `TcpTransport::accept`: wait for a single peer
//!
//! ## Design Choices
//! - `TCP_NODELAY` is enabled: the handshake sends one small value per
//!   direction and must not sit in Nagle's buffer
//! - `accept` serves exactly one connection; the listener is dropped
//!   after the first peer arrives (the handshake is point-to-point)
//!
//! ## ⚠️ Important Note for Next Developer
//! - No interleaving of other traffic on this channel during the
//!   handshake; keep the connection dedicated
//!
//! ## Last Modified
//! v0.1.0 - Initial TCP transport implementation

use std::net::SocketAddr;

use tokio::net::{TcpListener, TcpStream};
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::stream::StreamTransport;

// ============================================
// TcpTransport
// ============================================

/// Factory for TCP-backed transports.
pub struct TcpTransport;

impl TcpTransport {
    /// Connects to a peer endpoint.
    ///
    /// # Arguments
    /// * `addr` - Address to dial (e.g., "192.168.1.20:4040")
    ///
    /// # Errors
    /// - `InvalidAddress` if the address string cannot be parsed
    /// - `ConnectFailed` if the connection cannot be established
    pub async fn connect(addr: &str) -> Result<StreamTransport<TcpStream>> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|_| TransportError::InvalidAddress { addr: addr.into() })?;

        info!(%socket_addr, "connecting to peer");
        let stream = TcpStream::connect(socket_addr)
            .await
            .map_err(|e| TransportError::connect_failed(addr, e.to_string()))?;
        stream
            .set_nodelay(true)
            .map_err(|e| TransportError::io("setting TCP_NODELAY", e))?;

        debug!("connection established");
        Ok(StreamTransport::new(stream))
    }

    /// Binds to an address and waits for a single peer.
    ///
    /// # Arguments
    /// * `addr` - Address to listen on (e.g., "0.0.0.0:4040")
    ///
    /// # Errors
    /// - `InvalidAddress` if the address string cannot be parsed
    /// - `AcceptFailed` if binding or accepting fails
    pub async fn accept(addr: &str) -> Result<StreamTransport<TcpStream>> {
        let socket_addr: SocketAddr = addr
            .parse()
            .map_err(|_| TransportError::InvalidAddress { addr: addr.into() })?;

        info!(%socket_addr, "waiting for peer");
        let listener = TcpListener::bind(socket_addr)
            .await
            .map_err(|e| TransportError::accept_failed(addr, e.to_string()))?;
        let (stream, peer_addr) = listener
            .accept()
            .await
            .map_err(|e| TransportError::accept_failed(addr, e.to_string()))?;
        stream
            .set_nodelay(true)
            .map_err(|e| TransportError::io("setting TCP_NODELAY", e))?;

        debug!(%peer_addr, "peer connected");
        Ok(StreamTransport::new(stream))
    }
}

// ============================================
// Tests
// ============================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Transport;

    #[tokio::test]
    async fn test_connect_rejects_bad_address() {
        let err = TcpTransport::connect("not-an-address").await.unwrap_err();
        assert!(matches!(err, TransportError::InvalidAddress { .. }));
    }

    #[tokio::test]
    async fn test_connect_and_exchange() {
        // Bind manually so the test can learn the ephemeral port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut transport = StreamTransport::new(stream);

            let mut buf = [0u8; 32];
            transport.read_exact(&mut buf).await.unwrap();
            transport.write_all(&buf).await.unwrap();
        });

        let mut client = TcpTransport::connect(&addr).await.unwrap();
        client.write_all(&[0x5A; 32]).await.unwrap();

        let mut echoed = [0u8; 32];
        client.read_exact(&mut echoed).await.unwrap();
        assert_eq!(echoed, [0x5A; 32]);

        server.await.unwrap();
    }
}
