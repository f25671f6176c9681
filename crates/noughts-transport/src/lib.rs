//! Datagram transport layer for Noughts.
//!
//! Provides the [`Transport`] trait that abstracts over a connectionless
//! socket, and [`UdpTransport`], the Tokio UDP implementation.
//!
//! There are no connections here: every inbound [`Datagram`] carries its
//! source address, and every send names its destination. Delivery is
//! best-effort; the transport never retries.

#![allow(async_fn_in_trait)]

mod error;
mod udp;

pub use error::TransportError;
pub use udp::UdpTransport;

use std::net::SocketAddr;
use std::time::Duration;

/// Largest datagram the server will read. Anything longer is truncated
/// by the socket and fails length validation upstream.
pub const MAX_DATAGRAM_SIZE: usize = 64;

/// A single inbound packet and the address it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    /// Raw payload, at most [`MAX_DATAGRAM_SIZE`] bytes.
    pub payload: Vec<u8>,
    /// Source address of the packet.
    pub source: SocketAddr,
}

/// A connectionless socket that can receive from and send to any peer.
pub trait Transport: Send + Sync + 'static {
    /// The error type for transport operations.
    type Error: std::error::Error + Send + Sync;

    /// Waits for the next datagram.
    async fn recv(&self) -> Result<Datagram, Self::Error>;

    /// Sends `data` to `dest`.
    async fn send_to(&self, dest: SocketAddr, data: &[u8]) -> Result<(), Self::Error>;

    /// Returns the address the socket is bound to.
    fn local_addr(&self) -> Result<SocketAddr, Self::Error>;

    /// Waits for the next datagram, giving up after `timeout`.
    ///
    /// Returns `Ok(None)` when nothing arrived in time. The server loop
    /// relies on this so that periodic work still runs on an idle network.
    async fn recv_timeout(&self, timeout: Duration) -> Result<Option<Datagram>, Self::Error> {
        match tokio::time::timeout(timeout, self.recv()).await {
            Ok(result) => result.map(Some),
            Err(_) => Ok(None),
        }
    }
}
