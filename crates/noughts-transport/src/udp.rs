//! UDP transport implementation using `tokio::net::UdpSocket`.

use std::net::SocketAddr;

use tokio::net::UdpSocket;

use crate::{Datagram, MAX_DATAGRAM_SIZE, Transport, TransportError};

/// A [`Transport`] backed by a single bound UDP socket.
pub struct UdpTransport {
    socket: UdpSocket,
}

impl UdpTransport {
    /// Binds a new UDP transport to the given address.
    pub async fn bind(addr: &str) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(addr)
            .await
            .map_err(TransportError::BindFailed)?;
        tracing::info!(addr, "UDP transport listening");
        Ok(Self { socket })
    }
}

impl Transport for UdpTransport {
    type Error = TransportError;

    async fn recv(&self) -> Result<Datagram, Self::Error> {
        let mut buf = [0u8; MAX_DATAGRAM_SIZE];
        let (len, source) = self
            .socket
            .recv_from(&mut buf)
            .await
            .map_err(TransportError::ReceiveFailed)?;
        tracing::trace!(%source, len, "datagram received");
        Ok(Datagram {
            payload: buf[..len].to_vec(),
            source,
        })
    }

    async fn send_to(&self, dest: SocketAddr, data: &[u8]) -> Result<(), Self::Error> {
        self.socket
            .send_to(data, dest)
            .await
            .map_err(TransportError::SendFailed)?;
        Ok(())
    }

    fn local_addr(&self) -> Result<SocketAddr, Self::Error> {
        self.socket.local_addr().map_err(TransportError::LocalAddr)
    }
}
