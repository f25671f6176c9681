//! `NoughtsServer` builder and server loop.
//!
//! This ties the layers together: transport → protocol → lobby →
//! protocol → transport, with the scheduler run on every iteration.

use std::future::Future;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use noughts_protocol::{BinaryCodec, Codec, PeerId};
use noughts_transport::{Datagram, Transport, UdpTransport};

use crate::{Lobby, NoughtsError, Outbound, Scheduler, ServerConfig};

/// Builder for configuring and starting a Noughts server.
///
/// # Example
///
/// ```rust,no_run
/// # async fn demo() -> Result<(), noughts::NoughtsError> {
/// use noughts::prelude::*;
///
/// let server = NoughtsServer::builder()
///     .bind("0.0.0.0:9999")
///     .build()
///     .await?;
/// server.run().await
/// # }
/// ```
pub struct NoughtsServerBuilder {
    bind_addr: Option<String>,
    config: ServerConfig,
}

impl NoughtsServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: None,
            config: ServerConfig::default(),
        }
    }

    /// Sets the address to bind, overriding `config.bind_addr`.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = Some(addr.to_string());
        self
    }

    /// Sets the server configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Binds the socket and assembles the server.
    pub async fn build(self) -> Result<NoughtsServer, NoughtsError> {
        let mut config = self.config.validated();
        if let Some(addr) = self.bind_addr {
            config.bind_addr = addr;
        }

        let transport = UdpTransport::bind(&config.bind_addr).await?;
        let now = Instant::now();

        Ok(NoughtsServer {
            transport,
            codec: BinaryCodec,
            lobby: Lobby::from_config(&config),
            scheduler: Scheduler::new(config.announce_interval(), now),
            recv_timeout: config.recv_timeout(),
        })
    }
}

impl Default for NoughtsServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A bound Noughts server.
///
/// Call [`run()`](Self::run) to serve until Ctrl-C, or
/// [`run_until()`](Self::run_until) to choose the stop signal.
pub struct NoughtsServer {
    transport: UdpTransport,
    codec: BinaryCodec,
    lobby: Lobby,
    scheduler: Scheduler,
    recv_timeout: Duration,
}

impl NoughtsServer {
    /// Creates a new builder.
    pub fn builder() -> NoughtsServerBuilder {
        NoughtsServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> Result<SocketAddr, NoughtsError> {
        Ok(self.transport.local_addr()?)
    }

    /// Serves until the process receives Ctrl-C.
    pub async fn run(self) -> Result<(), NoughtsError> {
        self.run_until(async {
            if let Err(error) = tokio::signal::ctrl_c().await {
                tracing::warn!(%error, "cannot listen for Ctrl-C, serving forever");
                std::future::pending::<()>().await;
            }
        })
        .await
    }

    /// Serves until `shutdown` completes.
    ///
    /// Each iteration receives at most one datagram, dispatches it, then
    /// runs scheduled work. The receive waits no longer than the receive
    /// timeout or the next announcement, whichever comes first.
    /// Per-iteration failures are logged and never end the loop.
    pub async fn run_until<F>(mut self, shutdown: F) -> Result<(), NoughtsError>
    where
        F: Future<Output = ()>,
    {
        tracing::info!(addr = ?self.transport.local_addr().ok(), "Noughts server running");
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = self.step() => {}
            }
        }

        let metrics = self.scheduler.announce_metrics();
        tracing::info!(
            players = self.lobby.sessions().len(),
            rooms = self.lobby.rooms().len(),
            announcements = metrics.total_ticks,
            skipped_announcements = metrics.total_skipped,
            "shutting down"
        );
        Ok(())
    }

    /// One loop iteration.
    async fn step(&mut self) {
        let wait = self
            .recv_timeout
            .min(self.scheduler.time_until_due(Instant::now()));
        match self.transport.recv_timeout(wait).await {
            Ok(Some(datagram)) => {
                let out = self.dispatch(datagram, Instant::now());
                self.deliver(out).await;
            }
            Ok(None) => {}
            Err(error) => tracing::warn!(%error, "receive failed"),
        }

        let out = self.scheduler.run_due(&mut self.lobby, Instant::now());
        self.deliver(out).await;
    }

    fn dispatch(&mut self, datagram: Datagram, now: Instant) -> Vec<Outbound> {
        let peer = PeerId::from(datagram.source);
        match self.codec.decode_command(&datagram.payload) {
            Ok(command) => {
                tracing::debug!(%peer, opcode = %command.opcode(), "command received");
                self.lobby.handle_command(peer, command, now)
            }
            Err(error) => self.lobby.handle_malformed(peer, &error, now),
        }
    }

    async fn deliver(&self, out: Vec<Outbound>) {
        for Outbound { to, response } in out {
            let bytes = self.codec.encode_response(&response);
            if let Err(error) = self.transport.send_to(to.0, &bytes).await {
                tracing::warn!(peer = %to, %error, "send failed");
            }
        }
    }
}
