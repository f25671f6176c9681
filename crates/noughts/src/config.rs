//! Server configuration.

use std::path::Path;
use std::time::Duration;

use noughts_room::RoomConfig;
use noughts_session::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::NoughtsError;

/// Everything the server needs to start.
///
/// Every field has a default, so a config file only has to name what it
/// changes:
///
/// ```
/// let config: noughts::ServerConfig =
///     serde_json::from_str(r#"{ "bind_addr": "0.0.0.0:9999" }"#).unwrap();
/// assert_eq!(config.max_rooms, 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// UDP address to bind.
    pub bind_addr: String,

    /// Upper bound on each receive, in milliseconds. Periodic work runs at
    /// least this often.
    pub recv_timeout_ms: u64,

    /// How often open rooms are announced to idle players.
    pub announce_interval_secs: u64,

    /// How long a player may stay silent before eviction.
    pub liveness_timeout_secs: u64,

    /// Maximum concurrent rooms. Capped at the announcement width.
    pub max_rooms: usize,

    /// Evict a registered player who sends a malformed packet.
    pub kick_on_malformed: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:9999".to_string(),
            recv_timeout_ms: 1_000,
            announce_interval_secs: 5,
            liveness_timeout_secs: 120,
            max_rooms: noughts_protocol::MAX_ROOMS,
            kick_on_malformed: false,
        }
    }
}

impl ServerConfig {
    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, NoughtsError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| {
            NoughtsError::ConfigRead {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// - `recv_timeout_ms`, `announce_interval_secs` and
    ///   `liveness_timeout_secs` are at least 1.
    /// - `max_rooms` is capped at the announcement width.
    pub fn validated(mut self) -> Self {
        if self.recv_timeout_ms == 0 {
            tracing::warn!("recv_timeout_ms is 0, using 1");
            self.recv_timeout_ms = 1;
        }
        if self.announce_interval_secs == 0 {
            tracing::warn!("announce_interval_secs is 0, using 1");
            self.announce_interval_secs = 1;
        }
        if self.liveness_timeout_secs == 0 {
            tracing::warn!("liveness_timeout_secs is 0, using 1");
            self.liveness_timeout_secs = 1;
        }
        self.max_rooms = self.room_config().validated().max_rooms;
        self
    }

    pub fn recv_timeout(&self) -> Duration {
        Duration::from_millis(self.recv_timeout_ms)
    }

    pub fn announce_interval(&self) -> Duration {
        Duration::from_secs(self.announce_interval_secs)
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            liveness_timeout: Duration::from_secs(self.liveness_timeout_secs),
        }
    }

    pub fn room_config(&self) -> RoomConfig {
        RoomConfig {
            max_rooms: self.max_rooms,
        }
    }
}
