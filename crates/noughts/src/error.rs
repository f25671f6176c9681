//! Unified error type for Noughts.

use std::path::PathBuf;

use noughts_transport::TransportError;

/// Errors that stop the server from starting or serving.
///
/// Protocol, session, room and move failures never get here: the lobby
/// answers them on the wire (NEGATED or silence) and keeps serving.
#[derive(Debug, thiserror::Error)]
pub enum NoughtsError {
    /// A transport-level error (bind, send, receive).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The config file could not be read.
    #[error("failed to read config {}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid JSON for [`ServerConfig`](crate::ServerConfig).
    #[error("invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
