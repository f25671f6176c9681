//! Error types for the session layer.

use noughts_protocol::PeerId;

/// Errors that can occur during session management.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// No player is registered at this address.
    #[error("no player registered at {0}")]
    UnknownPeer(PeerId),

    /// A player is already registered at this address. The caller decides
    /// what to do with the stale registration.
    #[error("a player is already registered at {0}")]
    AlreadyRegistered(PeerId),
}
