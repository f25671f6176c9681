//! The player record and session settings.

use std::time::{Duration, Instant};

use noughts_protocol::{PeerId, PlayerId, PlayerName, RoomId};

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a player may stay silent before being evicted.
    ///
    /// Default: 120 seconds.
    pub liveness_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            liveness_timeout: Duration::from_secs(120),
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A registered player.
///
/// `room` is a handle into the room registry, not ownership: the room is
/// owned there, and the dispatcher keeps both sides in step.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,

    /// The address this player's packets come from.
    pub peer: PeerId,

    /// Self-declared display name, raw bytes as sent.
    pub name: PlayerName,

    /// The room this player owns or challenges, if any.
    pub room: Option<RoomId>,

    /// When the last packet from this player arrived.
    pub last_seen: Instant,
}

impl Player {
    /// Returns `true` if the player has been silent for longer than
    /// `timeout` as of `now`.
    pub fn is_silent(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) > timeout
    }
}
