//! Room configuration and lifecycle states.

use noughts_protocol::MAX_ROOMS;

// ---------------------------------------------------------------------------
// RoomConfig
// ---------------------------------------------------------------------------

/// Configuration for the room registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomConfig {
    /// Maximum number of rooms that may exist at once.
    pub max_rooms: usize,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            max_rooms: MAX_ROOMS,
        }
    }
}

impl RoomConfig {
    /// Clamps out-of-range values so the config is safe to use.
    ///
    /// `max_rooms` cannot exceed [`MAX_ROOMS`]: the announcement packet has
    /// exactly that many slots, and an unannounced room can never be
    /// challenged.
    pub fn validated(mut self) -> Self {
        if self.max_rooms > MAX_ROOMS {
            tracing::warn!(
                max_rooms = self.max_rooms,
                limit = MAX_ROOMS,
                "max_rooms exceeds announcement capacity, clamping"
            );
            self.max_rooms = MAX_ROOMS;
        }
        self
    }
}

// ---------------------------------------------------------------------------
// RoomState
// ---------------------------------------------------------------------------

/// The lifecycle state of a room, derived from its game.
///
/// ```text
/// WaitingForChallenger ──(challenger seated)──→ InProgress ──→ Won | Draw
///          ↑                                        │
///          └──────────────(reset)───────────────────┘
/// ```
///
/// - **WaitingForChallenger**: the door is open; the room is announced.
/// - **InProgress**: two players, moves alternate.
/// - **Won** / **Draw**: terminal. The room is torn down right after.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    WaitingForChallenger,
    InProgress,
    Won,
    Draw,
}

impl RoomState {
    /// Returns `true` if the room accepts a challenger.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::WaitingForChallenger)
    }

    /// Returns `true` once no more moves are accepted.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won | Self::Draw)
    }
}

impl std::fmt::Display for RoomState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WaitingForChallenger => write!(f, "WaitingForChallenger"),
            Self::InProgress => write!(f, "InProgress"),
            Self::Won => write!(f, "Won"),
            Self::Draw => write!(f, "Draw"),
        }
    }
}
