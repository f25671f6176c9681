//! Error types for the room layer.

use noughts_protocol::{PlayerId, RoomId};

/// Errors from room and registry operations. All of them are policy
/// rejections: the caller answers NEGATED and nothing changes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomError {
    /// The room does not exist.
    #[error("room {0} not found")]
    NotFound(RoomId),

    /// The registry already holds the maximum number of rooms.
    #[error("room limit of {0} reached")]
    AtCapacity(usize),

    /// The player already owns or occupies a room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomId),

    /// The room has a challenger already, or its game is over.
    #[error("room {0} is not accepting challengers")]
    DoorClosed(RoomId),
}

/// Why a move was refused. A refused move changes nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("cell {0} is off the board")]
    OutOfBounds(u32),

    #[error("cell {0} is already taken")]
    CellTaken(usize),

    #[error("game is over")]
    GameOver,

    #[error("no challenger yet")]
    NoChallenger,

    #[error("player {0} is not playing in this room")]
    NotParticipant(PlayerId),

    #[error("not {0}'s turn")]
    NotYourTurn(PlayerId),
}
