//! Core protocol types for Noughts' wire format.
//!
//! Everything here either travels on the wire (commands, responses, cell
//! codes) or names something that does (peers, players, rooms). The byte
//! layout itself lives in [`crate::codec`].

use std::fmt;
use std::net::SocketAddr;

// ---------------------------------------------------------------------------
// Wire constants
// ---------------------------------------------------------------------------

/// Length of the display name carried by a Join packet.
pub const NAME_LEN: usize = 21;

/// Number of room-id slots in an announcement. Also the hard upper bound
/// on concurrent rooms, since a room that cannot be announced cannot be
/// challenged.
pub const MAX_ROOMS: usize = 10;

/// Number of cells on the board.
pub const BOARD_CELLS: usize = 9;

/// Total length of a Join packet: opcode + name.
pub const JOIN_PACKET_LEN: usize = 4 + NAME_LEN;

/// Total length of every other client packet: opcode + one u32 argument
/// (unused by Quit and CreateRoom, but still present).
pub const COMMAND_PACKET_LEN: usize = 8;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// The transport-level identity of a peer: the source address of its
/// datagrams. This is the only identity a player has.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub SocketAddr);

impl From<SocketAddr> for PeerId {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Handle for a registered player.
///
/// Allocated by the session registry on every successful join and never
/// reused, so a room holding a stale `PlayerId` can never confuse it with
/// a newer registration from the same address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

/// Identifier of a room. Positive, allocated from 1 upwards, never reused
/// within one server lifetime. `0` on the wire means "empty slot".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{}", self.0)
    }
}

/// A self-declared display name: exactly [`NAME_LEN`] raw bytes.
///
/// The bytes are kept as sent. They are not required to be UTF-8 or
/// NUL-free; [`Display`](fmt::Display) renders them lossily up to the
/// first NUL for logging.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlayerName([u8; NAME_LEN]);

impl PlayerName {
    /// Wraps raw name bytes.
    pub fn new(bytes: [u8; NAME_LEN]) -> Self {
        Self(bytes)
    }

    /// Builds a NUL-padded name from a string, truncating at
    /// [`NAME_LEN`] bytes.
    pub fn from_str_padded(name: &str) -> Self {
        let mut bytes = [0u8; NAME_LEN];
        let len = name.len().min(NAME_LEN);
        bytes[..len].copy_from_slice(&name.as_bytes()[..len]);
        Self(bytes)
    }

    /// The raw bytes, padding included.
    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = self.0.iter().position(|b| *b == 0).unwrap_or(NAME_LEN);
        write!(f, "{}", String::from_utf8_lossy(&self.0[..end]))
    }
}

impl fmt::Debug for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerName({:?})", self.to_string())
    }
}

// ---------------------------------------------------------------------------
// Opcodes
// ---------------------------------------------------------------------------

/// Every opcode the protocol knows, in both directions.
///
/// Client commands occupy 0–4; server responses occupy 5–13. Codes 8
/// and 14 were reserved by older servers and are never produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Opcode {
    Join = 0,
    Challenge = 1,
    Move = 2,
    Quit = 3,
    CreateRoom = 4,
    AnnounceRooms = 5,
    Ok = 6,
    Negated = 7,
    RoomDestroyed = 9,
    RoomCreated = 10,
    Kick = 11,
    RoomClosing = 12,
    GameState = 13,
}

impl Opcode {
    /// Parses a raw opcode. Returns `None` for anything unassigned.
    pub fn from_u32(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Join,
            1 => Self::Challenge,
            2 => Self::Move,
            3 => Self::Quit,
            4 => Self::CreateRoom,
            5 => Self::AnnounceRooms,
            6 => Self::Ok,
            7 => Self::Negated,
            9 => Self::RoomDestroyed,
            10 => Self::RoomCreated,
            11 => Self::Kick,
            12 => Self::RoomClosing,
            13 => Self::GameState,
            _ => return None,
        })
    }

    /// Returns `true` for opcodes a client may send.
    pub fn is_command(self) -> bool {
        (self as u32) <= Self::CreateRoom as u32
    }

    /// The exact packet length for this opcode, header included.
    pub fn packet_len(self) -> usize {
        match self {
            Self::Join => JOIN_PACKET_LEN,
            Self::Challenge | Self::Move | Self::Quit | Self::CreateRoom => COMMAND_PACKET_LEN,
            Self::Ok | Self::Negated | Self::Kick => 4,
            Self::RoomDestroyed | Self::RoomCreated | Self::RoomClosing => 8,
            Self::AnnounceRooms => 4 + 4 * MAX_ROOMS,
            Self::GameState => 4 + 4 + 4 * BOARD_CELLS,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}({})", *self as u32)
    }
}

// ---------------------------------------------------------------------------
// Command (client → server)
// ---------------------------------------------------------------------------

/// A decoded client command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// "Register me under this name."
    Join { name: PlayerName },
    /// "Put me in this room as the challenger."
    Challenge { room_id: RoomId },
    /// "Claim this cell." The index is validated by the game, not here.
    Move { cell: u32 },
    /// "I'm leaving."
    Quit,
    /// "Open a new room with me as owner."
    CreateRoom,
}

impl Command {
    /// The opcode this command travels under.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Join { .. } => Opcode::Join,
            Self::Challenge { .. } => Opcode::Challenge,
            Self::Move { .. } => Opcode::Move,
            Self::Quit => Opcode::Quit,
            Self::CreateRoom => Opcode::CreateRoom,
        }
    }
}

// ---------------------------------------------------------------------------
// Response (server → client)
// ---------------------------------------------------------------------------

/// How one board cell looks from the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum CellCode {
    Empty = 0,
    /// Claimed by the room owner.
    Owner = 1,
    /// Claimed by the challenger.
    Challenger = 2,
    /// Claimed by someone who is no longer either participant.
    Ambiguous = 3,
}

impl CellCode {
    /// Parses a raw cell code.
    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            0 => Some(Self::Empty),
            1 => Some(Self::Owner),
            2 => Some(Self::Challenger),
            3 => Some(Self::Ambiguous),
            _ => None,
        }
    }
}

/// A server response or notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Open rooms. Only the first [`MAX_ROOMS`] ids are encoded; the rest
    /// of the slots are zero.
    AnnounceRooms(Vec<RoomId>),
    Ok,
    Negated,
    /// "You're out." Sent on kicks and on every normal departure.
    Kick,
    RoomDestroyed(RoomId),
    RoomCreated(RoomId),
    /// The room you are in is going away (opponent left or game over).
    RoomClosing(RoomId),
    /// Board snapshot, personalised per recipient.
    GameState {
        /// `true` if the recipient moves next.
        your_turn: bool,
        cells: [CellCode; BOARD_CELLS],
    },
}

impl Response {
    /// The opcode this response travels under.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::AnnounceRooms(_) => Opcode::AnnounceRooms,
            Self::Ok => Opcode::Ok,
            Self::Negated => Opcode::Negated,
            Self::Kick => Opcode::Kick,
            Self::RoomDestroyed(_) => Opcode::RoomDestroyed,
            Self::RoomCreated(_) => Opcode::RoomCreated,
            Self::RoomClosing(_) => Opcode::RoomClosing,
            Self::GameState { .. } => Opcode::GameState,
        }
    }
}

// =========================================================================
// Tests
// =========================================================================
