//! Room lifecycle and game rules for Noughts.
//!
//! A room is one tic-tac-toe match: an owner who created it, at most one
//! challenger, and the board they share. Rooms never touch the network;
//! they only refer to players through [`PlayerId`](noughts_protocol::PlayerId)
//! handles and to their addresses through
//! [`PeerId`](noughts_protocol::PeerId).
//!
//! # Key types
//!
//! - [`Game`]: the board, turn pointer and outcome
//! - [`Room`]: a game plus the addresses of its participants
//! - [`RoomRegistry`]: creates, looks up and deletes rooms; caps the count
//! - [`RoomState`]: lifecycle state machine
//! - [`RoomConfig`]: registry settings

mod config;
mod error;
mod game;
mod registry;

pub use config::{RoomConfig, RoomState};
pub use error::{MoveError, RoomError};
pub use game::{Game, Outcome};
pub use registry::{Room, RoomRegistry};
