//! Wire protocol for Noughts.
//!
//! This crate defines the language clients and the server speak over UDP:
//!
//! - **Types** ([`Command`], [`Response`], [`CellCode`], [`Opcode`]) and
//!   the identities they mention ([`PeerId`], [`PlayerId`], [`RoomId`],
//!   [`PlayerName`]).
//! - **Codec** ([`Codec`] trait, [`BinaryCodec`]): fixed-width,
//!   little-endian packets.
//! - **Errors** ([`ProtocolError`]): the malformed-packet taxonomy.
//!
//! # Architecture
//!
//! ```text
//! Transport (datagrams) → Protocol (Command) → Lobby (state) → Protocol (Response)
//! ```
//!
//! The protocol layer is pure: no sockets, no clocks, no state.

mod codec;
mod error;
mod types;

pub use codec::{BinaryCodec, Codec};
pub use error::ProtocolError;
pub use types::{
    BOARD_CELLS, COMMAND_PACKET_LEN, CellCode, Command, JOIN_PACKET_LEN,
    MAX_ROOMS, NAME_LEN, Opcode, PeerId, PlayerId, PlayerName, Response,
    RoomId,
};
