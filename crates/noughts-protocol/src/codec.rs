//! Codec trait and the fixed-width binary implementation.
//!
//! A codec converts between typed commands/responses and raw datagram
//! bytes. The server only ever calls [`Codec::decode_command`] and
//! [`Codec::encode_response`]; the other two directions exist for clients
//! and for tests that play the client role.
//!
//! # Layout
//!
//! Every field is a little-endian `u32`, except the Join name which is 21
//! raw bytes. Lengths are exact: a packet that is one byte too long is as
//! malformed as one that is one byte too short.

use crate::{
    BOARD_CELLS, CellCode, Command, MAX_ROOMS, NAME_LEN, Opcode, PlayerName,
    ProtocolError, Response, RoomId,
};

/// Smallest packet the server will look at.
const MIN_PACKET_LEN: usize = 4;

/// Converts commands and responses to and from bytes.
///
/// `Send + Sync + 'static` so a codec can live inside the server for its
/// whole lifetime.
pub trait Codec: Send + Sync + 'static {
    /// Decodes a client packet.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the packet is too short, carries an
    /// opcode that is not a client command, or has the wrong length for
    /// its opcode.
    fn decode_command(&self, data: &[u8]) -> Result<Command, ProtocolError>;

    /// Encodes a server response.
    fn encode_response(&self, response: &Response) -> Vec<u8>;

    /// Encodes a client command.
    fn encode_command(&self, command: &Command) -> Vec<u8>;

    /// Decodes a server response.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the packet is malformed or a cell
    /// code / turn flag is out of range.
    fn decode_response(&self, data: &[u8]) -> Result<Response, ProtocolError>;
}

// ---------------------------------------------------------------------------
// BinaryCodec
// ---------------------------------------------------------------------------

/// The fixed-width little-endian [`Codec`] spoken by every Noughts client.
///
/// ```rust
/// use noughts_protocol::{BinaryCodec, Codec, Command};
///
/// let codec = BinaryCodec;
/// let bytes = [2, 0, 0, 0, 4, 0, 0, 0];
/// assert_eq!(codec.decode_command(&bytes), Ok(Command::Move { cell: 4 }));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryCodec;

impl Codec for BinaryCodec {
    fn decode_command(&self, data: &[u8]) -> Result<Command, ProtocolError> {
        // Every client packet carries at least one argument word, so
        // anything under 8 bytes is garbage regardless of opcode.
        if data.len() < crate::COMMAND_PACKET_LEN {
            return Err(ProtocolError::TooShort(data.len()));
        }

        let raw = read_u32(data, 0);
        let opcode = Opcode::from_u32(raw)
            .filter(|op| op.is_command())
            .ok_or(ProtocolError::UnknownOpcode(raw))?;
        check_len(opcode, data)?;

        Ok(match opcode {
            Opcode::Join => {
                let mut name = [0u8; NAME_LEN];
                name.copy_from_slice(&data[4..4 + NAME_LEN]);
                Command::Join {
                    name: PlayerName::new(name),
                }
            }
            Opcode::Challenge => Command::Challenge {
                room_id: RoomId(read_u32(data, 4)),
            },
            Opcode::Move => Command::Move {
                cell: read_u32(data, 4),
            },
            Opcode::Quit => Command::Quit,
            Opcode::CreateRoom => Command::CreateRoom,
            _ => return Err(ProtocolError::UnknownOpcode(raw)),
        })
    }

    fn encode_response(&self, response: &Response) -> Vec<u8> {
        let opcode = response.opcode();
        let mut buf = Vec::with_capacity(opcode.packet_len());
        put_u32(&mut buf, opcode as u32);

        match response {
            Response::Ok | Response::Negated | Response::Kick => {}
            Response::RoomDestroyed(id)
            | Response::RoomCreated(id)
            | Response::RoomClosing(id) => put_u32(&mut buf, id.0),
            Response::AnnounceRooms(ids) => {
                for slot in 0..MAX_ROOMS {
                    put_u32(&mut buf, ids.get(slot).map_or(0, |id| id.0));
                }
            }
            Response::GameState { your_turn, cells } => {
                put_u32(&mut buf, u32::from(*your_turn));
                for cell in cells {
                    put_u32(&mut buf, *cell as u32);
                }
            }
        }

        buf
    }

    fn encode_command(&self, command: &Command) -> Vec<u8> {
        let opcode = command.opcode();
        let mut buf = Vec::with_capacity(opcode.packet_len());
        put_u32(&mut buf, opcode as u32);

        match command {
            Command::Join { name } => buf.extend_from_slice(name.as_bytes()),
            Command::Challenge { room_id } => put_u32(&mut buf, room_id.0),
            Command::Move { cell } => put_u32(&mut buf, *cell),
            Command::Quit | Command::CreateRoom => put_u32(&mut buf, 0),
        }

        buf
    }

    fn decode_response(&self, data: &[u8]) -> Result<Response, ProtocolError> {
        if data.len() < MIN_PACKET_LEN {
            return Err(ProtocolError::TooShort(data.len()));
        }

        let raw = read_u32(data, 0);
        let opcode = Opcode::from_u32(raw)
            .filter(|op| !op.is_command())
            .ok_or(ProtocolError::UnknownOpcode(raw))?;
        check_len(opcode, data)?;

        Ok(match opcode {
            Opcode::Ok => Response::Ok,
            Opcode::Negated => Response::Negated,
            Opcode::Kick => Response::Kick,
            Opcode::RoomDestroyed => Response::RoomDestroyed(RoomId(read_u32(data, 4))),
            Opcode::RoomCreated => Response::RoomCreated(RoomId(read_u32(data, 4))),
            Opcode::RoomClosing => Response::RoomClosing(RoomId(read_u32(data, 4))),
            Opcode::AnnounceRooms => Response::AnnounceRooms(
                (0..MAX_ROOMS)
                    .map(|slot| read_u32(data, 4 + 4 * slot))
                    .filter(|id| *id != 0)
                    .map(RoomId)
                    .collect(),
            ),
            Opcode::GameState => {
                let your_turn = match read_u32(data, 4) {
                    0 => false,
                    1 => true,
                    value => {
                        return Err(ProtocolError::InvalidField {
                            field: "turn flag",
                            value,
                        });
                    }
                };
                let mut cells = [CellCode::Empty; BOARD_CELLS];
                for (i, cell) in cells.iter_mut().enumerate() {
                    let value = read_u32(data, 8 + 4 * i);
                    *cell = CellCode::from_u32(value).ok_or(
                        ProtocolError::InvalidField {
                            field: "cell code",
                            value,
                        },
                    )?;
                }
                Response::GameState { your_turn, cells }
            }
            _ => return Err(ProtocolError::UnknownOpcode(raw)),
        })
    }
}

fn check_len(opcode: Opcode, data: &[u8]) -> Result<(), ProtocolError> {
    let expected = opcode.packet_len();
    if data.len() != expected {
        return Err(ProtocolError::WrongLength {
            opcode,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Reads a little-endian `u32` at `offset`. Callers check the length first.
fn read_u32(data: &[u8], offset: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&data[offset..offset + 4]);
    u32::from_le_bytes(word)
}

fn put_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(words: &[u32]) -> Vec<u8> {
        words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    fn join_packet(name: &str) -> Vec<u8> {
        let mut data = packet(&[0]);
        data.extend_from_slice(PlayerName::from_str_padded(name).as_bytes());
        data
    }

    // =====================================================================
    // decode_command
    // =====================================================================

    #[test]
    fn test_decode_join_reads_name() {
        let cmd = BinaryCodec.decode_command(&join_packet("Alice")).unwrap();
        match cmd {
            Command::Join { name } => assert_eq!(name.to_string(), "Alice"),
            other => panic!("expected Join, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_join_wrong_length_is_malformed() {
        let mut data = join_packet("Alice");
        data.push(0);
        let err = BinaryCodec.decode_command(&data).unwrap_err();
        assert_eq!(
            err,
            ProtocolError::WrongLength {
                opcode: Opcode::Join,
                expected: 25,
                actual: 26,
            }
        );

        let err = BinaryCodec.decode_command(&packet(&[0, 0])).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::WrongLength { opcode: Opcode::Join, actual: 8, .. }
        ));
    }

    #[test]
    fn test_decode_challenge_and_move() {
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[1, 42])),
            Ok(Command::Challenge { room_id: RoomId(42) })
        );
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[2, 8])),
            Ok(Command::Move { cell: 8 })
        );
    }

    #[test]
    fn test_decode_move_keeps_out_of_range_cell() {
        // Range checking belongs to the game, not the codec.
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[2, 99])),
            Ok(Command::Move { cell: 99 })
        );
    }

    #[test]
    fn test_decode_quit_and_create_room_ignore_padding_word() {
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[3, 0])),
            Ok(Command::Quit)
        );
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[4, 4])),
            Ok(Command::CreateRoom)
        );
    }

    #[test]
    fn test_decode_short_packet_is_too_short() {
        assert_eq!(
            BinaryCodec.decode_command(&[3, 0, 0, 0]),
            Err(ProtocolError::TooShort(4))
        );
        assert_eq!(
            BinaryCodec.decode_command(&[]),
            Err(ProtocolError::TooShort(0))
        );
    }

    #[test]
    fn test_decode_server_opcode_is_unknown() {
        // 5 is ANNOUNCE_ROOMS: valid on the wire, but never from a client.
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[5, 0])),
            Err(ProtocolError::UnknownOpcode(5))
        );
    }

    #[test]
    fn test_decode_garbage_opcode_is_unknown() {
        assert_eq!(
            BinaryCodec.decode_command(&packet(&[0xdead_beef, 0])),
            Err(ProtocolError::UnknownOpcode(0xdead_beef))
        );
    }

    #[test]
    fn test_decode_move_with_trailing_bytes_is_malformed() {
        let err = BinaryCodec.decode_command(&packet(&[2, 4, 0])).unwrap_err();
        assert!(matches!(
            err,
            ProtocolError::WrongLength { opcode: Opcode::Move, expected: 8, actual: 12 }
        ));
    }

    // =====================================================================
    // encode_response
    // =====================================================================

    #[test]
    fn test_encode_bare_responses_are_one_word() {
        assert_eq!(BinaryCodec.encode_response(&Response::Ok), packet(&[6]));
        assert_eq!(
            BinaryCodec.encode_response(&Response::Negated),
            packet(&[7])
        );
        assert_eq!(BinaryCodec.encode_response(&Response::Kick), packet(&[11]));
    }

    #[test]
    fn test_encode_room_responses_carry_id() {
        assert_eq!(
            BinaryCodec.encode_response(&Response::RoomCreated(RoomId(1))),
            packet(&[10, 1])
        );
        assert_eq!(
            BinaryCodec.encode_response(&Response::RoomDestroyed(RoomId(2))),
            packet(&[9, 2])
        );
        assert_eq!(
            BinaryCodec.encode_response(&Response::RoomClosing(RoomId(3))),
            packet(&[12, 3])
        );
    }

    #[test]
    fn test_encode_announce_rooms_zero_pads() {
        let bytes = BinaryCodec
            .encode_response(&Response::AnnounceRooms(vec![RoomId(2), RoomId(5)]));
        assert_eq!(bytes, packet(&[5, 2, 5, 0, 0, 0, 0, 0, 0, 0, 0]));
    }

    #[test]
    fn test_encode_announce_rooms_truncates_overflow() {
        let ids: Vec<RoomId> = (1..=12).map(RoomId).collect();
        let bytes = BinaryCodec.encode_response(&Response::AnnounceRooms(ids));
        assert_eq!(bytes.len(), 44);
        assert_eq!(bytes, packet(&[5, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10]));
    }

    #[test]
    fn test_encode_game_state_layout() {
        let mut cells = [CellCode::Empty; BOARD_CELLS];
        cells[4] = CellCode::Owner;
        cells[0] = CellCode::Challenger;
        cells[8] = CellCode::Ambiguous;
        let bytes = BinaryCodec.encode_response(&Response::GameState {
            your_turn: true,
            cells,
        });
        assert_eq!(bytes, packet(&[13, 1, 2, 0, 0, 0, 1, 0, 0, 0, 3]));
    }

    // =====================================================================
    // Client direction
    // =====================================================================

    #[test]
    fn test_encode_command_matches_client_layout() {
        assert_eq!(BinaryCodec.encode_command(&Command::Quit), packet(&[3, 0]));
        assert_eq!(
            BinaryCodec.encode_command(&Command::Challenge { room_id: RoomId(7) }),
            packet(&[1, 7])
        );
        let join = BinaryCodec.encode_command(&Command::Join {
            name: PlayerName::from_str_padded("Bob"),
        });
        assert_eq!(join, join_packet("Bob"));
    }

    #[test]
    fn test_decode_response_announce_skips_empty_slots() {
        let data = packet(&[5, 3, 0, 9, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(
            BinaryCodec.decode_response(&data),
            Ok(Response::AnnounceRooms(vec![RoomId(3), RoomId(9)]))
        );
    }

    #[test]
    fn test_decode_response_rejects_bad_cell_code() {
        let data = packet(&[13, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0]);
        assert_eq!(
            BinaryCodec.decode_response(&data),
            Err(ProtocolError::InvalidField { field: "cell code", value: 4 })
        );
    }

    #[test]
    fn test_decode_response_rejects_command_opcode() {
        assert_eq!(
            BinaryCodec.decode_response(&packet(&[2, 4])),
            Err(ProtocolError::UnknownOpcode(2))
        );
    }
}
