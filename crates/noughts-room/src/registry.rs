//! Room registry: creates, tracks, and deletes rooms.

use std::collections::BTreeMap;

use noughts_protocol::{PeerId, PlayerId, RoomId};

use crate::{Game, MoveError, Outcome, RoomConfig, RoomError, RoomState};

/// A game plus the addresses needed to reach its participants.
#[derive(Debug, Clone)]
pub struct Room {
    id: RoomId,
    owner_peer: PeerId,
    challenger_peer: Option<PeerId>,
    game: Game,
}

impl Room {
    fn new(id: RoomId, owner: PlayerId, owner_peer: PeerId) -> Self {
        Self {
            id,
            owner_peer,
            challenger_peer: None,
            game: Game::new(owner),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn owner_peer(&self) -> PeerId {
        self.owner_peer
    }

    pub fn challenger_peer(&self) -> Option<PeerId> {
        self.challenger_peer
    }

    /// Read-only view of the board and seats.
    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn state(&self) -> RoomState {
        self.game.state()
    }

    pub fn is_door_open(&self) -> bool {
        self.game.is_door_open()
    }

    /// Seated players and their addresses, owner first.
    pub fn participants(&self) -> Vec<(PlayerId, PeerId)> {
        let owner = (self.game.owner(), self.owner_peer);
        let challenger = self.game.challenger().zip(self.challenger_peer);
        std::iter::once(owner).chain(challenger).collect()
    }

    /// Seats `player` (reachable at `peer`) as the challenger.
    pub fn seat_challenger(&mut self, player: PlayerId, peer: PeerId) -> Result<(), RoomError> {
        self.game.seat_challenger(self.id, player)?;
        self.challenger_peer = Some(peer);
        tracing::info!(room_id = %self.id, %player, state = %self.state(), "challenger seated");
        Ok(())
    }

    pub fn make_move(&mut self, player: PlayerId, cell: u32) -> Result<Outcome, MoveError> {
        let outcome = self.game.make_move(player, cell)?;
        if self.state().is_terminal() {
            tracing::debug!(room_id = %self.id, state = %self.state(), "game over");
        }
        Ok(outcome)
    }

    /// Drops the challenger and reopens the door for a new one.
    pub fn reopen(&mut self) {
        self.game.reset();
        self.challenger_peer = None;
        tracing::info!(room_id = %self.id, state = %self.state(), "room reopened");
    }
}

/// Owns every room, keyed by id.
///
/// Ids come from a counter that starts at 1 and never goes backwards, so
/// an id is never reused while the registry lives. Iteration order is
/// ascending id, which makes announcements deterministic.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: BTreeMap<RoomId, Room>,
    next_room_id: u32,
    config: RoomConfig,
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new(RoomConfig::default())
    }
}

impl RoomRegistry {
    pub fn new(config: RoomConfig) -> Self {
        Self {
            rooms: BTreeMap::new(),
            next_room_id: 1,
            config: config.validated(),
        }
    }

    /// Creates a room owned by `owner` and returns its id.
    ///
    /// # Errors
    /// - [`RoomError::AlreadyInRoom`] if `owner` already owns or occupies
    ///   a room.
    /// - [`RoomError::AtCapacity`] if the registry is full.
    pub fn create(&mut self, owner: PlayerId, owner_peer: PeerId) -> Result<RoomId, RoomError> {
        if let Some(current) = self.room_of(owner) {
            return Err(RoomError::AlreadyInRoom(owner, current));
        }
        if self.rooms.len() >= self.config.max_rooms {
            return Err(RoomError::AtCapacity(self.config.max_rooms));
        }

        let room_id = RoomId(self.next_room_id);
        self.next_room_id += 1;
        self.rooms
            .insert(room_id, Room::new(room_id, owner, owner_peer));
        tracing::info!(%room_id, %owner, "room created");
        Ok(room_id)
    }

    pub fn get(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.get(&room_id)
    }

    pub fn get_mut(&mut self, room_id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(&room_id)
    }

    /// Deletes a room and hands it back.
    pub fn remove(&mut self, room_id: RoomId) -> Result<Room, RoomError> {
        let room = self
            .rooms
            .remove(&room_id)
            .ok_or(RoomError::NotFound(room_id))?;
        tracing::info!(%room_id, "room destroyed");
        Ok(room)
    }

    /// The room `player` owns or challenges, if any.
    pub fn room_of(&self, player: PlayerId) -> Option<RoomId> {
        self.rooms
            .values()
            .find(|room| room.game.is_participant(player))
            .map(Room::id)
    }

    /// Ids of rooms accepting a challenger, ascending.
    pub fn open_room_ids(&self) -> Vec<RoomId> {
        self.rooms
            .values()
            .filter(|room| room.is_door_open())
            .map(Room::id)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Maximum number of rooms that may exist at once.
    pub fn capacity(&self) -> usize {
        self.config.max_rooms
    }
}
