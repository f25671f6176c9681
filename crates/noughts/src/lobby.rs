//! Matchmaking and command dispatch.
//!
//! The [`Lobby`] owns every player and every room. It turns one decoded
//! command (or one malformed packet, or one liveness sweep) into a list of
//! [`Outbound`] messages and never touches a socket itself, so every rule
//! here can be exercised without the network.
//!
//! Registry invariants the lobby maintains between calls:
//!
//! - A player's `room` is `Some(id)` iff the room with that id lists the
//!   player as owner or challenger.
//! - A room exists only while its owner is registered.
//! - A room whose game reached a result is deleted in the same call.

use std::time::Instant;

use noughts_protocol::{
    Command, Opcode, PeerId, PlayerId, PlayerName, ProtocolError, Response,
    RoomId,
};
use noughts_room::{Outcome, RoomRegistry};
use noughts_session::SessionRegistry;
use tracing::{debug, info, warn};

use crate::ServerConfig;

/// One message to send: a response and the peer that should get it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outbound {
    pub to: PeerId,
    pub response: Response,
}

impl Outbound {
    pub fn new(to: PeerId, response: Response) -> Self {
        Self { to, response }
    }
}

/// All session and room state, plus the rules that change it.
pub struct Lobby {
    sessions: SessionRegistry,
    rooms: RoomRegistry,
    kick_on_malformed: bool,
}

impl Default for Lobby {
    fn default() -> Self {
        Self::new(SessionRegistry::default(), RoomRegistry::default())
    }
}

impl Lobby {
    pub fn new(sessions: SessionRegistry, rooms: RoomRegistry) -> Self {
        Self {
            sessions,
            rooms,
            kick_on_malformed: false,
        }
    }

    /// Builds empty registries sized by `config`.
    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            SessionRegistry::new(config.session_config()),
            RoomRegistry::new(config.room_config()),
        )
        .kick_on_malformed(config.kick_on_malformed)
    }

    /// When enabled, a registered player who sends a malformed packet is
    /// evicted as if they had quit.
    pub fn kick_on_malformed(mut self, enabled: bool) -> Self {
        self.kick_on_malformed = enabled;
        self
    }

    pub fn sessions(&self) -> &SessionRegistry {
        &self.sessions
    }

    pub fn rooms(&self) -> &RoomRegistry {
        &self.rooms
    }

    // -----------------------------------------------------------------
    // Entry points
    // -----------------------------------------------------------------

    /// Applies one decoded command from `peer`.
    pub fn handle_command(
        &mut self,
        peer: PeerId,
        command: Command,
        now: Instant,
    ) -> Vec<Outbound> {
        let mut out = Vec::new();

        if let Some(player) = self.sessions.get_mut(peer) {
            player.last_seen = now;
        }

        match command {
            Command::Join { name } => self.join(peer, name, now, &mut out),
            Command::CreateRoom => self.create_room(peer, &mut out),
            Command::Challenge { room_id } => self.challenge(peer, room_id, &mut out),
            Command::Move { cell } => self.make_move(peer, cell, now, &mut out),
            Command::Quit => self.quit(peer, now, &mut out),
        }

        out
    }

    /// Reacts to a packet that failed to decode.
    ///
    /// Most malformed packets get silence. A wrong-length Join is answered
    /// with NEGATED so the client knows to resend. With
    /// [`kick_on_malformed`](Self::kick_on_malformed) set, a registered
    /// sender is evicted instead.
    pub fn handle_malformed(
        &mut self,
        peer: PeerId,
        error: &ProtocolError,
        now: Instant,
    ) -> Vec<Outbound> {
        let mut out = Vec::new();
        debug!(%peer, %error, "malformed packet");

        if self.kick_on_malformed && self.sessions.contains(peer) {
            info!(%peer, "kicking player for malformed packet");
            return self.remove_player(peer, now);
        }

        if let ProtocolError::WrongLength {
            opcode: Opcode::Join,
            ..
        } = error
        {
            out.push(Outbound::new(peer, Response::Negated));
        }
        out
    }

    /// Removes the player at `peer`, tearing down or reopening their room,
    /// then re-announces open rooms.
    ///
    /// An unknown peer still gets a KICK.
    pub fn remove_player(&mut self, peer: PeerId, now: Instant) -> Vec<Outbound> {
        let mut out = Vec::new();
        self.evict(peer, now, &mut out);
        self.push_announcement(&mut out);
        out
    }

    /// The current open-room list, addressed to every player not in a room.
    pub fn announce(&self) -> Vec<Outbound> {
        let mut out = Vec::new();
        self.push_announcement(&mut out);
        out
    }

    /// Evicts every player silent for longer than the liveness timeout.
    /// Announces once afterwards if anyone was evicted.
    pub fn sweep(&mut self, now: Instant) -> Vec<Outbound> {
        let mut out = Vec::new();
        let expired = self.sessions.expired(now);
        if expired.is_empty() {
            return out;
        }

        for peer in expired {
            info!(%peer, "evicting silent player");
            self.evict(peer, now, &mut out);
        }
        self.push_announcement(&mut out);
        out
    }

    // -----------------------------------------------------------------
    // Command handlers
    // -----------------------------------------------------------------

    fn join(&mut self, peer: PeerId, name: PlayerName, now: Instant, out: &mut Vec<Outbound>) {
        if self.sessions.contains(peer) {
            debug!(%peer, "duplicate join, evicting stale registration");
            out.extend(self.remove_player(peer, now));
            out.push(Outbound::new(peer, Response::Negated));
            return;
        }

        match self.sessions.register(peer, name, now).map(|_| ()) {
            Ok(()) => {
                out.push(Outbound::new(peer, Response::Ok));
                out.push(Outbound::new(peer, self.room_list()));
            }
            Err(error) => {
                debug!(%peer, %error, "join refused");
                out.push(Outbound::new(peer, Response::Negated));
            }
        }
    }

    fn create_room(&mut self, peer: PeerId, out: &mut Vec<Outbound>) {
        let Some((player_id, current)) = self.seat_of(peer) else {
            debug!(%peer, "create room from unknown peer");
            out.push(Outbound::new(peer, Response::Negated));
            return;
        };
        if let Some(room_id) = current {
            debug!(%peer, %room_id, "create room while already in a room");
            out.push(Outbound::new(peer, Response::Negated));
            return;
        }

        let room_id = match self.rooms.create(player_id, peer) {
            Ok(room_id) => room_id,
            Err(error) => {
                debug!(%peer, %error, "create room refused");
                out.push(Outbound::new(peer, Response::Negated));
                return;
            }
        };

        self.set_room(peer, Some(room_id));
        out.push(Outbound::new(peer, Response::RoomCreated(room_id)));
        self.push_announcement(out);
    }

    fn challenge(&mut self, peer: PeerId, room_id: RoomId, out: &mut Vec<Outbound>) {
        let Some((player_id, current)) = self.seat_of(peer) else {
            debug!(%peer, %room_id, "challenge from unknown peer");
            out.push(Outbound::new(peer, Response::Negated));
            return;
        };
        if let Some(current) = current {
            debug!(%peer, %current, "challenge while already in a room");
            out.push(Outbound::new(peer, Response::Negated));
            return;
        }
        let Some(room) = self.rooms.get_mut(room_id) else {
            debug!(%peer, %room_id, "challenge for unknown room");
            out.push(Outbound::new(peer, Response::Negated));
            return;
        };
        if let Err(error) = room.seat_challenger(player_id, peer) {
            debug!(%peer, %error, "challenge refused");
            out.push(Outbound::new(peer, Response::Negated));
            return;
        }

        let owner_peer = room.owner_peer();
        let snapshots: Vec<Outbound> = room
            .participants()
            .into_iter()
            .map(|(id, to)| Outbound::new(to, room.game().snapshot(id)))
            .collect();

        self.set_room(peer, Some(room_id));
        info!(%room_id, challenger = %peer, owner = %owner_peer, "game started");

        out.push(Outbound::new(peer, Response::Ok));
        out.push(Outbound::new(owner_peer, Response::Ok));
        out.extend(snapshots);
        self.push_announcement(out);
    }

    fn make_move(&mut self, peer: PeerId, cell: u32, now: Instant, out: &mut Vec<Outbound>) {
        let Some((player_id, Some(room_id))) = self.seat_of(peer) else {
            debug!(%peer, cell, "move from peer not in a room");
            return;
        };
        let Some(room) = self.rooms.get_mut(room_id) else {
            warn!(%peer, %room_id, "player points at a missing room");
            self.set_room(peer, None);
            return;
        };

        let outcome = match room.make_move(player_id, cell) {
            Ok(outcome) => outcome,
            Err(error) => {
                debug!(%peer, %room_id, %error, "move rejected");
                return;
            }
        };

        out.extend(
            room.participants()
                .into_iter()
                .map(|(id, to)| Outbound::new(to, room.game().snapshot(id))),
        );

        match outcome {
            Outcome::InProgress => {}
            Outcome::Won(winner) => {
                info!(%room_id, %winner, "game won");
                self.close_finished_room(room_id, now, out);
            }
            Outcome::Draw => {
                info!(%room_id, "game drawn");
                self.close_finished_room(room_id, now, out);
            }
        }
    }

    fn quit(&mut self, peer: PeerId, now: Instant, out: &mut Vec<Outbound>) {
        if !self.sessions.contains(peer) {
            debug!(%peer, "quit from unknown peer");
            return;
        }
        out.extend(self.remove_player(peer, now));
    }

    // -----------------------------------------------------------------
    // Teardown
    // -----------------------------------------------------------------

    /// Deletes the player at `peer` and settles their room. Ends with a
    /// KICK to `peer`. Does not announce.
    fn evict(&mut self, peer: PeerId, now: Instant, out: &mut Vec<Outbound>) {
        if let Some((player_id, Some(room_id))) = self.seat_of(peer) {
            self.leave_room(player_id, room_id, now, out);
        }
        match self.sessions.remove(peer) {
            Ok(_) => {}
            Err(error) => debug!(%peer, %error, "removing unknown peer"),
        }
        out.push(Outbound::new(peer, Response::Kick));
    }

    /// Takes `player_id` out of `room_id`.
    ///
    /// An owner leaving deletes the room; a challenger leaving reopens it
    /// for the owner. The remaining participant is told ROOM_CLOSING and
    /// its silence clock restarts.
    fn leave_room(
        &mut self,
        player_id: PlayerId,
        room_id: RoomId,
        now: Instant,
        out: &mut Vec<Outbound>,
    ) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            warn!(%player_id, %room_id, "player points at a missing room");
            return;
        };

        if room.game().owner() != player_id {
            let owner_peer = room.owner_peer();
            room.reopen();
            out.push(Outbound::new(owner_peer, Response::RoomClosing(room_id)));
            self.refresh(owner_peer, now);
            return;
        }

        let owner_peer = room.owner_peer();
        let challenger_peer = room.challenger_peer();
        if let Err(error) = self.rooms.remove(room_id) {
            warn!(%room_id, %error, "room vanished during teardown");
        }
        if let Some(challenger_peer) = challenger_peer {
            out.push(Outbound::new(
                challenger_peer,
                Response::RoomClosing(room_id),
            ));
            self.set_room(challenger_peer, None);
            self.refresh(challenger_peer, now);
        }
        self.set_room(owner_peer, None);
        out.push(Outbound::new(owner_peer, Response::RoomDestroyed(room_id)));
    }

    /// Tells both players their game is over, frees them and deletes the
    /// room.
    fn close_finished_room(&mut self, room_id: RoomId, now: Instant, out: &mut Vec<Outbound>) {
        let room = match self.rooms.remove(room_id) {
            Ok(room) => room,
            Err(error) => {
                warn!(%room_id, %error, "finished room already gone");
                return;
            }
        };
        for (_, peer) in room.participants() {
            out.push(Outbound::new(peer, Response::RoomClosing(room_id)));
            self.set_room(peer, None);
            self.refresh(peer, now);
        }
        self.push_announcement(out);
    }

    // -----------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------

    /// The player's id and room, if `peer` is registered.
    fn seat_of(&self, peer: PeerId) -> Option<(PlayerId, Option<RoomId>)> {
        self.sessions.get(peer).map(|p| (p.id, p.room))
    }

    fn set_room(&mut self, peer: PeerId, room: Option<RoomId>) {
        if let Some(player) = self.sessions.get_mut(peer) {
            player.room = room;
        }
    }

    fn refresh(&mut self, peer: PeerId, now: Instant) {
        if let Err(error) = self.sessions.touch(peer, now) {
            debug!(%peer, %error, "cannot refresh departed peer");
        }
    }

    fn room_list(&self) -> Response {
        Response::AnnounceRooms(self.rooms.open_room_ids())
    }

    fn push_announcement(&self, out: &mut Vec<Outbound>) {
        let list = self.room_list();
        out.extend(
            self.sessions
                .idle_peers()
                .into_iter()
                .map(|peer| Outbound::new(peer, list.clone())),
        );
    }
}
