//! The session registry: every registered player, keyed by address.
//!
//! Like the room registry, this is plain owned state with no interior
//! locking. One task owns it and mutates it between receives.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::time::Instant;

use noughts_protocol::{PeerId, PlayerId, PlayerName};

use crate::{Player, SessionConfig, SessionError};

/// Tracks registered players and when they were last heard from.
///
/// ```text
/// register() ──→ touch() ... touch() ──→ remove()
///                     │
///                     ▼ (silent > liveness_timeout)
///                 expired() ──→ caller evicts
/// ```
pub struct SessionRegistry {
    players: HashMap<PeerId, Player>,
    next_player_id: u64,
    config: SessionConfig,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl SessionRegistry {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            players: HashMap::new(),
            next_player_id: 1,
            config,
        }
    }

    /// Registers a new player at `peer`.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyRegistered`] if `peer` already has a
    /// player. The existing registration is left untouched.
    pub fn register(
        &mut self,
        peer: PeerId,
        name: PlayerName,
        now: Instant,
    ) -> Result<&Player, SessionError> {
        let Entry::Vacant(slot) = self.players.entry(peer) else {
            return Err(SessionError::AlreadyRegistered(peer));
        };

        let id = PlayerId(self.next_player_id);
        self.next_player_id += 1;

        let player = slot.insert(Player {
            id,
            peer,
            name,
            room: None,
            last_seen: now,
        });
        tracing::info!(%peer, player_id = %id, %name, "player registered");
        Ok(player)
    }

    /// Deletes the player at `peer` and hands the record back.
    pub fn remove(&mut self, peer: PeerId) -> Result<Player, SessionError> {
        let player = self
            .players
            .remove(&peer)
            .ok_or(SessionError::UnknownPeer(peer))?;
        tracing::info!(%peer, player_id = %player.id, "player removed");
        Ok(player)
    }

    pub fn get(&self, peer: PeerId) -> Option<&Player> {
        self.players.get(&peer)
    }

    pub fn get_mut(&mut self, peer: PeerId) -> Option<&mut Player> {
        self.players.get_mut(&peer)
    }

    pub fn contains(&self, peer: PeerId) -> bool {
        self.players.contains_key(&peer)
    }

    /// Records that `peer` was heard from at `now`.
    pub fn touch(&mut self, peer: PeerId, now: Instant) -> Result<(), SessionError> {
        let player = self
            .players
            .get_mut(&peer)
            .ok_or(SessionError::UnknownPeer(peer))?;
        player.last_seen = now;
        Ok(())
    }

    /// Addresses of players silent for longer than the liveness timeout,
    /// sorted. Nothing is removed; the caller evicts them.
    pub fn expired(&self, now: Instant) -> Vec<PeerId> {
        let timeout = self.config.liveness_timeout;
        let mut peers: Vec<PeerId> = self
            .players
            .values()
            .filter(|p| p.is_silent(now, timeout))
            .map(|p| p.peer)
            .collect();
        peers.sort();
        peers
    }

    /// Addresses of players not in any room, sorted. These are the
    /// recipients of room announcements.
    pub fn idle_peers(&self) -> Vec<PeerId> {
        let mut peers: Vec<PeerId> = self
            .players
            .values()
            .filter(|p| p.room.is_none())
            .map(|p| p.peer)
            .collect();
        peers.sort();
        peers
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }
}
