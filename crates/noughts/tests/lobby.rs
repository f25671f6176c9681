//! Scenario tests for the lobby: whole conversations between peers and the
//! dispatcher, without sockets.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use noughts::prelude::*;
use noughts_room::RoomRegistry;
use noughts_session::{SessionConfig, SessionRegistry};

// =========================================================================
// Helpers
// =========================================================================

fn alice() -> PeerId {
    PeerId(SocketAddr::from(([10, 0, 0, 1], 5000)))
}

fn bob() -> PeerId {
    PeerId(SocketAddr::from(([10, 0, 0, 2], 5000)))
}

fn carol() -> PeerId {
    PeerId(SocketAddr::from(([10, 0, 0, 3], 5000)))
}

fn join(name: &str) -> Command {
    Command::Join {
        name: PlayerName::from_str_padded(name),
    }
}

/// Responses addressed to `peer`, in order.
fn to(out: &[Outbound], peer: PeerId) -> Vec<Response> {
    out.iter()
        .filter(|o| o.to == peer)
        .map(|o| o.response.clone())
        .collect()
}

fn game_state(out: &[Outbound], peer: PeerId) -> (bool, [CellCode; 9]) {
    to(out, peer)
        .into_iter()
        .find_map(|r| match r {
            Response::GameState { your_turn, cells } => Some((your_turn, cells)),
            _ => None,
        })
        .expect("expected a GAME_STATE")
}

fn announced(out: &[Outbound], peer: PeerId) -> Option<Vec<RoomId>> {
    to(out, peer).into_iter().rev().find_map(|r| match r {
        Response::AnnounceRooms(ids) => Some(ids),
        _ => None,
    })
}

// =========================================================================
// Full match
// =========================================================================

#[test]
fn test_alice_beats_bob_on_middle_row() {
    let now = Instant::now();
    let mut lobby = Lobby::default();

    let out = lobby.handle_command(alice(), join("Alice"), now);
    assert_eq!(to(&out, alice())[0], Response::Ok);
    let out = lobby.handle_command(alice(), Command::CreateRoom, now);
    assert_eq!(to(&out, alice()), vec![Response::RoomCreated(RoomId(1))]);

    let out = lobby.handle_command(bob(), join("Bob"), now);
    assert_eq!(
        to(&out, bob()),
        vec![Response::Ok, Response::AnnounceRooms(vec![RoomId(1)])]
    );

    let out = lobby.handle_command(bob(), Command::Challenge { room_id: RoomId(1) }, now);
    assert_eq!(to(&out, bob())[0], Response::Ok);
    assert_eq!(to(&out, alice())[0], Response::Ok);
    assert!(game_state(&out, alice()).0, "owner moves first");
    assert!(!game_state(&out, bob()).0);

    let out = lobby.handle_command(alice(), Command::Move { cell: 4 }, now);
    let (alice_turn, cells) = game_state(&out, alice());
    assert!(!alice_turn);
    assert!(game_state(&out, bob()).0);
    assert_eq!(cells[4], CellCode::Owner);

    let out = lobby.handle_command(bob(), Command::Move { cell: 0 }, now);
    let (_, cells) = game_state(&out, bob());
    assert_eq!(cells[0], CellCode::Challenger);
    assert!(game_state(&out, alice()).0);

    lobby.handle_command(alice(), Command::Move { cell: 3 }, now);
    lobby.handle_command(bob(), Command::Move { cell: 8 }, now);
    let out = lobby.handle_command(alice(), Command::Move { cell: 5 }, now);

    let (_, cells) = game_state(&out, alice());
    assert_eq!(&cells[3..6], &[CellCode::Owner; 3]);
    let closing = Response::RoomClosing(RoomId(1));
    assert!(to(&out, alice()).contains(&closing));
    assert!(to(&out, bob()).contains(&closing));

    // Both are back in the lobby and the room is gone from announcements.
    assert_eq!(announced(&out, alice()), Some(vec![]));
    assert_eq!(announced(&out, bob()), Some(vec![]));
    assert!(lobby.rooms().is_empty());
    let nothing_open = Response::AnnounceRooms(vec![]);
    assert!(lobby.announce().iter().all(|o| o.response == nothing_open));
}

#[test]
fn test_players_can_start_a_new_room_after_a_match() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    lobby.handle_command(bob(), join("Bob"), now);
    lobby.handle_command(alice(), Command::CreateRoom, now);
    lobby.handle_command(bob(), Command::Challenge { room_id: RoomId(1) }, now);
    for (peer, cell) in [(alice(), 0), (bob(), 3), (alice(), 1), (bob(), 4), (alice(), 2)] {
        lobby.handle_command(peer, Command::Move { cell }, now);
    }
    assert!(lobby.rooms().is_empty());

    let out = lobby.handle_command(bob(), Command::CreateRoom, now);
    assert_eq!(to(&out, bob()), vec![Response::RoomCreated(RoomId(2))]);
    assert_eq!(announced(&out, alice()), Some(vec![RoomId(2)]));
}

// =========================================================================
// Rejections
// =========================================================================

#[test]
fn test_challenge_unknown_room_negated_and_state_unchanged() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    lobby.handle_command(alice(), Command::CreateRoom, now);
    lobby.handle_command(bob(), join("Bob"), now);

    let out = lobby.handle_command(bob(), Command::Challenge { room_id: RoomId(99) }, now);

    assert_eq!(out, vec![Outbound::new(bob(), Response::Negated)]);
    assert_eq!(lobby.sessions().len(), 2);
    assert_eq!(lobby.rooms().len(), 1);
    assert_eq!(lobby.rooms().open_room_ids(), vec![RoomId(1)]);
    assert_eq!(lobby.sessions().get(bob()).unwrap().room, None);
}

#[test]
fn test_challenge_from_unknown_peer_negated() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    lobby.handle_command(alice(), Command::CreateRoom, now);

    let out = lobby.handle_command(carol(), Command::Challenge { room_id: RoomId(1) }, now);
    assert_eq!(out, vec![Outbound::new(carol(), Response::Negated)]);
    assert_eq!(lobby.rooms().open_room_ids(), vec![RoomId(1)]);
}

#[test]
fn test_move_outside_any_room_is_ignored() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    let out = lobby.handle_command(alice(), Command::Move { cell: 4 }, now);
    assert!(out.is_empty());
}

// =========================================================================
// Departures
// =========================================================================

#[test]
fn test_owner_quits_mid_game() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    lobby.handle_command(alice(), Command::CreateRoom, now);
    lobby.handle_command(bob(), join("Bob"), now);
    lobby.handle_command(bob(), Command::Challenge { room_id: RoomId(1) }, now);
    lobby.handle_command(alice(), Command::Move { cell: 4 }, now);

    let out = lobby.handle_command(alice(), Command::Quit, now);

    assert_eq!(
        to(&out, bob()),
        vec![Response::RoomClosing(RoomId(1)), Response::AnnounceRooms(vec![])]
    );
    assert_eq!(
        to(&out, alice()),
        vec![Response::RoomDestroyed(RoomId(1)), Response::Kick]
    );
    assert!(lobby.rooms().get(RoomId(1)).is_none());
    assert_eq!(lobby.sessions().get(bob()).unwrap().room, None);
    assert!(lobby.sessions().get(alice()).is_none());
}

#[test]
fn test_challenger_quits_and_owner_waits_again() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    lobby.handle_command(alice(), Command::CreateRoom, now);
    lobby.handle_command(bob(), join("Bob"), now);
    lobby.handle_command(carol(), join("Carol"), now);
    lobby.handle_command(bob(), Command::Challenge { room_id: RoomId(1) }, now);
    lobby.handle_command(alice(), Command::Move { cell: 4 }, now);

    let out = lobby.handle_command(bob(), Command::Quit, now);
    assert_eq!(to(&out, alice()), vec![Response::RoomClosing(RoomId(1))]);
    assert_eq!(announced(&out, carol()), Some(vec![RoomId(1)]));

    // The reopened room has a clean board and accepts a new challenger.
    let out = lobby.handle_command(carol(), Command::Challenge { room_id: RoomId(1) }, now);
    let (alice_turn, cells) = game_state(&out, alice());
    assert!(alice_turn);
    assert_eq!(cells, [CellCode::Empty; 9]);
}

#[test]
fn test_rejoin_after_duplicate_join_gets_fresh_identity() {
    let now = Instant::now();
    let mut lobby = Lobby::default();
    lobby.handle_command(alice(), join("Alice"), now);
    let first_id = lobby.sessions().get(alice()).unwrap().id;

    let out = lobby.handle_command(alice(), join("Alice"), now);
    assert_eq!(to(&out, alice()), vec![Response::Kick, Response::Negated]);

    let out = lobby.handle_command(alice(), join("Alice"), now);
    assert_eq!(to(&out, alice())[0], Response::Ok);
    assert_ne!(lobby.sessions().get(alice()).unwrap().id, first_id);
}

// =========================================================================
// Liveness
// =========================================================================

#[test]
fn test_silent_owner_evicted_and_room_unannounced() {
    let start = Instant::now();
    let config = ServerConfig {
        liveness_timeout_secs: 120,
        ..ServerConfig::default()
    };
    let mut lobby = Lobby::from_config(&config);
    lobby.handle_command(alice(), join("Alice"), start);
    lobby.handle_command(alice(), Command::CreateRoom, start);
    lobby.handle_command(bob(), join("Bob"), start + Duration::from_secs(60));

    assert_eq!(announced(&lobby.announce(), bob()), Some(vec![RoomId(1)]));

    let mut scheduler = Scheduler::new(config.announce_interval(), start);
    let out = scheduler.run_due(&mut lobby, start + Duration::from_secs(121));

    assert!(to(&out, alice()).contains(&Response::Kick));
    assert!(lobby.sessions().get(alice()).is_none());
    assert!(lobby.rooms().is_empty());
    assert_eq!(announced(&out, bob()), Some(vec![]));
}

#[test]
fn test_liveness_uses_configured_timeout() {
    let start = Instant::now();
    let mut lobby = Lobby::new(
        SessionRegistry::new(SessionConfig {
            liveness_timeout: Duration::from_secs(3),
        }),
        RoomRegistry::default(),
    );
    lobby.handle_command(alice(), join("Alice"), start);

    assert!(lobby.sweep(start + Duration::from_secs(3)).is_empty());
    assert_eq!(
        lobby.sweep(start + Duration::from_secs(4)),
        vec![Outbound::new(alice(), Response::Kick)]
    );
}

#[test]
fn test_zero_liveness_timeout_does_not_evict_fresh_player() {
    let start = Instant::now();
    let config = ServerConfig {
        liveness_timeout_secs: 0,
        ..ServerConfig::default()
    }
    .validated();
    let mut lobby = Lobby::from_config(&config);
    lobby.handle_command(alice(), join("Alice"), start);

    assert!(lobby.sweep(start + Duration::from_millis(1)).is_empty());
    assert_eq!(lobby.sessions().len(), 1);
    assert_eq!(
        lobby.sweep(start + Duration::from_secs(2)),
        vec![Outbound::new(alice(), Response::Kick)]
    );
}
