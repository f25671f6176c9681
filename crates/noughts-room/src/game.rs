//! The tic-tac-toe state machine shared by a room's two players.
//!
//! [`Game`] knows nothing about sockets or registries. It holds player
//! handles, so the only thing it can verify about a mover is whether the
//! handle is one of its two participants and whose turn it is.

use noughts_protocol::{BOARD_CELLS, CellCode, PlayerId, Response, RoomId};

use crate::{MoveError, RoomError, RoomState};

/// Every winning line, in tie-break order: rows, columns, the left
/// diagonal, then the right diagonal.
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// How a game stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won(PlayerId),
    Draw,
}

impl Outcome {
    /// Returns `true` for `Won` and `Draw`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }
}

/// One board, two seats, a turn pointer and an outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    owner: PlayerId,
    challenger: Option<PlayerId>,
    board: [Option<PlayerId>; BOARD_CELLS],
    turn: PlayerId,
    outcome: Outcome,
}

impl Game {
    /// A fresh game waiting for a challenger.
    pub fn new(owner: PlayerId) -> Self {
        Self {
            owner,
            challenger: None,
            board: [None; BOARD_CELLS],
            turn: owner,
            outcome: Outcome::InProgress,
        }
    }

    pub fn owner(&self) -> PlayerId {
        self.owner
    }

    pub fn challenger(&self) -> Option<PlayerId> {
        self.challenger
    }

    /// Cell owners, row-major.
    pub fn board(&self) -> &[Option<PlayerId>; BOARD_CELLS] {
        &self.board
    }

    /// The player whose move is next.
    pub fn turn(&self) -> PlayerId {
        self.turn
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// The lifecycle state implied by the seats and the outcome.
    pub fn state(&self) -> RoomState {
        match (self.outcome, self.challenger) {
            (Outcome::Won(_), _) => RoomState::Won,
            (Outcome::Draw, _) => RoomState::Draw,
            (Outcome::InProgress, None) => RoomState::WaitingForChallenger,
            (Outcome::InProgress, Some(_)) => RoomState::InProgress,
        }
    }

    /// Open for a challenger: nobody seated yet and no result.
    pub fn is_door_open(&self) -> bool {
        self.state().is_joinable()
    }

    /// Returns `true` if `player` holds either seat.
    pub fn is_participant(&self, player: PlayerId) -> bool {
        player == self.owner || self.challenger == Some(player)
    }

    /// Seats a challenger and starts the game with the owner to move.
    ///
    /// # Errors
    /// - [`RoomError::DoorClosed`] if the door is not open.
    /// - [`RoomError::AlreadyInRoom`] if `player` is the owner.
    pub fn seat_challenger(&mut self, room_id: RoomId, player: PlayerId) -> Result<(), RoomError> {
        if !self.is_door_open() {
            return Err(RoomError::DoorClosed(room_id));
        }
        if player == self.owner {
            return Err(RoomError::AlreadyInRoom(player, room_id));
        }
        self.challenger = Some(player);
        self.turn = self.owner;
        Ok(())
    }

    /// Claims `cell` for `player`.
    ///
    /// On success the outcome is recomputed and the turn passes to the
    /// other participant (even when the move ended the game). On failure
    /// nothing changes.
    ///
    /// # Errors
    /// The first failing check, in this order: cell range, cell occupied,
    /// game over, no challenger, not a participant, not their turn.
    pub fn make_move(&mut self, player: PlayerId, cell: u32) -> Result<Outcome, MoveError> {
        let index = usize::try_from(cell)
            .ok()
            .filter(|i| *i < BOARD_CELLS)
            .ok_or(MoveError::OutOfBounds(cell))?;
        if self.board[index].is_some() {
            return Err(MoveError::CellTaken(index));
        }
        if self.outcome.is_terminal() {
            return Err(MoveError::GameOver);
        }
        let challenger = self.challenger.ok_or(MoveError::NoChallenger)?;
        if !self.is_participant(player) {
            return Err(MoveError::NotParticipant(player));
        }
        if player != self.turn {
            return Err(MoveError::NotYourTurn(player));
        }

        self.board[index] = Some(player);
        self.outcome = match self.winner() {
            Some(winner) => Outcome::Won(winner),
            None if self.board.iter().all(Option::is_some) => Outcome::Draw,
            None => Outcome::InProgress,
        };
        self.turn = if self.turn == self.owner {
            challenger
        } else {
            self.owner
        };

        Ok(self.outcome)
    }

    /// Clears the board, drops the challenger, gives the turn back to the
    /// owner and clears the outcome.
    pub fn reset(&mut self) {
        self.challenger = None;
        self.board = [None; BOARD_CELLS];
        self.turn = self.owner;
        self.outcome = Outcome::InProgress;
    }

    /// How `index` looks on the wire.
    pub fn cell_code(&self, index: usize) -> CellCode {
        match self.board.get(index).copied().flatten() {
            None => CellCode::Empty,
            Some(p) if p == self.owner => CellCode::Owner,
            Some(p) if Some(p) == self.challenger => CellCode::Challenger,
            Some(_) => CellCode::Ambiguous,
        }
    }

    /// The board as `viewer` should see it: cell codes plus a flag saying
    /// whether `viewer` moves next.
    pub fn snapshot(&self, viewer: PlayerId) -> Response {
        let mut cells = [CellCode::Empty; BOARD_CELLS];
        for (i, cell) in cells.iter_mut().enumerate() {
            *cell = self.cell_code(i);
        }
        Response::GameState {
            your_turn: self.turn == viewer,
            cells,
        }
    }

    /// First completed line, scanning in [`LINES`] order.
    fn winner(&self) -> Option<PlayerId> {
        LINES.iter().find_map(|&[a, b, c]| {
            let player = self.board[a]?;
            (self.board[b] == Some(player) && self.board[c] == Some(player))
                .then_some(player)
        })
    }
}

// =========================================================================
// Tests
// =========================================================================
