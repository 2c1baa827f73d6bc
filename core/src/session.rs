use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::*;

/// Valid transitions: Started -> Won, Started -> Lost. Finished states accept
/// no further transitions.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Started,
    Won,
    Lost,
}

impl SessionState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Started
    }
}

/// Player intent against a single cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Reveal { row: Coord, col: Coord },
    Flag { row: Coord, col: Coord },
}

impl Action {
    pub const fn coords(self) -> Coord2 {
        match self {
            Self::Reveal { row, col } | Self::Flag { row, col } => (row, col),
        }
    }
}

/// One game from creation to win or loss. Mine placement is deferred to the
/// first reveal so that reveal can never hit a mine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    pub(crate) id: Uuid,
    pub(crate) config: GameConfig,
    pub(crate) board: Board,
    pub(crate) state: SessionState,
    pub(crate) generated: bool,
    pub(crate) seed: u64,
    pub(crate) safe_start: SafeStartPolicy,
    pub(crate) revealed_count: CellCount,
    pub(crate) flagged_count: CellCount,
    pub(crate) started_at: Option<DateTime<Utc>>,
    pub(crate) ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// New game with a placement seed derived from the freshly minted id.
    pub fn create(width: Coord, height: Coord, mines: CellCount) -> Result<GameSession> {
        let mut session = Self::create_seeded(width, height, mines, 0)?;
        let (hi, lo) = session.id.as_u64_pair();
        session.seed = hi ^ lo;
        Ok(session)
    }

    /// New game with an explicit placement seed, for reproducible boards.
    pub fn create_seeded(
        width: Coord,
        height: Coord,
        mines: CellCount,
        seed: u64,
    ) -> Result<GameSession> {
        let config = GameConfig::new(width, height, mines)?;
        Ok(GameSession {
            id: Uuid::new_v4(),
            config,
            board: Board::new(width, height),
            state: SessionState::default(),
            generated: false,
            seed,
            safe_start: SafeStartPolicy::default(),
            revealed_count: 0,
            flagged_count: 0,
            started_at: None,
            ended_at: None,
        })
    }

    /// Wraps a preset board, skipping generation entirely. The layout must
    /// leave at least one safe cell.
    pub fn from_board(board: Board) -> Result<GameSession> {
        if board.safe_cell_count() == 0 {
            return Err(GameError::InvalidConfiguration);
        }
        let (height, width) = board.size();
        let config = GameConfig::new_unchecked(width, height, board.mine_count());
        Ok(GameSession {
            id: Uuid::new_v4(),
            config,
            board,
            state: SessionState::default(),
            generated: true,
            seed: 0,
            safe_start: SafeStartPolicy::default(),
            revealed_count: 0,
            flagged_count: 0,
            started_at: None,
            ended_at: None,
        })
    }

    pub fn with_safe_start(mut self, policy: SafeStartPolicy) -> GameSession {
        self.safe_start = policy;
        self
    }

    /// Applies one action and returns the resulting snapshot. The sole
    /// mutator of a session: coordinates are validated before anything else,
    /// and a finished game answers with its final snapshot unchanged.
    pub fn apply(&mut self, action: Action) -> Result<SessionSnapshot> {
        let coords = self.board.validate_coords(action.coords())?;

        if self.state.is_finished() {
            return Ok(self.snapshot());
        }

        match action {
            Action::Reveal { .. } => self.reveal_cell(coords)?,
            Action::Flag { .. } => self.toggle_flag(coords),
        }

        Ok(self.snapshot())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn cell_at(&self, coords: Coord2) -> Cell {
        self.board[coords]
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Fraction of safe cells revealed so far, 0.0 to 1.0.
    pub fn progress(&self) -> f64 {
        f64::from(self.revealed_count) / f64::from(self.config.safe_cells())
    }

    /// How many mines have not been flagged yet, negative when overflagged.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count as isize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_validates_configuration() {
        assert_eq!(
            GameSession::create(0, 9, 10).unwrap_err(),
            GameError::InvalidConfiguration
        );
        assert_eq!(
            GameSession::create(3, 3, 9).unwrap_err(),
            GameError::InvalidConfiguration
        );
        assert!(GameSession::create(3, 3, 8).is_ok());
    }

    #[test]
    fn sessions_get_distinct_ids() {
        let first = GameSession::create(9, 9, 10).unwrap();
        let second = GameSession::create(9, 9, 10).unwrap();
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn out_of_bounds_action_is_rejected_without_mutation() {
        let mut session = GameSession::create_seeded(9, 9, 10, 1).unwrap();
        let before = session.clone();
        assert_eq!(
            session.apply(Action::Reveal { row: 9, col: 0 }).unwrap_err(),
            GameError::OutOfBounds
        );
        assert_eq!(
            session.apply(Action::Flag { row: 0, col: 99 }).unwrap_err(),
            GameError::OutOfBounds
        );
        assert_eq!(session, before);
    }

    #[test]
    fn generation_and_clock_start_on_first_reveal() {
        let mut session = GameSession::create_seeded(9, 9, 10, 3).unwrap();
        assert!(!session.generated);
        assert!(session.started_at().is_none());
        assert_eq!(session.board().mine_count(), 0);

        // flagging does not trigger generation or start the clock
        session.apply(Action::Flag { row: 0, col: 0 }).unwrap();
        assert!(!session.generated);
        assert!(session.started_at().is_none());

        session.apply(Action::Reveal { row: 4, col: 4 }).unwrap();
        assert!(session.generated);
        assert!(session.started_at().is_some());
        assert_eq!(session.board().mine_count(), 10);
    }

    #[test]
    fn same_seed_produces_the_same_board() {
        let mut first = GameSession::create_seeded(9, 9, 10, 99).unwrap();
        let mut second = GameSession::create_seeded(9, 9, 10, 99).unwrap();
        first.apply(Action::Reveal { row: 4, col: 4 }).unwrap();
        second.apply(Action::Reveal { row: 4, col: 4 }).unwrap();
        assert_eq!(first.board(), second.board());
    }

    #[test]
    fn flag_accounting_tracks_mines_left() {
        let mut session = GameSession::create_seeded(9, 9, 10, 5).unwrap();
        assert_eq!(session.mines_left(), 10);
        session.apply(Action::Flag { row: 0, col: 0 }).unwrap();
        session.apply(Action::Flag { row: 0, col: 1 }).unwrap();
        assert_eq!(session.mines_left(), 8);
        session.apply(Action::Flag { row: 0, col: 1 }).unwrap();
        assert_eq!(session.mines_left(), 9);
    }
}
