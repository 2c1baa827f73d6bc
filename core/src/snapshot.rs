use chrono::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::*;

/// One cell as exposed to clients. Until a cell is revealed (or the game has
/// finished) its `mine` and `count` fields are withheld entirely, so the
/// serialized form of a hidden cell carries no information about its
/// contents.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellView {
    pub state: CellState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mine: Option<bool>,
}

/// Board-less projection of a session, used for listings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
    pub progress: f64,
    pub state: SessionState,
    pub date_started: Option<DateTime<Utc>>,
    pub date_ended: Option<DateTime<Utc>>,
}

/// Read-only projection of a full session, suitable for serialization.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(flatten)]
    pub summary: SessionSummary,
    pub board: Vec<Vec<CellView>>,
}

fn cell_view(cell: Cell, disclose_all: bool) -> CellView {
    if cell.state.is_revealed() || disclose_all {
        CellView {
            state: cell.state,
            count: Some(cell.count),
            mine: Some(cell.mine),
        }
    } else {
        CellView {
            state: cell.state,
            count: None,
            mine: None,
        }
    }
}

impl GameSession {
    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            width: self.config.width,
            height: self.config.height,
            mines: self.config.mines,
            progress: self.progress(),
            state: self.state,
            date_started: self.started_at,
            date_ended: self.ended_at,
        }
    }

    /// Projects the current state. While the game is in play, unrevealed
    /// cells are opaque; once it is won or lost the whole layout is
    /// disclosed.
    pub fn snapshot(&self) -> SessionSnapshot {
        let disclose_all = self.state.is_finished();
        let (height, width) = self.board.size();
        let board = (0..height)
            .map(|row| {
                (0..width)
                    .map(|col| cell_view(self.board[(row, col)], disclose_all))
                    .collect()
            })
            .collect();
        SessionSnapshot {
            summary: self.summary(),
            board,
        }
    }
}
