use serde::{Deserialize, Serialize};

/// Player-visible state of a cell. The only cell attribute that changes
/// during play.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_revealed(self) -> bool {
        matches!(self, Self::Revealed)
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}

/// One board position. `mine` and `count` are fixed once mine placement has
/// run; `count` is the number of mines among the up-to-8 neighbors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    pub state: CellState,
    pub mine: bool,
    pub count: u8,
}
