use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

/// One-time mine placement strategy for a fresh board. `generate` must place
/// exactly `mines` mines, none of them on an excluded position, and fill in
/// every cell's adjacency count; on failure the board is left untouched.
pub trait MineGenerator {
    fn generate(self, board: &mut Board, mines: CellCount, excluded: &[Coord2]) -> Result<()>;
}

/// How much area around the first revealed cell stays mine-free.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeStartPolicy {
    /// Only the first revealed cell is excluded from placement.
    CellOnly,
    /// The first revealed cell and its neighbors are excluded, so the first
    /// reveal always lands on a zero and cascades.
    WithNeighbors,
}

impl Default for SafeStartPolicy {
    fn default() -> Self {
        Self::WithNeighbors
    }
}
