use core::ops::{Index, IndexMut};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Rectangular grid of cells, indexed by `(row, col)`. The board knows its
/// exact mine count once placement has run; before that it is zero.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub(crate) cells: Array2<Cell>,
    pub(crate) mine_count: CellCount,
}

impl Board {
    /// All cells hidden, no mines placed yet.
    pub fn new(width: Coord, height: Coord) -> Board {
        Board {
            cells: Array2::default([height as usize, width as usize]),
            mine_count: 0,
        }
    }

    /// Builds a board with an explicit mine layout and precomputed adjacency
    /// counts, for preset or scripted games.
    pub fn with_mines(width: Coord, height: Coord, mine_coords: &[Coord2]) -> Result<Board> {
        let mut board = Board::new(width, height);
        for &coords in mine_coords {
            let coords = board.validate_coords(coords)?;
            board[coords].mine = true;
        }
        board.finish_generation();
        Ok(board)
    }

    /// Size as `(height, width)`, i.e. the bounds of `(row, col)` coordinates.
    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn width(&self) -> Coord {
        self.size().1
    }

    pub fn height(&self) -> Coord {
        self.size().0
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (height, width) = self.size();
        if coords.0 < height && coords.1 < width {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// The up-to-8 valid positions adjacent to `coords`, row-major.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn get(&self, coords: Coord2) -> Result<Cell> {
        let coords = self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn set_state(&mut self, coords: Coord2, state: CellState) -> Result<()> {
        let coords = self.validate_coords(coords)?;
        self[coords].state = state;
        Ok(())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    /// Derives adjacency counts and the mine total from the final mine mask.
    /// Counts are never touched again after this.
    pub(crate) fn finish_generation(&mut self) {
        let (height, width) = self.size();
        let mut mine_count = 0;
        for row in 0..height {
            for col in 0..width {
                if self[(row, col)].mine {
                    mine_count += 1;
                    for neighbor in self.neighbors((row, col)) {
                        self[neighbor].count += 1;
                    }
                }
            }
        }
        self.mine_count = mine_count;
    }

    /// Discloses the full mine layout, used when a game is lost.
    pub(crate) fn reveal_all_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.mine {
                cell.state = CellState::Revealed;
            }
        }
    }
}

impl Index<Coord2> for Board {
    type Output = Cell;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cells[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Board {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cells[coords.to_nd_index()]
    }
}
