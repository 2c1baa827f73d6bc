use super::*;

/// Uniform random placement driven by a fixed seed; a given seed always
/// produces the same layout on the same board shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(self, board: &mut Board, mines: CellCount, excluded: &[Coord2]) -> Result<()> {
        use rand::prelude::*;

        for &coords in excluded {
            board.validate_coords(coords)?;
        }

        // Reserve the exclusion zone by marking it before sampling.
        let mut reserved = 0;
        for &coords in excluded {
            if !board[coords].mine {
                board[coords].mine = true;
                reserved += 1;
            }
        }

        let mut free_cells = board.total_cells() - reserved;
        if mines > free_cells {
            // roll the reservation back, failed generation must not mutate
            for &coords in excluded {
                board[coords].mine = false;
            }
            return Err(GameError::InvalidConfiguration);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut mines_placed = 0;
        {
            let cells = board
                .cells
                .as_slice_mut()
                .expect("layout should be standard");
            while mines_placed < mines {
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    let i = i as CellCount;
                    if cell.mine {
                        place += 1;
                    }
                    if i == place {
                        cell.mine = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        // Drop the reservation so the exclusion zone plays as safe cells.
        for &coords in excluded {
            board[coords].mine = false;
        }

        board.finish_generation();
        if board.mine_count() != mines {
            log::warn!(
                "generated mine count mismatch, actual: {}, requested: {}",
                board.mine_count(),
                mines
            );
        }
        Ok(())
    }
}
