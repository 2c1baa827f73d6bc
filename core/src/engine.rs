use std::collections::{HashSet, VecDeque};

use chrono::prelude::*;

use crate::*;

/// Reveal and flag mechanics. Everything here assumes coordinates were
/// validated and the session is still in play; `GameSession::apply` is the
/// only entry point.
impl GameSession {
    pub(crate) fn reveal_cell(&mut self, coords: Coord2) -> Result<()> {
        // flagged and already-revealed cells are defined no-ops
        if self.board[coords].state != CellState::Hidden {
            return Ok(());
        }

        if !self.generated {
            self.generate_mines(coords)?;
        }
        self.mark_started();

        let cell = self.board[coords];
        self.board[coords].state = CellState::Revealed;

        if cell.mine {
            log::debug!("mine hit at {:?}", coords);
            self.board.reveal_all_mines();
            self.finish(false);
            return Ok(());
        }

        self.revealed_count += 1;
        log::debug!("revealed {:?}, adjacent mines: {}", coords, cell.count);

        if cell.count == 0 {
            self.flood_fill(coords);
        }

        if self.revealed_count == self.board.safe_cell_count() {
            self.finish(true);
        }
        Ok(())
    }

    pub(crate) fn toggle_flag(&mut self, coords: Coord2) {
        match self.board[coords].state {
            CellState::Hidden => {
                self.board[coords].state = CellState::Flagged;
                self.flagged_count += 1;
            }
            CellState::Flagged => {
                self.board[coords].state = CellState::Hidden;
                self.flagged_count -= 1;
            }
            CellState::Revealed => {}
        }
    }

    /// Reveals the connected zero-count region around `start` and its fringe.
    /// Explicit worklist plus a visited set, every cell handled at most once.
    fn flood_fill(&mut self, start: Coord2) {
        let mut visited = HashSet::from([start]);
        let mut to_visit: VecDeque<_> = self
            .board
            .neighbors(start)
            .filter(|&pos| self.board[pos].state == CellState::Hidden)
            .collect();
        log::trace!("flood-fill from {:?}, initial frontier: {:?}", start, to_visit);

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            // flagged cells are never auto-revealed, and a queued cell may
            // have been revealed since
            if self.board[coords].state != CellState::Hidden {
                continue;
            }

            let count = self.board[coords].count;
            self.board[coords].state = CellState::Revealed;
            self.revealed_count += 1;
            log::trace!("flood revealed {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    self.board
                        .neighbors(coords)
                        .filter(|&pos| self.board[pos].state == CellState::Hidden)
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    fn generate_mines(&mut self, start: Coord2) -> Result<()> {
        let excluded = self.exclusion_zone(start);
        RandomMineGenerator::new(self.seed).generate(
            &mut self.board,
            self.config.mines,
            &excluded,
        )?;
        self.generated = true;
        Ok(())
    }

    fn exclusion_zone(&self, start: Coord2) -> Vec<Coord2> {
        let mut zone = vec![start];
        if matches!(self.safe_start, SafeStartPolicy::WithNeighbors) {
            zone.extend(self.board.neighbors(start));
        }
        // the cell-only zone always fits since mines < total cells
        if self.config.mines + zone.len() as CellCount > self.config.total_cells() {
            log::warn!("board too dense for a zero start, excluding only the first cell");
            zone.truncate(1);
        }
        zone
    }

    fn mark_started(&mut self) {
        if self.started_at.is_none() {
            let now = Utc::now();
            log::debug!("started at {}", now);
            self.started_at = Some(now);
        }
    }

    fn finish(&mut self, won: bool) {
        self.state = if won {
            SessionState::Won
        } else {
            SessionState::Lost
        };
        let now = Utc::now();
        self.ended_at = Some(now);
        log::debug!("ended at {}, won: {}", now, won);
    }
}
