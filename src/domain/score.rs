/// ScoreKeeper: verifies hits and counts them.
///
/// A click scores only when it lands on the active mole while the timer
/// is running. Anything else (empty cell, paused, ended) is ignored.

use super::cell::Cell;
use super::grid::GridModel;
use super::timer::SessionTimer;

#[derive(Clone, Debug, Default)]
pub struct ScoreKeeper {
    score: u32,
}

impl ScoreKeeper {
    pub fn new() -> Self {
        ScoreKeeper { score: 0 }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Returns true on a hit. A hit also clears the mole so the same
    /// mole can't be counted twice.
    pub fn on_cell_clicked(&mut self, cell: Cell, grid: &mut GridModel, timer: &SessionTimer) -> bool {
        if !timer.is_running() || grid.active_mole() != Some(cell) {
            return false;
        }
        self.score += 1;
        grid.clear_mole();
        true
    }
}
