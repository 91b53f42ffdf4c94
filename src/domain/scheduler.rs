/// MoleScheduler: picks where the mole goes next.
///
/// The draw is uniform over the 8 cells other than the excluded one
/// (uniform over all 9 when nothing is excluded), so the mole always
/// visibly moves. Randomness comes from the injected `R`; tests pass a
/// seeded `StdRng`.
///
/// The scheduler holds no game state of its own: the cell to exclude is
/// read from the grid, or passed in explicitly after a hit clears it.

use rand::Rng;

use super::cell::{Cell, CELL_COUNT};
use super::grid::GridModel;

#[derive(Debug)]
pub struct MoleScheduler<R> {
    rng: R,
}

impl<R: Rng> MoleScheduler<R> {
    pub fn new(rng: R) -> Self {
        MoleScheduler { rng }
    }

    /// Relocate away from the grid's current mole.
    pub fn on_tick(&mut self, grid: &mut GridModel) -> Cell {
        let previous = grid.active_mole();
        self.relocate_from(grid, previous)
    }

    /// Relocate, never landing on `previous`.
    pub fn relocate_from(&mut self, grid: &mut GridModel, previous: Option<Cell>) -> Cell {
        let next = self.pick(previous);
        grid.place_mole(next);
        next
    }

    fn pick(&mut self, exclude: Option<Cell>) -> Cell {
        let index = match exclude {
            Some(ex) => {
                // Draw from the 8 remaining indices and skip over the excluded one.
                let i = self.rng.random_range(0..CELL_COUNT - 1);
                if i >= ex.index() { i + 1 } else { i }
            }
            None => self.rng.random_range(0..CELL_COUNT),
        };
        // index < CELL_COUNT by construction
        Cell::from_index(index).unwrap_or_else(Cell::center)
    }
}
