/// GridModel: the 3x3 field and the single active mole.
///
/// The mole is stored as `Option<Cell>` rather than a flag per cell,
/// so "at most one mole" holds for every reachable state.
/// `states()` gives the per-cell view for code that wants it.

use super::cell::{self, Cell};

#[derive(Clone, Debug, Default)]
pub struct GridModel {
    active: Option<Cell>,
}

impl GridModel {
    pub fn new() -> Self {
        GridModel { active: None }
    }

    /// The fixed sequence of 9 cells.
    pub fn cells(&self) -> impl Iterator<Item = Cell> {
        cell::cells()
    }

    /// Put the mole in `cell`, removing it from wherever it was.
    pub fn place_mole(&mut self, cell: Cell) {
        self.active = Some(cell);
    }

    pub fn clear_mole(&mut self) {
        self.active = None;
    }

    pub fn active_mole(&self) -> Option<Cell> {
        self.active
    }

    pub fn has_mole(&self, cell: Cell) -> bool {
        self.active == Some(cell)
    }

    /// `(cell, mole present)` for every cell, in reading order.
    pub fn states(&self) -> impl Iterator<Item = (Cell, bool)> + '_ {
        self.cells().map(move |c| (c, self.has_mole(c)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moles(grid: &GridModel) -> usize {
        grid.states().filter(|(_, present)| *present).count()
    }

    #[test]
    fn starts_empty() {
        let grid = GridModel::new();
        assert_eq!(grid.active_mole(), None);
        assert_eq!(moles(&grid), 0);
        assert_eq!(grid.cells().count(), 9);
    }

    #[test]
    fn place_replaces_previous_mole() {
        let mut grid = GridModel::new();
        let a = Cell::new(0, 1).unwrap();
        let b = Cell::new(2, 0).unwrap();

        grid.place_mole(a);
        assert!(grid.has_mole(a));
        assert_eq!(moles(&grid), 1);

        grid.place_mole(b);
        assert!(!grid.has_mole(a));
        assert!(grid.has_mole(b));
        assert_eq!(moles(&grid), 1);
    }

    #[test]
    fn clear_removes_mole() {
        let mut grid = GridModel::new();
        grid.place_mole(Cell::center());
        grid.clear_mole();
        assert_eq!(grid.active_mole(), None);
        assert_eq!(moles(&grid), 0);
    }
}
