/// Grid cell identity.
/// A `Cell` can only hold valid coordinates, so every function taking one
/// can index the grid without bounds checks.

/// Rows and columns in the play field. Fixed for every session.
pub const GRID_SIZE: usize = 3;

/// Total number of cells.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    row: u8,
    col: u8,
}

impl Cell {
    /// Returns `None` when either coordinate is off the grid.
    pub fn new(row: usize, col: usize) -> Option<Cell> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Cell { row: row as u8, col: col as u8 })
        } else {
            None
        }
    }

    /// Reading-order index: 0 is top-left, 8 is bottom-right.
    pub fn from_index(index: usize) -> Option<Cell> {
        Cell::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    pub fn index(self) -> usize {
        self.row as usize * GRID_SIZE + self.col as usize
    }

    pub fn row(self) -> usize {
        self.row as usize
    }

    pub fn col(self) -> usize {
        self.col as usize
    }

    /// Step one cell in the given direction, clamped at the grid edge.
    /// Used by the keyboard / gamepad cursor.
    pub fn step(self, d_row: i32, d_col: i32) -> Cell {
        let max = GRID_SIZE as i32 - 1;
        let row = (self.row as i32 + d_row).clamp(0, max);
        let col = (self.col as i32 + d_col).clamp(0, max);
        Cell { row: row as u8, col: col as u8 }
    }

    /// The center cell; where the cursor starts.
    pub fn center() -> Cell {
        Cell { row: 1, col: 1 }
    }
}

/// All 9 cells in reading order. Restartable: each call yields a fresh iterator.
pub fn cells() -> impl Iterator<Item = Cell> {
    (0..CELL_COUNT).map(|i| Cell { row: (i / GRID_SIZE) as u8, col: (i % GRID_SIZE) as u8 })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_are_nine_in_reading_order() {
        let all: Vec<Cell> = cells().collect();
        assert_eq!(all.len(), 9);
        for (i, c) in all.iter().enumerate() {
            assert_eq!(c.index(), i);
        }
        assert_eq!(all[0], Cell::new(0, 0).unwrap());
        assert_eq!(all[5], Cell::new(1, 2).unwrap());
        assert_eq!(all[8], Cell::new(2, 2).unwrap());

        // Restartable
        assert_eq!(cells().count(), 9);
    }

    #[test]
    fn off_grid_coordinates_rejected() {
        assert!(Cell::new(3, 0).is_none());
        assert!(Cell::new(0, 3).is_none());
        assert!(Cell::from_index(9).is_none());
        assert_eq!(Cell::from_index(4), Some(Cell::center()));
    }

    #[test]
    fn step_clamps_at_edges() {
        let corner = Cell::new(0, 0).unwrap();
        assert_eq!(corner.step(-1, -1), corner);
        assert_eq!(corner.step(1, 0), Cell::new(1, 0).unwrap());
        let far = Cell::new(2, 2).unwrap();
        assert_eq!(far.step(1, 1), far);
        assert_eq!(far.step(0, -1), Cell::new(2, 1).unwrap());
    }
}
