//! Hamiltonian cycle over the playfield
//!
//! A serpentine traversal visiting every cell exactly once, with the first
//! and last cells adjacent. Exists only when at least one grid dimension is
//! even; odd-by-odd boards have no Hamiltonian cycle on the 4-connected grid
//! (the two-coloring argument), and the autopilot degrades to its fallback
//! policy there.
//!
//! The cycle is stored as the linear visit order plus a dense cell-to-index
//! map, so position lookups and forward-distance queries are O(1).

use crate::game::{Cell, GridBounds};

pub struct HamiltonianCycle {
    bounds: GridBounds,
    cells: Vec<Cell>,
    index_by_cell: Vec<i32>,
    valid: bool,
}

impl HamiltonianCycle {
    /// Build the cycle for `bounds`
    ///
    /// The construction serpentines the interior of whichever dimension is
    /// even and returns through a single corridor row or column. The result
    /// is validated cell-by-cell; a board with two odd dimensions (or any
    /// construction defect) yields a cycle with `is_valid() == false`.
    pub fn new(bounds: GridBounds) -> Self {
        let cells = if bounds.width() % 2 == 0 {
            build_even_width(&bounds)
        } else if bounds.height() % 2 == 0 {
            build_even_height(&bounds)
        } else {
            Vec::new()
        };

        let mut cycle = Self {
            bounds,
            cells,
            index_by_cell: vec![-1; bounds.cell_count()],
            valid: false,
        };
        cycle.valid = cycle.index_cells() && cycle.check_adjacency();
        if !cycle.valid {
            cycle.cells.clear();
            cycle.index_by_cell.fill(-1);
        }
        cycle
    }

    /// Fill the dense index map, failing on out-of-bounds or repeated cells
    fn index_cells(&mut self) -> bool {
        if self.cells.len() != self.bounds.cell_count() {
            return false;
        }
        for (i, cell) in self.cells.iter().enumerate() {
            let Some(key) = self.bounds.index_of(*cell) else {
                return false;
            };
            if self.index_by_cell[key] != -1 {
                return false;
            }
            self.index_by_cell[key] = i as i32;
        }
        true
    }

    /// Every consecutive pair, including the wrap, must be one step apart
    fn check_adjacency(&self) -> bool {
        let len = self.cells.len();
        if len < 4 {
            return false;
        }
        (0..len).all(|i| self.cells[i].manhattan(self.cells[(i + 1) % len]) == 1)
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Number of cells on the cycle (the board's cell count when valid)
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Cycle position of a cell, or -1 when the cell is not a member
    pub fn index_of(&self, cell: Cell) -> i32 {
        match self.bounds.index_of(cell) {
            Some(key) => self.index_by_cell[key],
            None => -1,
        }
    }

    /// Cell at a cycle position, with modular wrap for out-of-range and
    /// negative indices
    pub fn cell_at(&self, index: i64) -> Option<Cell> {
        if self.cells.is_empty() {
            return None;
        }
        let len = self.cells.len() as i64;
        Some(self.cells[index.rem_euclid(len) as usize])
    }

    /// The cycle successor of a member cell
    pub fn next_cell(&self, cell: Cell) -> Option<Cell> {
        let idx = self.index_of(cell);
        if idx < 0 {
            return None;
        }
        self.cell_at(idx as i64 + 1)
    }

    /// Forward (clockwise-along-the-cycle) distance between two positions
    ///
    /// Always non-negative; zero for equal positions or when no cycle exists.
    pub fn distance_forward(&self, from_idx: i32, to_idx: i32) -> i32 {
        if self.cells.is_empty() {
            return 0;
        }
        (to_idx - from_idx).rem_euclid(self.cells.len() as i32)
    }
}

/// Serpentine the interior columns, return along row 0
///
/// Left column walks top to bottom, columns `1..width` zig-zag over rows
/// `1..height`, and the top row carries the walk back to the origin. Closes
/// exactly when `width` is even.
fn build_even_width(bounds: &GridBounds) -> Vec<Cell> {
    let (w, h) = (bounds.width(), bounds.height());
    let at = |x: i32, z: i32| Cell::new(bounds.min_x() + x, bounds.min_z() + z);
    let mut cells = Vec::with_capacity(bounds.cell_count());

    for z in 0..h {
        cells.push(at(0, z));
    }
    for x in 1..w {
        if x % 2 == 1 {
            for z in (1..h).rev() {
                cells.push(at(x, z));
            }
        } else {
            for z in 1..h {
                cells.push(at(x, z));
            }
        }
    }
    for x in (1..w).rev() {
        cells.push(at(x, 0));
    }
    cells
}

/// The axis-swapped construction: serpentine the interior rows, return along
/// column 0. Closes exactly when `height` is even.
fn build_even_height(bounds: &GridBounds) -> Vec<Cell> {
    let (w, h) = (bounds.width(), bounds.height());
    let at = |x: i32, z: i32| Cell::new(bounds.min_x() + x, bounds.min_z() + z);
    let mut cells = Vec::with_capacity(bounds.cell_count());

    for x in 0..w {
        cells.push(at(x, 0));
    }
    for z in 1..h {
        if z % 2 == 1 {
            for x in (1..w).rev() {
                cells.push(at(x, z));
            }
        } else {
            for x in 1..w {
                cells.push(at(x, z));
            }
        }
    }
    for z in (1..h).rev() {
        cells.push(at(0, z));
    }
    cells
}
