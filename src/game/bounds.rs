use anyhow::{ensure, Result};
use rand::Rng;
use std::collections::HashSet;

use super::cell::Cell;

/// Rectangular playfield geometry
///
/// Immutable once constructed. The origin may be offset so boards can be
/// centred on `(0, 0)` the way the host lays out its playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    width: i32,
    height: i32,
    min_x: i32,
    min_z: i32,
}

impl GridBounds {
    /// Create bounds for a `width` x `height` board starting at `(min_x, min_z)`
    ///
    /// Rejects boards smaller than 2x2; a one-wide corridor has no legal
    /// non-reversing moves.
    pub fn new(width: i32, height: i32, min_x: i32, min_z: i32) -> Result<Self> {
        ensure!(
            width >= 2 && height >= 2,
            "grid must be at least 2x2, got {}x{}",
            width,
            height
        );
        Ok(Self {
            width,
            height,
            min_x,
            min_z,
        })
    }

    /// Bounds centred on the origin, matching the host's playfield layout
    pub fn centered(width: i32, height: i32) -> Result<Self> {
        Self::new(width, height, -(width / 2), -(height / 2))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn min_x(&self) -> i32 {
        self.min_x
    }

    pub fn min_z(&self) -> i32 {
        self.min_z
    }

    pub fn max_x(&self) -> i32 {
        self.min_x + self.width - 1
    }

    pub fn max_z(&self) -> i32 {
        self.min_z + self.height - 1
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Check if a cell is within the grid
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.x >= self.min_x
            && cell.x <= self.max_x()
            && cell.z >= self.min_z
            && cell.z <= self.max_z()
    }

    /// Dense row-major index for a cell, usable as a canonical hash key
    ///
    /// `None` when the cell is out of bounds.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let col = (cell.x - self.min_x) as usize;
        let row = (cell.z - self.min_z) as usize;
        Some(col + row * self.width as usize)
    }

    /// Iterate every cell in row-major order (x varies fastest)
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        let (min_x, min_z) = (self.min_x, self.min_z);
        let (max_x, max_z) = (self.max_x(), self.max_z());
        (min_z..=max_z).flat_map(move |z| (min_x..=max_x).map(move |x| Cell::new(x, z)))
    }

    /// Pick a uniformly random cell not present in `occupied`
    ///
    /// Returns `None` when the board is full. The free list is enumerated in
    /// row-major order, so the result is deterministic for a given rng state.
    pub fn random_free_cell<R: Rng>(
        &self,
        occupied: &HashSet<Cell>,
        rng: &mut R,
    ) -> Option<Cell> {
        let free: Vec<Cell> = self.cells().filter(|c| !occupied.contains(c)).collect();
        if free.is_empty() {
            return None;
        }
        Some(free[rng.gen_range(0..free.len())])
    }
}
