use std::collections::{HashSet, VecDeque};

use crate::game::{Cell, Direction, GridBounds};

/// Count the cells reachable from `start` by orthogonal steps
///
/// Breadth-first search over the 4-connected grid, bounded by the board's
/// cell count. Includes `start` itself when it is in bounds and unobstructed;
/// returns 0 otherwise.
pub fn flood_fill(bounds: &GridBounds, start: Cell, obstacles: &HashSet<Cell>) -> usize {
    let Some(start_idx) = bounds.index_of(start) else {
        return 0;
    };
    if obstacles.contains(&start) {
        return 0;
    }

    let cell_count = bounds.cell_count();
    let mut visited = vec![false; cell_count];
    visited[start_idx] = true;

    let mut queue = VecDeque::new();
    queue.push_back(start);
    let mut reached = 0usize;

    while let Some(cell) = queue.pop_front() {
        reached += 1;
        if reached >= cell_count {
            break;
        }
        for dir in Direction::all() {
            let neighbor = dir.apply(cell);
            let Some(idx) = bounds.index_of(neighbor) else {
                continue;
            };
            if visited[idx] || obstacles.contains(&neighbor) {
                continue;
            }
            visited[idx] = true;
            queue.push_back(neighbor);
        }
    }

    reached
}

/// How many of a cell's four neighbors are in bounds and unobstructed
pub fn open_neighbors(bounds: &GridBounds, cell: Cell, obstacles: &HashSet<Cell>) -> usize {
    Direction::all()
        .into_iter()
        .map(|dir| dir.apply(cell))
        .filter(|n| bounds.in_bounds(*n) && !obstacles.contains(n))
        .count()
}
