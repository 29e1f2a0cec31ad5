use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

use crate::game::{Cell, Direction, GridBounds};

/// A* shortest path over the 4-connected grid
///
/// Obstacle cells are never entered; whether the destination counts as an
/// obstacle is the caller's business (the autopilot removes a vacating tail
/// from the set before calling). The returned path excludes `start` and
/// includes `end`, in step order. `start == end` yields an empty path, and an
/// unreachable destination yields `None`.
pub fn find_path(
    bounds: &GridBounds,
    start: Cell,
    end: Cell,
    obstacles: &HashSet<Cell>,
) -> Option<Vec<Cell>> {
    if start == end {
        return Some(Vec::new());
    }
    let start_idx = bounds.index_of(start)?;
    let end_idx = bounds.index_of(end)?;

    let cell_count = bounds.cell_count();
    let mut g_score = vec![i32::MAX; cell_count];
    let mut came_from: Vec<Option<Cell>> = vec![None; cell_count];
    let mut closed = vec![false; cell_count];

    // Reverse on (f, index) keeps the heap a min-heap with a stable,
    // input-deterministic tie-break.
    let mut open = BinaryHeap::new();
    g_score[start_idx] = 0;
    open.push(Reverse((start.manhattan(end), start_idx, start)));

    while let Some(Reverse((_, idx, cell))) = open.pop() {
        if closed[idx] {
            continue;
        }
        closed[idx] = true;

        if idx == end_idx {
            return Some(reconstruct(&came_from, bounds, start, end));
        }

        let next_g = g_score[idx].saturating_add(1);
        for dir in Direction::all() {
            let neighbor = dir.apply(cell);
            let Some(n_idx) = bounds.index_of(neighbor) else {
                continue;
            };
            if closed[n_idx] || obstacles.contains(&neighbor) {
                continue;
            }
            if next_g < g_score[n_idx] {
                g_score[n_idx] = next_g;
                came_from[n_idx] = Some(cell);
                let f = next_g.saturating_add(neighbor.manhattan(end));
                open.push(Reverse((f, n_idx, neighbor)));
            }
        }
    }

    None
}

fn reconstruct(
    came_from: &[Option<Cell>],
    bounds: &GridBounds,
    start: Cell,
    end: Cell,
) -> Vec<Cell> {
    let mut path = vec![end];
    let mut current = end;
    while current != start {
        let idx = match bounds.index_of(current) {
            Some(idx) => idx,
            None => break,
        };
        match came_from[idx] {
            Some(prev) if prev != start => {
                path.push(prev);
                current = prev;
            }
            _ => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> GridBounds {
        GridBounds::new(10, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_straight_line_path() {
        let path = find_path(&bounds(), Cell::new(0, 0), Cell::new(3, 0), &HashSet::new());
        assert_eq!(
            path,
            Some(vec![Cell::new(1, 0), Cell::new(2, 0), Cell::new(3, 0)])
        );
    }

    #[test]
    fn test_start_equals_end() {
        let path = find_path(&bounds(), Cell::new(4, 4), Cell::new(4, 4), &HashSet::new());
        assert_eq!(path, Some(Vec::new()));
    }

    #[test]
    fn test_path_length_is_manhattan_on_open_board() {
        let start = Cell::new(1, 2);
        let end = Cell::new(7, 8);
        let path = find_path(&bounds(), start, end, &HashSet::new()).unwrap();
        assert_eq!(path.len() as i32, start.manhattan(end));
        assert_eq!(*path.last().unwrap(), end);
        // Consecutive steps are orthogonally adjacent
        let mut prev = start;
        for &step in &path {
            assert_eq!(prev.manhattan(step), 1);
            prev = step;
        }
    }

    #[test]
    fn test_routes_around_obstacle_wall() {
        // Wall across x=5 with a single gap at z=9
        let obstacles: HashSet<Cell> = (0..9).map(|z| Cell::new(5, z)).collect();
        let path = find_path(&bounds(), Cell::new(0, 0), Cell::new(9, 0), &obstacles).unwrap();
        assert!(path.iter().all(|c| !obstacles.contains(c)));
        assert!(path.contains(&Cell::new(5, 9)));
        assert_eq!(*path.last().unwrap(), Cell::new(9, 0));
    }

    #[test]
    fn test_unreachable_returns_none() {
        // Full wall across x=5
        let obstacles: HashSet<Cell> = (0..10).map(|z| Cell::new(5, z)).collect();
        assert_eq!(
            find_path(&bounds(), Cell::new(0, 0), Cell::new(9, 0), &obstacles),
            None
        );
    }

    #[test]
    fn test_out_of_bounds_endpoints() {
        assert_eq!(
            find_path(&bounds(), Cell::new(-1, 0), Cell::new(3, 0), &HashSet::new()),
            None
        );
        assert_eq!(
            find_path(&bounds(), Cell::new(0, 0), Cell::new(30, 0), &HashSet::new()),
            None
        );
    }
}
