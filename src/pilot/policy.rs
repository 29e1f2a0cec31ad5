//! Scoring and validation primitives shared by the decision policies
//!
//! Each policy proposes a first step; everything here answers the same two
//! questions about a proposal: is the resulting state provably safe, and how
//! good is it. Safety is always established through the move simulator plus
//! the cycle-order invariant and the escape-route rule; no policy trusts its
//! own arithmetic.

use std::collections::HashSet;

use crate::cycle::HamiltonianCycle;
use crate::game::{simulate_step, Cell, Direction, GridBounds, Snake};
use crate::path::{find_path, flood_fill, open_neighbors};

/// A legal first step: the direction and the cell it lands on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CandidateMove {
    pub dir: Direction,
    pub cell: Cell,
}

/// A fully validated shortcut proposal
#[derive(Debug, Clone, Copy)]
pub struct ShortcutPlan {
    pub first: CandidateMove,
    pub score: f64,
    /// Smallest head-to-tail cycle gap observed anywhere along the path
    pub buffer: i32,
    pub path_len: usize,
    /// Cycle distance to the fruit minus the path length
    pub food_gain: i32,
}

/// Enumerate legal first steps from `head`
///
/// A candidate is dropped when it reverses the current direction, leaves the
/// board, lands on a hazard, or lands on a body segment that will still be
/// there next tick. The head cell is overwritten and the tail vacates, so
/// neither blocks. Order is the fixed up/down/left/right enumeration.
pub fn legal_moves(
    bounds: &GridBounds,
    head: Cell,
    current_dir: Option<Direction>,
    body: &[Cell],
    hazards: &HashSet<Cell>,
) -> Vec<CandidateMove> {
    let blockers: HashSet<Cell> = if body.len() > 2 {
        body[1..body.len() - 1].iter().copied().collect()
    } else {
        HashSet::new()
    };

    Direction::all()
        .into_iter()
        .filter(|dir| current_dir.map_or(true, |cur| !cur.is_opposite(*dir)))
        .map(|dir| CandidateMove {
            dir,
            cell: dir.apply(head),
        })
        .filter(|mv| {
            bounds.in_bounds(mv.cell)
                && !blockers.contains(&mv.cell)
                && !hazards.contains(&mv.cell)
        })
        .collect()
}

/// Obstacle set for pathfinding: the body minus its vacating tail, plus
/// hazards
pub fn path_obstacles(body: &[Cell], hazards: &HashSet<Cell>) -> HashSet<Cell> {
    let mut obstacles: HashSet<Cell> = hazards.iter().copied().collect();
    if body.len() > 1 {
        obstacles.extend(body[..body.len() - 1].iter().copied());
    }
    obstacles
}

/// Obstacle set for evaluating a state: interior segments plus hazards
///
/// The head is where searches start and the tail vacates, so only the
/// segments strictly between them block.
fn interior_obstacles(snake: &Snake, hazards: &HashSet<Cell>) -> HashSet<Cell> {
    let mut obstacles: HashSet<Cell> = hazards.iter().copied().collect();
    if snake.len() > 2 {
        obstacles.extend(snake.body[1..snake.len() - 1].iter().copied());
    }
    obstacles
}

/// Head-to-tail distance along the cycle for a simulated state
///
/// Zero when no valid cycle exists.
pub fn tail_buffer(cycle: &HamiltonianCycle, snake: &Snake) -> i32 {
    if !cycle.is_valid() {
        return 0;
    }
    let head_idx = cycle.index_of(snake.head());
    let tail_idx = cycle.index_of(snake.tail());
    if head_idx < 0 || tail_idx < 0 {
        return 0;
    }
    cycle.distance_forward(head_idx, tail_idx)
}

/// Cycle-order invariant: the head must stay far enough behind the tail
///
/// `gap > max(base, length * 8 / 100)` where `base` is 2 on growing steps
/// (the tail holds its cell) and 1 otherwise. Trivially satisfied when no
/// cycle exists.
pub fn cycle_gap_ok(cycle: &HamiltonianCycle, snake: &Snake, grew: bool) -> bool {
    if !cycle.is_valid() {
        return true;
    }
    let base_gap = if grew { 2 } else { 1 };
    let required = base_gap.max(snake.len() as i32 * 8 / 100);
    tail_buffer(cycle, snake) > required
}

/// A state has an escape route when the head can still reach the tail
///
/// A* from head to tail through the interior segments and hazards. A snake
/// that can reach its own tail cannot seal itself into a pocket on the next
/// step.
pub fn has_escape_route(bounds: &GridBounds, snake: &Snake, hazards: &HashSet<Cell>) -> bool {
    let obstacles = interior_obstacles(snake, hazards);
    find_path(bounds, snake.head(), snake.tail(), &obstacles).is_some()
}

/// Survival score for a simulated post-move state
///
/// Branching factor dominates so corridors are avoided; the tail buffer
/// rewards states far from self-closure; fruit distance is a gentle pull.
pub fn survival_score(
    bounds: &GridBounds,
    cycle: &HamiltonianCycle,
    snake: &Snake,
    fruits: &[Cell],
    hazards: &HashSet<Cell>,
) -> f64 {
    let obstacles = interior_obstacles(snake, hazards);
    let head = snake.head();
    let open_space = flood_fill(bounds, head, &obstacles) as f64;
    let branching = open_neighbors(bounds, head, &obstacles) as f64;
    let buffer = tail_buffer(cycle, snake) as f64;
    let fruit_dist = fruits
        .iter()
        .map(|f| head.manhattan(*f))
        .min()
        .unwrap_or(0) as f64;

    open_space * 6.0 + branching * 55.0 + buffer * 4.0 - fruit_dist * 3.0
}

/// Walk a shortcut path step by step through the simulator
///
/// Every intermediate state must honor the cycle-order invariant, and the
/// endpoint must keep an escape route. Returns the end state and the
/// smallest gap seen, or `None` as soon as any step fails.
pub fn validate_shortcut_path(
    bounds: &GridBounds,
    cycle: &HamiltonianCycle,
    snake: &Snake,
    path: &[Cell],
    fruit_set: &HashSet<Cell>,
    hazards: &HashSet<Cell>,
) -> Option<(Snake, i32)> {
    let mut state = snake.clone();
    let mut min_gap = i32::MAX;

    for step in path {
        let grows = fruit_set.contains(step);
        state = simulate_step(&state, *step, grows, bounds, hazards)?;
        if !cycle_gap_ok(cycle, &state, grows) {
            return None;
        }
        min_gap = min_gap.min(tail_buffer(cycle, &state));
    }

    if !has_escape_route(bounds, &state, hazards) {
        return None;
    }
    Some((state, min_gap))
}

/// The nearest fruits by Manhattan distance from `head`, capped at `limit`
///
/// Sorted with a full (distance, x, z) key so selection is deterministic
/// regardless of the caller's fruit ordering.
pub fn nearest_fruits(head: Cell, fruits: &[Cell], limit: usize) -> Vec<Cell> {
    let mut ranked: Vec<Cell> = fruits.to_vec();
    ranked.sort_by_key(|f| (head.manhattan(*f), f.x, f.z));
    ranked.truncate(limit);
    ranked
}

/// Maximum shortcut path length for the current snake length
pub fn shortcut_path_limit(length: usize) -> usize {
    if length < 80 {
        34
    } else if length < 180 {
        28
    } else {
        22
    }
}

/// How often shortcuts are even considered, by length band
///
/// Empirically tuned; kept in one place for retuning.
pub fn proactive_interval(length: usize) -> u64 {
    if length < 90 {
        1
    } else if length < 180 {
        2
    } else {
        3
    }
}

/// Score slack a shortcut may concede to the cycle move and still win
pub fn score_tolerance(length: usize) -> f64 {
    if length < 80 {
        18.0
    } else if length < 180 {
        12.0
    } else {
        8.0
    }
}

/// Minimum survival buffer a shortcut must keep, by snake length
pub fn min_shortcut_buffer(length: usize) -> i32 {
    3.max(length as i32 * 5 / 100)
}

/// Path-length cap under which a shortcut is "short relative to the snake"
pub fn short_path_cap(length: usize) -> usize {
    if length < 70 {
        8
    } else {
        6
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GridBounds, HamiltonianCycle) {
        let bounds = GridBounds::new(10, 10, 0, 0).unwrap();
        (bounds, HamiltonianCycle::new(bounds))
    }

    #[test]
    fn test_legal_moves_exclude_reverse_and_walls() {
        let (bounds, _) = setup();
        // Head in the top-left corner, moving right: Up leaves the board and
        // Left reverses, leaving Down and Right.
        let body = vec![Cell::new(0, 0)];
        let moves = legal_moves(&bounds, body[0], Some(Direction::Right), &body, &HashSet::new());
        let dirs: Vec<Direction> = moves.iter().map(|m| m.dir).collect();
        assert_eq!(dirs, vec![Direction::Down, Direction::Right]);
    }

    #[test]
    fn test_legal_moves_allow_tail_cell() {
        let (bounds, _) = setup();
        // Square snake: the tail at (5,6) is adjacent to the head
        let body = vec![
            Cell::new(5, 5),
            Cell::new(4, 5),
            Cell::new(4, 6),
            Cell::new(5, 6),
        ];
        let moves = legal_moves(&bounds, body[0], Some(Direction::Right), &body, &HashSet::new());
        assert!(moves.iter().any(|m| m.cell == Cell::new(5, 6)));
        assert!(!moves.iter().any(|m| m.cell == Cell::new(4, 5)));
    }

    #[test]
    fn test_legal_moves_respect_hazards() {
        let (bounds, _) = setup();
        let snake = Snake::straight(Cell::new(5, 5), Direction::Right, 3);
        let hazards: HashSet<Cell> = [Cell::new(5, 4)].into_iter().collect();
        let moves = legal_moves(&bounds, snake.head(), Some(Direction::Right), &snake.body, &hazards);
        assert!(!moves.iter().any(|m| m.cell == Cell::new(5, 4)));
    }

    #[test]
    fn test_zero_current_direction_allows_all() {
        let (bounds, _) = setup();
        let body = vec![Cell::new(5, 5)];
        let moves = legal_moves(&bounds, body[0], None, &body, &HashSet::new());
        assert_eq!(moves.len(), 4);
    }

    #[test]
    fn test_tail_buffer_on_cycle() {
        let (_, cycle) = setup();
        assert!(cycle.is_valid());
        // Body laid along the cycle: head at index 5, tail at index 3
        let body = vec![
            cycle.cell_at(5).unwrap(),
            cycle.cell_at(4).unwrap(),
            cycle.cell_at(3).unwrap(),
        ];
        let snake = Snake::new(body);
        assert_eq!(tail_buffer(&cycle, &snake), 98);
    }

    #[test]
    fn test_cycle_gap_invariant() {
        let (_, cycle) = setup();
        // Head one step behind the tail on the cycle: gap 1 fails either way
        let snake = Snake::new(vec![cycle.cell_at(5).unwrap(), cycle.cell_at(6).unwrap()]);
        assert!(!cycle_gap_ok(&cycle, &snake, false));
        // Generous gap passes
        let snake = Snake::new(vec![cycle.cell_at(5).unwrap(), cycle.cell_at(4).unwrap()]);
        assert!(cycle_gap_ok(&cycle, &snake, false));
        assert!(cycle_gap_ok(&cycle, &snake, true));
    }

    #[test]
    fn test_escape_route_detects_sealed_pocket() {
        let bounds = GridBounds::new(10, 10, 0, 0).unwrap();
        // Open snake: head can walk around to the tail
        let open = Snake::new(vec![Cell::new(5, 5), Cell::new(4, 5), Cell::new(3, 5)]);
        assert!(has_escape_route(&bounds, &open, &HashSet::new()));

        // Head boxed into the corner by its own body
        let boxed_in = Snake::new(vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(2, 2),
        ]);
        assert!(!has_escape_route(&bounds, &boxed_in, &HashSet::new()));
    }

    #[test]
    fn test_nearest_fruits_deterministic_order() {
        let head = Cell::new(0, 0);
        let fruits = vec![
            Cell::new(3, 0),
            Cell::new(0, 3),
            Cell::new(1, 0),
            Cell::new(0, 1),
            Cell::new(5, 5),
        ];
        let nearest = nearest_fruits(head, &fruits, 4);
        assert_eq!(
            nearest,
            vec![Cell::new(0, 1), Cell::new(1, 0), Cell::new(0, 3), Cell::new(3, 0)]
        );
    }

    #[test]
    fn test_length_bands() {
        assert_eq!(shortcut_path_limit(10), 34);
        assert_eq!(shortcut_path_limit(100), 28);
        assert_eq!(shortcut_path_limit(300), 22);
        assert_eq!(proactive_interval(10), 1);
        assert_eq!(proactive_interval(120), 2);
        assert_eq!(proactive_interval(200), 3);
        assert_eq!(min_shortcut_buffer(10), 3);
        assert_eq!(min_shortcut_buffer(200), 10);
    }

    #[test]
    fn test_validate_shortcut_path_simulates_growth() {
        let (bounds, cycle) = setup();
        let snake = Snake::straight(Cell::new(2, 5), Direction::Right, 3);
        let fruit = Cell::new(4, 5);
        let path = vec![Cell::new(3, 5), Cell::new(4, 5)];
        let fruit_set: HashSet<Cell> = [fruit].into_iter().collect();
        let (end, min_gap) =
            validate_shortcut_path(&bounds, &cycle, &snake, &path, &fruit_set, &HashSet::new())
                .expect("path should validate");
        assert_eq!(end.head(), fruit);
        assert_eq!(end.len(), 4);
        assert!(min_gap > 0);
    }
}
