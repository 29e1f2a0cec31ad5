use log::{debug, warn};
use std::collections::HashSet;

use crate::cycle::HamiltonianCycle;
use crate::game::{simulate_step, Cell, Direction, GridBounds, Snake};
use crate::path::find_path;

use super::policy::{
    cycle_gap_ok, has_escape_route, legal_moves, min_shortcut_buffer, nearest_fruits,
    path_obstacles, proactive_interval, score_tolerance, short_path_cap, shortcut_path_limit,
    survival_score, tail_buffer, validate_shortcut_path, CandidateMove, ShortcutPlan,
};
use super::stats::{DebugStats, Decision};

/// How many fruits the chase and shortcut policies rank by distance
const CHASE_FRUIT_LIMIT: usize = 4;
/// Snake length up to which the early-game chase policy applies
const EARLY_CHASE_MAX_LEN: usize = 18;
/// Fruits probed by the host-facing reachability check
const REACHABLE_FRUIT_LIMIT: usize = 6;

/// A scored, simulator-approved first step
struct ScoredMove {
    mv: CandidateMove,
    score: f64,
    buffer: i32,
}

/// The snake autopilot
///
/// Decides one orthogonal move per tick so the snake survives indefinitely
/// while greedily collecting fruit. Three layered policies back each other
/// up: a provably-safe Hamiltonian baseline, validated shortcuts off the
/// cycle, and a survival-score fallback for boards where no cycle exists.
/// The only state carried between calls is the step counter and the debug
/// counters; everything else is supplied afresh by the host each tick.
pub struct Autopilot {
    bounds: GridBounds,
    cycle: HamiltonianCycle,
    difficulty: String,
    hazards: HashSet<Cell>,
    step_counter: u64,
    stats: DebugStats,
}

impl Autopilot {
    pub fn new(bounds: GridBounds, difficulty: impl Into<String>) -> Self {
        let cycle = HamiltonianCycle::new(bounds);
        let difficulty = difficulty.into();
        let stats = DebugStats::new(difficulty.clone(), cycle.is_valid());
        Self {
            bounds,
            cycle,
            difficulty,
            hazards: HashSet::new(),
            step_counter: 0,
            stats,
        }
    }

    /// The difficulty tag is an opaque host label; it is stored and echoed
    /// through the debug stats but does not change decisions
    pub fn set_difficulty(&mut self, tag: impl Into<String>) {
        self.difficulty = tag.into();
        self.stats.mode = self.difficulty.clone();
    }

    /// Replace the hazard set (e.g. bomb danger zones)
    pub fn set_hazards(&mut self, cells: &[Cell]) {
        self.hazards = cells
            .iter()
            .copied()
            .filter(|c| self.bounds.in_bounds(*c))
            .collect();
    }

    /// Clear per-game state for a fresh run
    pub fn reset_state(&mut self) {
        self.step_counter = 0;
        self.hazards.clear();
        self.stats.reset();
    }

    pub fn debug_stats(&self) -> &DebugStats {
        &self.stats
    }

    pub fn cycle(&self) -> &HamiltonianCycle {
        &self.cycle
    }

    pub fn bounds(&self) -> &GridBounds {
        &self.bounds
    }

    /// Decide the next move
    ///
    /// Always returns some direction. When no legal move exists (or the
    /// inputs are malformed) the current direction comes back unchanged and
    /// the decision is labelled `no-legal-move`; the caller's tick will then
    /// register the crash.
    pub fn next_direction(
        &mut self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Direction {
        self.step_counter = self.step_counter.wrapping_add(1);
        self.stats.step = self.step_counter;

        if body.is_empty() || body[0] != head || !self.bounds.in_bounds(head) {
            warn!("malformed autopilot input: head {:?}, body length {}", head, body.len());
            return self.give_up(current_dir);
        }

        let snake = Snake::new(body.to_vec());
        let fruits = self.filter_fruits(body, fruits);
        let fruit_set: HashSet<Cell> = fruits.iter().copied().collect();

        let candidates = legal_moves(&self.bounds, head, current_dir, body, &self.hazards);
        if candidates.is_empty() {
            return self.give_up(current_dir);
        }

        // A legal move that lands straight on a fruit and leaves a provably
        // recoverable state wins outright.
        if let Some(chosen) = self.direct_fruit_move(&snake, &candidates, &fruits, &fruit_set) {
            return self.commit(chosen, Decision::DirectFruit);
        }

        // While the snake is short, chase the nearest fruits along full A*
        // paths.
        if snake.len() <= EARLY_CHASE_MAX_LEN && !fruits.is_empty() {
            if let Some(chosen) = self.early_chase_move(&snake, &candidates, &fruits, &fruit_set) {
                return self.commit(chosen, Decision::EarlyChase);
            }
        }

        // Follow the cycle, unless a validated shortcut wins the
        // arbitration.
        let cycle_move = self.cycle_move(&snake, &candidates, &fruit_set);
        let shortcut = self.best_shortcut(&snake, &candidates, &fruits, &fruit_set);
        match (cycle_move, shortcut) {
            (Some(cycle_mv), Some(plan)) => {
                if self.arbitrate(&snake, &cycle_mv, &plan) {
                    self.stats.shortcuts_accepted += 1;
                    let chosen = ScoredMove {
                        mv: plan.first,
                        score: plan.score,
                        buffer: plan.buffer,
                    };
                    return self.commit(chosen, Decision::Shortcut);
                }
                self.stats.shortcuts_rejected += 1;
                return self.commit(cycle_mv, Decision::Cycle);
            }
            (Some(cycle_mv), None) => {
                return self.commit(cycle_mv, Decision::Cycle);
            }
            (None, Some(plan)) => {
                if plan.buffer > min_shortcut_buffer(snake.len()) {
                    self.stats.shortcuts_accepted += 1;
                    let chosen = ScoredMove {
                        mv: plan.first,
                        score: plan.score,
                        buffer: plan.buffer,
                    };
                    return self.commit(chosen, Decision::Shortcut);
                }
                self.stats.shortcuts_rejected += 1;
            }
            (None, None) => {}
        }

        // Last line of defense: pick whatever scores best on survival alone.
        if let Some(chosen) = self.survival_move(&snake, &candidates, &fruits, &fruit_set) {
            self.stats.fallback_count += 1;
            return self.commit(chosen, Decision::Emergency);
        }

        self.give_up(current_dir)
    }

    /// Best fallback move without consulting the fruit policies
    ///
    /// The host calls this when its primary move just collided, as a
    /// same-tick retry before declaring the game over.
    pub fn emergency_direction(
        &mut self,
        head: Cell,
        current_dir: Option<Direction>,
        body: &[Cell],
        fruits: &[Cell],
    ) -> Option<Direction> {
        self.stats.emergency_count += 1;

        if body.is_empty() || body[0] != head || !self.bounds.in_bounds(head) {
            return None;
        }

        let snake = Snake::new(body.to_vec());
        let fruits = self.filter_fruits(body, fruits);
        let fruit_set: HashSet<Cell> = fruits.iter().copied().collect();
        let candidates = legal_moves(&self.bounds, head, current_dir, body, &self.hazards);

        let chosen = self.survival_move(&snake, &candidates, &fruits, &fruit_set)?;
        self.stats.last_decision = Some(Decision::Emergency);
        self.stats.last_survival_buffer = chosen.buffer;
        Some(chosen.mv.dir)
    }

    /// Whether any nearby fruit is still reachable from the head
    ///
    /// The host uses this to detect stalls (too many ticks without an
    /// eatable fruit) and respawn fruit somewhere useful.
    pub fn has_reachable_food(&self, head: Cell, body: &[Cell], fruits: &[Cell]) -> bool {
        if body.is_empty() || !self.bounds.in_bounds(head) {
            return false;
        }
        let fruits = self.filter_fruits(body, fruits);
        let obstacles = path_obstacles(body, &self.hazards);
        nearest_fruits(head, &fruits, REACHABLE_FRUIT_LIMIT)
            .into_iter()
            .any(|fruit| find_path(&self.bounds, head, fruit, &obstacles).is_some())
    }

    /// Drop duplicate, out-of-bounds, and body-covered fruit cells
    fn filter_fruits(&self, body: &[Cell], fruits: &[Cell]) -> Vec<Cell> {
        let body_set: HashSet<Cell> = body.iter().copied().collect();
        let mut seen = HashSet::new();
        fruits
            .iter()
            .copied()
            .filter(|f| self.bounds.in_bounds(*f) && !body_set.contains(f) && seen.insert(*f))
            .collect()
    }

    fn direct_fruit_move(
        &self,
        snake: &Snake,
        candidates: &[CandidateMove],
        fruits: &[Cell],
        fruit_set: &HashSet<Cell>,
    ) -> Option<ScoredMove> {
        let mut best: Option<ScoredMove> = None;
        for mv in candidates.iter().filter(|mv| fruit_set.contains(&mv.cell)) {
            let Some(state) = simulate_step(snake, mv.cell, true, &self.bounds, &self.hazards)
            else {
                continue;
            };
            if self.cycle.is_valid() && !cycle_gap_ok(&self.cycle, &state, true) {
                continue;
            }
            if !has_escape_route(&self.bounds, &state, &self.hazards) {
                continue;
            }
            let score = survival_score(&self.bounds, &self.cycle, &state, fruits, &self.hazards);
            let buffer = tail_buffer(&self.cycle, &state);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ScoredMove { mv: *mv, score, buffer });
            }
        }
        best
    }

    fn early_chase_move(
        &self,
        snake: &Snake,
        candidates: &[CandidateMove],
        fruits: &[Cell],
        fruit_set: &HashSet<Cell>,
    ) -> Option<ScoredMove> {
        let obstacles = path_obstacles(&snake.body, &self.hazards);
        let mut best: Option<ScoredMove> = None;

        for fruit in nearest_fruits(snake.head(), fruits, CHASE_FRUIT_LIMIT) {
            let Some(path) = find_path(&self.bounds, snake.head(), fruit, &obstacles) else {
                continue;
            };
            let Some(&first) = path.first() else {
                continue;
            };
            let Some(mv) = candidates.iter().find(|m| m.cell == first) else {
                continue;
            };
            let grows = fruit_set.contains(&first);
            let Some(state) = simulate_step(snake, first, grows, &self.bounds, &self.hazards)
            else {
                continue;
            };
            if !has_escape_route(&self.bounds, &state, &self.hazards) {
                continue;
            }
            let score = survival_score(&self.bounds, &self.cycle, &state, fruits, &self.hazards)
                + 300.0
                + (14.0 - path.len() as f64).max(0.0) * 22.0;
            let buffer = tail_buffer(&self.cycle, &state);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ScoredMove { mv: *mv, score, buffer });
            }
        }
        best
    }

    fn cycle_move(
        &self,
        snake: &Snake,
        candidates: &[CandidateMove],
        fruit_set: &HashSet<Cell>,
    ) -> Option<ScoredMove> {
        if !self.cycle.is_valid() {
            return None;
        }
        let successor = self.cycle.next_cell(snake.head())?;
        let mv = candidates.iter().find(|m| m.cell == successor)?;
        let grows = fruit_set.contains(&successor);
        let state = simulate_step(snake, successor, grows, &self.bounds, &self.hazards)?;
        let buffer = tail_buffer(&self.cycle, &state);
        Some(ScoredMove {
            mv: *mv,
            score: 380.0 + buffer as f64 * 1.2,
            buffer,
        })
    }

    /// The best validated shortcut to a nearby fruit, if this step is on the
    /// evaluation cadence
    fn best_shortcut(
        &mut self,
        snake: &Snake,
        candidates: &[CandidateMove],
        fruits: &[Cell],
        fruit_set: &HashSet<Cell>,
    ) -> Option<ShortcutPlan> {
        if !self.cycle.is_valid() || fruits.is_empty() {
            return None;
        }
        let len = snake.len();
        if self.step_counter % proactive_interval(len) != 0 {
            return None;
        }

        let limit = shortcut_path_limit(len);
        let obstacles = path_obstacles(&snake.body, &self.hazards);
        let head_idx = self.cycle.index_of(snake.head());
        let mut best: Option<ShortcutPlan> = None;

        for fruit in nearest_fruits(snake.head(), fruits, CHASE_FRUIT_LIMIT) {
            let Some(path) = find_path(&self.bounds, snake.head(), fruit, &obstacles) else {
                continue;
            };
            if path.is_empty() || path.len() > limit {
                self.stats.shortcuts_rejected += 1;
                continue;
            }
            let Some(first) = candidates.iter().find(|m| m.cell == path[0]).copied() else {
                self.stats.shortcuts_rejected += 1;
                continue;
            };
            let Some((end_state, min_gap)) = validate_shortcut_path(
                &self.bounds,
                &self.cycle,
                snake,
                &path,
                fruit_set,
                &self.hazards,
            ) else {
                self.stats.shortcuts_rejected += 1;
                debug!("shortcut to {:?} rejected by step validation", fruit);
                continue;
            };

            let fruit_idx = self.cycle.index_of(fruit);
            let food_gain = self.cycle.distance_forward(head_idx, fruit_idx) - path.len() as i32;
            let score =
                survival_score(&self.bounds, &self.cycle, &end_state, fruits, &self.hazards)
                    + food_gain as f64 * 34.0
                    + (220.0 - path.len() as f64 * 7.0).max(0.0);

            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ShortcutPlan {
                    first,
                    score,
                    buffer: min_gap,
                    path_len: path.len(),
                    food_gain,
                });
            }
        }
        best
    }

    /// Should the shortcut be taken over the cycle move this step
    fn arbitrate(&self, snake: &Snake, cycle_mv: &ScoredMove, plan: &ShortcutPlan) -> bool {
        let len = snake.len();
        if plan.buffer <= min_shortcut_buffer(len) {
            return false;
        }
        let proactive = self.step_counter % proactive_interval(len) == 0;
        let worthwhile =
            plan.path_len <= short_path_cap(len) || plan.food_gain >= 1 || proactive;
        worthwhile && plan.score >= cycle_mv.score - score_tolerance(len)
    }

    /// Maximize the survival score over the simulated successors
    fn survival_move(
        &self,
        snake: &Snake,
        candidates: &[CandidateMove],
        fruits: &[Cell],
        fruit_set: &HashSet<Cell>,
    ) -> Option<ScoredMove> {
        let mut best: Option<ScoredMove> = None;
        for mv in candidates {
            let grows = fruit_set.contains(&mv.cell);
            let Some(state) = simulate_step(snake, mv.cell, grows, &self.bounds, &self.hazards)
            else {
                continue;
            };
            let score = survival_score(&self.bounds, &self.cycle, &state, fruits, &self.hazards);
            let buffer = tail_buffer(&self.cycle, &state);
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(ScoredMove { mv: *mv, score, buffer });
            }
        }
        best
    }

    fn commit(&mut self, chosen: ScoredMove, decision: Decision) -> Direction {
        debug!(
            "step {}: {} -> {:?} (score {:.0}, buffer {})",
            self.step_counter,
            decision.as_str(),
            chosen.mv.dir,
            chosen.score,
            chosen.buffer
        );
        self.stats.last_decision = Some(decision);
        self.stats.last_survival_buffer = chosen.buffer;
        chosen.mv.dir
    }

    fn give_up(&mut self, current_dir: Option<Direction>) -> Direction {
        self.stats.last_decision = Some(Decision::NoLegalMove);
        self.stats.last_survival_buffer = 0;
        current_dir.unwrap_or(Direction::Up)
    }
}
