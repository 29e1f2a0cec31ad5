//! The autopilot decision pipeline
//!
//! One `next_direction` call per tick: enumerate the legal first steps, try
//! the fruit policies, fall back to the Hamiltonian cycle (with validated
//! shortcuts), and as a last resort pick the move with the best survival
//! score. Every accepted move has been run through the move simulator first.

pub mod autopilot;
pub mod policy;
pub mod stats;

pub use autopilot::Autopilot;
pub use stats::{DebugStats, Decision};
