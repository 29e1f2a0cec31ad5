//! Grid pathfinding primitives
//!
//! A* and flood fill over the playfield against a per-call obstacle set.
//! Both degrade to empty sentinels (`None` path, zero count) instead of
//! erroring; the autopilot decides what an empty result means.

pub mod astar;
pub mod flood;

pub use astar::find_path;
pub use flood::{flood_fill, open_neighbors};
