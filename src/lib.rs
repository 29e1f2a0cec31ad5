//! Snake autopilot - a survival-first snake steering library
//!
//! This library provides:
//! - Playfield geometry and the snake move simulator (game module)
//! - A* and flood-fill pathfinding over the grid (path module)
//! - A Hamiltonian cycle with O(1) position lookups (cycle module)
//! - The layered decision pipeline that picks each tick's move (pilot module)
//! - A seeded fill-the-board evaluation harness (harness module)
//!
//! The host game supplies the head, body, fruit, and hazard cells each tick
//! and applies the one direction the autopilot returns; rendering, timing,
//! and input stay on the host's side of the boundary.

pub mod cycle;
pub mod game;
pub mod harness;
pub mod path;
pub mod pilot;
