//! Board-filling evaluation harness
//!
//! Plays the host's side of the contract: repeated seeded games where the
//! autopilot must survive the step limit or fill the board, aggregated into
//! a JSON summary with a pass-rate gate.

pub mod config;
pub mod report;
pub mod runner;

pub use config::HarnessConfig;
pub use report::{summarize, HarnessReport, HarnessResults};
pub use runner::{run_all, GameRunner, RunOutcome, RunResult};
