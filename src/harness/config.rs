use anyhow::{ensure, Result};
use serde::Serialize;

/// Configuration for the board-filling evaluation harness
#[derive(Debug, Clone, Serialize)]
pub struct HarnessConfig {
    /// Number of independent games to run
    pub runs: usize,
    /// Step limit per game
    pub steps: usize,
    /// Minimum pass rate before the harness exits non-zero
    pub threshold: f64,
    /// Difficulty tag forwarded to the autopilot
    pub difficulty: String,
    /// Base seed; run `i` uses `seed + i`
    pub seed: u64,
    /// Count only board fills as passes, not mere survival
    pub require_fill: bool,
    /// Grid width
    pub width: i32,
    /// Grid height
    pub height: i32,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            runs: 200,
            steps: 15_000,
            threshold: 0.95,
            difficulty: "normal".to_string(),
            seed: 0,
            require_fill: false,
            width: 20,
            height: 20,
        }
    }
}

impl HarnessConfig {
    /// Validate the configuration before running
    pub fn validate(&self) -> Result<()> {
        ensure!(self.runs >= 1, "at least one run is required");
        ensure!(self.steps >= 1, "step limit must be positive");
        ensure!(
            (0.0..=1.0).contains(&self.threshold),
            "threshold must be within [0, 1], got {}",
            self.threshold
        );
        // The initial snake is three straight segments at the board centre
        ensure!(
            self.width >= 4 && self.height >= 4,
            "harness boards must be at least 4x4, got {}x{}",
            self.width,
            self.height
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HarnessConfig::default();
        assert_eq!(config.runs, 200);
        assert_eq!(config.steps, 15_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = HarnessConfig::default();
        config.threshold = 1.5;
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.width = 3;
        assert!(config.validate().is_err());

        let mut config = HarnessConfig::default();
        config.runs = 0;
        assert!(config.validate().is_err());
    }
}
