use serde::Serialize;
use std::collections::BTreeMap;

use super::config::HarnessConfig;
use super::runner::RunResult;

/// Aggregated results across every run
#[derive(Debug, Clone, Serialize)]
pub struct HarnessResults {
    pub pass_rate: f64,
    pub full_win_rate: f64,
    pub avg_fruits: f64,
    pub avg_steps: f64,
    /// 95th percentile of steps survived
    pub p95_survival: usize,
    /// Outcome label -> number of runs that ended that way
    pub reasons: BTreeMap<String, usize>,
}

/// The JSON document the harness prints
#[derive(Debug, Clone, Serialize)]
pub struct HarnessReport {
    pub config: HarnessConfig,
    pub results: HarnessResults,
}

/// Summarize per-run results into the report document
pub fn summarize(config: &HarnessConfig, results: &[RunResult]) -> HarnessReport {
    let runs = results.len().max(1) as f64;

    let passed = results
        .iter()
        .filter(|r| r.passed(config.require_fill))
        .count() as f64;
    let filled = results
        .iter()
        .filter(|r| r.outcome == super::runner::RunOutcome::Filled)
        .count() as f64;

    let mut reasons: BTreeMap<String, usize> = BTreeMap::new();
    for result in results {
        *reasons.entry(result.outcome.as_str().to_string()).or_default() += 1;
    }

    let mut survival: Vec<usize> = results.iter().map(|r| r.steps).collect();
    survival.sort_unstable();

    HarnessReport {
        config: config.clone(),
        results: HarnessResults {
            pass_rate: passed / runs,
            full_win_rate: filled / runs,
            avg_fruits: results.iter().map(|r| r.fruits as f64).sum::<f64>() / runs,
            avg_steps: results.iter().map(|r| r.steps as f64).sum::<f64>() / runs,
            p95_survival: percentile(&survival, 0.95),
            reasons,
        },
    }
}

/// Value at quantile `q` of an ascending-sorted sample (nearest-rank)
fn percentile(sorted: &[usize], q: f64) -> usize {
    if sorted.is_empty() {
        return 0;
    }
    let rank = (sorted.len() as f64 * q).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::runner::RunOutcome;

    fn result(steps: usize, fruits: u32, outcome: RunOutcome) -> RunResult {
        RunResult {
            steps,
            fruits,
            outcome,
        }
    }

    #[test]
    fn test_summary_rates() {
        let config = HarnessConfig::default();
        let results = vec![
            result(100, 10, RunOutcome::Filled),
            result(200, 8, RunOutcome::Survived),
            result(50, 2, RunOutcome::Collision),
            result(300, 12, RunOutcome::Survived),
        ];
        let report = summarize(&config, &results);
        assert_eq!(report.results.pass_rate, 0.75);
        assert_eq!(report.results.full_win_rate, 0.25);
        assert_eq!(report.results.avg_fruits, 8.0);
        assert_eq!(report.results.reasons["survived"], 2);
        assert_eq!(report.results.reasons["collision"], 1);
    }

    #[test]
    fn test_require_fill_tightens_pass() {
        let mut config = HarnessConfig::default();
        config.require_fill = true;
        let results = vec![
            result(100, 10, RunOutcome::Filled),
            result(200, 8, RunOutcome::Survived),
        ];
        let report = summarize(&config, &results);
        assert_eq!(report.results.pass_rate, 0.5);
    }

    #[test]
    fn test_percentile_nearest_rank() {
        assert_eq!(percentile(&[], 0.95), 0);
        assert_eq!(percentile(&[7], 0.95), 7);
        let sample: Vec<usize> = (1..=100).collect();
        assert_eq!(percentile(&sample, 0.95), 95);
        assert_eq!(percentile(&sample, 0.5), 50);
    }

    #[test]
    fn test_report_serializes() {
        let config = HarnessConfig::default();
        let report = summarize(&config, &[result(10, 1, RunOutcome::Survived)]);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["results"]["pass_rate"].is_number());
        assert_eq!(json["config"]["runs"], 200);
    }
}
