use anyhow::{Context, Result};
use clap::Parser;
use snake_pilot::harness::{run_all, summarize, HarnessConfig};

#[derive(Parser)]
#[command(name = "snake_pilot")]
#[command(version, about = "Fill-the-board evaluation harness for the snake autopilot")]
struct Cli {
    /// Number of independent games to run
    #[arg(long, default_value = "200")]
    runs: usize,

    /// Step limit per game
    #[arg(long, default_value = "15000")]
    steps: usize,

    /// Minimum pass rate; the process exits non-zero below it
    #[arg(long, default_value = "0.95")]
    threshold: f64,

    /// Difficulty tag forwarded to the autopilot
    #[arg(long, default_value = "normal")]
    difficulty: String,

    /// Base seed; run i plays with seed + i
    #[arg(long, default_value = "0")]
    seed: u64,

    /// Count only full-board wins as passes
    #[arg(long)]
    require_fill: bool,

    /// Grid width
    #[arg(long, default_value = "20")]
    width: i32,

    /// Grid height
    #[arg(long, default_value = "20")]
    height: i32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = HarnessConfig {
        runs: cli.runs,
        steps: cli.steps,
        threshold: cli.threshold,
        difficulty: cli.difficulty,
        seed: cli.seed,
        require_fill: cli.require_fill,
        width: cli.width,
        height: cli.height,
    };

    let results = run_all(&config).context("harness run failed")?;
    let report = summarize(&config, &results);

    let json =
        serde_json::to_string_pretty(&report).context("failed to serialize harness report")?;
    println!("{}", json);

    if report.results.pass_rate < config.threshold {
        eprintln!(
            "pass rate {:.3} below threshold {:.3}",
            report.results.pass_rate, config.threshold
        );
        std::process::exit(1);
    }
    Ok(())
}
