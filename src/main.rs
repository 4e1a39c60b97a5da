use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tickbot::backtest::{run_configured, ReportFormat};
use tickbot::settings::{ConfigLoader, Overrides};

/// Moving-average trading simulation over a synthetic random-walk price
#[derive(Parser, Debug)]
#[command(name = "tickbot", version, about)]
struct Cli {
    /// Config file (defaults to ./tickbot.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed the price walk for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to simulate
    #[arg(long)]
    ticks: Option<usize>,

    /// Number of prices in the moving-average window
    #[arg(long)]
    window_size: Option<usize>,

    /// Starting cash balance
    #[arg(long)]
    initial_funds: Option<f64>,

    /// Starting price of the random walk
    #[arg(long, allow_hyphen_values = true)]
    initial_price: Option<f64>,

    /// Mean of the per-tick price change
    #[arg(long, allow_hyphen_values = true)]
    mean: Option<f64>,

    /// Standard deviation of the per-tick price change
    #[arg(long)]
    stddev: Option<f64>,

    /// Stop the run on a non-positive price instead of trading on it
    #[arg(long)]
    strict_prices: bool,

    /// Run N independent simulations and compare them
    #[arg(long)]
    runs: Option<usize>,

    /// Print a summary after the tick lines
    #[arg(long)]
    summary: bool,

    /// Print only the summary, as JSON
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            mean: self.mean,
            stddev: self.stddev,
            initial_price: self.initial_price,
            window_size: self.window_size,
            initial_funds: self.initial_funds,
            ticks: self.ticks,
            seed: self.seed,
            strict_prices: self.strict_prices,
            runs: self.runs,
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();

    let mut loader = ConfigLoader::default();
    if let Some(path) = &cli.config {
        loader = loader.with_file(path);
    }
    let mut config = loader.load().context("Failed to load configuration")?;
    cli.overrides().apply(&mut config);
    config.validate().context("Invalid configuration")?;

    tracing::info!(
        seed = ?config.seed,
        runs = config.runs,
        strict_prices = config.strict_prices,
        "tickbot starting"
    );

    let format = if cli.json {
        ReportFormat::Json
    } else if cli.summary {
        ReportFormat::Summary
    } else {
        ReportFormat::Lines
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let results =
        run_configured(&config, format, &mut out).context("Failed to run simulation")?;
    out.flush()?;

    if let Some((run, reason)) = results
        .iter()
        .enumerate()
        .find_map(|(i, s)| s.halted.as_ref().map(|r| (i + 1, r)))
    {
        anyhow::bail!("Run {} halted: {}", run, reason);
    }

    Ok(())
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("tickbot=info")),
        )
        .with_writer(io::stderr)
        .init();
}
