use crate::backtest::metrics::{PriceRange, RunSummary, TradeLog};
use crate::execution::{SimulationError, TradingSimulator};
use crate::market::{FeedError, PriceGenerator, PriceSource};
use crate::report::{self, format_number};
use crate::settings::SimConfig;
use crate::strategy::Strategy;
use std::io::{self, Write};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error("Failed to create price generator: {0}")]
    Feed(#[from] FeedError),

    #[error("Failed to create simulator: {0}")]
    Simulation(#[from] SimulationError),

    #[error("Failed to write output: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to write JSON summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// What gets written after (or instead of) the tick lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Tick lines only; a halted run still gets its summary
    Lines,
    /// Tick lines followed by a summary
    Summary,
    /// A JSON summary and nothing else
    Json,
}

/// Run every simulation `config` asks for and write the report to `out`
///
/// A single run writes its tick lines unless the format is JSON. Batch runs
/// only write the comparison table (or the JSON array of summaries).
pub fn run_configured<W: Write>(
    config: &SimConfig,
    format: ReportFormat,
    out: &mut W,
) -> Result<Vec<RunSummary>, RunError> {
    let show_ticks = config.runs == 1 && format != ReportFormat::Json;

    let mut results = Vec::with_capacity(config.runs);
    for run in 0..config.runs {
        let summary = if show_ticks {
            run_once(config, run, out)?
        } else {
            run_once(config, run, &mut io::sink())?
        };
        results.push(summary);
    }

    match format {
        ReportFormat::Json => {
            match results.as_slice() {
                [single] => serde_json::to_writer_pretty(&mut *out, single)?,
                many => serde_json::to_writer_pretty(&mut *out, many)?,
            }
            writeln!(out)?;
        }
        _ if results.len() > 1 => write_comparison(out, &results)?,
        ReportFormat::Summary => {
            if let Some(summary) = results.first() {
                write_summary(out, summary)?;
            }
        }
        ReportFormat::Lines => {
            if let Some(summary) = results.first().filter(|s| s.halted.is_some()) {
                write_summary(out, summary)?;
            }
        }
    }

    Ok(results)
}

fn run_once<W: Write>(config: &SimConfig, run: usize, out: &mut W) -> Result<RunSummary, RunError> {
    let generator = match config.seed_for_run(run) {
        Some(seed) => {
            PriceGenerator::with_seed(seed, config.mean, config.stddev, config.initial_price)?
        }
        None => PriceGenerator::new(config.mean, config.stddev, config.initial_price)?,
    };

    let mut simulator = TradingSimulator::new(config.window_size, generator, config.initial_funds)?
        .strict_prices(config.strict_prices);

    Ok(SimulationRunner::new(config.ticks).run(&mut simulator, out)?)
}

/// Drives a simulator for a fixed number of ticks
pub struct SimulationRunner {
    ticks: usize,
}

impl SimulationRunner {
    pub fn new(ticks: usize) -> Self {
        Self { ticks }
    }

    /// Run the tick loop, writing the trade and status lines for every tick
    ///
    /// A rejected price stops the run; the summary covers the ticks that
    /// completed and carries the reason in `halted`. Only write failures
    /// are returned as errors.
    pub fn run<S, St, W>(
        &self,
        simulator: &mut TradingSimulator<S, St>,
        out: &mut W,
    ) -> io::Result<RunSummary>
    where
        S: PriceSource,
        St: Strategy,
        W: Write,
    {
        let start = simulator.status();
        let initial_equity = start.equity(simulator.last_price().unwrap_or(0.0));
        let start_tick = simulator.ticks();

        tracing::info!(
            ticks = self.ticks,
            window = simulator.window().capacity(),
            strategy = simulator.strategy().name(),
            "Starting simulation: ${:.2} funds",
            start.funds
        );

        let mut trades = TradeLog::new();
        let mut price_range = None;
        let mut halted = None;

        for _ in 0..self.ticks {
            let event = match simulator.tick() {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!("Simulation halted: {}", e);
                    halted = Some(e.to_string());
                    break;
                }
            };

            if let Some(price) = simulator.last_price() {
                price_range = Some(PriceRange::observe(price_range, price));
            }
            if let Some(event) = event {
                trades.record(simulator.ticks(), event);
            }

            report::write_tick(out, event.as_ref(), &simulator.status())?;
        }

        let mut summary = RunSummary::new(
            simulator.ticks() - start_tick,
            initial_equity,
            simulator.status(),
            simulator.last_price(),
            price_range,
            trades,
        );
        summary.halted = halted;

        tracing::info!(
            "Simulation complete: {} trades, P&L: ${:.2} ({:.2}%)",
            summary.total_trades,
            summary.pnl(),
            summary.total_return_pct
        );

        Ok(summary)
    }
}

/// Print a human-readable summary of one run
pub fn write_summary<W: Write>(out: &mut W, summary: &RunSummary) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "📊 Summary")?;
    writeln!(out, "   Ticks:          {}", summary.ticks_run)?;
    writeln!(
        out,
        "   Trades:         {} ({} buys, {} sells)",
        summary.total_trades, summary.buys, summary.sells
    )?;
    if let Some(range) = summary.price_range {
        writeln!(
            out,
            "   Price range:    {} - {}",
            format_number(range.min),
            format_number(range.max)
        )?;
    }
    if let Some(price) = summary.final_price {
        writeln!(out, "   Final price:    {}", format_number(price))?;
    }
    writeln!(out, "   Final funds:    ${:.2}", summary.final_funds)?;
    writeln!(out, "   Shares owned:   {}", summary.final_shares)?;
    writeln!(
        out,
        "   Equity:         ${:.2} ({:+.2}%)",
        summary.final_equity, summary.total_return_pct
    )?;
    if let Some(reason) = &summary.halted {
        writeln!(out, "   ⚠️  Halted: {}", reason)?;
    }
    Ok(())
}

/// Print a comparison table across independent runs
pub fn write_comparison<W: Write>(out: &mut W, results: &[RunSummary]) -> io::Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{:<6} {:>8} {:>8} {:>12} {:>10} {:>10}",
        "Run", "Trades", "Shares", "Equity", "P&L", "Return%"
    )?;
    writeln!(out, "{}", "─".repeat(60))?;

    for (i, summary) in results.iter().enumerate() {
        writeln!(
            out,
            "{:<6} {:>8} {:>8} {:>12.2} {:>10.2} {:>10.2}",
            i + 1,
            summary.total_trades,
            summary.final_shares,
            summary.final_equity,
            summary.pnl(),
            summary.total_return_pct
        )?;
    }

    if results.is_empty() {
        return Ok(());
    }

    let halted = results.iter().filter(|s| s.halted.is_some()).count();
    if halted > 0 {
        writeln!(out, "⚠️  {} run(s) halted on a rejected price", halted)?;
    }

    let avg_return =
        results.iter().map(|s| s.total_return_pct).sum::<f64>() / results.len() as f64;
    let total_trades: usize = results.iter().map(|s| s.total_trades).sum();

    if let Some((best, summary)) = results
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_return_pct.total_cmp(&b.1.total_return_pct))
    {
        writeln!(
            out,
            "\n🏆 Best Run: {} ({:+.2}%)",
            best + 1,
            summary.total_return_pct
        )?;
    }
    if let Some((worst, summary)) = results
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_return_pct.total_cmp(&b.1.total_return_pct))
    {
        writeln!(
            out,
            "⚠️  Worst Run: {} ({:+.2}%)",
            worst + 1,
            summary.total_return_pct
        )?;
    }

    writeln!(out, "\n📊 Overall Statistics:")?;
    writeln!(out, "   Total Trades Across All Runs: {}", total_trades)?;
    writeln!(out, "   Average Return: {:+.2}%", avg_return)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::ScriptedFeed;

    #[test]
    fn test_run_writes_two_lines_on_trade_ticks() {
        let feed = ScriptedFeed::new([100.0, 100.0, 100.0, 70.0]);
        let mut sim = TradingSimulator::new(3, feed, 1000.0).unwrap();
        let mut out = Vec::new();

        let summary = SimulationRunner::new(4).run(&mut sim, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], "Funds: $1000, Shares Owned: 0");
        assert_eq!(lines[3], "Buying 14 shares at 70");
        assert_eq!(lines[4], "Funds: $20, Shares Owned: 14");

        assert_eq!(summary.ticks_run, 4);
        assert_eq!(summary.buys, 1);
        assert_eq!(summary.trades.trades()[0].tick, 4);
        assert_eq!(summary.price_range, Some(PriceRange { min: 70.0, max: 100.0 }));
        assert_eq!(summary.final_equity, 1000.0);
        assert!(summary.halted.is_none());
    }

    #[test]
    fn test_run_halts_on_rejected_price() {
        let feed = ScriptedFeed::new([100.0, 99.0, -1.0, 98.0]);
        let mut sim = TradingSimulator::new(3, feed, 1000.0)
            .unwrap()
            .strict_prices(true);
        let mut out = Vec::new();

        let summary = SimulationRunner::new(4).run(&mut sim, &mut out).unwrap();

        assert_eq!(summary.ticks_run, 2);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
        assert!(summary.halted.unwrap().contains("tick 3"));
    }

    fn seeded_config(seed: u64, ticks: usize) -> SimConfig {
        SimConfig {
            seed: Some(seed),
            ticks,
            ..Default::default()
        }
    }

    #[test]
    fn test_json_output_is_only_the_summary() {
        let mut out = Vec::new();

        let results =
            run_configured(&seeded_config(7, 20), ReportFormat::Json, &mut out).unwrap();

        let parsed: RunSummary = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.ticks_run, 20);
        assert_eq!(parsed, results[0]);
    }

    #[test]
    fn test_json_batch_output_is_an_array() {
        let config = SimConfig {
            runs: 3,
            ..seeded_config(7, 20)
        };
        let mut out = Vec::new();

        run_configured(&config, ReportFormat::Json, &mut out).unwrap();

        let parsed: Vec<RunSummary> = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed.len(), 3);
        assert!(parsed.iter().all(|s| s.ticks_run == 20));
    }

    #[test]
    fn test_lines_output_matches_tick_protocol() {
        let mut out = Vec::new();

        run_configured(&seeded_config(42, 30), ReportFormat::Lines, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let status_lines = text.lines().filter(|l| l.starts_with("Funds: $")).count();
        assert_eq!(status_lines, 30);
        assert!(!text.contains("Summary"));
    }

    #[test]
    fn test_halted_run_prints_summary_without_flag() {
        let config = SimConfig {
            mean: -5.0,
            stddev: 0.1,
            initial_price: 10.0,
            strict_prices: true,
            ..seeded_config(1, 100)
        };
        let mut out = Vec::new();

        let results = run_configured(&config, ReportFormat::Lines, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(results[0].halted.is_some());
        assert!(text.contains("📊 Summary"));
        assert!(text.contains("Halted: tick"));
    }

    #[test]
    fn test_write_summary_and_comparison() {
        let feed = ScriptedFeed::new([100.0, 100.0, 100.0, 70.0, 130.0]);
        let mut sim = TradingSimulator::new(3, feed, 1000.0).unwrap();
        let summary = SimulationRunner::new(5).run(&mut sim, &mut io::sink()).unwrap();

        let mut out = Vec::new();
        write_summary(&mut out, &summary).unwrap();
        write_comparison(&mut out, &[summary.clone(), summary]).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Trades:         2 (1 buys, 1 sells)"));
        assert!(text.contains("Equity:         $1840.00 (+84.00%)"));
        assert!(text.contains("Worst Run: 1"));
        assert!(text.contains("Total Trades Across All Runs: 4"));
    }
}
