pub mod rows;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::runner::RunReport;

use rows::{OverviewRow, SignalRow};

pub const LATEST_SIGNALS_FILE: &str = "latest_signals.csv";
pub const OVERVIEW_FILE: &str = "market_overview.csv";
pub const LATEST_RUN_FILE: &str = "latest_run.json";

/// Human-readable timestamp stamped on every row of a run.
pub fn run_timestamp(report: &RunReport) -> String {
    report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Signal rows in ranked order.
pub fn signal_rows(report: &RunReport) -> Vec<SignalRow> {
    let ts = run_timestamp(report);
    report
        .ranked_signals()
        .into_iter()
        .map(|s| SignalRow::new(s, &ts))
        .collect()
}

pub fn overview_rows(report: &RunReport) -> Vec<OverviewRow> {
    let ts = run_timestamp(report);
    report
        .overviews
        .iter()
        .map(|o| OverviewRow::new(o, &ts))
        .collect()
}

// ── Console ─────────────────────────────────────────────────────────

pub fn print_signals(report: &RunReport) {
    let rows = signal_rows(report);
    println!("\n{}", "═".repeat(118));
    println!("  Option Buying Signals");
    println!("{}", "═".repeat(118));
    if rows.is_empty() {
        println!("  No trading signals generated");
        println!("{}", "═".repeat(118));
        return;
    }
    println!(
        "  {:<12} {:<12} {:<4} {:>10} {:>7} {:>10} {:>6} {:>6} {:>5}  {}",
        "Symbol", "Signal", "Side", "Strike", "Score", "Spot", "PCR", "OIR", "FB", "Selection",
    );
    println!("  {}", "-".repeat(112));
    for r in &rows {
        println!(
            "  {:<12} {:<12} {:<4} {:>10.2} {:>7.2} {:>10.2} {:>6.2} {:>6.2} {:>5}  {}",
            r.symbol,
            r.signal,
            r.option_side,
            r.strike,
            r.score,
            r.underlying_price,
            r.pcr_open_interest,
            r.window_oi_ratio,
            if r.fallback { "yes" } else { "" },
            r.selection_reason,
        );
    }
    println!("{}", "═".repeat(118));
}

pub fn print_overview(report: &RunReport) {
    let rows = overview_rows(report);
    println!("\n{}", "═".repeat(110));
    println!("  Market Overview");
    println!("{}", "═".repeat(110));
    println!(
        "  {:<12} {:>10} {:>10} {:>4} {:>6} {:>6} {:<13} {:>10} {:<8} {:<12}",
        "Symbol", "Spot", "ATM", "Win", "PCR", "OIR", "Sentiment", "MaxPain", "Skew", "Expiry",
    );
    println!("  {}", "-".repeat(104));
    for r in &rows {
        let max_pain = r.max_pain.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".into());
        println!(
            "  {:<12} {:>10.2} {:>10.2} {:>4} {:>6.2} {:>6.2} {:<13} {:>10} {:<8} {:<12}",
            r.symbol,
            r.underlying_price,
            r.atm_strike,
            r.window_size,
            r.pcr_open_interest,
            r.window_oi_ratio,
            r.sentiment_label,
            max_pain,
            if r.skew_mood.is_empty() { "-" } else { r.skew_mood.as_str() },
            r.expiry,
        );
    }
    println!("{}", "═".repeat(110));
    if !report.skipped.is_empty() {
        println!("  Skipped {} symbol(s):", report.skipped_count());
        for s in &report.skipped {
            println!("    {} ({:?}): {}", s.symbol, s.stage, s.reason);
        }
    }
}

// ── Files ───────────────────────────────────────────────────────────

/// Write the run's CSV and JSON artifacts to `dir`, returning the paths
/// written.
///
/// Signal CSVs are only written when the run produced signals, so
/// `latest_signals.csv` keeps the last non-empty result.
pub fn write_reports(report: &RunReport, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    let mut written = Vec::new();

    let signals = signal_rows(report);
    if !signals.is_empty() {
        let stamp = report.generated_at.format("%Y%m%d_%H%M%S");
        let dated = dir.join(format!("signals_{stamp}.csv"));
        write_csv(&dated, &signals)?;
        written.push(dated);

        let latest = dir.join(LATEST_SIGNALS_FILE);
        write_csv(&latest, &signals)?;
        written.push(latest);
    }

    let overview = overview_rows(report);
    if !overview.is_empty() {
        let path = dir.join(OVERVIEW_FILE);
        write_csv(&path, &overview)?;
        written.push(path);
    }

    let json_path = dir.join(LATEST_RUN_FILE);
    let json = serde_json::to_string_pretty(report).context("serializing run report")?;
    std::fs::write(&json_path, json)
        .with_context(|| format!("writing {}", json_path.display()))?;
    written.push(json_path);

    for path in &written {
        info!(path = %path.display(), "wrote report");
    }
    Ok(written)
}

fn write_csv<T: serde::Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("writing CSV row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing CSV file {}", path.display()))?;
    Ok(())
}
