use std::path::PathBuf;

use anyhow::{Context, Result};

use option_signals::config::AppConfig;
use option_signals::fetch::source_for;
use option_signals::report;
use option_signals::runner::{RunReport, run_once};

pub struct AnalyzeArgs {
    pub symbols: Option<Vec<String>>,
    pub input_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub radius: Option<usize>,
    pub output_dir: Option<PathBuf>,
    pub json: bool,
    pub no_write: bool,
}

/// One batch run. Returns the report so the caller can pick an exit code.
pub fn run(args: AnalyzeArgs) -> Result<RunReport> {
    let mut config = AppConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(symbols) = args.symbols {
        config.symbols = symbols
            .into_iter()
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();
    }
    if let Some(radius) = args.radius {
        config.engine.radius = radius;
    }
    if config.symbols.is_empty() {
        anyhow::bail!("no symbols to analyze");
    }

    let source = source_for(args.input_dir.as_deref(), &config.fetch)
        .context("creating option-chain source")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    let report = rt.block_on(run_once(source.as_ref(), &config.symbols, &config.engine));

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serializing run report")?;
        println!("{json}");
    } else {
        report::print_overview(&report);
        report::print_signals(&report);
    }

    if !args.no_write {
        let dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
        let written = report::write_reports(&report, &dir)?;
        if !args.json {
            println!("\n  Wrote {} file(s) to {}", written.len(), dir.display());
        }
    }

    Ok(report)
}
