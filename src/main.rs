use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use option_signals::{example, schema};

mod analyze;
mod cli;
mod serve;

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = cli::Cli::parse();

    match cli.command {
        cli::Command::Analyze {
            symbols,
            input_dir,
            config,
            radius,
            output_dir,
            json,
            no_write,
        } => {
            let report = analyze::run(analyze::AnalyzeArgs {
                symbols,
                input_dir,
                config,
                radius,
                output_dir,
                json,
                no_write,
            })?;
            if report.signals.is_empty() {
                return Ok(ExitCode::FAILURE);
            }
        }
        cli::Command::Serve {
            host,
            port,
            config,
            input_dir,
            refresh_secs,
        } => serve::run(serve::ServeArgs {
            host,
            port,
            config,
            input_dir,
            refresh_secs,
        })?,
        cli::Command::Schema { kind } => schema::run(kind)?,
        cli::Command::Example { kind } => example::run(kind)?,
    }

    Ok(ExitCode::SUCCESS)
}
