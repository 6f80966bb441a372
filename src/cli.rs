use clap::{Parser, Subcommand};
use std::path::PathBuf;

use option_signals::schema::DocumentKind;

/// Option-chain signal engine: turn exchange option-chain snapshots into
/// directional buy/sell signals with a recommended strike.
#[derive(Parser)]
#[command(name = "option-signals", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run one analysis pass over a set of symbols
    Analyze {
        /// Comma-separated symbols (default: configured symbol list)
        #[arg(long, value_delimiter = ',')]
        symbols: Option<Vec<String>>,

        /// Read `<SYMBOL>.json` snapshots from this directory instead of the live API
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Path to a JSON config file (falls back to $OPTION_SIGNALS_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Strikes on each side of ATM to include in the window
        #[arg(long)]
        radius: Option<usize>,

        /// Directory for CSV/JSON reports (default: configured output_dir)
        #[arg(long)]
        output_dir: Option<PathBuf>,

        /// Print the run report as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Skip writing report files
        #[arg(long)]
        no_write: bool,
    },

    /// Serve the dashboard API with periodic background refresh
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(long, default_value = "5000")]
        port: u16,

        /// Path to a JSON config file (falls back to $OPTION_SIGNALS_CONFIG)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Read `<SYMBOL>.json` snapshots from this directory instead of the live API
        #[arg(long)]
        input_dir: Option<PathBuf>,

        /// Seconds between refresh runs (default: configured interval)
        #[arg(long)]
        refresh_secs: Option<u64>,
    },

    /// Output the JSON schema for a snapshot or config document
    Schema {
        #[arg(long, value_enum, default_value_t = DocumentKind::Snapshot)]
        kind: DocumentKind,
    },

    /// Output an example snapshot or config document to stdout
    Example {
        #[arg(long, value_enum, default_value_t = DocumentKind::Snapshot)]
        kind: DocumentKind,
    },
}
