use std::path::PathBuf;

use anyhow::{Context, Result};

use option_signals::api;
use option_signals::config::AppConfig;
use option_signals::fetch::source_for;

pub struct ServeArgs {
    pub host: String,
    pub port: u16,
    pub config: Option<PathBuf>,
    pub input_dir: Option<PathBuf>,
    pub refresh_secs: Option<u64>,
}

pub fn run(args: ServeArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref()).context("loading config")?;
    if let Some(secs) = args.refresh_secs {
        config.refresh_interval_secs = secs.max(1);
    }

    let source = source_for(args.input_dir.as_deref(), &config.fetch)
        .context("creating option-chain source")?;

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(api::serve(&args.host, args.port, config, source))
}
