//! Data-fetch collaborators. The engine only sees `RawSnapshot`s; session
//! handling, pacing and retries all live here.

pub mod file;
pub mod nse;
pub mod rate_limit;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::FetchSettings;
use crate::model::raw::RawSnapshot;

pub use file::FileSource;
pub use nse::NseClient;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for {symbol}")]
    Status { symbol: String, status: u16 },

    #[error("unauthorized for {symbol} after refreshing the session")]
    Unauthorized { symbol: String },

    #[error("invalid JSON for {symbol}: {source}")]
    Decode {
        symbol: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no snapshot available for {symbol}")]
    NotFound { symbol: String },
}

/// Anything that can produce a raw option-chain snapshot for a symbol.
///
/// Failures are per-symbol and transient: callers skip the symbol and
/// carry on with the rest of the run.
#[async_trait]
pub trait ChainSource: Send + Sync {
    async fn fetch_option_chain(&self, symbol: &str) -> Result<RawSnapshot, FetchError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

/// Exponential backoff: 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> std::time::Duration {
    std::time::Duration::from_millis(1000 * 2u64.pow(attempt.min(6)))
}

/// Offline file source when `input_dir` is given, live NSE client otherwise.
pub fn source_for(
    input_dir: Option<&Path>,
    settings: &FetchSettings,
) -> Result<Arc<dyn ChainSource>, FetchError> {
    let source: Arc<dyn ChainSource> = match input_dir {
        Some(dir) => Arc::new(FileSource::new(dir)),
        None => Arc::new(NseClient::new(settings.clone())?),
    };
    Ok(source)
}
