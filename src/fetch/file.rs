use std::path::PathBuf;

use async_trait::async_trait;
use tracing::debug;

use crate::model::raw::RawSnapshot;

use super::{ChainSource, FetchError};

/// Offline source reading saved payloads from `<dir>/<SYMBOL>.json`.
pub struct FileSource {
    dir: PathBuf,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, symbol: &str) -> PathBuf {
        self.dir.join(format!("{symbol}.json"))
    }
}

#[async_trait]
impl ChainSource for FileSource {
    async fn fetch_option_chain(&self, symbol: &str) -> Result<RawSnapshot, FetchError> {
        let path = self.path_for(symbol);
        if !path.exists() {
            return Err(FetchError::NotFound {
                symbol: symbol.to_string(),
            });
        }

        let contents = std::fs::read_to_string(&path).map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(symbol, path = %path.display(), "loaded snapshot from disk");

        serde_json::from_str(&contents).map_err(|source| FetchError::Decode {
            symbol: symbol.to_string(),
            source,
        })
    }

    fn name(&self) -> &'static str {
        "file"
    }
}
