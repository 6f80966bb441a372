use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

use crate::model::signal::{MarketOverview, Signal};
use crate::runner::{RunReport, SkippedSymbol};

#[derive(Clone, Default)]
pub struct AppState {
    pub inner: Arc<RwLock<DashboardStore>>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Latest analysis per symbol plus a summary of the most recent run.
#[derive(Debug, Default)]
pub struct DashboardStore {
    pub symbols: BTreeMap<String, SymbolEntry>,
    pub last_run: Option<RunSummary>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolEntry {
    pub overview: MarketOverview,
    pub signal: Option<Signal>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub generated_at: DateTime<Utc>,
    pub analyzed: usize,
    pub signals: usize,
    pub skipped_count: usize,
    pub skipped: Vec<SkippedSymbol>,
}

impl DashboardStore {
    /// Merge a finished run into the store.
    ///
    /// Every analyzed symbol is replaced, including its signal slot, so a
    /// symbol that stopped signalling reads as "no signal". Symbols skipped
    /// in this run keep their previous entry and its older `updated_at`.
    /// Keys are uppercased to match `get`.
    pub fn apply(&mut self, report: &RunReport) {
        for overview in &report.overviews {
            let signal = report
                .signals
                .iter()
                .find(|s| s.symbol == overview.symbol)
                .cloned();
            self.symbols.insert(
                overview.symbol.to_ascii_uppercase(),
                SymbolEntry {
                    overview: overview.clone(),
                    signal,
                    updated_at: report.generated_at,
                },
            );
        }

        self.last_run = Some(RunSummary {
            generated_at: report.generated_at,
            analyzed: report.overviews.len(),
            signals: report.signals.len(),
            skipped_count: report.skipped_count(),
            skipped: report.skipped.clone(),
        });
    }

    pub fn get(&self, symbol: &str) -> Option<&SymbolEntry> {
        self.symbols.get(&symbol.to_ascii_uppercase())
    }

    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.symbols.values().filter_map(|e| e.signal.as_ref())
    }

    pub fn overviews(&self) -> impl Iterator<Item = &MarketOverview> {
        self.symbols.values().map(|e| &e.overview)
    }
}
