use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::EngineConfig;
use crate::engine::{self, Analysis};
use crate::fetch::ChainSource;
use crate::model::raw::RawSnapshot;
use crate::model::round::round2;
use crate::model::signal::{MarketOverview, Signal};

/// Pipeline stage at which a symbol dropped out of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipStage {
    Fetch,
    Analysis,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkippedSymbol {
    pub symbol: String,
    pub stage: SkipStage,
    pub reason: String,
}

/// Output of one analysis run across all requested symbols.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub generated_at: DateTime<Utc>,
    /// One per symbol that produced a directional signal, in symbol order.
    pub signals: Vec<Signal>,
    /// One per symbol that was analyzed, in symbol order.
    pub overviews: Vec<MarketOverview>,
    pub skipped: Vec<SkippedSymbol>,
}

impl RunReport {
    pub fn new(generated_at: DateTime<Utc>) -> Self {
        Self {
            generated_at,
            signals: Vec::new(),
            overviews: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn ranked_signals(&self) -> Vec<&Signal> {
        rank_signals(&self.signals)
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }

    fn record(&mut self, analysis: Analysis) {
        self.overviews.push(analysis.overview);
        if let Some(signal) = analysis.signal {
            self.signals.push(signal);
        }
    }

    fn skip(&mut self, symbol: &str, stage: SkipStage, reason: String) {
        warn!(symbol, ?stage, %reason, "skipping symbol");
        self.skipped.push(SkippedSymbol {
            symbol: symbol.to_string(),
            stage,
            reason,
        });
    }
}

/// Strong signals first, then by chain-wide PCR, highest first.
pub fn rank_signals<'a>(signals: impl IntoIterator<Item = &'a Signal>) -> Vec<&'a Signal> {
    let mut ranked: Vec<&Signal> = signals.into_iter().collect();
    ranked.sort_by(|a, b| {
        b.label.strength().cmp(&a.label.strength()).then(
            b.metrics
                .pcr_open_interest
                .total_cmp(&a.metrics.pcr_open_interest),
        )
    });
    ranked
}

/// Fetch every symbol, then analyze the snapshots that arrived.
///
/// Fetches run one after another so the source can pace itself; analysis
/// of the fetched set runs in parallel on the blocking pool. A failing
/// symbol never stops the run.
pub async fn run_once(
    source: &dyn ChainSource,
    symbols: &[String],
    config: &EngineConfig,
) -> RunReport {
    let mut report = RunReport::new(Utc::now());
    let mut fetched: Vec<(String, RawSnapshot)> = Vec::with_capacity(symbols.len());

    info!(source = source.name(), symbols = symbols.len(), "starting analysis run");
    for symbol in symbols {
        match source.fetch_option_chain(symbol).await {
            Ok(raw) => fetched.push((symbol.clone(), raw)),
            Err(e) => report.skip(symbol, SkipStage::Fetch, e.to_string()),
        }
    }

    // Rayon work stays off the async workers.
    let batch_config = config.clone();
    let analyzed = tokio::task::spawn_blocking(move || {
        let results = engine::analyze_batch(&fetched, &batch_config);
        (fetched, results)
    })
    .await;
    let (fetched, results) = match analyzed {
        Ok(pair) => pair,
        Err(e) => {
            warn!(error = %e, "analysis task failed");
            for symbol in symbols {
                if !report.skipped.iter().any(|s| &s.symbol == symbol) {
                    report.skip(symbol, SkipStage::Analysis, format!("analysis task failed: {e}"));
                }
            }
            return report;
        }
    };

    for ((symbol, _), result) in fetched.iter().zip(results) {
        match result {
            Ok(analysis) => {
                info!(
                    symbol = symbol.as_str(),
                    price = analysis.overview.underlying_price,
                    pcr = round2(analysis.overview.pcr_open_interest),
                    oi_ratio = round2(analysis.overview.window_oi_ratio),
                    signal = analysis
                        .signal
                        .as_ref()
                        .map_or("none", |s| s.label.as_str()),
                    "analyzed"
                );
                report.record(analysis);
            }
            Err(e) => report.skip(symbol, SkipStage::Analysis, e.to_string()),
        }
    }

    info!(
        signals = report.signals.len(),
        analyzed = report.overviews.len(),
        skipped = report.skipped_count(),
        "analysis run complete"
    );
    report
}
