//! Signal decision engine: normalize → window → metrics → classify.
//!
//! Every stage is a pure, synchronous function of its inputs. Nothing is
//! kept between calls, so symbols can be analyzed in any order or in
//! parallel.

pub mod classifier;
pub mod metrics;
pub mod normalize;
pub mod scorer;
pub mod window;

use thiserror::Error;

use crate::config::EngineConfig;
use crate::model::chain::ChainSnapshot;
use crate::model::raw::RawSnapshot;
use crate::model::signal::{MarketOverview, SentimentLabel, Signal};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("malformed snapshot for {symbol}: {reason}")]
    MalformedSnapshot { symbol: String, reason: String },

    #[error("no strikes left for {symbol} after filtering")]
    EmptyChain { symbol: String },
}

impl EngineError {
    pub fn malformed(symbol: &str, reason: impl Into<String>) -> Self {
        EngineError::MalformedSnapshot {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result of analyzing one symbol: always an overview, a signal only when
/// the classifier found a direction and a strike.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub overview: MarketOverview,
    pub signal: Option<Signal>,
}

/// Run the full pipeline on a raw payload.
pub fn analyze(
    symbol: &str,
    raw: &RawSnapshot,
    config: &EngineConfig,
) -> Result<Analysis, EngineError> {
    let snapshot = normalize::normalize(symbol, raw)?;
    analyze_snapshot(&snapshot, config)
}

/// Run window selection, metrics and classification on a normalized chain.
pub fn analyze_snapshot(
    snapshot: &ChainSnapshot,
    config: &EngineConfig,
) -> Result<Analysis, EngineError> {
    let window = window::select(snapshot, config.radius)?;
    let aggregate = metrics::compute(snapshot, &window);

    let overview = MarketOverview {
        symbol: snapshot.symbol().to_string(),
        underlying_price: snapshot.underlying_price(),
        atm_strike: window.atm_strike(),
        window_size: window.len(),
        pcr_open_interest: aggregate.pcr_open_interest,
        window_oi_ratio: aggregate.window_oi_ratio,
        sentiment_label: SentimentLabel::from_pcr(aggregate.pcr_open_interest),
        expiry: snapshot.expiry().to_string(),
        pcr_volume: aggregate.pcr_volume,
        levels: metrics::oi_levels(snapshot),
        iv_skew: metrics::iv_skew(&window, &config.indicators),
        activity: metrics::volume_oi_activity(snapshot, &config.indicators),
    };

    let signal = classifier::classify(snapshot, &window, &aggregate, config);

    Ok(Analysis { overview, signal })
}

/// Analyze many payloads in parallel. Output order matches input order.
#[cfg(feature = "full")]
pub fn analyze_batch(
    inputs: &[(String, RawSnapshot)],
    config: &EngineConfig,
) -> Vec<Result<Analysis, EngineError>> {
    use rayon::prelude::*;

    inputs
        .par_iter()
        .map(|(symbol, raw)| analyze(symbol, raw, config))
        .collect()
}
