use serde::Serialize;

use crate::model::round::round2;
use crate::model::signal::{MarketOverview, Signal};

/// Flat, CSV-friendly view of a `Signal`. Ratios and prices are rounded
/// to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalRow {
    pub symbol: String,
    pub signal: String,
    pub option_side: String,
    pub strike: f64,
    pub score: f64,
    pub distance_from_atm: usize,
    pub underlying_price: f64,
    pub expiry: String,
    pub pcr_open_interest: f64,
    pub pcr_volume: f64,
    pub window_oi_ratio: f64,
    pub open_interest: u64,
    pub change_in_open_interest: i64,
    pub total_traded_volume: u64,
    pub implied_volatility: f64,
    pub last_price: f64,
    pub price_change_percent: f64,
    pub fallback: bool,
    pub selection_reason: String,
    pub reason: String,
    pub timestamp: String,
}

impl SignalRow {
    pub fn new(signal: &Signal, timestamp: &str) -> Self {
        let c = &signal.candidate;
        Self {
            symbol: signal.symbol.clone(),
            signal: signal.label.to_string(),
            option_side: signal.option_side.to_string(),
            strike: c.strike,
            score: round2(c.score),
            distance_from_atm: c.distance_from_atm,
            underlying_price: round2(signal.underlying_price),
            expiry: signal.expiry.clone(),
            pcr_open_interest: round2(signal.metrics.pcr_open_interest),
            pcr_volume: round2(signal.metrics.pcr_volume),
            window_oi_ratio: round2(signal.metrics.window_oi_ratio),
            open_interest: c.quote.open_interest,
            change_in_open_interest: c.quote.change_in_open_interest,
            total_traded_volume: c.quote.total_traded_volume,
            implied_volatility: round2(c.quote.implied_volatility),
            last_price: round2(c.quote.last_price),
            price_change_percent: round2(c.quote.price_change_percent),
            fallback: signal.is_fallback(),
            selection_reason: c.reason_summary(),
            reason: signal.reason_text.clone(),
            timestamp: timestamp.to_string(),
        }
    }
}

/// Flat view of a `MarketOverview`; strike lists are `|`-joined.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewRow {
    pub symbol: String,
    pub underlying_price: f64,
    pub atm_strike: f64,
    pub window_size: usize,
    pub pcr_open_interest: f64,
    pub window_oi_ratio: f64,
    pub sentiment_label: String,
    pub expiry: String,
    pub pcr_volume: f64,
    pub max_pain: Option<f64>,
    pub max_oi_strike: Option<f64>,
    pub support: String,
    pub resistance: String,
    pub atm_iv: Option<f64>,
    pub put_skew: Option<f64>,
    pub call_skew: Option<f64>,
    pub skew_mood: String,
    pub avg_call_vol_oi: f64,
    pub avg_put_vol_oi: f64,
    pub activity_mood: String,
    pub high_activity_calls: String,
    pub high_activity_puts: String,
    pub timestamp: String,
}

impl OverviewRow {
    pub fn new(overview: &MarketOverview, timestamp: &str) -> Self {
        let skew = overview.iv_skew;
        let activity = &overview.activity;
        Self {
            symbol: overview.symbol.clone(),
            underlying_price: round2(overview.underlying_price),
            atm_strike: overview.atm_strike,
            window_size: overview.window_size,
            pcr_open_interest: round2(overview.pcr_open_interest),
            window_oi_ratio: round2(overview.window_oi_ratio),
            sentiment_label: overview.sentiment_label.to_string(),
            expiry: overview.expiry.clone(),
            pcr_volume: round2(overview.pcr_volume),
            max_pain: overview.levels.max_pain,
            max_oi_strike: overview.levels.max_oi_strike,
            support: join_strikes(&overview.levels.support),
            resistance: join_strikes(&overview.levels.resistance),
            atm_iv: skew.map(|s| round2(s.atm_iv)),
            put_skew: skew.map(|s| round2(s.put_skew)),
            call_skew: skew.map(|s| round2(s.call_skew)),
            skew_mood: skew.map(|s| label(&s.mood)).unwrap_or_default(),
            avg_call_vol_oi: round2(activity.avg_call_ratio),
            avg_put_vol_oi: round2(activity.avg_put_ratio),
            activity_mood: label(&activity.mood),
            high_activity_calls: join_strikes(&activity.high_activity_calls),
            high_activity_puts: join_strikes(&activity.high_activity_puts),
            timestamp: timestamp.to_string(),
        }
    }
}

fn join_strikes(strikes: &[f64]) -> String {
    strikes
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("|")
}

/// Serialized name of a unit enum variant, e.g. `high_momentum`.
fn label<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(s)) => s,
        _ => String::new(),
    }
}
