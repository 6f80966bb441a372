use tracing::{debug, warn};

use crate::model::chain::{ChainSnapshot, LegQuote, StrikeRecord};
use crate::model::raw::{RawLeg, RawSnapshot, RawStrikeEntry};

use super::EngineError;

/// Flatten a raw payload into a single-expiry `ChainSnapshot`.
///
/// The first listed expiry is the current one; rows for any other expiry
/// are discarded. Rows without a usable strike or without any leg are
/// dropped.
pub fn normalize(symbol: &str, raw: &RawSnapshot) -> Result<ChainSnapshot, EngineError> {
    let underlying_price = raw
        .underlying_value()
        .ok_or_else(|| EngineError::malformed(symbol, "missing underlying price"))?;
    if !(underlying_price.is_finite() && underlying_price > 0.0) {
        return Err(EngineError::malformed(
            symbol,
            format!("underlying price must be positive, got {underlying_price}"),
        ));
    }

    let expiry = raw
        .expiry_dates()
        .first()
        .ok_or_else(|| EngineError::malformed(symbol, "no expiry dates listed"))?;

    let current: Vec<&RawStrikeEntry> = raw
        .entries()
        .iter()
        .filter(|e| e.expiry_date.as_deref() == Some(expiry.as_str()))
        .collect();
    if current.is_empty() {
        return Err(EngineError::malformed(
            symbol,
            format!("no strike entries for expiry {expiry}"),
        ));
    }

    let mut records = Vec::with_capacity(current.len());
    for entry in current {
        match to_record(entry) {
            Some(record) => records.push(record),
            None => debug!(symbol, ?entry.strike_price, "dropping strike row without strike or legs"),
        }
    }

    if records.is_empty() {
        return Err(EngineError::EmptyChain {
            symbol: symbol.to_string(),
        });
    }

    let rows = records.len();
    let snapshot = ChainSnapshot::new(symbol, underlying_price, expiry.as_str(), records);
    if snapshot.strikes().len() < rows {
        warn!(
            symbol,
            expiry = expiry.as_str(),
            duplicates = rows - snapshot.strikes().len(),
            "duplicate strikes in snapshot, kept first occurrence"
        );
    }
    Ok(snapshot)
}

fn to_record(entry: &RawStrikeEntry) -> Option<StrikeRecord> {
    let strike = entry.strike_price.filter(|s| s.is_finite() && *s > 0.0)?;
    let call = entry.call.as_ref().map(to_leg);
    let put = entry.put.as_ref().map(to_leg);
    if call.is_none() && put.is_none() {
        return None;
    }
    Some(StrikeRecord { strike, call, put })
}

fn to_leg(raw: &RawLeg) -> LegQuote {
    LegQuote {
        open_interest: count(raw.open_interest),
        change_in_open_interest: signed(raw.change_in_open_interest),
        total_traded_volume: count(raw.total_traded_volume),
        implied_volatility: float(raw.implied_volatility).max(0.0),
        last_price: float(raw.last_price),
        price_change: float(raw.price_change),
        price_change_percent: float(raw.price_change_percent),
        delta: float(raw.delta),
        gamma: float(raw.gamma),
    }
}

fn float(v: Option<f64>) -> f64 {
    v.filter(|x| x.is_finite()).unwrap_or(0.0)
}

fn count(v: Option<f64>) -> u64 {
    float(v).max(0.0).round() as u64
}

fn signed(v: Option<f64>) -> i64 {
    float(v).round() as i64
}
