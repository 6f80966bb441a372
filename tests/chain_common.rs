//! Shared option-chain builders for the integration tests.
#![allow(dead_code)]

use option_signals::model::raw::{RawLeg, RawRecords, RawSnapshot, RawStrikeEntry};
use option_signals::model::{ChainSnapshot, LegQuote, StrikeRecord};

pub const EXPIRY: &str = "25-Apr-2024";
pub const NEXT_EXPIRY: &str = "02-May-2024";

/// A quote block with OI only.
pub fn oi_leg(oi: f64) -> RawLeg {
    RawLeg {
        open_interest: Some(oi),
        ..Default::default()
    }
}

pub fn leg(oi: f64, coi: f64, volume: f64, iv: f64, p_change: f64) -> RawLeg {
    RawLeg {
        open_interest: Some(oi),
        change_in_open_interest: Some(coi),
        total_traded_volume: Some(volume),
        implied_volatility: Some(iv),
        last_price: Some(10.0),
        price_change: Some(p_change / 10.0),
        price_change_percent: Some(p_change),
        ..Default::default()
    }
}

pub fn entry(strike: f64, call: Option<RawLeg>, put: Option<RawLeg>) -> RawStrikeEntry {
    RawStrikeEntry {
        strike_price: Some(strike),
        expiry_date: Some(EXPIRY.into()),
        call,
        put,
    }
}

pub fn raw_snapshot(price: f64, entries: Vec<RawStrikeEntry>) -> RawSnapshot {
    RawSnapshot {
        records: Some(RawRecords {
            underlying_value: Some(price),
            expiry_dates: vec![EXPIRY.into(), NEXT_EXPIRY.into()],
            timestamp: None,
            data: entries,
        }),
        filtered: None,
        data: Vec::new(),
    }
}

/// Strikes 100, 110, ..., 200 with the same call and put OI on every row.
pub fn ladder(price: f64, call_oi: f64, put_oi: f64) -> RawSnapshot {
    let entries = strikes()
        .map(|k| entry(k, Some(oi_leg(call_oi)), Some(oi_leg(put_oi))))
        .collect();
    raw_snapshot(price, entries)
}

pub fn strikes() -> impl Iterator<Item = f64> {
    (0..11).map(|i| 100.0 + 10.0 * f64::from(i))
}

pub fn quote(oi: u64, coi: i64, volume: u64, iv: f64, p_change: f64) -> LegQuote {
    LegQuote {
        open_interest: oi,
        change_in_open_interest: coi,
        total_traded_volume: volume,
        implied_volatility: iv,
        price_change_percent: p_change,
        ..Default::default()
    }
}

pub fn record(strike: f64, call: Option<LegQuote>, put: Option<LegQuote>) -> StrikeRecord {
    StrikeRecord { strike, call, put }
}

pub fn chain(price: f64, records: Vec<StrikeRecord>) -> ChainSnapshot {
    ChainSnapshot::new("TEST", price, EXPIRY, records)
}
