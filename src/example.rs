use crate::config::AppConfig;
use crate::model::raw::{RawLeg, RawRecords, RawSnapshot, RawStrikeEntry};
use crate::schema::DocumentKind;

const EXAMPLE_EXPIRY: &str = "25-Apr-2024";
const EXAMPLE_SPOT: f64 = 22_150.5;

/// A put-heavy NIFTY chain of eleven strikes around the spot. Run through
/// the engine with default settings it yields a STRONG_BUY on a call.
pub fn snapshot() -> RawSnapshot {
    let data = (0..11u32)
        .map(|i| {
            let strike = 21_900.0 + 50.0 * f64::from(i);
            let i = f64::from(i);
            RawStrikeEntry {
                strike_price: Some(strike),
                expiry_date: Some(EXAMPLE_EXPIRY.into()),
                call: Some(RawLeg {
                    open_interest: Some(50_000.0 + 5_000.0 * i),
                    change_in_open_interest: Some(1_200.0 - 200.0 * i),
                    total_traded_volume: Some(3_000.0 - 150.0 * i),
                    implied_volatility: Some(12.0 + 0.3 * i),
                    last_price: Some((EXAMPLE_SPOT - strike).max(0.0) + 80.0 - 4.0 * i),
                    price_change: Some(9.0 - 1.5 * i),
                    price_change_percent: Some(4.5 - 0.8 * i),
                    ..Default::default()
                }),
                put: Some(RawLeg {
                    open_interest: Some(150_000.0 - 5_000.0 * i),
                    change_in_open_interest: Some(2_500.0 - 150.0 * i),
                    total_traded_volume: Some(1_500.0 + 120.0 * i),
                    implied_volatility: Some(14.5 - 0.2 * i),
                    last_price: Some((strike - EXAMPLE_SPOT).max(0.0) + 40.0 + 3.0 * i),
                    price_change: Some(-6.0 + 0.5 * i),
                    price_change_percent: Some(-3.0 + 0.4 * i),
                    ..Default::default()
                }),
            }
        })
        .collect();

    RawSnapshot {
        records: Some(RawRecords {
            underlying_value: Some(EXAMPLE_SPOT),
            expiry_dates: vec![EXAMPLE_EXPIRY.into(), "02-May-2024".into()],
            timestamp: Some("19-Apr-2024 15:30:00".into()),
            data,
        }),
        filtered: None,
        data: Vec::new(),
    }
}

pub fn config() -> AppConfig {
    AppConfig {
        symbols: vec!["NIFTY".into(), "BANKNIFTY".into(), "RELIANCE".into()],
        ..AppConfig::default()
    }
}

/// Print an example document as JSON to stdout.
pub fn run(kind: DocumentKind) -> anyhow::Result<()> {
    let json = match kind {
        DocumentKind::Snapshot => serde_json::to_string_pretty(&snapshot())?,
        DocumentKind::Config => serde_json::to_string_pretty(&config())?,
    };
    println!("{json}");
    Ok(())
}
