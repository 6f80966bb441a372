use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Option side. Serialized with the exchange's `CE`/`PE` codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum OptionSide {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
}

impl OptionSide {
    pub fn opposite(self) -> Self {
        match self {
            OptionSide::Call => OptionSide::Put,
            OptionSide::Put => OptionSide::Call,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            OptionSide::Call => "CE",
            OptionSide::Put => "PE",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Normalized quote for one leg (call or put) of a strike.
///
/// Fields the exchange left out are zero, so the scoring formula never
/// sees a missing value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegQuote {
    pub open_interest: u64,
    pub change_in_open_interest: i64,
    pub total_traded_volume: u64,
    pub implied_volatility: f64,
    pub last_price: f64,
    pub price_change: f64,
    pub price_change_percent: f64,
    pub delta: f64,
    pub gamma: f64,
}

/// One strike of the current expiry. At least one leg is always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrikeRecord {
    pub strike: f64,
    #[serde(rename = "CE", default, skip_serializing_if = "Option::is_none")]
    pub call: Option<LegQuote>,
    #[serde(rename = "PE", default, skip_serializing_if = "Option::is_none")]
    pub put: Option<LegQuote>,
}

impl StrikeRecord {
    pub fn leg(&self, side: OptionSide) -> Option<&LegQuote> {
        match side {
            OptionSide::Call => self.call.as_ref(),
            OptionSide::Put => self.put.as_ref(),
        }
    }

    pub fn call_oi(&self) -> u64 {
        self.call.as_ref().map_or(0, |l| l.open_interest)
    }

    pub fn put_oi(&self) -> u64 {
        self.put.as_ref().map_or(0, |l| l.open_interest)
    }

    pub fn call_volume(&self) -> u64 {
        self.call.as_ref().map_or(0, |l| l.total_traded_volume)
    }

    pub fn put_volume(&self) -> u64 {
        self.put.as_ref().map_or(0, |l| l.total_traded_volume)
    }
}

/// A single-expiry option chain for one symbol.
///
/// Strikes are kept sorted ascending and unique; the snapshot is never
/// mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainSnapshot {
    symbol: String,
    underlying_price: f64,
    expiry: String,
    strikes: Vec<StrikeRecord>,
}

impl ChainSnapshot {
    /// Build a snapshot, sorting strikes ascending. When a strike value
    /// repeats, the first occurrence is kept.
    pub fn new(
        symbol: impl Into<String>,
        underlying_price: f64,
        expiry: impl Into<String>,
        strikes: Vec<StrikeRecord>,
    ) -> Self {
        let mut strikes = strikes;
        // Stable sort keeps the first occurrence of a duplicate in front.
        strikes.sort_by(|a, b| a.strike.total_cmp(&b.strike));
        strikes.dedup_by(|later, earlier| later.strike == earlier.strike);
        Self {
            symbol: symbol.into(),
            underlying_price,
            expiry: expiry.into(),
            strikes,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn underlying_price(&self) -> f64 {
        self.underlying_price
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    /// All strikes, ascending.
    pub fn strikes(&self) -> &[StrikeRecord] {
        &self.strikes
    }

    pub fn is_empty(&self) -> bool {
        self.strikes.is_empty()
    }
}
