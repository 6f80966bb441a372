use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Option-chain payload as served by the exchange API.
///
/// Every field is optional on the wire; the normalizer decides what is
/// actually required. Field names follow the NSE JSON layout:
///
/// ```json
/// {
///   "records":  { "underlyingValue": 22150.5, "expiryDates": ["25-Apr-2024"], "data": [..] },
///   "filtered": { "data": [..] }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records: Option<RawRecords>,
    /// Current-expiry subset pre-filtered by the exchange.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filtered: Option<RawFiltered>,
    /// Some mirrors flatten the strike list to the top level.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<RawStrikeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawRecords {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying_value: Option<f64>,
    /// Expiry dates, nearest first.
    #[serde(default)]
    pub expiry_dates: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub data: Vec<RawStrikeEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawFiltered {
    #[serde(default)]
    pub data: Vec<RawStrikeEntry>,
}

/// One strike/expiry row with optional call (`CE`) and put (`PE`) blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawStrikeEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strike_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<String>,
    #[serde(rename = "CE", default, skip_serializing_if = "Option::is_none")]
    pub call: Option<RawLeg>,
    #[serde(rename = "PE", default, skip_serializing_if = "Option::is_none")]
    pub put: Option<RawLeg>,
}

/// Quote block for a single call or put.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
    #[serde(
        rename = "changeinOpenInterest",
        alias = "changeInOpenInterest",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub change_in_open_interest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_traded_volume: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_volatility: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_price: Option<f64>,
    #[serde(
        rename = "change",
        alias = "priceChange",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub price_change: Option<f64>,
    #[serde(
        rename = "pChange",
        alias = "priceChangePercent",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub price_change_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gamma: Option<f64>,
}

impl RawSnapshot {
    pub fn underlying_value(&self) -> Option<f64> {
        self.records.as_ref().and_then(|r| r.underlying_value)
    }

    pub fn expiry_dates(&self) -> &[String] {
        self.records
            .as_ref()
            .map(|r| r.expiry_dates.as_slice())
            .unwrap_or_default()
    }

    /// Strike rows to normalize: the exchange's filtered view when present,
    /// otherwise the full record list, otherwise the flattened top level.
    pub fn entries(&self) -> &[RawStrikeEntry] {
        if let Some(filtered) = self.filtered.as_ref().filter(|f| !f.data.is_empty()) {
            return &filtered.data;
        }
        if let Some(records) = self.records.as_ref().filter(|r| !r.data.is_empty()) {
            return &records.data;
        }
        &self.data
    }
}
