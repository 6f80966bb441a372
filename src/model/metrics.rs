use serde::{Deserialize, Serialize};

use super::chain::OptionSide;
use super::round::serialize_round2;

/// Open-interest and volume ratios for one snapshot.
///
/// `pcr_*` cover the whole filtered chain; `window_oi_ratio` only the ATM
/// window. Values keep full precision and are rounded when serialized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    #[serde(serialize_with = "serialize_round2")]
    pub pcr_open_interest: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub pcr_volume: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub window_oi_ratio: f64,
    pub total_call_oi: u64,
    pub total_put_oi: u64,
    pub total_call_volume: u64,
    pub total_put_volume: u64,
    pub window_call_oi: u64,
    pub window_put_oi: u64,
}

/// Strikes where open interest concentrates across the whole chain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OiLevels {
    /// Highest call-OI strikes, strongest first.
    pub resistance: Vec<f64>,
    /// Highest put-OI strikes, strongest first.
    pub support: Vec<f64>,
    pub max_oi_strike: Option<f64>,
    /// Strike at which option writers pay out the least at expiry.
    pub max_pain: Option<f64>,
}

// ── IV skew ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkewMood {
    Fear,
    Greed,
    Neutral,
}

/// OTM implied volatility relative to ATM, in percent of ATM IV.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IvSkew {
    #[serde(serialize_with = "serialize_round2")]
    pub atm_iv: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub put_skew: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub call_skew: f64,
    /// Side whose OTM wing is richer.
    pub direction: OptionSide,
    pub mood: SkewMood,
}

// ── Volume / OI activity ────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityMood {
    HighMomentum,
    Consolidation,
}

/// Traded volume relative to open interest, a proxy for fresh positioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeOiActivity {
    /// Busiest call strikes above the activity ratio, by volume.
    pub high_activity_calls: Vec<f64>,
    pub high_activity_puts: Vec<f64>,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_call_ratio: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub avg_put_ratio: f64,
    pub mood: ActivityMood,
}

impl Default for VolumeOiActivity {
    fn default() -> Self {
        Self {
            high_activity_calls: Vec::new(),
            high_activity_puts: Vec::new(),
            avg_call_ratio: 0.0,
            avg_put_ratio: 0.0,
            mood: ActivityMood::Consolidation,
        }
    }
}
