use std::fmt;

use serde::{Deserialize, Serialize};

use super::chain::{LegQuote, OptionSide};
use super::metrics::{AggregateMetrics, IvSkew, OiLevels, VolumeOiActivity};
use super::round::serialize_round2;

// ── Signal label ────────────────────────────────────────────────────

/// Directional classification for one symbol. "No trade" is modelled as
/// the absence of a `Signal`, not as a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalLabel {
    StrongBuy,
    Buy,
    StrongSell,
    Sell,
}

impl SignalLabel {
    /// Side the label asks the scorer for.
    pub fn implied_side(self) -> OptionSide {
        match self {
            SignalLabel::StrongBuy | SignalLabel::Buy => OptionSide::Call,
            SignalLabel::StrongSell | SignalLabel::Sell => OptionSide::Put,
        }
    }

    /// 2 for the strong variants, 1 otherwise.
    pub fn strength(self) -> u8 {
        match self {
            SignalLabel::StrongBuy | SignalLabel::StrongSell => 2,
            SignalLabel::Buy | SignalLabel::Sell => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SignalLabel::StrongBuy => "STRONG_BUY",
            SignalLabel::Buy => "BUY",
            SignalLabel::StrongSell => "STRONG_SELL",
            SignalLabel::Sell => "SELL",
        }
    }
}

impl fmt::Display for SignalLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Strike candidate ────────────────────────────────────────────────

/// Qualitative reason attached to a selected strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SelectionTag {
    AtmStrike,
    NearAtm,
    StrikesFromAtm(usize),
    FreshLongBuildup,
    LongUnwinding,
    HighVolume,
    LowIv,
}

impl fmt::Display for SelectionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionTag::AtmStrike => f.write_str("ATM strike"),
            SelectionTag::NearAtm => f.write_str("Near ATM"),
            SelectionTag::StrikesFromAtm(n) => write!(f, "{n} strikes from ATM"),
            SelectionTag::FreshLongBuildup => f.write_str("Fresh long buildup"),
            SelectionTag::LongUnwinding => f.write_str("Long unwinding"),
            SelectionTag::HighVolume => f.write_str("High volume"),
            SelectionTag::LowIv => f.write_str("Low IV"),
        }
    }
}

impl From<SelectionTag> for String {
    fn from(tag: SelectionTag) -> Self {
        tag.to_string()
    }
}

impl TryFrom<String> for SelectionTag {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let tag = match s.as_str() {
            "ATM strike" => SelectionTag::AtmStrike,
            "Near ATM" => SelectionTag::NearAtm,
            "Fresh long buildup" => SelectionTag::FreshLongBuildup,
            "Long unwinding" => SelectionTag::LongUnwinding,
            "High volume" => SelectionTag::HighVolume,
            "Low IV" => SelectionTag::LowIv,
            other => {
                let n = other
                    .strip_suffix(" strikes from ATM")
                    .and_then(|n| n.parse().ok())
                    .ok_or_else(|| format!("unknown selection tag `{other}`"))?;
                SelectionTag::StrikesFromAtm(n)
            }
        };
        Ok(tag)
    }
}

/// Per-factor contributions to a candidate's score, unrounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreComponents {
    pub proximity: f64,
    pub open_interest: f64,
    pub change_in_oi: f64,
    pub volume: f64,
    pub implied_volatility: f64,
    pub momentum: f64,
}

impl ScoreComponents {
    pub fn total(&self) -> f64 {
        self.proximity
            + self.open_interest
            + self.change_in_oi
            + self.volume
            + self.implied_volatility
            + self.momentum
    }
}

/// A strike evaluated by the scorer for one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrikeCandidate {
    pub strike: f64,
    pub side: OptionSide,
    /// Distance in window positions (not price) from the ATM strike.
    pub distance_from_atm: usize,
    pub components: ScoreComponents,
    /// Sum of components, rounded to two decimals.
    pub score: f64,
    pub selection_reason: Vec<SelectionTag>,
    pub quote: LegQuote,
}

impl StrikeCandidate {
    pub fn reason_summary(&self) -> String {
        self.selection_reason
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

// ── Signal ──────────────────────────────────────────────────────────

/// Directional recommendation for one symbol in one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Signal {
    pub symbol: String,
    pub label: SignalLabel,
    /// Side of the chosen strike. Differs from `label.implied_side()` when
    /// the classifier had to fall back.
    pub option_side: OptionSide,
    pub candidate: StrikeCandidate,
    pub metrics: AggregateMetrics,
    #[serde(serialize_with = "serialize_round2")]
    pub underlying_price: f64,
    pub expiry: String,
    pub atm_strike: f64,
    pub bullish_points: u8,
    pub bearish_points: u8,
    /// Side originally implied by the label, set only on fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_from: Option<OptionSide>,
    pub reason_text: String,
}

impl Signal {
    pub fn is_fallback(&self) -> bool {
        self.fallback_from.is_some()
    }
}

// ── Market overview ─────────────────────────────────────────────────

/// Coarse sentiment bucket derived from the chain-wide OI put-call ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SentimentLabel {
    #[serde(rename = "very bullish")]
    VeryBullish,
    #[serde(rename = "bullish")]
    Bullish,
    #[serde(rename = "neutral")]
    Neutral,
    #[serde(rename = "bearish")]
    Bearish,
    #[serde(rename = "very bearish")]
    VeryBearish,
}

impl SentimentLabel {
    pub fn from_pcr(pcr_open_interest: f64) -> Self {
        if pcr_open_interest > 1.5 {
            SentimentLabel::VeryBullish
        } else if pcr_open_interest > 1.2 {
            SentimentLabel::Bullish
        } else if pcr_open_interest < 0.6 {
            SentimentLabel::VeryBearish
        } else if pcr_open_interest < 0.8 {
            SentimentLabel::Bearish
        } else {
            SentimentLabel::Neutral
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::VeryBullish => "very bullish",
            SentimentLabel::Bullish => "bullish",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Bearish => "bearish",
            SentimentLabel::VeryBearish => "very bearish",
        }
    }
}

impl fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-symbol market summary handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketOverview {
    pub symbol: String,
    #[serde(serialize_with = "serialize_round2")]
    pub underlying_price: f64,
    pub atm_strike: f64,
    pub window_size: usize,
    #[serde(serialize_with = "serialize_round2")]
    pub pcr_open_interest: f64,
    #[serde(serialize_with = "serialize_round2")]
    pub window_oi_ratio: f64,
    pub sentiment_label: SentimentLabel,
    pub expiry: String,
    #[serde(serialize_with = "serialize_round2")]
    pub pcr_volume: f64,
    #[serde(flatten)]
    pub levels: OiLevels,
    /// Absent when no ATM leg quotes an IV.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iv_skew: Option<IvSkew>,
    #[serde(default)]
    pub activity: VolumeOiActivity,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentiment_buckets() {
        assert_eq!(SentimentLabel::from_pcr(1.6), SentimentLabel::VeryBullish);
        assert_eq!(SentimentLabel::from_pcr(1.5), SentimentLabel::Bullish);
        assert_eq!(SentimentLabel::from_pcr(1.2), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_pcr(1.0), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_pcr(0.8), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_pcr(0.7), SentimentLabel::Bearish);
        assert_eq!(SentimentLabel::from_pcr(0.6), SentimentLabel::Bearish);
        assert_eq!(SentimentLabel::from_pcr(0.0), SentimentLabel::VeryBearish);
    }

    #[test]
    fn test_selection_tag_text_round_trips() {
        for tag in [
            SelectionTag::AtmStrike,
            SelectionTag::StrikesFromAtm(3),
            SelectionTag::LowIv,
        ] {
            let json = serde_json::to_string(&tag).unwrap();
            let back: SelectionTag = serde_json::from_str(&json).unwrap();
            assert_eq!(back, tag);
        }
        assert_eq!(
            serde_json::to_string(&SelectionTag::StrikesFromAtm(3)).unwrap(),
            "\"3 strikes from ATM\""
        );
    }

    #[test]
    fn test_label_side_and_strength() {
        assert_eq!(SignalLabel::Buy.implied_side(), OptionSide::Call);
        assert_eq!(SignalLabel::StrongSell.implied_side(), OptionSide::Put);
        assert_eq!(SignalLabel::StrongBuy.strength(), 2);
        assert_eq!(SignalLabel::Sell.strength(), 1);
        assert_eq!(
            serde_json::to_string(&SignalLabel::StrongSell).unwrap(),
            "\"STRONG_SELL\""
        );
    }
}
