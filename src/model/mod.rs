pub mod chain;
pub mod metrics;
pub mod raw;
pub mod round;
pub mod signal;

pub use chain::{ChainSnapshot, LegQuote, OptionSide, StrikeRecord};
pub use metrics::{ActivityMood, AggregateMetrics, IvSkew, OiLevels, SkewMood, VolumeOiActivity};
pub use raw::RawSnapshot;
pub use signal::{
    MarketOverview, ScoreComponents, SelectionTag, SentimentLabel, Signal, SignalLabel,
    StrikeCandidate,
};
