use tracing::{debug, info};

use crate::config::{EngineConfig, Thresholds};
use crate::model::chain::{ChainSnapshot, OptionSide};
use crate::model::metrics::AggregateMetrics;
use crate::model::signal::{Signal, SignalLabel, StrikeCandidate};

use super::scorer;
use super::window::AtmWindow;

/// Bullish and bearish point totals, each 0-3.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Points {
    pub bullish: u8,
    pub bearish: u8,
}

/// Score the aggregate metrics against the thresholds.
///
/// PCR contributes up to 2 points per direction, the window OI ratio 1.
pub fn points(metrics: &AggregateMetrics, t: &Thresholds) -> Points {
    let mut p = Points::default();
    let pcr = metrics.pcr_open_interest;

    if pcr >= t.pcr_strong {
        p.bullish += 2;
    } else if pcr >= t.pcr_weak {
        p.bullish += 1;
    }
    if pcr <= t.bearish_strong() {
        p.bearish += 2;
    } else if pcr <= t.bearish_weak() {
        p.bearish += 1;
    }

    if metrics.window_oi_ratio >= t.bull_oi {
        p.bullish += 1;
    }
    if metrics.window_oi_ratio <= t.bear_oi {
        p.bearish += 1;
    }
    p
}

/// Map point totals to a label. Bullish totals are checked first.
pub fn label_for(points: Points) -> Option<SignalLabel> {
    if points.bullish >= 3 {
        Some(SignalLabel::StrongBuy)
    } else if points.bullish >= 2 {
        Some(SignalLabel::Buy)
    } else if points.bearish >= 3 {
        Some(SignalLabel::StrongSell)
    } else if points.bearish >= 2 {
        Some(SignalLabel::Sell)
    } else {
        None
    }
}

/// Classify one snapshot and pick a strike for the implied side.
///
/// When the implied side has no eligible strike the opposite side is tried
/// once and the signal records the fallback; the label is kept as is.
/// `None` means no trade.
pub fn classify(
    snapshot: &ChainSnapshot,
    window: &AtmWindow<'_>,
    metrics: &AggregateMetrics,
    config: &EngineConfig,
) -> Option<Signal> {
    let points = points(metrics, &config.thresholds);
    let Some(label) = label_for(points) else {
        debug!(
            symbol = snapshot.symbol(),
            bullish = points.bullish,
            bearish = points.bearish,
            "no directional signal"
        );
        return None;
    };

    let price = snapshot.underlying_price();
    let requested = label.implied_side();

    let (candidate, fallback_from) =
        match scorer::score(window, price, requested, &config.weights) {
            Some(c) => (c, None),
            None => {
                let alternate = requested.opposite();
                let c = scorer::score(window, price, alternate, &config.weights)?;
                info!(
                    symbol = snapshot.symbol(),
                    %label,
                    from = %requested,
                    to = %alternate,
                    "no eligible strike on implied side, falling back"
                );
                (c, Some(requested))
            }
        };

    let reason_text = reason_text(label, points, metrics, &candidate, fallback_from);

    Some(Signal {
        symbol: snapshot.symbol().to_string(),
        label,
        option_side: candidate.side,
        metrics: *metrics,
        underlying_price: price,
        expiry: snapshot.expiry().to_string(),
        atm_strike: window.atm_strike(),
        bullish_points: points.bullish,
        bearish_points: points.bearish,
        fallback_from,
        reason_text,
        candidate,
    })
}

fn reason_text(
    label: SignalLabel,
    points: Points,
    metrics: &AggregateMetrics,
    candidate: &StrikeCandidate,
    fallback_from: Option<OptionSide>,
) -> String {
    let mood = match label {
        SignalLabel::StrongBuy => "Strong bullish",
        SignalLabel::Buy => "Bullish",
        SignalLabel::StrongSell => "Strong bearish",
        SignalLabel::Sell => "Bearish",
    };
    let mut text = format!(
        "{mood} sentiment: PCR {:.2}, window OI ratio {:.2} ({} bullish / {} bearish points). \
         {} {} score {:.2}: {}",
        metrics.pcr_open_interest,
        metrics.window_oi_ratio,
        points.bullish,
        points.bearish,
        candidate.strike,
        candidate.side,
        candidate.score,
        candidate.reason_summary(),
    );
    if let Some(requested) = fallback_from {
        text.push_str(&format!(
            " [fallback: no eligible {requested} strike, using {}]",
            candidate.side
        ));
    }
    text
}
