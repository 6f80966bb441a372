use crate::config::ScoringWeights;
use crate::model::chain::{LegQuote, OptionSide, StrikeRecord};
use crate::model::round::round2;
use crate::model::signal::{ScoreComponents, SelectionTag, StrikeCandidate};

use super::window::AtmWindow;

/// Pick the best at-the-money or out-of-the-money strike for `side`.
///
/// Returns `None` when no window strike qualifies. The scorer never
/// switches sides; that decision belongs to the classifier.
pub fn score(
    window: &AtmWindow<'_>,
    underlying_price: f64,
    side: OptionSide,
    weights: &ScoringWeights,
) -> Option<StrikeCandidate> {
    let mut best: Option<StrikeCandidate> = None;
    for candidate in candidates(window, underlying_price, side, weights) {
        let replace = match &best {
            None => true,
            Some(current) => {
                candidate.score > current.score
                    || (candidate.score == current.score
                        && candidate.quote.total_traded_volume
                            > current.quote.total_traded_volume)
            }
        };
        if replace {
            best = Some(candidate);
        }
    }
    best
}

/// Every eligible strike in the window, scored, in ascending strike order.
pub fn candidates(
    window: &AtmWindow<'_>,
    underlying_price: f64,
    side: OptionSide,
    weights: &ScoringWeights,
) -> Vec<StrikeCandidate> {
    window
        .window_records()
        .iter()
        .enumerate()
        .filter(|(_, record)| is_eligible(record, underlying_price, side))
        .filter_map(|(position, record)| {
            let quote = record.leg(side)?;
            let distance = window.distance_from_atm(position);
            Some(evaluate(record.strike, side, distance, quote, weights))
        })
        .collect()
}

/// ATM or OTM only: calls at or above the underlying, puts at or below.
pub fn is_eligible(record: &StrikeRecord, underlying_price: f64, side: OptionSide) -> bool {
    if record.leg(side).is_none() {
        return false;
    }
    match side {
        OptionSide::Call => record.strike >= underlying_price,
        OptionSide::Put => record.strike <= underlying_price,
    }
}

fn evaluate(
    strike: f64,
    side: OptionSide,
    distance: usize,
    quote: &LegQuote,
    w: &ScoringWeights,
) -> StrikeCandidate {
    let oi = quote.open_interest as f64;
    let volume = quote.total_traded_volume as f64;
    let iv = quote.implied_volatility;

    let components = ScoreComponents {
        proximity: proximity(distance, w),
        open_interest: (oi / w.oi_unit).min(w.oi_cap) * w.oi_multiplier,
        // Uncapped: heavy unwinding can push the total below the OI floor.
        change_in_oi: quote.change_in_open_interest as f64 / w.coi_unit,
        volume: (volume / w.volume_unit).min(w.volume_cap),
        implied_volatility: (w.iv_base - iv / w.iv_divisor).max(0.0),
        momentum: if quote.price_change_percent > 0.0 {
            w.momentum_bonus
        } else {
            0.0
        },
    };

    StrikeCandidate {
        strike,
        side,
        distance_from_atm: distance,
        score: round2(components.total()),
        components,
        selection_reason: tags(distance, quote, w),
        quote: quote.clone(),
    }
}

fn proximity(distance: usize, w: &ScoringWeights) -> f64 {
    match distance {
        0 => w.atm_bonus,
        1 => w.near_atm_bonus,
        d => (w.proximity_base - w.proximity_decay * d as f64).max(0.0),
    }
}

fn tags(distance: usize, quote: &LegQuote, w: &ScoringWeights) -> Vec<SelectionTag> {
    let mut tags = vec![match distance {
        0 => SelectionTag::AtmStrike,
        1 => SelectionTag::NearAtm,
        d => SelectionTag::StrikesFromAtm(d),
    }];

    match quote.change_in_open_interest.signum() {
        1 => tags.push(SelectionTag::FreshLongBuildup),
        -1 => tags.push(SelectionTag::LongUnwinding),
        _ => {}
    }
    if quote.total_traded_volume > w.high_volume_tag {
        tags.push(SelectionTag::HighVolume);
    }
    if quote.implied_volatility > 0.0 && quote.implied_volatility < w.low_iv_tag {
        tags.push(SelectionTag::LowIv);
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_proximity_curve() {
        let w = ScoringWeights::default();
        assert_eq!(proximity(0, &w), 60.0);
        assert_eq!(proximity(1, &w), 50.0);
        assert_eq!(proximity(2, &w), 30.0);
        assert_eq!(proximity(5, &w), 15.0);
        assert_eq!(proximity(8, &w), 0.0);
        assert_eq!(proximity(20, &w), 0.0);
    }

    #[test]
    fn test_formula_components() {
        let w = ScoringWeights::default();
        let quote = LegQuote {
            open_interest: 75_000,
            change_in_open_interest: 1_000,
            total_traded_volume: 2_500,
            implied_volatility: 15.0,
            price_change_percent: 4.2,
            ..Default::default()
        };
        let c = evaluate(100.0, OptionSide::Call, 1, &quote, &w);
        assert_eq!(c.components.proximity, 50.0);
        assert_eq!(c.components.open_interest, 10.0); // capped at 5 * 2
        assert_eq!(c.components.change_in_oi, 2.0);
        assert_eq!(c.components.volume, 2.5);
        assert_eq!(c.components.implied_volatility, 2.0);
        assert_eq!(c.components.momentum, 2.0);
        assert_eq!(c.score, 68.5);
        assert_eq!(
            c.selection_reason,
            vec![
                SelectionTag::NearAtm,
                SelectionTag::FreshLongBuildup,
                SelectionTag::HighVolume,
                SelectionTag::LowIv,
            ]
        );
    }

    #[test]
    fn test_unwinding_is_uncapped_and_missing_iv_is_not_tagged() {
        let w = ScoringWeights::default();
        let quote = LegQuote {
            open_interest: 10_000,
            change_in_open_interest: -20_000,
            ..Default::default()
        };
        let c = evaluate(100.0, OptionSide::Put, 0, &quote, &w);
        assert_eq!(c.components.open_interest, 2.0);
        assert_eq!(c.components.change_in_oi, -40.0);
        // Absent IV counts as 0 and earns the full IV component.
        assert_eq!(c.components.implied_volatility, 5.0);
        assert_eq!(c.score, 27.0);
        assert_eq!(
            c.selection_reason,
            vec![SelectionTag::AtmStrike, SelectionTag::LongUnwinding]
        );
    }
}
