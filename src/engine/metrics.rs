use crate::config::IndicatorSettings;
use crate::model::chain::{ChainSnapshot, OptionSide, StrikeRecord};
use crate::model::metrics::{
    ActivityMood, AggregateMetrics, IvSkew, OiLevels, SkewMood, VolumeOiActivity,
};

use super::window::AtmWindow;

/// Number of support/resistance strikes reported.
const LEVEL_COUNT: usize = 3;

/// Chain-wide put-call ratios plus the window-local OI ratio.
///
/// Both scopes feed the classifier.
pub fn compute(snapshot: &ChainSnapshot, window: &AtmWindow<'_>) -> AggregateMetrics {
    let chain = Totals::over(snapshot.strikes());
    let local = Totals::over(window.window_records());

    AggregateMetrics {
        pcr_open_interest: ratio(chain.put_oi, chain.call_oi),
        pcr_volume: ratio(chain.put_volume, chain.call_volume),
        window_oi_ratio: ratio(local.put_oi, local.call_oi),
        total_call_oi: chain.call_oi,
        total_put_oi: chain.put_oi,
        total_call_volume: chain.call_volume,
        total_put_volume: chain.put_volume,
        window_call_oi: local.call_oi,
        window_put_oi: local.put_oi,
    }
}

/// `num / den`, or 0 when the denominator is 0.
pub fn ratio(num: u64, den: u64) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

#[derive(Debug, Default)]
struct Totals {
    call_oi: u64,
    put_oi: u64,
    call_volume: u64,
    put_volume: u64,
}

impl Totals {
    fn over(records: &[StrikeRecord]) -> Self {
        records.iter().fold(Totals::default(), |mut t, r| {
            t.call_oi = t.call_oi.saturating_add(r.call_oi());
            t.put_oi = t.put_oi.saturating_add(r.put_oi());
            t.call_volume = t.call_volume.saturating_add(r.call_volume());
            t.put_volume = t.put_volume.saturating_add(r.put_volume());
            t
        })
    }
}

// ── OI levels ───────────────────────────────────────────────────────

fn total_oi(record: &StrikeRecord) -> u64 {
    record.call_oi().saturating_add(record.put_oi())
}

/// Support/resistance, max-OI and max-pain strikes over the whole chain.
pub fn oi_levels(snapshot: &ChainSnapshot) -> OiLevels {
    let strikes = snapshot.strikes();

    OiLevels {
        resistance: top_strikes(strikes, StrikeRecord::call_oi),
        support: top_strikes(strikes, StrikeRecord::put_oi),
        max_oi_strike: top_strikes(strikes, total_oi)
            .first()
            .copied(),
        max_pain: max_pain(strikes),
    }
}

/// Up to `LEVEL_COUNT` strikes with the largest nonzero `oi`, largest first.
/// Ties keep the lower strike first.
fn top_strikes(strikes: &[StrikeRecord], oi: impl Fn(&StrikeRecord) -> u64) -> Vec<f64> {
    let mut ranked: Vec<(u64, f64)> = strikes
        .iter()
        .map(|r| (oi(r), r.strike))
        .filter(|(v, _)| *v > 0)
        .collect();
    // Stable sort on an ascending ladder keeps lower strikes ahead on ties.
    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked.into_iter().take(LEVEL_COUNT).map(|(_, s)| s).collect()
}

/// Expiry price that minimizes the total intrinsic value paid to option
/// holders, evaluated at each listed strike.
fn max_pain(strikes: &[StrikeRecord]) -> Option<f64> {
    let has_oi = strikes.iter().any(|r| total_oi(r) > 0);
    if !has_oi {
        return None;
    }

    let mut best: Option<(f64, f64)> = None;
    for candidate in strikes {
        let k = candidate.strike;
        let payout: f64 = strikes
            .iter()
            .map(|r| {
                let call = r.call_oi() as f64 * (k - r.strike).max(0.0);
                let put = r.put_oi() as f64 * (r.strike - k).max(0.0);
                call + put
            })
            .sum();
        if best.is_none_or(|(_, p)| payout < p) {
            best = Some((k, payout));
        }
    }
    best.map(|(k, _)| k)
}

// ── IV skew ─────────────────────────────────────────────────────────

/// Average IV of the nearest OTM strikes on each side against ATM IV.
///
/// ATM IV is the mean of whichever ATM legs quote an IV; `None` when
/// neither does. A wing with no quoted IV has zero skew.
pub fn iv_skew(window: &AtmWindow<'_>, settings: &IndicatorSettings) -> Option<IvSkew> {
    let atm = window.atm_record();
    let atm_iv = mean(
        [OptionSide::Call, OptionSide::Put]
            .into_iter()
            .filter_map(|side| quoted_iv(atm, side)),
    )?;

    let call_wing = window
        .strikes_above()
        .iter()
        .take(settings.skew_strikes)
        .filter_map(|r| quoted_iv(r, OptionSide::Call));
    let put_wing = window
        .strikes_below()
        .iter()
        .rev()
        .take(settings.skew_strikes)
        .filter_map(|r| quoted_iv(r, OptionSide::Put));

    let skew = |wing: Option<f64>| wing.map_or(0.0, |iv| (iv - atm_iv) / atm_iv * 100.0);
    let call_skew = skew(mean(call_wing));
    let put_skew = skew(mean(put_wing));

    let mood = if put_skew > settings.skew_alert_pct {
        SkewMood::Fear
    } else if call_skew > settings.skew_alert_pct {
        SkewMood::Greed
    } else {
        SkewMood::Neutral
    };

    Some(IvSkew {
        atm_iv,
        put_skew,
        call_skew,
        direction: if put_skew > call_skew {
            OptionSide::Put
        } else {
            OptionSide::Call
        },
        mood,
    })
}

fn quoted_iv(record: &StrikeRecord, side: OptionSide) -> Option<f64> {
    record
        .leg(side)
        .map(|q| q.implied_volatility)
        .filter(|iv| *iv > 0.0)
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0u32), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / f64::from(n))
}

// ── Volume / OI activity ────────────────────────────────────────────

/// Per-leg volume/OI ratios across the whole chain.
///
/// A leg with zero OI has ratio 0. High-activity strikes are those above
/// `high_activity_ratio`, busiest first, ties by lower strike.
pub fn volume_oi_activity(
    snapshot: &ChainSnapshot,
    settings: &IndicatorSettings,
) -> VolumeOiActivity {
    let (high_activity_calls, avg_call_ratio) =
        side_activity(snapshot.strikes(), OptionSide::Call, settings);
    let (high_activity_puts, avg_put_ratio) =
        side_activity(snapshot.strikes(), OptionSide::Put, settings);

    VolumeOiActivity {
        high_activity_calls,
        high_activity_puts,
        avg_call_ratio,
        avg_put_ratio,
        mood: if avg_call_ratio > settings.moderate_activity_ratio {
            ActivityMood::HighMomentum
        } else {
            ActivityMood::Consolidation
        },
    }
}

fn side_activity(
    strikes: &[StrikeRecord],
    side: OptionSide,
    settings: &IndicatorSettings,
) -> (Vec<f64>, f64) {
    let legs: Vec<(f64, u64, f64)> = strikes
        .iter()
        .filter_map(|r| {
            let q = r.leg(side)?;
            Some((r.strike, q.total_traded_volume, ratio(q.total_traded_volume, q.open_interest)))
        })
        .collect();

    let avg = mean(legs.iter().map(|(_, _, ratio)| *ratio)).unwrap_or(0.0);

    let mut active: Vec<(f64, u64)> = legs
        .iter()
        .filter(|(_, _, ratio)| *ratio > settings.high_activity_ratio)
        .map(|(strike, volume, _)| (*strike, *volume))
        .collect();
    active.sort_by(|a, b| b.1.cmp(&a.1));
    let strikes = active
        .into_iter()
        .take(settings.activity_strikes)
        .map(|(strike, _)| strike)
        .collect();

    (strikes, avg)
}
