mod chain_common;

use chain_common::*;
use option_signals::config::IndicatorSettings;
use option_signals::engine::metrics::{compute, iv_skew, oi_levels, ratio, volume_oi_activity};
use option_signals::engine::window::select;
use option_signals::model::{ActivityMood, OptionSide, SkewMood};

// ── Put-call ratios ─────────────────────────────────────────────────

#[test]
fn test_chain_and_window_scopes_differ() {
    // Window (radius 1 around 150) holds 140/150/160; the rest sits outside.
    let mut records = Vec::new();
    for k in strikes() {
        let inside = (140.0..=160.0).contains(&k);
        let (call, put) = if inside { (100, 200) } else { (100, 50) };
        records.push(record(
            k,
            Some(quote(call, 0, 10, 0.0, 0.0)),
            Some(quote(put, 0, 30, 0.0, 0.0)),
        ));
    }
    let snapshot = chain(150.0, records);
    let window = select(&snapshot, 1).unwrap();
    let m = compute(&snapshot, &window);

    assert_eq!(m.total_call_oi, 1100);
    assert_eq!(m.total_put_oi, 3 * 200 + 8 * 50);
    assert_eq!(m.window_call_oi, 300);
    assert_eq!(m.window_put_oi, 600);
    assert!((m.pcr_open_interest - 1000.0 / 1100.0).abs() < 1e-12);
    assert_eq!(m.window_oi_ratio, 2.0);
    assert_eq!(m.pcr_volume, 3.0);
}

#[test]
fn test_zero_call_side_yields_zero_ratios() {
    let records = strikes()
        .map(|k| record(k, None, Some(quote(500, 0, 100, 0.0, 0.0))))
        .collect();
    let snapshot = chain(150.0, records);
    let window = select(&snapshot, 5).unwrap();
    let m = compute(&snapshot, &window);

    assert_eq!(m.pcr_open_interest, 0.0);
    assert_eq!(m.pcr_volume, 0.0);
    assert_eq!(m.window_oi_ratio, 0.0);
    assert_eq!(ratio(7, 0), 0.0);
}

// ── OI levels ───────────────────────────────────────────────────────

#[test]
fn test_support_resistance_and_max_pain() {
    let snapshot = chain(
        110.0,
        vec![
            record(100.0, Some(quote(10, 0, 0, 0.0, 0.0)), None),
            record(
                110.0,
                Some(quote(5, 0, 0, 0.0, 0.0)),
                Some(quote(50, 0, 0, 0.0, 0.0)),
            ),
            record(120.0, None, Some(quote(10, 0, 0, 0.0, 0.0))),
        ],
    );
    let levels = oi_levels(&snapshot);

    assert_eq!(levels.resistance, vec![100.0, 110.0]);
    assert_eq!(levels.support, vec![110.0, 120.0]);
    assert_eq!(levels.max_oi_strike, Some(110.0));
    // Payouts: K=100 -> 700, K=110 -> 200, K=120 -> 250.
    assert_eq!(levels.max_pain, Some(110.0));
}

#[test]
fn test_levels_capped_at_three_and_ties_favor_lower_strike() {
    let records = strikes()
        .map(|k| record(k, Some(quote(100, 0, 0, 0.0, 0.0)), None))
        .collect();
    let levels = oi_levels(&chain(150.0, records));

    assert_eq!(levels.resistance, vec![100.0, 110.0, 120.0]);
    assert!(levels.support.is_empty());
}

#[test]
fn test_no_open_interest_has_no_levels() {
    let records = strikes()
        .map(|k| record(k, Some(quote(0, 0, 10, 0.0, 0.0)), None))
        .collect();
    let levels = oi_levels(&chain(150.0, records));

    assert!(levels.resistance.is_empty());
    assert_eq!(levels.max_oi_strike, None);
    assert_eq!(levels.max_pain, None);
}

// ── IV skew ─────────────────────────────────────────────────────────

/// ATM at 150 quoting 20 IV on both legs; calls above and puts below
/// quote the given wing IVs.
fn skewed_chain(call_wing: f64, put_wing: f64) -> option_signals::model::ChainSnapshot {
    let records = strikes()
        .map(|k| {
            let (call_iv, put_iv) = if k == 150.0 {
                (20.0, 20.0)
            } else if k > 150.0 {
                (call_wing, 0.0)
            } else {
                (0.0, put_wing)
            };
            record(
                k,
                Some(quote(100, 0, 10, call_iv, 0.0)),
                Some(quote(100, 0, 10, put_iv, 0.0)),
            )
        })
        .collect();
    chain(150.0, records)
}

#[test]
fn test_rich_put_wing_reads_as_fear() {
    let snapshot = skewed_chain(20.0, 25.0);
    let window = select(&snapshot, 2).unwrap();
    let skew = iv_skew(&window, &IndicatorSettings::default()).unwrap();

    assert_eq!(skew.atm_iv, 20.0);
    assert!((skew.put_skew - 25.0).abs() < 1e-9);
    assert_eq!(skew.call_skew, 0.0);
    assert_eq!(skew.direction, OptionSide::Put);
    assert_eq!(skew.mood, SkewMood::Fear);
}

#[test]
fn test_rich_call_wing_reads_as_greed() {
    let snapshot = skewed_chain(24.0, 20.0);
    let window = select(&snapshot, 2).unwrap();
    let skew = iv_skew(&window, &IndicatorSettings::default()).unwrap();

    assert!((skew.call_skew - 20.0).abs() < 1e-9);
    assert_eq!(skew.direction, OptionSide::Call);
    assert_eq!(skew.mood, SkewMood::Greed);
}

#[test]
fn test_flat_wings_are_neutral_and_favor_calls() {
    let snapshot = skewed_chain(21.0, 21.0);
    let window = select(&snapshot, 2).unwrap();
    let skew = iv_skew(&window, &IndicatorSettings::default()).unwrap();

    assert_eq!(skew.put_skew, skew.call_skew);
    assert_eq!(skew.direction, OptionSide::Call);
    assert_eq!(skew.mood, SkewMood::Neutral);
}

#[test]
fn test_skew_only_reads_nearest_wing_strikes() {
    // 140 and 130 are the two nearest puts; 100..=120 would push skew far up.
    let records = strikes()
        .map(|k| {
            let put_iv = if k == 150.0 {
                20.0
            } else if k == 130.0 || k == 140.0 {
                23.0
            } else if k < 130.0 {
                60.0
            } else {
                0.0
            };
            let call_iv = if k == 150.0 { 20.0 } else { 0.0 };
            record(
                k,
                Some(quote(100, 0, 10, call_iv, 0.0)),
                Some(quote(100, 0, 10, put_iv, 0.0)),
            )
        })
        .collect();
    let snapshot = chain(150.0, records);
    let window = select(&snapshot, 1).unwrap();
    let settings = IndicatorSettings {
        skew_strikes: 2,
        ..Default::default()
    };
    let skew = iv_skew(&window, &settings).unwrap();

    assert!((skew.put_skew - 15.0).abs() < 1e-9);
    // No call wing IV quoted at all.
    assert_eq!(skew.call_skew, 0.0);
    assert_eq!(skew.mood, SkewMood::Fear);
}

#[test]
fn test_no_atm_iv_has_no_skew() {
    let records = strikes()
        .map(|k| {
            let iv = if k == 150.0 { 0.0 } else { 30.0 };
            record(
                k,
                Some(quote(100, 0, 10, iv, 0.0)),
                Some(quote(100, 0, 10, iv, 0.0)),
            )
        })
        .collect();
    let snapshot = chain(150.0, records);
    let window = select(&snapshot, 2).unwrap();

    assert_eq!(iv_skew(&window, &IndicatorSettings::default()), None);
}

// ── Volume / OI activity ────────────────────────────────────────────

#[test]
fn test_busiest_high_ratio_strikes_are_reported() {
    let call = |oi, volume| Some(quote(oi, 0, volume, 0.0, 0.0));
    let records = vec![
        record(100.0, call(100, 80), Some(quote(100, 0, 10, 0.0, 0.0))),
        record(110.0, call(100, 60), None),
        record(120.0, call(100, 90), None),
        // Zero OI counts as ratio 0.
        record(130.0, call(0, 50), None),
        record(140.0, call(100, 10), None),
        record(150.0, call(100, 90), None),
    ];
    let settings = IndicatorSettings {
        activity_strikes: 2,
        ..Default::default()
    };
    let activity = volume_oi_activity(&chain(125.0, records), &settings);

    // 120 and 150 tie on volume; the lower strike goes first.
    assert_eq!(activity.high_activity_calls, vec![120.0, 150.0]);
    assert!(activity.high_activity_puts.is_empty());
    assert!((activity.avg_call_ratio - 3.3 / 6.0).abs() < 1e-9);
    assert!((activity.avg_put_ratio - 0.1).abs() < 1e-9);
    assert_eq!(activity.mood, ActivityMood::HighMomentum);
}

#[test]
fn test_quiet_chain_is_consolidating() {
    let records = strikes()
        .map(|k| {
            record(
                k,
                Some(quote(1000, 0, 100, 0.0, 0.0)),
                Some(quote(1000, 0, 900, 0.0, 0.0)),
            )
        })
        .collect();
    let activity = volume_oi_activity(&chain(150.0, records), &IndicatorSettings::default());

    assert!(activity.high_activity_calls.is_empty());
    assert_eq!(activity.high_activity_puts.len(), 5);
    assert!((activity.avg_call_ratio - 0.1).abs() < 1e-9);
    // Mood follows the call side only.
    assert_eq!(activity.mood, ActivityMood::Consolidation);
}

#[test]
fn test_overview_carries_indicators() {
    let analysis = option_signals::engine::analyze(
        "TEST",
        &ladder(150.0, 100.0, 100.0),
        &option_signals::config::EngineConfig::default(),
    )
    .unwrap();
    let json = serde_json::to_value(&analysis.overview).unwrap();

    // No IV anywhere in the ladder.
    assert!(json.get("ivSkew").is_none());
    assert_eq!(json["activity"]["mood"], "consolidation");
    assert_eq!(json["activity"]["avgCallRatio"], 0.0);
}

// ── Extreme inputs ──────────────────────────────────────────────────

#[test]
fn test_huge_open_interest_saturates_instead_of_overflowing() {
    let raw = raw_snapshot(
        105.0,
        vec![
            entry(100.0, Some(oi_leg(1e19)), Some(oi_leg(1e19))),
            entry(110.0, Some(oi_leg(1e19)), Some(oi_leg(1e19))),
        ],
    );
    let analysis = option_signals::engine::analyze(
        "TEST",
        &raw,
        &option_signals::config::EngineConfig::default(),
    )
    .unwrap();

    assert_eq!(analysis.overview.pcr_open_interest, 1.0);
    assert_eq!(analysis.overview.window_oi_ratio, 1.0);
    assert_eq!(analysis.overview.levels.max_oi_strike, Some(100.0));
    assert!(analysis.overview.levels.max_pain.is_some());
}
