mod chain_common;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::{Duration, Utc};

use chain_common::*;
use option_signals::api::error::ApiError;
use option_signals::api::handlers::{dashboard, health, symbols};
use option_signals::api::state::AppState;
use option_signals::config::EngineConfig;
use option_signals::engine::analyze;
use option_signals::runner::{RunReport, SkipStage, SkippedSymbol};

// ── Helpers ─────────────────────────────────────────────────────────

fn report_with(entries: &[(&str, f64, f64)], offset_secs: i64) -> RunReport {
    let mut report = RunReport::new(Utc::now() + Duration::seconds(offset_secs));
    for &(symbol, call_oi, put_oi) in entries {
        let analysis = analyze(
            symbol,
            &ladder(152.0, call_oi, put_oi),
            &EngineConfig::default(),
        )
        .unwrap();
        report.overviews.push(analysis.overview);
        report.signals.extend(analysis.signal);
    }
    report
}

async fn state_with(report: &RunReport) -> AppState {
    let state = AppState::new();
    state.inner.write().await.apply(report);
    state
}

// ── Store ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_apply_replaces_analyzed_and_keeps_skipped() {
    let first = report_with(&[("NIFTY", 1_000.0, 2_000.0), ("TCS", 2_000.0, 1_000.0)], 0);
    let state = state_with(&first).await;

    // Second run: NIFTY goes flat, TCS fails to fetch.
    let mut second = report_with(&[("NIFTY", 1_000.0, 1_000.0)], 60);
    second.skipped.push(SkippedSymbol {
        symbol: "TCS".into(),
        stage: SkipStage::Fetch,
        reason: "HTTP error".into(),
    });
    state.inner.write().await.apply(&second);

    let store = state.inner.read().await;
    let nifty = store.get("nifty").unwrap();
    assert!(nifty.signal.is_none());
    assert_eq!(nifty.updated_at, second.generated_at);

    let tcs = store.get("TCS").unwrap();
    assert!(tcs.signal.is_some());
    assert_eq!(tcs.updated_at, first.generated_at);

    let summary = store.last_run.as_ref().unwrap();
    assert_eq!(summary.skipped_count, 1);
    assert_eq!(summary.analyzed, 1);
}

#[tokio::test]
async fn test_lowercase_symbols_are_keyed_uppercase() {
    let report = report_with(&[("nifty", 1_000.0, 2_000.0)], 0);
    let state = state_with(&report).await;

    let store = state.inner.read().await;
    assert_eq!(store.symbols.keys().collect::<Vec<_>>(), vec!["NIFTY"]);
    let entry = store.get("Nifty").unwrap();
    assert!(entry.signal.is_some());
}

// ── Handlers ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_dashboard_ranks_signals() {
    let report = report_with(
        &[
            ("AAA", 1_000.0, 1_300.0),
            ("BBB", 1_000.0, 2_000.0),
            ("CCC", 1_000.0, 1_000.0),
        ],
        0,
    );
    let state = state_with(&report).await;

    let Json(body) = dashboard::dashboard(State(state)).await;
    let order: Vec<&str> = body.signals.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["BBB", "AAA"]);
    assert_eq!(body.market_overview.len(), 3);
    assert_eq!(body.last_run.unwrap().signals, 2);
}

#[tokio::test]
async fn test_symbol_routes_return_not_found() {
    let report = report_with(&[("NIFTY", 1_000.0, 1_000.0)], 0);
    let state = state_with(&report).await;

    let Json(entry) = symbols::symbol_data(State(state.clone()), Path("NIFTY".into()))
        .await
        .unwrap();
    assert_eq!(entry.overview.symbol, "NIFTY");

    let missing = symbols::symbol_data(State(state.clone()), Path("TCS".into())).await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));

    // Analyzed but no signal.
    let no_signal = symbols::symbol_signals(State(state), Path("NIFTY".into())).await;
    assert!(matches!(no_signal, Err(ApiError::NotFound(_))));
}

#[tokio::test]
async fn test_health_lists_symbols() {
    let report = report_with(&[("NIFTY", 1_000.0, 2_000.0), ("TCS", 1_000.0, 1_000.0)], 0);
    let state = state_with(&report).await;

    let Json(body) = health::health(State(state)).await;
    assert_eq!(body.status, "ok");
    assert_eq!(body.last_run, Some(report.generated_at));
    let flags: Vec<(&str, bool)> = body
        .symbols
        .iter()
        .map(|s| (s.symbol.as_str(), s.has_signal))
        .collect();
    assert_eq!(flags, vec![("NIFTY", true), ("TCS", false)]);
}

#[tokio::test]
async fn test_not_found_renders_json_error() {
    let resp = ApiError::NotFound("no data for symbol TCS".into()).into_response();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({ "error": "no data for symbol TCS" }));
}
