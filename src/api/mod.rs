pub mod error;
pub mod handlers;
pub mod state;
pub mod types;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::get;
use tokio::time::MissedTickBehavior;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::fetch::ChainSource;
use crate::runner::run_once;

use state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/api/health", get(handlers::health::health))
        .route("/api/dashboard", get(handlers::dashboard::dashboard))
        .route("/api/data/{symbol}", get(handlers::symbols::symbol_data))
        .route("/api/signals/{symbol}", get(handlers::symbols::symbol_signals))
        .layer(cors)
        .with_state(state)
}

/// Serve the dashboard API while a background task keeps the store fresh.
pub async fn serve(
    host: &str,
    port: u16,
    config: AppConfig,
    source: Arc<dyn ChainSource>,
) -> Result<()> {
    let state = AppState::new();
    let refresher = tokio::spawn(refresh_loop(state.clone(), source, config));

    let app = router(state);
    let addr = format!("{host}:{port}");
    println!("option-signals dashboard listening on {addr}");
    println!("  Health:    GET http://{addr}/api/health");
    println!("  Dashboard: GET http://{addr}/api/dashboard");
    println!("  Symbol:    GET http://{addr}/api/data/{{symbol}}");
    println!("  Signal:    GET http://{addr}/api/signals/{{symbol}}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running server")?;

    refresher.abort();
    info!("server stopped");
    Ok(())
}

/// Run an analysis pass immediately, then once per refresh interval.
async fn refresh_loop(state: AppState, source: Arc<dyn ChainSource>, config: AppConfig) {
    let mut ticker = tokio::time::interval(Duration::from_secs(config.refresh_interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let report = run_once(source.as_ref(), &config.symbols, &config.engine).await;
        if report.overviews.is_empty() {
            warn!(skipped = report.skipped_count(), "refresh produced no data");
        } else {
            info!(
                analyzed = report.overviews.len(),
                signals = report.signals.len(),
                "dashboard refreshed"
            );
        }
        state.inner.write().await.apply(&report);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
