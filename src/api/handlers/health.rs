use axum::Json;
use axum::extract::State;
use chrono::Utc;

use crate::api::state::AppState;
use crate::api::types::{HealthResponse, SymbolHealth};

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.inner.read().await;
    let symbols = store
        .symbols
        .iter()
        .map(|(symbol, entry)| SymbolHealth {
            symbol: symbol.clone(),
            updated_at: entry.updated_at,
            has_signal: entry.signal.is_some(),
        })
        .collect();

    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        last_run: store.last_run.as_ref().map(|r| r.generated_at),
        symbols,
    })
}
