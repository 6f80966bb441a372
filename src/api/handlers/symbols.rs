use axum::Json;
use axum::extract::{Path, State};

use crate::api::error::ApiError;
use crate::api::state::{AppState, SymbolEntry};
use crate::model::signal::Signal;

pub async fn symbol_data(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<SymbolEntry>, ApiError> {
    let store = state.inner.read().await;
    store
        .get(&symbol)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no data for symbol {symbol}")))
}

pub async fn symbol_signals(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Signal>, ApiError> {
    let store = state.inner.read().await;
    store
        .get(&symbol)
        .and_then(|entry| entry.signal.clone())
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("no signal for symbol {symbol}")))
}
