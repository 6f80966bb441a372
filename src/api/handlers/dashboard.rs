use axum::Json;
use axum::extract::State;

use crate::api::state::AppState;
use crate::api::types::DashboardResponse;
use crate::runner::rank_signals;

pub async fn dashboard(State(state): State<AppState>) -> Json<DashboardResponse> {
    let store = state.inner.read().await;
    let signals = rank_signals(store.signals()).into_iter().cloned().collect();
    Json(DashboardResponse {
        last_run: store.last_run.clone(),
        signals,
        market_overview: store.overviews().cloned().collect(),
    })
}
