use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::signal::{MarketOverview, Signal};

use super::state::RunSummary;

// ── Response types ───────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub last_run: Option<RunSummary>,
    /// Ranked: strong signals first, then by PCR.
    pub signals: Vec<Signal>,
    pub market_overview: Vec<MarketOverview>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolHealth {
    pub symbol: String,
    pub updated_at: DateTime<Utc>,
    pub has_signal: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    pub last_run: Option<DateTime<Utc>>,
    pub symbols: Vec<SymbolHealth>,
}
