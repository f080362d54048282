//! Audit log and status endpoints

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::ApiResponse;
use crate::api::state::AppState;
use crate::types::{EventLogEntry, LedgerStatus};

/// Query parameters for the event window
#[derive(Debug, Deserialize)]
pub struct EventsParams {
    /// Number of most recent entries (default: 20, max: 1000)
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    20
}

/// GET /api/events
pub async fn latest_events(
    State(state): State<Arc<AppState>>,
    Query(params): Query<EventsParams>,
) -> Json<ApiResponse<Vec<EventLogEntry>>> {
    let events = state.ledger.get_latest_events(params.limit.min(1000));
    let total = events.len();
    Json(ApiResponse::with_total(events, state.current_sequence_id(), total))
}

/// GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<ApiResponse<LedgerStatus>> {
    let status = state.ledger.status();
    let sequence_id = status.event_counter;
    Json(ApiResponse::new(status, sequence_id))
}
