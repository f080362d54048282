//! Per-key snapshot endpoints

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::{ledger_failure, ApiResponse, ApiResult, CallerParams};
use crate::api::state::AppState;
use crate::types::{Snapshot, Statistics, Tick};

/// Query parameters for range endpoints
#[derive(Debug, Deserialize)]
pub struct RangeParams {
    pub start: Tick,
    pub end: Tick,
    pub caller: Option<String>,
}

/// GET /api/keys/:key/latest
pub async fn get_latest(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(params): Query<CallerParams>,
) -> ApiResult<Snapshot> {
    let ctx = state.read_context(params.caller.as_deref());
    let snapshot = state.ledger.get_latest(&ctx, &key).map_err(ledger_failure)?;
    Ok(Json(ApiResponse::new(snapshot, state.current_sequence_id())))
}

/// GET /api/keys/:key/at/:tick
pub async fn get_at(
    State(state): State<Arc<AppState>>,
    Path((key, tick)): Path<(String, Tick)>,
    Query(params): Query<CallerParams>,
) -> ApiResult<Snapshot> {
    let ctx = state.read_context(params.caller.as_deref());
    let snapshot = state.ledger.get_at(&ctx, &key, tick).map_err(ledger_failure)?;
    Ok(Json(ApiResponse::new(snapshot, state.current_sequence_id())))
}

/// GET /api/keys/:key/before/:tick
pub async fn get_at_or_before(
    State(state): State<Arc<AppState>>,
    Path((key, tick)): Path<(String, Tick)>,
    Query(params): Query<CallerParams>,
) -> ApiResult<Snapshot> {
    let ctx = state.read_context(params.caller.as_deref());
    let snapshot = state
        .ledger
        .get_at_or_before(&ctx, &key, tick)
        .map_err(ledger_failure)?;
    Ok(Json(ApiResponse::new(snapshot, state.current_sequence_id())))
}

/// GET /api/keys/:key/range?start=&end=
pub async fn get_range(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Vec<Snapshot>> {
    let ctx = state.read_context(params.caller.as_deref());
    let snapshots = state
        .ledger
        .get_range(&ctx, &key, params.start, params.end)
        .map_err(ledger_failure)?;
    let total = snapshots.len();
    Ok(Json(ApiResponse::with_total(
        snapshots,
        state.current_sequence_id(),
        total,
    )))
}

/// GET /api/keys/:key/statistics?start=&end=
pub async fn get_statistics(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(params): Query<RangeParams>,
) -> ApiResult<Statistics> {
    let ctx = state.read_context(params.caller.as_deref());
    let stats = state
        .ledger
        .get_statistics(&ctx, &key, params.start, params.end)
        .map_err(ledger_failure)?;
    Ok(Json(ApiResponse::new(stats, state.current_sequence_id())))
}
