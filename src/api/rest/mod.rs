//! REST API module for HTTP endpoints
//!
//! Read-only access to the ledger:
//! - `GET /api/status` - Global counters
//! - `GET /api/keys/:key/latest` - Most recent snapshot
//! - `GET /api/keys/:key/at/:tick` - Exact lookup
//! - `GET /api/keys/:key/before/:tick` - Predecessor lookup
//! - `GET /api/keys/:key/range` - Snapshots in a tick range
//! - `GET /api/keys/:key/statistics` - Range statistics
//! - `GET /api/events` - Latest audit entries

pub mod events;
pub mod keys;

use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Identity of the reader, passed as `?caller=`
#[derive(Debug, Default, Deserialize)]
pub struct CallerParams {
    pub caller: Option<String>,
}

/// Standard API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Audit counter at the time of the read
    pub sequence_id: u64,
    /// Total count (for list responses)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    pub fn new(data: T, sequence_id: u64) -> Self {
        Self {
            data,
            sequence_id,
            total: None,
        }
    }

    pub fn with_total(data: T, sequence_id: u64, total: usize) -> Self {
        Self {
            data,
            sequence_id,
            total: Some(total),
        }
    }
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiError>)>;


impl From<LedgerError> for ApiError {
    fn from(err: LedgerError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}

/// 403 for permission failures, 404 for missing snapshots, 400 otherwise
pub fn status_for(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotAuthorized { .. } => StatusCode::FORBIDDEN,
        LedgerError::SnapshotNotFound { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::BAD_REQUEST,
    }
}

pub fn ledger_failure(err: LedgerError) -> (StatusCode, Json<ApiError>) {
    (status_for(&err), Json(ApiError::from(err)))
}
