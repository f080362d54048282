//! Range statistics tools

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{read_context, required_str, required_u64, schema};
use crate::types::McpResult;

fn range_schema() -> Value {
    schema(
        json!({
            "key": { "type": "string" },
            "start": { "type": "integer", "minimum": 0, "description": "First tick (inclusive)" },
            "end": { "type": "integer", "minimum": 0, "description": "Last tick (inclusive)" }
        }),
        &["key", "start", "end"],
        false,
    )
}

struct RangeArgs<'a> {
    key: &'a str,
    start: u64,
    end: u64,
}

fn range_args(params: &Value) -> McpResult<RangeArgs<'_>> {
    Ok(RangeArgs {
        key: required_str(params, "key")?,
        start: required_u64(params, "start")?,
        end: required_u64(params, "end")?,
    })
}

/// Statistics for a range, served from the cache when still valid
pub struct GetStatisticsTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetStatisticsTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetStatisticsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_statistics",
            "Sum, average, min, max and count of a key's values over a tick range",
            range_schema(),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let args = range_args(&params)?;

        let stats = self
            .ledger
            .get_statistics(&ctx, args.key, args.start, args.end)?;
        json_response(&stats)
    }
}

/// Compute statistics and store them in the cache
pub struct CalculateAndCacheTool {
    ledger: Arc<SnapshotLedger>,
}

impl CalculateAndCacheTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for CalculateAndCacheTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "calculate_and_cache_statistics",
            "Compute range statistics and cache them until the key is next written",
            range_schema(),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let args = range_args(&params)?;

        let stats = self
            .ledger
            .calculate_and_cache_statistics(&ctx, args.key, args.start, args.end)?;
        json_response(&stats)
    }
}

/// Read a cache entry without computing
pub struct GetCachedStatisticsTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetCachedStatisticsTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetCachedStatisticsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_cached_statistics",
            "Return cached statistics for a range. Fails if nothing valid is cached.",
            range_schema(),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let ctx = read_context(&self.ledger, &params)?;
        let args = range_args(&params)?;

        let entry = self
            .ledger
            .get_cached_statistics(&ctx, args.key, args.start, args.end)?;
        json_response(&entry)
    }
}
