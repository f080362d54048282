//! Argument extraction shared by the tools

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::types::{CallContext, McpResult, Tick};
use crate::utils::unix_timestamp;

/// Identity used for reads when no caller is given
pub const ANONYMOUS: &str = "anonymous";

pub fn required_str<'a>(params: &'a Value, name: &str) -> McpResult<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| format!("Missing '{}' parameter", name).into())
}

pub fn required_u64(params: &Value, name: &str) -> McpResult<u64> {
    optional_u64(params, name)?.ok_or_else(|| format!("Missing '{}' parameter", name).into())
}

pub fn optional_u64(params: &Value, name: &str) -> McpResult<Option<u64>> {
    match params.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| format!("'{}' must be a non-negative integer", name).into()),
    }
}

pub fn optional_bool(params: &Value, name: &str) -> bool {
    params.get(name).and_then(|v| v.as_bool()).unwrap_or(false)
}

/// Context for a mutating call: `caller` is required
pub fn write_context(ledger: &SnapshotLedger, params: &Value) -> McpResult<CallContext> {
    let caller = required_str(params, "caller")?;
    context_for(ledger, caller, params)
}

/// Context for a read: `caller` defaults to anonymous
pub fn read_context(ledger: &SnapshotLedger, params: &Value) -> McpResult<CallContext> {
    let caller = params
        .get("caller")
        .and_then(|v| v.as_str())
        .unwrap_or(ANONYMOUS);
    context_for(ledger, caller, params)
}

fn context_for(ledger: &SnapshotLedger, caller: &str, params: &Value) -> McpResult<CallContext> {
    let tick: Tick = optional_u64(params, "tick")?.unwrap_or_else(|| ledger.get_current_tick());
    Ok(CallContext::new(caller, tick).with_timestamp(unix_timestamp()))
}

/// Schema properties every tool accepts
pub fn context_properties(caller_description: &str) -> Value {
    json!({
        "caller": { "type": "string", "description": caller_description },
        "tick": { "type": "integer", "minimum": 0, "description": "Current block height (defaults to the ledger's current tick)" }
    })
}

/// Build an object schema from tool-specific properties plus the context properties
pub fn schema(properties: Value, required: &[&str], mutating: bool) -> Value {
    let caller_description = if mutating {
        "Principal performing the call"
    } else {
        "Principal performing the read (defaults to anonymous)"
    };
    let mut props = context_properties(caller_description);
    if let (Some(all), Value::Object(extra)) = (props.as_object_mut(), properties) {
        all.extend(extra);
    }
    let mut required: Vec<&str> = required.to_vec();
    if mutating {
        required.push("caller");
    }
    json!({
        "type": "object",
        "properties": props,
        "required": required
    })
}
