//! Read-only ledger inspection tools

use std::sync::Arc;

use serde_json::{json, Value};

use crate::ledger::SnapshotLedger;
use crate::protocol::{McpTool, Tool};
use crate::server::json_response;
use crate::tools::args::{optional_u64, required_str, required_u64, schema};
use crate::types::McpResult;

/// Default window for `get_latest_events`
const DEFAULT_EVENT_COUNT: u64 = 20;

pub struct GetStatusTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetStatusTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetStatusTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_status",
            "Global counters: total snapshots, event count, paused flag, fee, current tick and owner",
            json!({ "type": "object", "properties": {} }),
        )
    }

    fn execute(&self, _params: Value) -> McpResult<Value> {
        json_response(&self.ledger.status())
    }
}

pub struct GetKeySettingsTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetKeySettingsTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetKeySettingsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_key_settings",
            "Access settings of a key; null when the key is unregistered",
            json!({
                "type": "object",
                "properties": { "key": { "type": "string" } },
                "required": ["key"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let key = required_str(&params, "key")?;
        json_response(&json!({
            "key": key,
            "settings": self.ledger.get_key_settings(key)
        }))
    }
}

pub struct GetEventTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetEventTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetEventTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_event",
            "Fetch one audit log entry by id",
            json!({
                "type": "object",
                "properties": { "eventId": { "type": "integer", "minimum": 0 } },
                "required": ["eventId"]
            }),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let event_id = required_u64(&params, "eventId")?;
        match self.ledger.get_event(event_id) {
            Some(event) => json_response(&event),
            None => Err(format!("Event {} not found", event_id).into()),
        }
    }
}

pub struct GetLatestEventsTool {
    ledger: Arc<SnapshotLedger>,
}

impl GetLatestEventsTool {
    pub fn new(ledger: Arc<SnapshotLedger>) -> Self {
        Self { ledger }
    }
}

impl Tool for GetLatestEventsTool {
    fn definition(&self) -> McpTool {
        McpTool::new(
            "get_latest_events",
            "The most recent audit log entries, oldest first",
            schema(
                json!({ "count": { "type": "integer", "minimum": 0, "description": "How many entries (default 20)" } }),
                &[],
                false,
            ),
        )
    }

    fn execute(&self, params: Value) -> McpResult<Value> {
        let count = optional_u64(&params, "count")?.unwrap_or(DEFAULT_EVENT_COUNT);
        let events = self.ledger.get_latest_events(count as usize);
        json_response(&json!({ "count": events.len(), "events": events }))
    }
}
