//! MCP server implementation
//!
//! Reads one JSON-RPC request per line and writes one response per line.
//! Stdout carries the protocol, so logging goes to stderr.

mod handlers;

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, BufWriter, Stdin, Stdout, Write};

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use crate::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, McpTool, ServerInfo, Tool};
use crate::types::McpResult;

pub use handlers::*;

/// Called after every successful mutating tool call (e.g. to checkpoint)
pub type AfterWriteHook = Box<dyn FnMut() -> McpResult<()> + Send>;

/// MCP Server that handles JSON-RPC communication over a line-oriented stream
pub struct McpServer<R = BufReader<Stdin>, W = BufWriter<Stdout>> {
    server_info: ServerInfo,
    tools: HashMap<String, Box<dyn Tool>>,
    after_write: Option<AfterWriteHook>,
    reader: R,
    writer: W,
}

impl McpServer {
    /// Server on stdin/stdout
    pub fn stdio(info: ServerInfo) -> Self {
        Self::with_io(info, BufReader::new(io::stdin()), BufWriter::new(io::stdout()))
    }
}

impl<R: BufRead, W: Write> McpServer<R, W> {
    pub fn with_io(info: ServerInfo, reader: R, writer: W) -> Self {
        Self {
            server_info: info,
            tools: HashMap::new(),
            after_write: None,
            reader,
            writer,
        }
    }

    /// Register a tool with the server
    pub fn register_tool(&mut self, tool: Box<dyn Tool>) -> &mut Self {
        let name = tool.definition().name;
        self.tools.insert(name, tool);
        self
    }

    pub fn set_after_write_hook(&mut self, hook: AfterWriteHook) -> &mut Self {
        self.after_write = Some(hook);
        self
    }

    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Consume the server, returning its writer (for inspecting output)
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Run until the input stream closes
    pub fn run(&mut self) -> McpResult<()> {
        info!(
            name = %self.server_info.name,
            version = %self.server_info.version,
            tools = self.tools.len(),
            "server started"
        );
        let mut line = String::new();
        while self.reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                let request = trimmed.to_string();
                self.handle_request(&request)?;
            }
            line.clear();
        }
        info!("input closed, server stopping");
        Ok(())
    }

    /// Handle a single JSON-RPC request line
    pub fn handle_request(&mut self, request_str: &str) -> McpResult<()> {
        let request: JsonRpcRequest = match serde_json::from_str(request_str) {
            Ok(req) => req,
            Err(e) => return self.send(&JsonRpcError::parse_error(e.to_string())),
        };

        if !request.is_valid() {
            let id = request.id.unwrap_or(Value::Null);
            return self.send(&JsonRpcError::invalid_request(id, "jsonrpc must be '2.0'"));
        }

        let notification = request.is_notification();
        let id = request.id.clone().unwrap_or(Value::Null);
        debug!(method = %request.method, "request");

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "notifications/initialized" => Ok(()),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tool_call(id, request.params),
            "ping" => self.send(&JsonRpcResponse::new(id, json!({}))),
            _ if notification => Ok(()),
            other => {
                let other = other.to_string();
                self.send(&JsonRpcError::method_not_found(id, &other))
            }
        }
    }

    fn handle_initialize(&mut self, id: Value) -> McpResult<()> {
        let result = json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {
                "tools": {}
            },
            "serverInfo": {
                "name": self.server_info.name,
                "version": self.server_info.version
            }
        });
        self.send(&JsonRpcResponse::new(id, result))
    }

    fn handle_tools_list(&mut self, id: Value) -> McpResult<()> {
        let mut tools: Vec<McpTool> = self.tools.values().map(|t| t.definition()).collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        self.send(&JsonRpcResponse::new(id, json!({ "tools": tools })))
    }

    fn handle_tool_call(&mut self, id: Value, params: Option<Value>) -> McpResult<()> {
        let Some(params) = params else {
            return self.send(&JsonRpcError::invalid_params(id, "missing params"));
        };
        let Some(tool_name) = extract_tool_name(&params).map(str::to_string) else {
            return self.send(&JsonRpcError::invalid_params(id, "missing tool name"));
        };
        let Some(tool) = self.tools.get(&tool_name) else {
            return self.send(&JsonRpcError::unknown_tool(id, &tool_name));
        };

        let mutates = tool.mutates();
        match tool.execute(extract_arguments(&params)) {
            Ok(result) => {
                if mutates {
                    if let Some(hook) = self.after_write.as_mut() {
                        if let Err(e) = hook() {
                            error!(tool = %tool_name, error = %e, "after-write hook failed");
                            return self.send(&JsonRpcError::tool_error(
                                id,
                                format!("write applied but not persisted: {}", e),
                            ));
                        }
                    }
                }
                self.send(&JsonRpcResponse::new(id, result))
            }
            Err(e) => {
                warn!(tool = %tool_name, error = %e, "tool failed");
                self.send(&JsonRpcError::tool_error(id, e.to_string()))
            }
        }
    }

    fn send<T: Serialize>(&mut self, message: &T) -> McpResult<()> {
        let json = serde_json::to_string(message)?;
        writeln!(self.writer, "{}", json)?;
        self.writer.flush()?;
        Ok(())
    }
}
