//! Historical Snapshots MCP Server - Binary Entry Point
//!
//! Serves the ledger over JSON-RPC on stdio, checkpointing to the data
//! directory after every successful write. With `--http`, a read-only REST
//! API runs alongside.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use historical_snapshots::api::{self, AppState};
use historical_snapshots::ledger::LedgerConfig;
use historical_snapshots::persistence::{LedgerStore, PersistenceConfig};
use historical_snapshots::protocol::ServerInfo;
use historical_snapshots::server::McpServer;
use historical_snapshots::tools::register_all_tools;
use historical_snapshots::types::McpResult;
use historical_snapshots::utils::default_principal;

/// MCP server for the historical snapshots ledger.
#[derive(Parser, Debug)]
#[command(name = "snapshot-server")]
#[command(about = "Versioned key-value snapshot ledger over MCP")]
struct Args {
    /// Ledger owner (defaults to the OS user)
    #[arg(long, env = "SNAPSHOT_OWNER")]
    owner: Option<String>,

    /// Directory holding state.json and events.jsonl
    #[arg(long, env = "SNAPSHOT_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Serve the HTTP read API on this address (e.g. 127.0.0.1:8080)
    #[arg(long, env = "SNAPSHOT_HTTP_ADDR")]
    http: Option<SocketAddr>,

    /// Only a key's creator may re-register it
    #[arg(long)]
    immutable_creator: bool,

    /// Unregistered keys are writable and readable by the owner only
    #[arg(long)]
    closed_unregistered_keys: bool,

    /// Reject queries naming a tick beyond the current tick
    #[arg(long)]
    reject_future_ticks: bool,

    /// Maximum number of cached statistics entries
    #[arg(long, default_value_t = 1024)]
    max_cache_entries: usize,
}

impl Args {
    fn ledger_config(&self) -> LedgerConfig {
        let owner = self.owner.clone().unwrap_or_else(default_principal);
        LedgerConfig::new(owner)
            .with_open_unregistered_keys(!self.closed_unregistered_keys)
            .with_immutable_creator(self.immutable_creator)
            .with_reject_future_ticks(self.reject_future_ticks)
            .with_max_cache_entries(self.max_cache_entries)
    }
}

fn main() -> McpResult<()> {
    // Stdout carries the protocol, so logs go to stderr
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let args = Args::parse();
    let config = args.ledger_config();
    info!(owner = %config.owner, data_dir = %args.data_dir.display(), "opening ledger");

    let store = Arc::new(LedgerStore::open(
        config,
        PersistenceConfig::new(&args.data_dir),
    )?);
    let ledger = store.ledger();

    // Checkpoint on Ctrl+C / SIGTERM
    let shutdown_store = store.clone();
    ctrlc::set_handler(move || {
        info!("shutdown signal received, checkpointing");
        if let Err(e) = shutdown_store.flush() {
            error!(error = %e, "checkpoint on shutdown failed");
        }
        std::process::exit(0);
    })?;

    if let Some(addr) = args.http {
        let state = Arc::new(AppState::new(ledger.clone()));
        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(e) => {
                    error!(error = %e, "could not start HTTP runtime");
                    return;
                }
            };
            if let Err(e) = runtime.block_on(api::serve(addr, state)) {
                error!(error = %e, "HTTP server stopped");
            }
        });
    }

    let mut server = McpServer::stdio(ServerInfo::default());
    register_all_tools(&mut server, ledger);

    let hook_store = store.clone();
    server.set_after_write_hook(Box::new(move || -> McpResult<()> {
        hook_store.flush()?;
        Ok(())
    }));

    server.run()?;
    store.flush()?;
    Ok(())
}
