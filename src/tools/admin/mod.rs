//! Administration, retention and inspection tools

mod balances;
mod cleanup;
mod controls;
mod status;

pub use balances::{DepositTool, GetBalanceTool};
pub use cleanup::CleanupTool;
pub use controls::{SetFeeTool, SetPausedTool};
pub use status::{GetEventTool, GetKeySettingsTool, GetLatestEventsTool, GetStatusTool};
