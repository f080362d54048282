//! Snapshot lookup tools

mod point;
mod range;

pub use point::{GetAtOrBeforeTool, GetAtTool, GetLatestTool};
pub use range::GetRangeTool;
