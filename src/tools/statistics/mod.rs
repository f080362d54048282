//! Aggregation tools

mod moving_average;
mod range_stats;

pub use moving_average::GetMovingAverageTool;
pub use range_stats::{CalculateAndCacheTool, GetCachedStatisticsTool, GetStatisticsTool};
