//! Access control tools

mod register_key;
mod writers;

pub use register_key::RegisterKeyTool;
pub use writers::{GrantWriterTool, RevokeWriterTool};
