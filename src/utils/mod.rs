//! Utility functions and helpers

pub mod time;

pub use time::{default_principal, unix_timestamp};
