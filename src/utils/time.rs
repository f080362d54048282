//! Time and identity helpers

use std::env;

/// Current Unix timestamp in seconds
pub fn unix_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Login name of the current OS user, or "owner"
pub fn default_principal() -> String {
    env::var("USER") // Linux/Mac
        .or_else(|_| env::var("USERNAME")) // Windows
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| "owner".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_timestamp_is_recent() {
        // 2020-01-01
        assert!(unix_timestamp() > 1_577_836_800);
    }

    #[test]
    fn test_default_principal_not_empty() {
        assert!(!default_principal().is_empty());
    }
}
