//! Size limits and their checks

use crate::error::{LedgerError, LedgerResult};

/// Maximum key length in characters
pub const MAX_KEY_LENGTH: usize = 64;

/// Largest value a snapshot may record
pub const MAX_VALUE: u64 = 1_000_000_000_000_000_000;

/// Maximum items in one `batch_store`
pub const MAX_BATCH_SIZE: usize = 50;

/// Maximum metadata description length in characters
pub const MAX_DESCRIPTION_LENGTH: usize = 256;

/// Maximum number of metadata tags
pub const MAX_TAGS: usize = 10;

/// Maximum tag length in characters
pub const MAX_TAG_LENGTH: usize = 32;

/// Key must be 1..=64 characters
pub fn validate_key(key: &str) -> LedgerResult<()> {
    let len = key.chars().count();
    if len == 0 || len > MAX_KEY_LENGTH {
        return Err(LedgerError::InvalidKey {
            key: key.to_string(),
            max: MAX_KEY_LENGTH,
        });
    }
    Ok(())
}

pub fn validate_value(value: u64) -> LedgerResult<()> {
    if value > MAX_VALUE {
        return Err(LedgerError::ValueTooLarge {
            value,
            max: MAX_VALUE,
        });
    }
    Ok(())
}

/// Batches hold 1..=50 items
pub fn validate_batch_size(size: usize) -> LedgerResult<()> {
    if size == 0 || size > MAX_BATCH_SIZE {
        return Err(LedgerError::BatchTooLarge {
            size,
            max: MAX_BATCH_SIZE,
        });
    }
    Ok(())
}

pub fn validate_metadata(description: &str, tags: &[String]) -> LedgerResult<()> {
    let description_len = description.chars().count();
    if description_len > MAX_DESCRIPTION_LENGTH {
        return Err(LedgerError::InvalidMetadata(format!(
            "description has {} characters, maximum is {}",
            description_len, MAX_DESCRIPTION_LENGTH
        )));
    }

    if tags.len() > MAX_TAGS {
        return Err(LedgerError::InvalidMetadata(format!(
            "{} tags given, maximum is {}",
            tags.len(),
            MAX_TAGS
        )));
    }

    if let Some(tag) = tags.iter().find(|t| t.chars().count() > MAX_TAG_LENGTH) {
        return Err(LedgerError::InvalidMetadata(format!(
            "tag '{}' is longer than {} characters",
            tag, MAX_TAG_LENGTH
        )));
    }

    Ok(())
}
