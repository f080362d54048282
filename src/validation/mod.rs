//! Input validation for keys, values, batches and metadata
//!
//! All checks run before any state is touched.

mod limits;

pub use limits::{
    validate_batch_size, validate_key, validate_metadata, validate_value, MAX_BATCH_SIZE,
    MAX_DESCRIPTION_LENGTH, MAX_KEY_LENGTH, MAX_TAGS, MAX_TAG_LENGTH, MAX_VALUE,
};
