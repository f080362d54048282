//! Snapshot write tools

mod batch_store;
mod store;
mod store_with_metadata;

pub use batch_store::BatchStoreTool;
pub use store::StoreTool;
pub use store_with_metadata::StoreWithMetadataTool;
