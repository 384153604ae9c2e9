//! Snapshot persistence for small record collections.
//!
//! A snapshot store saves and loads one serializable value as a whole. Each
//! service owns its own store and its own data type; nothing here knows about
//! the records being stored.

mod error;
mod store;

pub use error::StoreError;
pub use store::{FileStore, MemoryStore, Store};
