//! Persistence for per-viewer dashboard layouts.
//!
//! Storage goes through the [`KeyValueStore`] trait so the backing medium
//! (process memory, a directory of JSON files) can be swapped, and mocked in
//! tests, without touching layout logic.

pub mod error;
pub mod kv;
pub mod layout;

pub use error::StoreError;
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use layout::LayoutStore;
