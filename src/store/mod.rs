//! Store boundary and schema-tolerant persistence
//!
//! - `interface.rs` - the `RowStore` async trait (the engine's only external boundary)
//! - `adapter.rs` - candidate/identifier-fallback retry strategy over a `RowStore`
//! - `rehydrate.rs` - post-write re-read of the authoritative projection
//! - `memory.rs` - column-strict in-memory backend for tests and demos

mod adapter;
mod interface;
mod memory;
mod rehydrate;

pub use adapter::PersistenceAdapter;
pub use interface::{RowStore, StoreRejection, StoreResult};
pub use memory::{DeriveFn, MemoryStore};
pub use rehydrate::Rehydrator;
