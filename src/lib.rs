//! # fieldsync
//!
//! Optimistic field-synchronization engine for admin consoles editing
//! reference data against a store whose exact column names are not reliably
//! known at build time.
//!
//! Every edit applies to local state immediately; the store write is
//! debounced per (row, field), sequence-guarded against superseded edits,
//! attempted under an ordered list of candidate column schemes, and followed
//! by a re-read of the authoritative projection.
//!
//! # Examples
//!
//! ```
//! use fieldsync::{ColumnScheme, MemoryStore, SyncConfig, SyncEngine};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # tokio_test::block_on(async {
//! let mut store = MemoryStore::new();
//! store.define_table("company", "company_id", &["name", "active"]);
//!
//! let config = SyncConfig::new("company")
//!     .id_columns(&["company_id", "id"])
//!     .scheme(ColumnScheme::new("legacy").map("name", "entity_name"))
//!     .scheme(ColumnScheme::new("canonical").map("name", "name"));
//!
//! let engine = SyncEngine::new(Arc::new(store), config).unwrap();
//!
//! // Insert succeeds on the second candidate scheme.
//! let row = engine
//!     .create(&[("name".to_string(), json!("Acme"))].into_iter().collect())
//!     .await
//!     .unwrap();
//! let id = row.resolve_id(&["company_id".to_string()]).unwrap();
//!
//! // Edits land locally at once; the write fires after the quiet period.
//! engine.edit(&id, "name", json!("Acme Corp"));
//! assert_eq!(engine.row(&id).unwrap().get("name"), Some(&json!("Acme Corp")));
//! engine.shutdown();
//! # });
//! ```

pub mod core;
pub mod engine;
pub mod schema;
pub mod store;

// Re-export main types for convenience
pub use crate::core::{Payload, Result, Row, RowId, SyncError};
pub use crate::engine::{ChannelSink, FaultSink, FieldFault, LogSink, SyncEngine};
pub use crate::schema::{ColumnScheme, DEFAULT_DEBOUNCE, SyncConfig};
pub use crate::store::{MemoryStore, RowStore, StoreRejection, StoreResult};
