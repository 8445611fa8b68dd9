//! Column-scheme configuration and candidate payload generation
//!
//! - `config.rs` - per-entity-kind configuration (`SyncConfig`, `ColumnScheme`)
//! - `candidates.rs` - ordered candidate payload generation

mod candidates;
mod config;

pub use candidates::CandidateGenerator;
pub use config::{ColumnScheme, DEFAULT_DEBOUNCE, FieldMapping, SyncConfig};
