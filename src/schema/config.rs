use crate::core::{Result, SyncError};
use std::collections::HashMap;
use std::time::Duration;

/// Quiet period a field must see before its pending write fires.
///
/// Uniform across all fields and entity kinds; override per engine with
/// [`SyncConfig::debounce`].
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(450);

/// How one logical field lands in a payload under a given scheme: the
/// physical column that receives the value, plus any sibling columns that
/// must carry the same value in the same payload.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldMapping {
    pub column: String,
    pub mirrors: Vec<String>,
}

/// One ordered guess at a deployment's physical column names.
///
/// A scheme maps logical field names to [`FieldMapping`]s. Logical fields a
/// scheme does not mention pass through under their logical name when
/// candidates are generated.
#[derive(Debug, Clone)]
pub struct ColumnScheme {
    name: String,
    mappings: HashMap<String, FieldMapping>,
}

impl ColumnScheme {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            mappings: HashMap::new(),
        }
    }

    /// Map a logical field to a physical column
    pub fn map(mut self, logical: &str, column: &str) -> Self {
        self.mappings.insert(
            logical.to_string(),
            FieldMapping {
                column: column.to_string(),
                mirrors: Vec::new(),
            },
        );
        self
    }

    /// Map a logical field to a physical column plus sibling columns that
    /// must be set together with it
    pub fn map_with_mirrors(mut self, logical: &str, column: &str, mirrors: &[&str]) -> Self {
        self.mappings.insert(
            logical.to_string(),
            FieldMapping {
                column: column.to_string(),
                mirrors: mirrors.iter().map(|m| m.to_string()).collect(),
            },
        );
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mapping(&self, logical: &str) -> Option<&FieldMapping> {
        self.mappings.get(logical)
    }
}

/// Per-entity-kind synchronization configuration
///
/// One config drives one [`SyncEngine`](crate::SyncEngine) instance: the
/// write target table, the authoritative read projection, the ordered
/// identifier-column fallbacks, and the ordered column schemes tried against
/// the store.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Base relation writes land on
    pub table: String,

    /// Read-optimized projection rows are re-fetched from after a write
    pub projection: String,

    /// Identifier column names, in resolution priority order
    pub id_columns: Vec<String>,

    /// Column schemes, in attempt order (canonical scheme first)
    pub schemes: Vec<ColumnScheme>,

    /// Debounce delay for coalesced field writes
    pub debounce: Duration,
}

impl SyncConfig {
    /// Create a configuration for one entity kind. The projection defaults
    /// to the table itself and the identifier column to `id`.
    pub fn new(table: &str) -> Self {
        Self {
            table: table.to_string(),
            projection: table.to_string(),
            id_columns: vec!["id".to_string()],
            schemes: Vec::new(),
            debounce: DEFAULT_DEBOUNCE,
        }
    }

    /// Set the authoritative read projection
    pub fn projection(mut self, projection: &str) -> Self {
        self.projection = projection.to_string();
        self
    }

    /// Replace the identifier-column fallback list
    pub fn id_columns(mut self, columns: &[&str]) -> Self {
        self.id_columns = columns.iter().map(|c| c.to_string()).collect();
        self
    }

    /// Append a column scheme (schemes are tried in insertion order)
    pub fn scheme(mut self, scheme: ColumnScheme) -> Self {
        self.schemes.push(scheme);
        self
    }

    /// Set the debounce delay
    pub fn debounce(mut self, delay: Duration) -> Self {
        self.debounce = delay;
        self
    }

    /// Set the debounce delay in milliseconds
    pub fn debounce_ms(self, millis: u64) -> Self {
        self.debounce(Duration::from_millis(millis))
    }

    /// Identifier column tried first for writes and reads
    pub fn primary_id_column(&self) -> &str {
        &self.id_columns[0]
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.table.is_empty() {
            return Err(SyncError::InvalidConfig("table cannot be empty".into()));
        }

        if self.projection.is_empty() {
            return Err(SyncError::InvalidConfig(
                "projection cannot be empty".into(),
            ));
        }

        if self.id_columns.is_empty() {
            return Err(SyncError::InvalidConfig(
                "at least one identifier column is required".into(),
            ));
        }

        if self.schemes.is_empty() {
            return Err(SyncError::InvalidConfig(
                "at least one column scheme is required".into(),
            ));
        }

        Ok(())
    }
}
