use crate::core::{Row, RowId};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// The in-memory row table presented to display consumers.
///
/// Edits land here synchronously and unconditionally, before anything is
/// scheduled against the store; local responsiveness is the point of the
/// whole design. Confirmed writes replace rows wholesale via
/// [`StateStore::replace_row`], never per-field merges, so server-computed
/// fields populate correctly.
#[derive(Clone)]
pub struct StateStore {
    rows: Arc<RwLock<HashMap<RowId, Row>>>,
    primary_id_column: String,
}

impl StateStore {
    pub fn new(primary_id_column: &str) -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
            primary_id_column: primary_id_column.to_string(),
        }
    }

    /// Apply an edit to local state. Never blocks behind a pending write and
    /// never fails: an edit to a row not yet loaded materializes a stub row
    /// holding the identifier and the edited field.
    pub fn apply_optimistic(&self, id: &RowId, field: &str, value: JsonValue) {
        let mut rows = self
            .rows
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let row = rows.entry(id.clone()).or_insert_with(|| {
            let mut stub = Row::new();
            stub.set(&self.primary_id_column, id.to_value());
            stub
        });
        row.set(field, value);
    }

    /// Replace a row with its canonical post-write projection. Inserts the
    /// row if it was not loaded (create path).
    pub fn replace_row(&self, id: &RowId, row: Row) {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), row);
    }

    pub fn remove_row(&self, id: &RowId) -> Option<Row> {
        self.rows
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn row(&self, id: &RowId) -> Option<Row> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Snapshot of all rows, in no particular order.
    pub fn rows(&self) -> Vec<Row> {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.rows
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
