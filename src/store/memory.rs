//! In-memory store backend
//!
//! A column-strict [`RowStore`] used as the default test backend and as the
//! reference implementation of the store contract. Each table declares its
//! physical columns up front and rejects any payload or identifier column it
//! does not know, which is exactly the behavior the schema-tolerant adapter
//! exists to absorb.

use crate::core::{Payload, Row, RowId};
use crate::store::interface::{RowStore, StoreRejection, StoreResult};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Computes server-side derived fields for a projection read.
pub type DeriveFn = Box<dyn Fn(&Payload) -> Payload + Send + Sync>;

struct MemoryTable {
    id_column: String,
    columns: HashSet<String>,
    rows: Vec<Payload>,
}

impl MemoryTable {
    fn position(&self, id_column: &str, id: &RowId) -> StoreResult<usize> {
        if !self.columns.contains(id_column) {
            return Err(StoreRejection::new(format!(
                "unknown identifier column '{id_column}'"
            )));
        }
        let target = id.to_value();
        self.rows
            .iter()
            .position(|row| row.get(id_column) == Some(&target))
            .ok_or_else(|| StoreRejection::new(format!("no row with {id_column} = {id}")))
    }

    fn check_columns(&self, payload: &Payload) -> StoreResult<()> {
        for column in payload.keys() {
            if !self.columns.contains(column) {
                return Err(StoreRejection::new(format!("unknown column '{column}'")));
            }
        }
        Ok(())
    }
}

struct Projection {
    base: String,
    derive: Option<DeriveFn>,
}

/// Column-strict in-memory [`RowStore`]
pub struct MemoryStore {
    tables: HashMap<String, Arc<RwLock<MemoryTable>>>,
    projections: HashMap<String, Projection>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
            projections: HashMap::new(),
        }
    }

    /// Declare a table with its identifier column and full column set. The
    /// identifier column is always part of the column set.
    pub fn define_table(&mut self, name: &str, id_column: &str, columns: &[&str]) {
        let mut set: HashSet<String> = columns.iter().map(|c| c.to_string()).collect();
        set.insert(id_column.to_string());
        self.tables.insert(
            name.to_string(),
            Arc::new(RwLock::new(MemoryTable {
                id_column: id_column.to_string(),
                columns: set,
                rows: Vec::new(),
            })),
        );
    }

    /// Declare a read projection over a base table.
    pub fn define_projection(&mut self, name: &str, base: &str) {
        self.projections.insert(
            name.to_string(),
            Projection {
                base: base.to_string(),
                derive: None,
            },
        );
    }

    /// Declare a read projection that adds server-computed fields on read.
    pub fn define_projection_with(&mut self, name: &str, base: &str, derive: DeriveFn) {
        self.projections.insert(
            name.to_string(),
            Projection {
                base: base.to_string(),
                derive: Some(derive),
            },
        );
    }

    fn table(&self, name: &str) -> StoreResult<Arc<RwLock<MemoryTable>>> {
        self.tables
            .get(name)
            .cloned()
            .ok_or_else(|| StoreRejection::new(format!("table '{name}' not found")))
    }

    pub async fn row_count(&self, table: &str) -> StoreResult<usize> {
        let handle = self.table(table)?;
        let table = handle.read().await;
        Ok(table.rows.len())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn create(&self, table: &str, payload: &Payload) -> StoreResult<RowId> {
        let handle = self.table(table)?;
        let mut table = handle.write().await;
        table.check_columns(payload)?;

        let id = match payload.get(&table.id_column).and_then(RowId::from_value) {
            Some(id) => {
                if table.position(&table.id_column.clone(), &id).is_ok() {
                    return Err(StoreRejection::new(format!("duplicate identifier {id}")));
                }
                id
            }
            None => RowId::Text(Uuid::new_v4().to_string()),
        };

        let mut row = payload.clone();
        row.insert(table.id_column.clone(), id.to_value());
        table.rows.push(row);
        Ok(id)
    }

    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id: &RowId,
        payload: &Payload,
    ) -> StoreResult<()> {
        let handle = self.table(table)?;
        let mut table = handle.write().await;
        table.check_columns(payload)?;
        let position = table.position(id_column, id)?;
        for (column, value) in payload {
            table.rows[position].insert(column.clone(), value.clone());
        }
        Ok(())
    }

    async fn read_one(&self, projection: &str, id_column: &str, id: &RowId) -> StoreResult<Row> {
        // A projection name that was never declared may still name a table
        // directly (deployments without a dedicated admin view).
        let (base, derive) = match self.projections.get(projection) {
            Some(p) => (p.base.as_str(), p.derive.as_ref()),
            None => (projection, None),
        };

        let handle = self.table(base)?;
        let table = handle.read().await;
        let position = table.position(id_column, id)?;

        let mut fields = table.rows[position].clone();
        if let Some(derive) = derive {
            for (column, value) in derive(&table.rows[position]) {
                fields.insert(column, value);
            }
        }
        Ok(Row::from(fields))
    }

    async fn delete(&self, table: &str, id_column: &str, id: &RowId) -> StoreResult<()> {
        let handle = self.table(table)?;
        let mut table = handle.write().await;
        let position = table.position(id_column, id)?;
        table.rows.remove(position);
        Ok(())
    }
}
