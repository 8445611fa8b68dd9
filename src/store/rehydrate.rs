use crate::core::{Result, Row, RowId, SyncError};
use crate::store::adapter::PersistenceAdapter;
use std::sync::Arc;

/// Post-write re-read of the authoritative projection.
///
/// The write target and the read projection are allowed to diverge (writes
/// land on a base relation; reads return a denormalized view with
/// server-computed fields), so the rehydrator never trusts the write path's
/// own response. Called exactly once after every successful insert or
/// update, never speculatively.
#[derive(Clone)]
pub struct Rehydrator {
    adapter: Arc<PersistenceAdapter>,
}

impl Rehydrator {
    pub fn new(adapter: Arc<PersistenceAdapter>) -> Self {
        Self { adapter }
    }

    /// Fetch the canonical row for `id`.
    ///
    /// A projection row that resolves to no identifier is treated as a
    /// rehydration failure: the caller could never reconcile it back into
    /// keyed state.
    pub async fn rehydrate(&self, id: &RowId) -> Result<Row> {
        let row = self
            .adapter
            .lookup_by_id(id)
            .await
            .map_err(|err| SyncError::Rehydration {
                id: id.clone(),
                detail: err.to_string(),
            })?;

        row.resolve_id(&self.adapter.config().id_columns)
            .map_err(|err| SyncError::Rehydration {
                id: id.clone(),
                detail: err.to_string(),
            })?;

        Ok(row)
    }
}
