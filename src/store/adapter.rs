//! Schema-tolerant persistence
//!
//! The adapter submits candidate payloads to the store in order and stops at
//! the first acceptance. Updates, reads and deletes additionally retry under
//! each identifier-column fallback, covering deployments where the primary
//! key itself is named differently. Exhausting every candidate under every
//! identifier column is a hard failure carrying the last rejection.

use crate::core::{Payload, Result, Row, RowId, SyncError};
use crate::schema::{CandidateGenerator, SyncConfig};
use crate::store::interface::{RowStore, StoreRejection};
use std::sync::Arc;
use tracing::debug;

pub struct PersistenceAdapter {
    store: Arc<dyn RowStore>,
    config: SyncConfig,
    generator: CandidateGenerator,
}

impl PersistenceAdapter {
    pub fn new(store: Arc<dyn RowStore>, config: SyncConfig) -> Self {
        let generator = CandidateGenerator::new(config.schemes.clone());
        Self {
            store,
            config,
            generator,
        }
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    fn exhausted(&self, last: StoreRejection) -> SyncError {
        SyncError::SchemaExhausted {
            table: self.config.table.clone(),
            detail: last.to_string(),
        }
    }

    /// Insert a new row, trying each candidate payload in order.
    pub async fn insert(&self, patch: &Payload) -> Result<RowId> {
        let candidates = self.generator.candidates(patch);
        if candidates.is_empty() {
            return Err(SyncError::EmptyPatch);
        }

        let mut last = StoreRejection::new("no candidate attempted");
        for (index, payload) in candidates.iter().enumerate() {
            match self.store.create(&self.config.table, payload).await {
                Ok(id) => return Ok(id),
                Err(rejection) => {
                    debug!(
                        table = %self.config.table,
                        candidate = index,
                        error = %rejection,
                        "create candidate rejected"
                    );
                    last = rejection;
                }
            }
        }
        Err(self.exhausted(last))
    }

    /// Update a row, trying every candidate payload under every
    /// identifier-column fallback.
    pub async fn update(&self, id: &RowId, patch: &Payload) -> Result<()> {
        let candidates = self.generator.candidates(patch);
        if candidates.is_empty() {
            return Err(SyncError::EmptyPatch);
        }

        let mut last = StoreRejection::new("no candidate attempted");
        for id_column in &self.config.id_columns {
            for (index, payload) in candidates.iter().enumerate() {
                match self
                    .store
                    .update(&self.config.table, id_column, id, payload)
                    .await
                {
                    Ok(()) => return Ok(()),
                    Err(rejection) => {
                        debug!(
                            table = %self.config.table,
                            %id_column,
                            candidate = index,
                            error = %rejection,
                            "update candidate rejected"
                        );
                        last = rejection;
                    }
                }
            }
        }
        Err(self.exhausted(last))
    }

    /// Read one row from the authoritative projection, retrying under each
    /// identifier-column fallback.
    pub async fn lookup_by_id(&self, id: &RowId) -> Result<Row> {
        let mut last = StoreRejection::new("no identifier column attempted");
        for id_column in &self.config.id_columns {
            match self
                .store
                .read_one(&self.config.projection, id_column, id)
                .await
            {
                Ok(row) => return Ok(row),
                Err(rejection) => {
                    debug!(
                        projection = %self.config.projection,
                        %id_column,
                        error = %rejection,
                        "lookup rejected"
                    );
                    last = rejection;
                }
            }
        }
        Err(self.exhausted(last))
    }

    /// Delete a row, retrying under each identifier-column fallback.
    pub async fn delete(&self, id: &RowId) -> Result<()> {
        let mut last = StoreRejection::new("no identifier column attempted");
        for id_column in &self.config.id_columns {
            match self.store.delete(&self.config.table, id_column, id).await {
                Ok(()) => return Ok(()),
                Err(rejection) => {
                    debug!(
                        table = %self.config.table,
                        %id_column,
                        error = %rejection,
                        "delete rejected"
                    );
                    last = rejection;
                }
            }
        }
        Err(self.exhausted(last))
    }
}
