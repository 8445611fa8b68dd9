use crate::core::{Payload, Result, Row, RowId, SyncError};
use crate::engine::coalescer::WriteCoalescer;
use crate::engine::fault::{FaultSink, FieldFault, LogSink};
use crate::engine::state::StateStore;
use crate::schema::SyncConfig;
use crate::store::{PersistenceAdapter, Rehydrator, RowStore};
use serde_json::Value as JsonValue;
use std::sync::Arc;

/// Everything a fired write needs, cloned into each armed timer task.
#[derive(Clone)]
struct Committer {
    adapter: Arc<PersistenceAdapter>,
    rehydrator: Rehydrator,
    state: StateStore,
    sink: Arc<dyn FaultSink>,
    table: String,
}

impl Committer {
    async fn commit_field(self, id: RowId, field: String, value: JsonValue) {
        let mut patch = Payload::new();
        patch.insert(field.clone(), value);

        match self.adapter.update(&id, &patch).await {
            Ok(()) => match self.rehydrator.rehydrate(&id).await {
                Ok(row) => self.state.replace_row(&id, row),
                Err(err) => self.sink.report(FieldFault::new(&self.table, id, &field, err)),
            },
            // Optimistic value stays on screen; the fault is the out-of-band
            // signal.
            Err(err) => self.sink.report(FieldFault::new(&self.table, id, &field, err)),
        }
    }
}

/// Optimistic field-synchronization engine for one entity kind.
///
/// One instance owns one table/session worth of state: the optimistic row
/// cache, the per-field debounce timers and sequence counters, and the
/// schema-tolerant adapter over the backing store. Edits apply locally at
/// once; the confirmed write happens in the background after the debounce
/// quiet period, followed by a re-read of the authoritative projection.
///
/// Dropping the engine (or calling [`SyncEngine::shutdown`]) cancels every
/// pending write; nothing fires after teardown.
pub struct SyncEngine {
    config: SyncConfig,
    adapter: Arc<PersistenceAdapter>,
    rehydrator: Rehydrator,
    state: StateStore,
    coalescer: WriteCoalescer,
    sink: Arc<dyn FaultSink>,
}

impl SyncEngine {
    /// Create an engine over a store. Background write failures go to the
    /// default logging sink; use [`SyncEngine::with_fault_sink`] to receive
    /// them instead.
    pub fn new(store: Arc<dyn RowStore>, config: SyncConfig) -> Result<Self> {
        config.validate()?;
        let adapter = Arc::new(PersistenceAdapter::new(store, config.clone()));
        let rehydrator = Rehydrator::new(adapter.clone());
        let state = StateStore::new(config.primary_id_column());
        let coalescer = WriteCoalescer::new(config.debounce);
        Ok(Self {
            config,
            adapter,
            rehydrator,
            state,
            coalescer,
            sink: Arc::new(LogSink),
        })
    }

    /// Replace the fault sink
    pub fn with_fault_sink(mut self, sink: Arc<dyn FaultSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Bulk-load rows from the initial read. Every row must resolve an
    /// identifier; returns how many rows were loaded.
    pub fn load_rows(&self, rows: Vec<Row>) -> Result<usize> {
        let mut loaded = 0;
        for row in rows {
            let id = row.resolve_id(&self.config.id_columns)?;
            self.state.replace_row(&id, row);
            loaded += 1;
        }
        Ok(loaded)
    }

    pub fn row(&self, id: &RowId) -> Option<Row> {
        self.state.row(id)
    }

    pub fn rows(&self) -> Vec<Row> {
        self.state.rows()
    }

    /// Number of edits waiting out their debounce delay.
    pub fn pending_writes(&self) -> usize {
        self.coalescer.pending()
    }

    /// Apply an edit.
    ///
    /// The value lands in local state immediately and unconditionally. The
    /// store write is armed behind the debounce delay; rapid repeated edits
    /// to the same field collapse into a single write carrying the final
    /// value. A failed background write keeps the optimistic value on
    /// screen and reports through the fault sink.
    pub fn edit(&self, id: &RowId, field: &str, value: JsonValue) {
        self.state.apply_optimistic(id, field, value.clone());

        let key = (id.clone(), field.to_string());
        let committer = self.committer();
        let id = id.clone();
        let field = field.to_string();
        self.coalescer
            .arm(key, move || committer.commit_field(id, field, value));
    }

    /// Fire the pending write for one field now, skipping the remaining
    /// debounce delay. A no-op when nothing is armed. Unlike the debounced
    /// path, failures come back to the caller directly.
    pub async fn flush(&self, id: &RowId, field: &str) -> Result<()> {
        let key = (id.clone(), field.to_string());
        if !self.coalescer.cancel(&key) {
            return Ok(());
        }

        let value = self
            .state
            .row(id)
            .and_then(|row| row.get(field).cloned())
            .ok_or_else(|| SyncError::RowNotFound(id.clone()))?;

        let mut patch = Payload::new();
        patch.insert(field.to_string(), value);
        self.adapter.update(id, &patch).await?;

        let row = self.rehydrator.rehydrate(id).await?;
        self.state.replace_row(id, row);
        Ok(())
    }

    /// Create a row: insert, rehydrate, load into local state. Not
    /// debounced.
    pub async fn create(&self, patch: &Payload) -> Result<Row> {
        let id = self.adapter.insert(patch).await?;
        let row = self.rehydrator.rehydrate(&id).await?;
        self.state.replace_row(&id, row.clone());
        Ok(row)
    }

    /// Delete a row: cancel its pending writes, delete at the store, drop
    /// it from local state. Not debounced.
    pub async fn delete(&self, id: &RowId) -> Result<()> {
        self.coalescer.cancel_row(id);
        self.adapter.delete(id).await?;
        self.state.remove_row(id);
        Ok(())
    }

    /// Cancel every pending write. Safe to call more than once; `Drop` does
    /// the same.
    pub fn shutdown(&self) {
        self.coalescer.cancel_all();
    }

    fn committer(&self) -> Committer {
        Committer {
            adapter: self.adapter.clone(),
            rehydrator: self.rehydrator.clone(),
            state: self.state.clone(),
            sink: self.sink.clone(),
            table: self.config.table.clone(),
        }
    }
}
