/// Persistence adapter tests
///
/// Candidate ordering, identifier-column fallback and exhaustion behavior
/// against a store that records every attempt.
/// Run with: cargo test --test adapter_tests
use async_trait::async_trait;
use fieldsync::store::PersistenceAdapter;
use fieldsync::{
    ColumnScheme, Payload, Row, RowId, RowStore, StoreRejection, StoreResult, SyncConfig,
    SyncError,
};
use serde_json::json;
use std::sync::{Arc, Mutex};

/// Accepts only configured payload columns and identifier columns; records
/// every attempt as "op/id_column/col1+col2".
struct RecordingStore {
    accepted_columns: Vec<String>,
    accepted_id_columns: Vec<String>,
    attempts: Mutex<Vec<String>>,
}

impl RecordingStore {
    fn new(accepted_columns: &[&str], accepted_id_columns: &[&str]) -> Self {
        Self {
            accepted_columns: accepted_columns.iter().map(|c| c.to_string()).collect(),
            accepted_id_columns: accepted_id_columns.iter().map(|c| c.to_string()).collect(),
            attempts: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, op: &str, id_column: &str, payload: &Payload) {
        let columns: Vec<&str> = payload.keys().map(|k| k.as_str()).collect();
        self.attempts
            .lock()
            .unwrap()
            .push(format!("{op}/{id_column}/{}", columns.join("+")));
    }

    fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap().clone()
    }

    fn accepts_payload(&self, payload: &Payload) -> bool {
        payload.keys().all(|c| self.accepted_columns.contains(c))
    }

    fn accepts_id_column(&self, id_column: &str) -> bool {
        self.accepted_id_columns.contains(&id_column.to_string())
    }
}

#[async_trait]
impl RowStore for RecordingStore {
    async fn create(&self, _table: &str, payload: &Payload) -> StoreResult<RowId> {
        self.record("create", "-", payload);
        if self.accepts_payload(payload) {
            Ok(RowId::Int(1))
        } else {
            Err(StoreRejection::new("unknown column in payload"))
        }
    }

    async fn update(
        &self,
        _table: &str,
        id_column: &str,
        _id: &RowId,
        payload: &Payload,
    ) -> StoreResult<()> {
        self.record("update", id_column, payload);
        if !self.accepts_id_column(id_column) {
            return Err(StoreRejection::new(format!(
                "unknown identifier column '{id_column}'"
            )));
        }
        if !self.accepts_payload(payload) {
            return Err(StoreRejection::new("unknown column in payload"));
        }
        Ok(())
    }

    async fn read_one(&self, _projection: &str, id_column: &str, id: &RowId) -> StoreResult<Row> {
        self.record("read", id_column, &Payload::new());
        if !self.accepts_id_column(id_column) {
            return Err(StoreRejection::new(format!(
                "unknown identifier column '{id_column}'"
            )));
        }
        let mut row = Row::new();
        row.set(id_column, id.to_value());
        row.set("name", json!("Acme"));
        Ok(row)
    }

    async fn delete(&self, _table: &str, id_column: &str, _id: &RowId) -> StoreResult<()> {
        self.record("delete", id_column, &Payload::new());
        if self.accepts_id_column(id_column) {
            Ok(())
        } else {
            Err(StoreRejection::new(format!(
                "unknown identifier column '{id_column}'"
            )))
        }
    }
}

fn config() -> SyncConfig {
    SyncConfig::new("company")
        .projection("v_company_admin")
        .id_columns(&["entity_id", "id"])
        .scheme(ColumnScheme::new("legacy").map("name", "entity_name"))
        .scheme(ColumnScheme::new("canonical").map("name", "name"))
}

fn adapter(store: Arc<RecordingStore>) -> PersistenceAdapter {
    PersistenceAdapter::new(store, config())
}

fn name_patch(value: &str) -> Payload {
    let mut patch = Payload::new();
    patch.insert("name".to_string(), json!(value));
    patch
}

#[tokio::test]
async fn test_update_stops_at_first_accepted_candidate() {
    let store = Arc::new(RecordingStore::new(&["name"], &["entity_id", "id"]));
    let adapter = adapter(store.clone());

    adapter
        .update(&RowId::Int(1), &name_patch("Acme"))
        .await
        .unwrap();

    // The legacy candidate is rejected, the canonical one accepted, and no
    // further combination is attempted.
    assert_eq!(
        store.attempts(),
        vec!["update/entity_id/entity_name", "update/entity_id/name"]
    );
}

#[tokio::test]
async fn test_update_falls_back_to_alternate_identifier_column() {
    let store = Arc::new(RecordingStore::new(&["entity_name", "name"], &["id"]));
    let adapter = adapter(store.clone());

    adapter
        .update(&RowId::Int(1), &name_patch("Acme"))
        .await
        .unwrap();

    // Both candidates fail under the primary identifier column, then the
    // full candidate set retries under the fallback and the first one lands.
    assert_eq!(
        store.attempts(),
        vec![
            "update/entity_id/entity_name",
            "update/entity_id/name",
            "update/id/entity_name",
        ]
    );
}

#[tokio::test]
async fn test_update_exhaustion_surfaces_last_error() {
    let store = Arc::new(RecordingStore::new(&[], &[]));
    let adapter = adapter(store.clone());

    let err = adapter
        .update(&RowId::Int(1), &name_patch("Acme"))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::SchemaExhausted { .. }));
    // Every candidate under every identifier column was attempted.
    assert_eq!(store.attempts().len(), 4);
}

#[tokio::test]
async fn test_insert_tries_candidates_in_scheme_order() {
    let store = Arc::new(RecordingStore::new(&["name"], &[]));
    let adapter = adapter(store.clone());

    let id = adapter.insert(&name_patch("Acme")).await.unwrap();
    assert_eq!(id, RowId::Int(1));
    assert_eq!(
        store.attempts(),
        vec!["create/-/entity_name", "create/-/name"]
    );
}

#[tokio::test]
async fn test_insert_empty_patch_is_rejected_locally() {
    let store = Arc::new(RecordingStore::new(&["name"], &["id"]));
    let adapter = adapter(store.clone());

    let err = adapter.insert(&Payload::new()).await.unwrap_err();
    assert!(matches!(err, SyncError::EmptyPatch));
    assert!(store.attempts().is_empty());
}

#[tokio::test]
async fn test_lookup_retries_identifier_columns_in_order() {
    let store = Arc::new(RecordingStore::new(&[], &["id"]));
    let adapter = adapter(store.clone());

    let row = adapter.lookup_by_id(&RowId::Int(7)).await.unwrap();
    assert_eq!(row.get("id"), Some(&json!(7)));
    assert_eq!(store.attempts(), vec!["read/entity_id/", "read/id/"]);
}

#[tokio::test]
async fn test_delete_uses_identifier_fallback() {
    let store = Arc::new(RecordingStore::new(&[], &["id"]));
    let adapter = adapter(store.clone());

    adapter.delete(&RowId::Int(7)).await.unwrap();
    assert_eq!(store.attempts(), vec!["delete/entity_id/", "delete/id/"]);
}
