use crate::core::{Payload, Row, RowId};
use async_trait::async_trait;
use thiserror::Error;

/// An opaque rejection from the backing store.
///
/// The engine never parses rejection contents to decide what to do next;
/// any rejection advances the adapter to the next candidate.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StoreRejection(pub String);

impl StoreRejection {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreRejection>;

/// The engine's only external boundary.
///
/// Implement this against whatever transport the deployment uses (HTTP RPC,
/// a SQL driver, [`MemoryStore`](crate::store::MemoryStore) in tests). Each
/// call receives fully concrete column names; all schema guessing happens
/// above this trait in the persistence adapter.
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Insert a row, returning the identifier the store assigned or kept.
    async fn create(&self, table: &str, payload: &Payload) -> StoreResult<RowId>;

    /// Update the row whose `id_column` equals `id`.
    async fn update(
        &self,
        table: &str,
        id_column: &str,
        id: &RowId,
        payload: &Payload,
    ) -> StoreResult<()>;

    /// Read one row from a projection by identifier.
    async fn read_one(&self, projection: &str, id_column: &str, id: &RowId) -> StoreResult<Row>;

    /// Delete the row whose `id_column` equals `id`.
    async fn delete(&self, table: &str, id_column: &str, id: &RowId) -> StoreResult<()>;
}
