use crate::core::row::RowId;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum SyncError {
    /// Every payload candidate under every identifier-column fallback was
    /// rejected by the store. Carries the last rejection, which came from the
    /// most permissive guess and is therefore the most informative one.
    #[error("all payload candidates rejected for '{table}': {detail}")]
    SchemaExhausted { table: String, detail: String },

    /// The write was accepted but the post-write read of the authoritative
    /// projection failed. The local value is unconfirmed, not wrong.
    #[error("row {id} saved but could not be confirmed: {detail}")]
    Rehydration { id: RowId, detail: String },

    /// A loaded or rehydrated row carries no non-null value under any of the
    /// configured identifier columns.
    #[error("row has no resolvable identifier (tried: {tried})")]
    UnresolvedId { tried: String },

    #[error("row {0} not found")]
    RowNotFound(RowId),

    #[error("patch contains no fields")]
    EmptyPatch,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, SyncError>;
