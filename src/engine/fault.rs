use crate::core::{RowId, SyncError};
use chrono::{DateTime, Utc};
use std::fmt;
use tokio::sync::mpsc;
use tracing::warn;

/// A failed background write, reported at (row, field) granularity.
///
/// Faults are never aggregated: a user editing ten fields across five rows
/// sees exactly which ones failed. The optimistic value stays on screen;
/// the fault is the out-of-band signal.
#[derive(Debug, Clone)]
pub struct FieldFault {
    pub at: DateTime<Utc>,
    pub table: String,
    pub row: RowId,
    pub field: String,
    pub error: SyncError,
}

impl FieldFault {
    pub fn new(table: &str, row: RowId, field: &str, error: SyncError) -> Self {
        Self {
            at: Utc::now(),
            table: table.to_string(),
            row,
            field: field.to_string(),
            error,
        }
    }

    /// Whether the write itself landed ("saved, but could not confirm").
    pub fn is_unconfirmed_save(&self) -> bool {
        matches!(self.error, SyncError::Rehydration { .. })
    }
}

impl fmt::Display for FieldFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} on row {}: {}",
            self.table, self.field, self.row, self.error
        )
    }
}

/// Destination for background write failures.
pub trait FaultSink: Send + Sync {
    fn report(&self, fault: FieldFault);
}

/// Default sink: log and move on.
pub struct LogSink;

impl FaultSink for LogSink {
    fn report(&self, fault: FieldFault) {
        warn!(
            table = %fault.table,
            row = %fault.row,
            field = %fault.field,
            error = %fault.error,
            "field write failed"
        );
    }
}

/// Sink that forwards faults over an unbounded channel, for consumers that
/// render error banners (and for tests).
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<FieldFault>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<FieldFault>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl FaultSink for ChannelSink {
    fn report(&self, fault: FieldFault) {
        // A dropped receiver means the consuming UI is gone; nothing to do.
        let _ = self.tx.send(fault);
    }
}
