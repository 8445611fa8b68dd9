pub mod error;
pub mod row;

pub use error::{Result, SyncError};
pub use row::{Payload, Row, RowId};
