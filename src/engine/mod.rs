//! The synchronization engine
//!
//! - `coalescer.rs` - debounced, sequence-guarded write coalescing
//! - `state.rs` - the optimistic in-memory row cache
//! - `fault.rs` - background write failure reporting
//! - `engine.rs` - the `SyncEngine` facade tying the pipeline together

#![allow(clippy::module_inception)]

mod coalescer;
mod engine;
mod fault;
mod state;

pub use coalescer::{FieldKey, WriteCoalescer};
pub use engine::SyncEngine;
pub use fault::{ChannelSink, FaultSink, FieldFault, LogSink};
pub use state::StateStore;
