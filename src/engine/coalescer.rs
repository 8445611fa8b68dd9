//! Debounced write coalescing
//!
//! One logical timer per (row, field) key. Arming a key increments its
//! sequence counter, aborts any existing timer and starts a fresh delay
//! carrying the new sequence number. When the delay elapses the carried
//! sequence is checked against the counter under the same lock that arming
//! takes; a stale fire is a silent no-op, so only the last-armed write for a
//! key ever reaches the store. Independent keys run fully concurrently.

use crate::core::RowId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

/// Coalescing key: one row's one logical field.
pub type FieldKey = (RowId, String);

struct Armed {
    seq: u64,
    timer: JoinHandle<()>,
}

#[derive(Default)]
struct Inner {
    seqs: HashMap<FieldKey, u64>,
    armed: HashMap<FieldKey, Armed>,
}

pub struct WriteCoalescer {
    delay: Duration,
    inner: Arc<Mutex<Inner>>,
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    // Every critical section is a plain map edit, so a poisoned lock still
    // holds consistent maps.
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

impl WriteCoalescer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            inner: Arc::new(Mutex::new(Inner::default())),
        }
    }

    /// Arm (or re-arm) the timer for `key`. After the delay elapses with no
    /// newer arm for the same key, `task` runs. A re-arm before then cancels
    /// this one entirely.
    pub fn arm<F, Fut>(&self, key: FieldKey, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut inner = lock(&self.inner);

        let counter = inner.seqs.entry(key.clone()).or_insert(0);
        *counter += 1;
        let seq = *counter;

        if let Some(previous) = inner.armed.remove(&key) {
            previous.timer.abort();
        }

        let delay = self.delay;
        let shared = Arc::clone(&self.inner);
        let timer_key = key.clone();
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut inner = lock(&shared);
                match inner.seqs.get(&timer_key) {
                    Some(current) if *current == seq => {
                        inner.armed.remove(&timer_key);
                    }
                    _ => {
                        trace!(row = %timer_key.0, field = %timer_key.1, seq, "superseded write skipped");
                        return;
                    }
                }
            }
            task().await;
        });

        // Still holding the lock, so the fresh timer cannot observe the maps
        // before this entry lands.
        inner.armed.insert(key, Armed { seq, timer });
    }

    /// Cancel the pending write for `key`, if any. Bumps the sequence so a
    /// timer already past its sleep still no-ops. Returns whether a write
    /// was armed.
    pub fn cancel(&self, key: &FieldKey) -> bool {
        let mut inner = lock(&self.inner);
        if let Some(counter) = inner.seqs.get_mut(key) {
            *counter += 1;
        }
        match inner.armed.remove(key) {
            Some(armed) => {
                armed.timer.abort();
                true
            }
            None => false,
        }
    }

    /// Cancel every pending write for one row (delete path).
    pub fn cancel_row(&self, id: &RowId) {
        let mut inner = lock(&self.inner);
        let keys: Vec<FieldKey> = inner
            .armed
            .keys()
            .filter(|(row, _)| row == id)
            .cloned()
            .collect();
        for key in keys {
            if let Some(counter) = inner.seqs.get_mut(&key) {
                *counter += 1;
            }
            if let Some(armed) = inner.armed.remove(&key) {
                armed.timer.abort();
            }
        }
    }

    /// Cancel everything (session teardown). Nothing fires after this.
    pub fn cancel_all(&self) {
        let mut inner = lock(&self.inner);
        for counter in inner.seqs.values_mut() {
            *counter += 1;
        }
        for (_, armed) in inner.armed.drain() {
            armed.timer.abort();
        }
    }

    /// Number of currently armed writes.
    pub fn pending(&self) -> usize {
        lock(&self.inner).armed.len()
    }

    pub fn is_armed(&self, key: &FieldKey) -> bool {
        lock(&self.inner).armed.contains_key(key)
    }
}

impl Drop for WriteCoalescer {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
