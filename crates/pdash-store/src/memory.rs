//! In-memory hierarchy backend for testing and ephemeral use.
//!
//! [`InMemoryBackend`] keeps the forest in a single slot behind a
//! `RwLock`. Data is lost when the backend is dropped.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;
use pdash_types::RawForest;

use crate::error::{StoreError, StoreResult};
use crate::traits::HierarchyBackend;

/// An in-memory implementation of [`HierarchyBackend`].
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    slot: RwLock<Option<RawForest>>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
}

impl InMemoryBackend {
    /// Create a backend that has never been written.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend that already holds `forest`.
    pub fn with_forest(forest: RawForest) -> Self {
        Self {
            slot: RwLock::new(Some(forest)),
            ..Self::default()
        }
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Make every subsequent write fail with [`StoreError::Unavailable`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl HierarchyBackend for InMemoryBackend {
    async fn read(&self) -> StoreResult<Option<RawForest>> {
        let slot = self
            .slot
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(slot.clone())
    }

    async fn write(&self, forest: &RawForest) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        let mut slot = self
            .slot
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        *slot = Some(forest.clone());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
