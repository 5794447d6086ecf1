use async_trait::async_trait;
use pdash_types::RawForest;

use crate::error::StoreResult;

/// A key-value backend holding the entire forest under one key.
///
/// Implementations must distinguish "never written" (`Ok(None)`) from an
/// explicitly empty forest (`Ok(Some(vec![]))`): migration relies on it.
#[async_trait]
pub trait HierarchyBackend: Send + Sync {
    /// Read the stored forest, or `None` if nothing was ever written.
    async fn read(&self) -> StoreResult<Option<RawForest>>;

    /// Overwrite the stored forest.
    async fn write(&self, forest: &RawForest) -> StoreResult<()>;

    /// Read, treating "never written" as an empty forest.
    async fn read_or_empty(&self) -> StoreResult<RawForest> {
        Ok(self.read().await?.unwrap_or_default())
    }
}

/// Returns `true` if the forest holds at least one non-null group.
pub fn has_data(forest: Option<&RawForest>) -> bool {
    forest.is_some_and(|f| f.iter().any(Option::is_some))
}
