//! Routing and migration between the two backends.

use std::sync::Arc;

use pdash_types::{RawForest, StorageOption};
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::traits::{has_data, HierarchyBackend};

/// Pairs the settings and global-state backends behind one contract.
///
/// The active backend is chosen by the "use settings storage" flag. The
/// adapter never decides to auto-populate a backend that was explicitly
/// emptied: [`migrate_if_needed`](Self::migrate_if_needed) only fills a
/// backend that has never been written.
#[derive(Clone)]
pub struct StoreAdapter {
    settings: Arc<dyn HierarchyBackend>,
    global_state: Arc<dyn HierarchyBackend>,
    use_settings_storage: bool,
}

impl StoreAdapter {
    pub fn new(
        settings: Arc<dyn HierarchyBackend>,
        global_state: Arc<dyn HierarchyBackend>,
        use_settings_storage: bool,
    ) -> Self {
        Self {
            settings,
            global_state,
            use_settings_storage,
        }
    }

    /// Change which backend is active. Does not move any data.
    pub fn set_use_settings_storage(&mut self, use_settings_storage: bool) {
        self.use_settings_storage = use_settings_storage;
    }

    /// The backend selected by configuration.
    pub fn active_backend(&self) -> StorageOption {
        StorageOption::from_flag(self.use_settings_storage)
    }

    pub fn backend(&self, option: StorageOption) -> &dyn HierarchyBackend {
        match option {
            StorageOption::Settings => self.settings.as_ref(),
            StorageOption::GlobalState => self.global_state.as_ref(),
        }
    }

    /// Read a backend, `None` meaning never written.
    pub async fn read(&self, option: StorageOption) -> StoreResult<Option<RawForest>> {
        self.backend(option).read().await
    }

    pub async fn write(&self, option: StorageOption, forest: &RawForest) -> StoreResult<()> {
        self.backend(option).write(forest).await
    }

    /// Read the active backend, coercing "never written" to empty.
    pub async fn read_active(&self) -> StoreResult<RawForest> {
        self.backend(self.active_backend()).read_or_empty().await
    }

    pub async fn write_active(&self, forest: &RawForest) -> StoreResult<()> {
        self.write(self.active_backend(), forest).await
    }

    /// Backends whose forest holds at least one group, in probe order.
    pub async fn backends_with_data(&self) -> StoreResult<Vec<StorageOption>> {
        let mut with_data = Vec::new();
        for option in StorageOption::ALL {
            if has_data(self.read(option).await?.as_ref()) {
                with_data.push(option);
            }
        }
        Ok(with_data)
    }

    /// Returns `true` if a backend other than the active one holds data.
    pub async fn other_backend_has_data(&self) -> StoreResult<bool> {
        let active = self.active_backend();
        Ok(self
            .backends_with_data()
            .await?
            .into_iter()
            .any(|option| option != active))
    }

    /// Copy the inactive backend into the active one if the active backend
    /// has never been written and the inactive one has.
    ///
    /// Returns `true` if data was copied.
    pub async fn migrate_if_needed(&self) -> StoreResult<bool> {
        let active = self.active_backend();
        let inactive = active.other();

        if self.read(active).await?.is_some() {
            debug!(%active, "active backend already written, no migration");
            return Ok(false);
        }
        let Some(source) = self.read(inactive).await? else {
            return Ok(false);
        };

        self.write(active, &source).await?;
        info!(from = %inactive, to = %active, groups = source.len(), "migrated project hierarchy");
        Ok(true)
    }

    /// If the active backend has no groups, fill it from another backend
    /// that does.
    ///
    /// Returns the backend copied from, if any.
    pub async fn copy_filled_to_empty(&self) -> StoreResult<Option<StorageOption>> {
        let active = self.active_backend();
        if has_data(self.read(active).await?.as_ref()) {
            return Ok(None);
        }

        let Some(source) = self
            .backends_with_data()
            .await?
            .into_iter()
            .find(|option| *option != active)
        else {
            return Ok(None);
        };

        let forest = self.read(source).await?.unwrap_or_default();
        self.write(active, &forest).await?;
        info!(from = %source, to = %active, groups = forest.len(), "copied project hierarchy");
        Ok(Some(source))
    }
}
