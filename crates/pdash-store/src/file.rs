//! JSON-file hierarchy backend.
//!
//! The forest is stored under one key of a JSON object document, next to
//! whatever else the document holds. A missing file, a missing key, or a
//! `null` value all mean "never written". Writes replace the document
//! atomically via a temp file and rename.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pdash_types::{decode_forest, RawForest};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::HierarchyBackend;

/// Document file of the settings-style backend.
pub const SETTINGS_FILE: &str = "settings.json";
/// Key of the forest inside the settings document.
pub const SETTINGS_KEY: &str = "projectData";
/// Document file of the global-state backend.
pub const GLOBAL_STATE_FILE: &str = "global_state.json";
/// Key of the forest inside the global-state document.
pub const GLOBAL_STATE_KEY: &str = "projects";

/// A [`HierarchyBackend`] persisting to one key of a JSON document.
#[derive(Clone, Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    key: String,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    /// The settings-style backend rooted at `dir`.
    pub fn settings(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILE), SETTINGS_KEY)
    }

    /// The global-state backend rooted at `dir`.
    pub fn global_state(dir: &Path) -> Self {
        Self::new(dir.join(GLOBAL_STATE_FILE), GLOBAL_STATE_KEY)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load_document(&self) -> StoreResult<Option<Map<String, Value>>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if text.trim().is_empty() {
            return Ok(Some(Map::new()));
        }
        let value: Value =
            serde_json::from_str(&text).map_err(|e| StoreError::CorruptDocument {
                path: self.path.display().to_string(),
                reason: e.to_string(),
            })?;
        match value {
            Value::Object(map) => Ok(Some(map)),
            other => Err(StoreError::CorruptDocument {
                path: self.path.display().to_string(),
                reason: format!("expected object, found {}", json_kind(&other)),
            }),
        }
    }
}

#[async_trait]
impl HierarchyBackend for JsonFileBackend {
    async fn read(&self) -> StoreResult<Option<RawForest>> {
        let Some(mut document) = self.load_document().await? else {
            return Ok(None);
        };
        match document.remove(&self.key) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(decode_forest(value))),
        }
    }

    async fn write(&self, forest: &RawForest) -> StoreResult<()> {
        let mut document = self.load_document().await?.unwrap_or_default();
        let value =
            serde_json::to_value(forest).map_err(|e| StoreError::Serialization(e.to_string()))?;
        document.insert(self.key.clone(), value);

        let bytes = serde_json::to_vec_pretty(&Value::Object(document))
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), groups = forest.len(), "wrote forest");
        Ok(())
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
