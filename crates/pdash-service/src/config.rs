use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ServiceError, ServiceResult};

/// Configuration consumed (never written) by the hierarchy service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Persist in the settings-style backend instead of global state.
    pub use_settings_storage: bool,
    /// Insert new projects at the front of their group instead of the back.
    pub add_new_project_to_front: bool,
    /// How many distinct recent colors to remember.
    pub max_recent_colors: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            use_settings_storage: false,
            add_new_project_to_front: false,
            max_recent_colors: 10,
        }
    }
}

impl ServiceConfig {
    pub fn from_toml_str(text: &str) -> ServiceResult<Self> {
        toml::from_str(text).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Load from `path`, falling back to defaults when the file is absent.
    pub fn load(path: &Path) -> ServiceResult<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml_str(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn to_toml_string(&self) -> ServiceResult<String> {
        toml::to_string_pretty(self).map_err(|e| ServiceError::Config(e.to_string()))
    }
}
