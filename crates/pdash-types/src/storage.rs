use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The two interchangeable persistence backends.
///
/// `Settings` is the shared, user-visible configuration store; `GlobalState`
/// is an opaque per-user blob store. Exactly one is active at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageOption {
    Settings,
    GlobalState,
}

impl StorageOption {
    /// Every backend, in the order they are probed for data.
    pub const ALL: [StorageOption; 2] = [StorageOption::Settings, StorageOption::GlobalState];

    /// Select the active backend from the "use settings storage" flag.
    pub fn from_flag(use_settings_storage: bool) -> Self {
        if use_settings_storage {
            Self::Settings
        } else {
            Self::GlobalState
        }
    }

    /// The backend that is not `self`.
    pub fn other(&self) -> Self {
        match self {
            Self::Settings => Self::GlobalState,
            Self::GlobalState => Self::Settings,
        }
    }
}

impl fmt::Display for StorageOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settings => write!(f, "settings"),
            Self::GlobalState => write!(f, "global-state"),
        }
    }
}

impl FromStr for StorageOption {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "settings" => Ok(Self::Settings),
            "global-state" | "globalstate" | "global_state" => Ok(Self::GlobalState),
            other => Err(TypeError::UnknownStorageOption(other.to_string())),
        }
    }
}
