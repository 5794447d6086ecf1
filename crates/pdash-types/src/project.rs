use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::id::generate_id;

/// URI prefix of projects opened through Remote-SSH.
pub const SSH_REMOTE_PREFIX: &str = "vscode-remote://ssh-remote+";

/// URI prefix of projects opened through Remote-WSL.
pub const WSL_REMOTE_PREFIX: &str = "vscode-remote://wsl+";

/// File extension of multi-root workspace files.
pub const WORKSPACE_FILE_EXTENSION: &str = ".code-workspace";

static WSL_PATH_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^\\\\wsl(\$|\.localhost)\\").expect("static regex"));

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("static regex"));

/// A single dashboard entry.
///
/// The `id` is assigned at creation and never changes afterwards; updates
/// merge every other field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Filesystem path or remote URI.
    pub path: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_git_repo: bool,
}

impl Project {
    /// Create a project with a fresh ID seeded from its name.
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: generate_id(Some(&name)),
            name,
            path: path.into(),
            color: String::new(),
            is_git_repo: false,
        }
    }

    /// Builder-style color setter.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Remote classification derived from the path. Never stored.
    pub fn remote_type(&self) -> RemoteType {
        classify_remote(&self.path)
    }

    /// Kind of filesystem target the path points to.
    pub fn path_type(&self) -> ProjectPathType {
        ProjectPathType::from_path(&self.path)
    }
}

/// Partial update for a [`Project`].
///
/// `id` is accepted so that full project payloads deserialize, but it is
/// never applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub id: Option<String>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub color: Option<String>,
    pub is_git_repo: Option<bool>,
}

impl ProjectPatch {
    /// Merge the patch into `project`, leaving its `id` untouched.
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(name) = &self.name {
            project.name = name.clone();
        }
        if let Some(path) = &self.path {
            project.path = path.clone();
        }
        if let Some(color) = &self.color {
            project.color = color.clone();
        }
        if let Some(is_git_repo) = self.is_git_repo {
            project.is_git_repo = is_git_repo;
        }
    }
}

/// Where a project lives relative to the local machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemoteType {
    None,
    Ssh,
    Wsl,
}

impl RemoteType {
    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for RemoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "local"),
            Self::Ssh => write!(f, "ssh"),
            Self::Wsl => write!(f, "wsl"),
        }
    }
}

/// Classify a project path as local, SSH, or WSL.
pub fn classify_remote(path: &str) -> RemoteType {
    if path.starts_with(SSH_REMOTE_PREFIX) {
        RemoteType::Ssh
    } else if path.starts_with(WSL_REMOTE_PREFIX) || WSL_PATH_PATTERN.is_match(path) {
        RemoteType::Wsl
    } else {
        RemoteType::None
    }
}

/// Strip tag-like `<...>` substrings and surrounding whitespace.
///
/// Returns an empty string for a missing name.
pub fn sanitize_name(name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => TAG_PATTERN.replace_all(name, "").trim().to_string(),
        _ => String::new(),
    }
}

/// What a project path points at on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectPathType {
    Folder,
    WorkspaceFile,
    File,
}

impl ProjectPathType {
    /// Infer the target kind from the path's final segment.
    pub fn from_path(path: &str) -> Self {
        let last = path
            .trim_end_matches(['/', '\\'])
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        if last.ends_with(WORKSPACE_FILE_EXTENSION) {
            Self::WorkspaceFile
        } else if last.rfind('.').is_some_and(|i| i > 0 && i + 1 < last.len()) {
            Self::File
        } else {
            Self::Folder
        }
    }
}
