//! Recent-colors bookkeeping and the best-effort side-effect policy.

use std::collections::VecDeque;
use std::fmt::Display;
use std::future::Future;
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::warn;

use crate::error::{ServiceError, ServiceResult};

/// Collaborator remembering the colors most recently given to projects.
#[async_trait]
pub trait RecentColors: Send + Sync {
    async fn add_recent_color(&self, color: &str) -> ServiceResult<()>;
}

/// A side effect whose failure must never abort or roll back the primary
/// operation. Failures are logged at `warn` and dropped.
#[derive(Clone, Copy, Debug)]
pub struct BestEffort {
    label: &'static str,
}

impl BestEffort {
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }

    /// Await `effect`, returning `true` if it succeeded.
    pub async fn run<F, E>(&self, effect: F) -> bool
    where
        F: Future<Output = Result<(), E>>,
        E: Display,
    {
        match effect.await {
            Ok(()) => true,
            Err(e) => {
                warn!(effect = self.label, error = %e, "best-effort side effect failed");
                false
            }
        }
    }
}

/// In-memory recent colors, most recent first, without duplicates.
#[derive(Debug)]
pub struct InMemoryRecentColors {
    colors: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl InMemoryRecentColors {
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    pub fn colors(&self) -> Vec<String> {
        self.colors
            .lock()
            .map(|c| c.iter().cloned().collect())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecentColors for InMemoryRecentColors {
    async fn add_recent_color(&self, color: &str) -> ServiceResult<()> {
        if color.is_empty() || self.capacity == 0 {
            return Ok(());
        }
        let mut colors = self
            .colors
            .lock()
            .map_err(|e| ServiceError::RecentColors(format!("lock poisoned: {e}")))?;
        colors.retain(|c| c != color);
        colors.push_front(color.to_string());
        colors.truncate(self.capacity);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn most_recent_first_without_duplicates() {
        let colors = InMemoryRecentColors::new(3);
        for c in ["red", "blue", "red", "green"] {
            colors.add_recent_color(c).await.unwrap();
        }
        assert_eq!(colors.colors(), vec!["green", "red", "blue"]);
    }

    #[tokio::test]
    async fn capacity_is_enforced() {
        let colors = InMemoryRecentColors::new(2);
        for c in ["a", "b", "c"] {
            colors.add_recent_color(c).await.unwrap();
        }
        assert_eq!(colors.colors(), vec!["c", "b"]);
    }

    #[tokio::test]
    async fn empty_color_is_ignored() {
        let colors = InMemoryRecentColors::new(2);
        colors.add_recent_color("").await.unwrap();
        assert!(colors.colors().is_empty());
    }

    #[tokio::test]
    async fn best_effort_swallows_errors() {
        let policy = BestEffort::new("test");
        let ok = policy.run(async { Ok::<(), String>(()) }).await;
        let failed = policy.run(async { Err::<(), _>("boom".to_string()) }).await;
        assert!(ok);
        assert!(!failed);
    }
}
