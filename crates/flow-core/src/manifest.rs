use crate::error::Result;
use crate::io;
use crate::paths;
use crate::types::{ContentSource, TaskType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sidecar record written next to the artifacts of every task Flow creates.
///
/// It carries the authoritative task type; directories without one fall back
/// to keyword inference over the business context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskManifest {
    pub number: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub task_type: TaskType,
    pub created_at: DateTime<Utc>,
    pub source: ContentSource,
}

impl TaskManifest {
    pub fn new(number: u32, name: &str, task_type: TaskType, source: ContentSource) -> Self {
        Self {
            number,
            name: name.to_string(),
            task_type,
            created_at: Utc::now(),
            source,
        }
    }

    pub fn save(&self, task_dir: &Path) -> Result<()> {
        let data = serde_yaml::to_string(self)?;
        io::atomic_write(&paths::task_manifest(task_dir), data.as_bytes())
    }

    pub fn load(task_dir: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(paths::task_manifest(task_dir))?;
        Ok(serde_yaml::from_str(&data)?)
    }

    /// `None` when the sidecar is absent or unreadable.
    pub fn try_load(task_dir: &Path) -> Option<Self> {
        if !paths::task_manifest(task_dir).exists() {
            return None;
        }
        match Self::load(task_dir) {
            Ok(m) => Some(m),
            Err(e) => {
                tracing::warn!(dir = %task_dir.display(), error = %e, "ignoring unreadable task manifest");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_and_load() {
        let dir = TempDir::new().unwrap();
        let m = TaskManifest::new(
            3,
            "login",
            TaskType::Bug,
            ContentSource::Template { summary: None },
        );
        m.save(dir.path()).unwrap();

        let raw = std::fs::read_to_string(dir.path().join("task.yaml")).unwrap();
        assert!(raw.contains("type: bug"));
        assert!(raw.contains("kind: template"));

        assert_eq!(TaskManifest::load(dir.path()).unwrap(), m);
    }

    #[test]
    fn try_load_missing_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(TaskManifest::try_load(dir.path()).is_none());
    }

    #[test]
    fn try_load_garbage_is_none() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("task.yaml"), "number: [").unwrap();
        assert!(TaskManifest::try_load(dir.path()).is_none());
    }
}
