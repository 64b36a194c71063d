use crate::error::Result;
use crate::paths;
use crate::types::TaskType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// AgentsLocation
// ---------------------------------------------------------------------------

/// Where the agent-instructions document lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentsLocation {
    #[default]
    ProjectRoot,
    StateDir,
}

impl AgentsLocation {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentsLocation::ProjectRoot => "project_root",
            AgentsLocation::StateDir => "state_dir",
        }
    }

    /// Path of `AGENTS.md` for this location.
    pub fn agents_path(self, root: &Path) -> PathBuf {
        match self {
            AgentsLocation::ProjectRoot => paths::agents_md_root_path(root),
            AgentsLocation::StateDir => paths::agents_md_state_path(root),
        }
    }
}

impl fmt::Display for AgentsLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Optional `.flow/config.yaml`. Every field has a default so an absent or
/// partial file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub agents_location: AgentsLocation,
    #[serde(default)]
    pub default_task_type: TaskType,
    #[serde(default)]
    pub auto_generate: bool,
}

impl Config {
    /// Load the project config; a missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Config::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Config::default());
        }
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Parse a loosely given task type. Missing input means the configured
    /// default; unrecognized input warns and uses it too.
    pub fn resolve_task_type(&self, requested: Option<&str>) -> TaskType {
        match requested.map(str::parse::<TaskType>) {
            Some(Ok(t)) => t,
            Some(Err(e)) => {
                tracing::warn!(error = %e, fallback = %self.default_task_type, "unrecognized task type");
                self.default_task_type
            }
            None => self.default_task_type,
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Resolve an `AGENTS.md` that already exists, checking the project root
    /// first and the state directory second. Falls back to the configured
    /// location when neither exists.
    pub fn locate_agents_md(&self, root: &Path) -> (PathBuf, bool) {
        for candidate in [
            paths::agents_md_root_path(root),
            paths::agents_md_state_path(root),
        ] {
            if candidate.exists() {
                return (candidate, true);
            }
        }
        (self.agents_location.agents_path(root), false)
    }
}
