//! The agent-instructions document (`AGENTS.md`).
//!
//! Flow owns only the section between [`AGENTS_START_MARKER`] and
//! [`AGENTS_END_MARKER`]; everything outside it belongs to the user.

use crate::config::{AgentsLocation, Config};
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::project::{FileOutcome, FileStatus};
use crate::templates::{agents_document, agents_section, AGENTS_END_MARKER, AGENTS_START_MARKER};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Create `AGENTS.md` at the configured location unless one already exists
/// in the project root or the state directory.
pub fn ensure_agents_md(root: &Path, cfg: &Config) -> Result<FileOutcome> {
    let (path, exists) = cfg.locate_agents_md(root);
    if exists {
        return Ok(FileOutcome {
            path,
            status: FileStatus::Exists,
        });
    }
    io::atomic_write(&path, agents_document().as_bytes())?;
    tracing::info!(path = %path.display(), "created agents file");
    Ok(FileOutcome {
        path,
        status: FileStatus::Created,
    })
}

fn location_of(root: &Path, path: &Path) -> AgentsLocation {
    if path == paths::agents_md_state_path(root) {
        AgentsLocation::StateDir
    } else {
        AgentsLocation::ProjectRoot
    }
}

// ---------------------------------------------------------------------------
// Check
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentsState {
    Missing,
    /// The file exists but has no Flow-managed section.
    Unmanaged,
    Outdated,
    UpToDate,
}

impl AgentsState {
    pub fn needs_update(self) -> bool {
        self != AgentsState::UpToDate
    }

    pub fn describe(self) -> &'static str {
        match self {
            AgentsState::Missing => "AGENTS.md does not exist",
            AgentsState::Unmanaged => "AGENTS.md has no Flow section",
            AgentsState::Outdated => "Flow section differs from the current template",
            AgentsState::UpToDate => "Flow section is up to date",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentsCheck {
    pub path: PathBuf,
    pub exists: bool,
    pub location: AgentsLocation,
    pub state: AgentsState,
    /// The managed section currently on disk, when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_section: Option<String>,
    pub template_section: String,
}

pub fn check_agents(root: &Path) -> Result<AgentsCheck> {
    let cfg = Config::load(root)?;
    let (path, exists) = cfg.locate_agents_md(root);
    let template_section = agents_section();

    let (state, current_section) = if !exists {
        (AgentsState::Missing, None)
    } else {
        let content = std::fs::read_to_string(&path)?;
        match io::extract_between_markers(&content, AGENTS_START_MARKER, AGENTS_END_MARKER) {
            None => (AgentsState::Unmanaged, None),
            Some(current) if current == template_section => {
                (AgentsState::UpToDate, Some(current.to_string()))
            }
            Some(current) => (AgentsState::Outdated, Some(current.to_string())),
        }
    };

    Ok(AgentsCheck {
        location: location_of(root, &path),
        path,
        exists,
        state,
        current_section,
        template_section,
    })
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentsUpdateOptions {
    /// Rewrite even when up to date; replace the whole file when it has no
    /// managed section.
    pub force: bool,
    pub backup: bool,
    /// When false the whole file is replaced by the template.
    pub preserve_customizations: bool,
}

impl Default for AgentsUpdateOptions {
    fn default() -> Self {
        Self {
            force: false,
            backup: true,
            preserve_customizations: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentsAction {
    Created,
    /// Managed section replaced in place.
    Replaced,
    /// Managed section appended to a file that had none.
    Appended,
    /// Whole file replaced by the template.
    Rewritten,
    Unchanged,
}

impl AgentsAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AgentsAction::Created => "created",
            AgentsAction::Replaced => "replaced",
            AgentsAction::Appended => "appended",
            AgentsAction::Rewritten => "rewritten",
            AgentsAction::Unchanged => "unchanged",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AgentsUpdate {
    pub path: PathBuf,
    pub action: AgentsAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup: Option<PathBuf>,
}

pub fn update_agents(root: &Path, opts: AgentsUpdateOptions) -> Result<AgentsUpdate> {
    let check = check_agents(root)?;
    let path = check.path;

    if !check.exists {
        io::atomic_write(&path, agents_document().as_bytes())?;
        return Ok(AgentsUpdate {
            path,
            action: AgentsAction::Created,
            backup: None,
        });
    }

    if check.state == AgentsState::UpToDate && !opts.force {
        return Ok(AgentsUpdate {
            path,
            action: AgentsAction::Unchanged,
            backup: None,
        });
    }

    let content = std::fs::read_to_string(&path)?;
    let section = agents_section();
    let (action, updated) = if !opts.preserve_customizations {
        (AgentsAction::Rewritten, agents_document())
    } else if let Some(spliced) =
        io::splice_between_markers(&content, AGENTS_START_MARKER, AGENTS_END_MARKER, &section)
    {
        (AgentsAction::Replaced, spliced)
    } else if opts.force {
        (AgentsAction::Rewritten, agents_document())
    } else {
        let sep = if content.ends_with('\n') { "\n" } else { "\n\n" };
        (AgentsAction::Appended, format!("{content}{sep}{section}\n"))
    };

    let backup = if opts.backup {
        Some(io::backup_file(&path)?)
    } else {
        None
    };
    io::atomic_write(&path, updated.as_bytes())?;
    tracing::info!(path = %path.display(), action = action.as_str(), "updated agents file");

    Ok(AgentsUpdate {
        path,
        action,
        backup,
    })
}
