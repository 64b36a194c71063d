//! Read-only views over the state directory: task listing, project status and
//! per-task previews.

use crate::error::Result;
use crate::io;
use crate::manifest::TaskManifest;
use crate::numbering::{self, TaskDirEntry};
use crate::paths;
use crate::types::{InferredType, TaskStatus, TaskType};
use serde::Serialize;
use std::path::Path;

/// Lines shown per artifact by [`task_info`].
pub const PREVIEW_LINES: usize = 5;

// ---------------------------------------------------------------------------
// Type inference
// ---------------------------------------------------------------------------

/// Where a listed task's type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSource {
    Manifest,
    Keywords,
    None,
}

/// Best-effort keyword match: the first type (in priority order) whose
/// lowercase or uppercase name occurs anywhere in `text`.
pub fn infer_type_from_text(text: &str) -> InferredType {
    TaskType::all()
        .iter()
        .find(|t| {
            let name = t.as_str();
            text.contains(name) || text.contains(&name.to_ascii_uppercase())
        })
        .map_or(InferredType::Unknown, |t| InferredType::Known(*t))
}

/// Task type from the sidecar manifest, else from the business context.
pub fn infer_task_type(task_dir: &Path) -> (InferredType, TypeSource) {
    if let Some(manifest) = TaskManifest::try_load(task_dir) {
        return (InferredType::Known(manifest.task_type), TypeSource::Manifest);
    }
    match std::fs::read_to_string(task_dir.join(paths::BUSINESS_CONTEXT_MD)) {
        Ok(content) => match infer_type_from_text(&content) {
            InferredType::Unknown => (InferredType::Unknown, TypeSource::None),
            known => (known, TypeSource::Keywords),
        },
        Err(_) => (InferredType::Unknown, TypeSource::None),
    }
}

pub fn task_status(task_dir: &Path) -> TaskStatus {
    if task_dir.join(paths::COMPLETION_REPORT_MD).exists() {
        TaskStatus::Complete
    } else {
        TaskStatus::InProgress
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TaskSummary {
    #[serde(flatten)]
    pub entry: TaskDirEntry,
    pub task_type: InferredType,
    pub type_source: TypeSource,
    pub status: TaskStatus,
}

impl TaskSummary {
    fn from_entry(entry: TaskDirEntry) -> Self {
        let (task_type, type_source) = infer_task_type(&entry.path);
        let status = task_status(&entry.path);
        Self {
            entry,
            task_type,
            type_source,
            status,
        }
    }
}

/// Every task in numeric order. Empty when the state directory is missing.
pub fn list_tasks(root: &Path) -> Result<Vec<TaskSummary>> {
    let entries = numbering::scan(&paths::state_dir(root))?;
    Ok(entries.into_iter().map(TaskSummary::from_entry).collect())
}

// ---------------------------------------------------------------------------
// Project status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub feature: usize,
    pub bug: usize,
    pub improvement: usize,
    pub research: usize,
    pub unknown: usize,
}

impl TypeCounts {
    fn add(&mut self, t: InferredType) {
        match t {
            InferredType::Known(TaskType::Feature) => self.feature += 1,
            InferredType::Known(TaskType::Bug) => self.bug += 1,
            InferredType::Known(TaskType::Improvement) => self.improvement += 1,
            InferredType::Known(TaskType::Research) => self.research += 1,
            InferredType::Unknown => self.unknown += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectStatus {
    pub initialized: bool,
    pub total: usize,
    pub complete: usize,
    pub in_progress: usize,
    /// Whole percent, rounded.
    pub completion_rate: u32,
    pub by_type: TypeCounts,
}

pub fn project_status(root: &Path) -> Result<ProjectStatus> {
    let tasks = list_tasks(root)?;
    let mut by_type = TypeCounts::default();
    let mut complete = 0;
    for t in &tasks {
        by_type.add(t.task_type);
        if t.status == TaskStatus::Complete {
            complete += 1;
        }
    }
    let total = tasks.len();
    let completion_rate = if total == 0 {
        0
    } else {
        ((complete as f64 / total as f64) * 100.0).round() as u32
    };
    Ok(ProjectStatus {
        initialized: paths::state_dir(root).is_dir(),
        total,
        complete,
        in_progress: total - complete,
        completion_rate,
        by_type,
    })
}

// ---------------------------------------------------------------------------
// Task info
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactPreview {
    pub file: String,
    pub exists: bool,
    pub head: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    pub task: TaskSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<TaskManifest>,
    pub artifacts: Vec<ArtifactPreview>,
}

/// Resolve a task by name and preview the first lines of each artifact.
pub fn task_info(root: &Path, task_name: &str) -> Result<TaskInfo> {
    let entry = numbering::resolve_task_directory(&paths::state_dir(root), task_name)?;
    let manifest = TaskManifest::try_load(&entry.path);

    let mut artifacts = Vec::new();
    for file in crate::validate::REQUIRED_ARTIFACTS {
        let path = entry.path.join(file);
        let (exists, head) = if path.is_file() {
            (true, io::read_head(&path, PREVIEW_LINES)?)
        } else {
            (false, Vec::new())
        };
        artifacts.push(ArtifactPreview {
            file: file.to_string(),
            exists,
            head,
        });
    }

    Ok(TaskInfo {
        task: TaskSummary::from_entry(entry),
        manifest,
        artifacts,
    })
}
