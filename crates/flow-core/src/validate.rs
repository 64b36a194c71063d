use crate::error::Result;
use crate::numbering::{self, TaskDirEntry};
use crate::paths;
use crate::templates::unresolved_placeholders;
use serde::Serialize;
use std::fmt;
use std::path::Path;

/// Artifacts every task directory must carry, in report order.
pub const REQUIRED_ARTIFACTS: [&str; 3] = [
    paths::BUSINESS_CONTEXT_MD,
    paths::APPROACH_MD,
    paths::COMPLETION_REPORT_MD,
];

pub const SCENARIO_KEYWORDS: [&str; 3] = ["Given", "When", "Then"];
pub const MIN_APPROACH_SECTIONS: usize = 3;

// ---------------------------------------------------------------------------
// ValidationIssue
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationIssue {
    Missing,
    Empty,
    UnresolvedPlaceholders { tokens: Vec<String> },
    MissingScenarioKeywords { missing: Vec<String> },
    InsufficientStructure { found: usize, required: usize },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Missing => f.write_str("File does not exist"),
            ValidationIssue::Empty => f.write_str("File is empty"),
            ValidationIssue::UnresolvedPlaceholders { tokens } => write!(
                f,
                "Contains unresolved template variables ({})",
                tokens.join(", ")
            ),
            ValidationIssue::MissingScenarioKeywords { missing } => write!(
                f,
                "Missing Gherkin scenarios (no {})",
                missing.join("/")
            ),
            ValidationIssue::InsufficientStructure { found, required } => write!(
                f,
                "Insufficient structure (needs at least {required} sections, found {found})"
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactReport {
    pub file: String,
    pub issues: Vec<ValidationIssue>,
}

impl ArtifactReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub task: TaskDirEntry,
    pub artifacts: Vec<ArtifactReport>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.artifacts.iter().all(ArtifactReport::is_valid)
    }

    pub fn issue_count(&self) -> usize {
        self.artifacts.iter().map(|a| a.issues.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Level-two Markdown headers (`## Title`); deeper levels are not counted.
pub fn count_section_headers(content: &str) -> usize {
    content
        .lines()
        .map(str::trim_start)
        .filter(|l| l.starts_with("##") && !l.starts_with("###"))
        .count()
}

/// Check one artifact's content. `None` means the file does not exist.
///
/// An empty file reports only [`ValidationIssue::Empty`]; every other rule
/// is checked independently and all findings are returned.
pub fn check_artifact(file: &str, content: Option<&str>) -> Vec<ValidationIssue> {
    let Some(content) = content else {
        return vec![ValidationIssue::Missing];
    };
    if content.trim().is_empty() {
        return vec![ValidationIssue::Empty];
    }

    let mut issues = Vec::new();

    let tokens = unresolved_placeholders(content);
    if !tokens.is_empty() {
        issues.push(ValidationIssue::UnresolvedPlaceholders { tokens });
    }

    if file == paths::BUSINESS_CONTEXT_MD {
        let missing: Vec<String> = SCENARIO_KEYWORDS
            .iter()
            .filter(|k| !content.contains(*k))
            .map(|k| k.to_string())
            .collect();
        if !missing.is_empty() {
            issues.push(ValidationIssue::MissingScenarioKeywords { missing });
        }
    }

    if file == paths::APPROACH_MD {
        let found = count_section_headers(content);
        if found < MIN_APPROACH_SECTIONS {
            issues.push(ValidationIssue::InsufficientStructure {
                found,
                required: MIN_APPROACH_SECTIONS,
            });
        }
    }

    issues
}

/// Validate every required artifact of the named task.
pub fn validate_task(root: &Path, task_name: &str) -> Result<ValidationReport> {
    let entry = numbering::resolve_task_directory(&paths::state_dir(root), task_name)?;

    let mut artifacts = Vec::with_capacity(REQUIRED_ARTIFACTS.len());
    for file in REQUIRED_ARTIFACTS {
        let path = entry.path.join(file);
        let content = if path.is_file() {
            Some(std::fs::read_to_string(&path)?)
        } else {
            None
        };
        artifacts.push(ArtifactReport {
            file: file.to_string(),
            issues: check_artifact(file, content.as_deref()),
        });
    }

    let report = ValidationReport {
        task: entry,
        artifacts,
    };
    tracing::debug!(
        task = %report.task.dir_name,
        issues = report.issue_count(),
        "validated task"
    );
    Ok(report)
}
