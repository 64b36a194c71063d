//! Project-level context: `.flow/PROJECT_CONTEXT.md` and `flow init`.

use crate::agents;
use crate::config::Config;
use crate::error::Result;
use crate::io;
use crate::paths;
use crate::templates::today;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TechStackEntry {
    pub category: String,
    pub technology: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub justification: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureInput {
    #[serde(default)]
    pub principles: Vec<String>,
    #[serde(default)]
    pub patterns: BTreeMap<String, String>,
    #[serde(default)]
    pub guidelines: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandardsInput {
    #[serde(default)]
    pub coding: Vec<String>,
    #[serde(default)]
    pub quality: Vec<String>,
    #[serde(default)]
    pub git: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolsInput {
    #[serde(default)]
    pub development: Vec<String>,
    #[serde(default)]
    pub monitoring: Vec<String>,
    #[serde(default, alias = "ciCd")]
    pub ci_cd: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsInput {
    #[serde(default)]
    pub technical: BTreeMap<String, String>,
    #[serde(default)]
    pub business: BTreeMap<String, String>,
}

/// Structured content for `PROJECT_CONTEXT.md`. Omitted sections render
/// with defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectContextInput {
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default)]
    pub mission: Option<String>,
    #[serde(default)]
    pub goals: Vec<String>,
    #[serde(default)]
    pub tech_stack: Vec<TechStackEntry>,
    #[serde(default)]
    pub architecture: Option<ArchitectureInput>,
    #[serde(default)]
    pub standards: Option<StandardsInput>,
    #[serde(default)]
    pub tools: Option<ToolsInput>,
    #[serde(default)]
    pub metrics: Option<MetricsInput>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ProjectContextInput {
    /// Names of the sections the caller actually supplied.
    pub fn supplied_sections(&self) -> Vec<&'static str> {
        let mut out = Vec::new();
        if self.project_name.is_some() {
            out.push("project name");
        }
        if self.mission.is_some() {
            out.push("mission");
        }
        if !self.goals.is_empty() {
            out.push("goals");
        }
        if !self.tech_stack.is_empty() {
            out.push("tech stack");
        }
        if self.architecture.is_some() {
            out.push("architecture");
        }
        if self.standards.is_some() {
            out.push("standards");
        }
        if self.tools.is_some() {
            out.push("tools");
        }
        if self.metrics.is_some() {
            out.push("metrics");
        }
        if self.notes.is_some() {
            out.push("notes");
        }
        out
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn bullets_or(out: &mut String, items: &[String], default: &str) {
    if items.is_empty() {
        out.push_str(default);
        out.push('\n');
    } else {
        for item in items {
            out.push_str(&format!("- {}\n", item.trim()));
        }
    }
}

fn pairs_or(out: &mut String, items: &BTreeMap<String, String>, default: &str) {
    if items.is_empty() {
        out.push_str(default);
        out.push('\n');
    } else {
        for (k, v) in items {
            out.push_str(&format!("- **{k}**: {v}\n"));
        }
    }
}

pub fn render_project_context(input: &ProjectContextInput) -> String {
    let mut out = String::new();
    let empty_arch = ArchitectureInput::default();
    let empty_std = StandardsInput::default();
    let empty_tools = ToolsInput::default();
    let empty_metrics = MetricsInput::default();
    let arch = input.architecture.as_ref().unwrap_or(&empty_arch);
    let standards = input.standards.as_ref().unwrap_or(&empty_std);
    let tools = input.tools.as_ref().unwrap_or(&empty_tools);
    let metrics = input.metrics.as_ref().unwrap_or(&empty_metrics);

    match input.project_name.as_deref().filter(|n| !n.trim().is_empty()) {
        Some(name) => {
            out.push_str(&format!("# Project Context: {}\n\n", name.trim()));
        }
        None => out.push_str("# Project Context\n\n"),
    }

    out.push_str("## Mission & Goals\n\n### Mission\n");
    out.push_str(&format!(
        "{}\n\n",
        input
            .mission
            .as_deref()
            .unwrap_or("_Describe the problem this project solves and the value it delivers._")
    ));
    out.push_str("### Long-term Goals\n");
    bullets_or(
        &mut out,
        &input.goals,
        "- _Goal 1: specific and measurable_\n- _Goal 2: specific and measurable_",
    );

    out.push_str("\n## Architecture & Technology\n\n### Tech Stack\n");
    out.push_str("| Category | Technology | Version | Rationale |\n|----------|------------|---------|-----------|\n");
    if input.tech_stack.is_empty() {
        out.push_str("| _category_ | _technology_ | _version_ | _why_ |\n");
    } else {
        for t in &input.tech_stack {
            out.push_str(&format!(
                "| {} | {} | {} | {} |\n",
                t.category,
                t.technology,
                t.version.as_deref().unwrap_or("N/A"),
                t.justification.as_deref().unwrap_or("_to be defined_")
            ));
        }
    }

    out.push_str("\n### Architectural Principles\n");
    bullets_or(
        &mut out,
        &arch.principles,
        "- **Modularity**: independent, reusable components\n\
         - **Simplicity**: the smallest design that meets the requirements\n\
         - **Maintainability**: clean, documented code",
    );
    out.push_str("\n### Design Patterns\n");
    pairs_or(
        &mut out,
        &arch.patterns,
        "- _List the patterns the codebase relies on._",
    );
    if !arch.guidelines.is_empty() {
        out.push_str("\n### Guidelines\n");
        bullets_or(&mut out, &arch.guidelines, "");
    }

    out.push_str("\n## Development Standards\n\n### Coding Conventions\n");
    bullets_or(
        &mut out,
        &standards.coding,
        "- Follow the language's standard formatter and linter",
    );
    out.push_str("\n### Code Quality\n");
    bullets_or(
        &mut out,
        &standards.quality,
        "- Every change ships with tests\n- Reviews required before merge",
    );
    out.push_str("\n### Git Workflow\n");
    bullets_or(
        &mut out,
        &standards.git,
        "- Short-lived branches, one task per branch\n- Descriptive commit messages",
    );

    out.push_str("\n## Tooling\n\n### Development\n");
    bullets_or(&mut out, &tools.development, "- _Editors, build tools, local environment_");
    out.push_str("\n### Monitoring\n");
    bullets_or(&mut out, &tools.monitoring, "- _Logs, metrics, alerts_");
    out.push_str("\n### CI/CD\n");
    bullets_or(&mut out, &tools.ci_cd, "- _Pipeline: build, test, deploy_");

    out.push_str("\n## Success Metrics\n\n### Technical\n");
    pairs_or(
        &mut out,
        &metrics.technical,
        "- **Quality**: no critical defects in production\n- **Tests**: suite passes on every merge",
    );
    out.push_str("\n### Business\n");
    pairs_or(
        &mut out,
        &metrics.business,
        "- _Define the outcomes that matter to users._",
    );

    if let Some(notes) = input.notes.as_deref().filter(|n| !n.trim().is_empty()) {
        out.push_str(&format!("\n## Notes\n\n{}\n", notes.trim()));
    }

    out.push_str(&format!("\n---\n**Last updated**: {}\n", today()));
    out
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Outcome for one file touched by a project-level operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Created,
    Exists,
    Updated,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FileStatus::Created => "created",
            FileStatus::Exists => "exists",
            FileStatus::Updated => "updated",
        }
    }

    fn from_written(written: bool) -> Self {
        if written {
            FileStatus::Created
        } else {
            FileStatus::Exists
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub status: FileStatus,
}

/// Write `PROJECT_CONTEXT.md` with default content unless it already exists.
pub fn ensure_project_context(root: &Path) -> Result<FileOutcome> {
    let path = paths::project_context_path(root);
    let written = io::write_if_missing(
        &path,
        render_project_context(&ProjectContextInput::default()).as_bytes(),
    )?;
    Ok(FileOutcome {
        path,
        status: FileStatus::from_written(written),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextUpdate {
    pub file: FileOutcome,
    pub sections: Vec<&'static str>,
}

/// Re-render `PROJECT_CONTEXT.md` from `input`, creating `.flow/` if needed.
pub fn update_project_context(root: &Path, input: &ProjectContextInput) -> Result<ContextUpdate> {
    io::ensure_dir(&paths::state_dir(root))?;
    let path = paths::project_context_path(root);
    let existed = path.exists();
    io::atomic_write(&path, render_project_context(input).as_bytes())?;
    tracing::info!(path = %path.display(), "project context written");
    Ok(ContextUpdate {
        file: FileOutcome {
            path,
            status: if existed {
                FileStatus::Updated
            } else {
                FileStatus::Created
            },
        },
        sections: input.supplied_sections(),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct InitReport {
    pub root: PathBuf,
    pub state_dir_created: bool,
    pub project_context: FileOutcome,
    pub config: FileOutcome,
    pub agents: FileOutcome,
    pub sections: Vec<&'static str>,
}

/// Initialize a Flow project. Safe to run repeatedly: existing files are
/// never overwritten.
pub fn init_project(root: &Path, input: &ProjectContextInput) -> Result<InitReport> {
    let state_dir = paths::state_dir(root);
    let state_dir_created = !state_dir.is_dir();
    io::ensure_dir(&state_dir)?;

    let pc_path = paths::project_context_path(root);
    let pc_written = io::write_if_missing(&pc_path, render_project_context(input).as_bytes())?;

    let cfg_path = paths::config_path(root);
    let cfg_written = if cfg_path.exists() {
        false
    } else {
        Config::default().save(root)?;
        true
    };

    let cfg = Config::load(root)?;
    let agents = agents::ensure_agents_md(root, &cfg)?;

    tracing::info!(root = %root.display(), "flow project initialized");
    Ok(InitReport {
        root: root.to_path_buf(),
        state_dir_created,
        project_context: FileOutcome {
            path: pc_path,
            status: FileStatus::from_written(pc_written),
        },
        config: FileOutcome {
            path: cfg_path,
            status: FileStatus::from_written(cfg_written),
        },
        agents,
        sections: input.supplied_sections(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_input() -> ProjectContextInput {
        ProjectContextInput {
            project_name: Some("Acme".into()),
            mission: Some("Ship reliable widgets".into()),
            goals: vec!["Cut lead time in half".into()],
            tech_stack: vec![TechStackEntry {
                category: "Backend".into(),
                technology: "Rust".into(),
                version: Some("1.80".into()),
                justification: None,
            }],
            ..ProjectContextInput::default()
        }
    }

    #[test]
    fn render_uses_supplied_sections() {
        let doc = render_project_context(&sample_input());
        assert!(doc.starts_with("# Project Context: Acme"));
        assert!(doc.contains("Ship reliable widgets"));
        assert!(doc.contains("- Cut lead time in half"));
        assert!(doc.contains("| Backend | Rust | 1.80 | _to be defined_ |"));
        assert!(!doc.contains("## Notes"));
    }

    #[test]
    fn render_defaults_when_empty() {
        let doc = render_project_context(&ProjectContextInput::default());
        assert!(doc.starts_with("# Project Context\n"));
        assert!(doc.contains("_Describe the problem this project solves"));
        assert!(crate::templates::unresolved_placeholders(&doc).is_empty());
    }

    #[test]
    fn input_deserializes_camel_case() {
        let json = serde_json::json!({
            "projectName": "Acme",
            "techStack": [{"category": "Db", "technology": "Postgres"}],
            "tools": {"ci_cd": ["GitHub Actions"]},
            "metrics": {"technical": {"Latency": "< 200ms"}}
        });
        let input: ProjectContextInput = serde_json::from_value(json).unwrap();
        assert_eq!(input.project_name.as_deref(), Some("Acme"));
        assert_eq!(input.tools.as_ref().unwrap().ci_cd, vec!["GitHub Actions"]);
        assert_eq!(
            input.supplied_sections(),
            vec!["project name", "tech stack", "tools", "metrics"]
        );
    }

    #[test]
    fn init_twice_keeps_project_context() {
        let dir = TempDir::new().unwrap();
        let first = init_project(dir.path(), &sample_input()).unwrap();
        assert!(first.state_dir_created);
        assert_eq!(first.project_context.status, FileStatus::Created);
        assert_eq!(first.config.status, FileStatus::Created);
        assert_eq!(first.agents.status, FileStatus::Created);

        let pc = dir.path().join(".flow/PROJECT_CONTEXT.md");
        std::fs::write(&pc, "hand edited").unwrap();

        let second = init_project(dir.path(), &ProjectContextInput::default()).unwrap();
        assert!(!second.state_dir_created);
        assert_eq!(second.project_context.status, FileStatus::Exists);
        assert_eq!(second.config.status, FileStatus::Exists);
        assert_eq!(second.agents.status, FileStatus::Exists);
        assert_eq!(std::fs::read_to_string(pc).unwrap(), "hand edited");
    }

    #[test]
    fn update_overwrites_and_reports_sections() {
        let dir = TempDir::new().unwrap();
        let first = update_project_context(dir.path(), &ProjectContextInput::default()).unwrap();
        assert_eq!(first.file.status, FileStatus::Created);
        assert!(first.sections.is_empty());

        let second = update_project_context(dir.path(), &sample_input()).unwrap();
        assert_eq!(second.file.status, FileStatus::Updated);
        assert!(second.sections.contains(&"mission"));
        let doc = std::fs::read_to_string(dir.path().join(".flow/PROJECT_CONTEXT.md")).unwrap();
        assert!(doc.contains("Ship reliable widgets"));
    }
}
