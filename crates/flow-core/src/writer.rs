//! Task creation: allocate the next numbered directory and write its
//! artifacts.

use crate::agents;
use crate::config::Config;
use crate::error::{FlowError, Result};
use crate::generate::{self, ApproachRequest, BusinessContextRequest};
use crate::io;
use crate::manifest::TaskManifest;
use crate::numbering::{self, MAX_SEQUENCE};
use crate::paths;
use crate::project::{self, FileOutcome};
use crate::templates::{self, TemplateVars};
use crate::types::{ContentSource, TaskType};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct CreateTaskRequest {
    pub name: String,
    pub task_type: TaskType,
    pub source: ContentSource,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreatedTask {
    pub number: u32,
    pub name: String,
    pub dir_name: String,
    pub path: PathBuf,
    pub task_type: TaskType,
    pub source: &'static str,
    pub files_created: Vec<String>,
    /// Project-level files checked on the way (project context, agents).
    pub project_files: Vec<FileOutcome>,
}

impl CreateTaskRequest {
    /// Build a request from loosely typed front-end options, filling gaps
    /// from the project config. An unrecognized type falls back to the
    /// configured default.
    pub fn from_options(
        cfg: &Config,
        name: &str,
        task_type: Option<&str>,
        description: Option<&str>,
        auto_generate: Option<bool>,
    ) -> Self {
        let resolved = cfg.resolve_task_type(task_type);
        let description = description.map(str::trim).filter(|d| !d.is_empty());
        let source = if auto_generate.unwrap_or(cfg.auto_generate) {
            ContentSource::Generated {
                description: description.unwrap_or(name).to_string(),
            }
        } else {
            ContentSource::Template {
                summary: description.map(str::to_string),
            }
        };
        Self {
            name: name.to_string(),
            task_type: resolved,
            source,
        }
    }
}

/// The three artifacts for a task, in write order.
pub fn render_artifacts(
    name: &str,
    task_type: TaskType,
    source: &ContentSource,
) -> [(&'static str, String); 3] {
    match source {
        ContentSource::Template { summary } => {
            let vars = TemplateVars::new(name, task_type).with_summary(summary.clone());
            [
                (
                    paths::BUSINESS_CONTEXT_MD,
                    templates::render(templates::BUSINESS_CONTEXT_TEMPLATE, &vars),
                ),
                (
                    paths::APPROACH_MD,
                    templates::render(templates::APPROACH_TEMPLATE, &vars),
                ),
                (
                    paths::COMPLETION_REPORT_MD,
                    templates::render(templates::COMPLETION_REPORT_TEMPLATE, &vars),
                ),
            ]
        }
        ContentSource::Generated { description } => {
            let description = if description.trim().is_empty() {
                name
            } else {
                description.as_str()
            };
            let business = generate::business_context(&BusinessContextRequest {
                task_name: name,
                description,
                user_story: None,
                acceptance_criteria: &[],
                task_type,
            });
            let approach = generate::approach(&ApproachRequest {
                task_name: name,
                business_context: &business,
                tech_stack: &[],
                architecture: None,
                task_type: Some(task_type),
            });
            [
                (paths::BUSINESS_CONTEXT_MD, business),
                (paths::APPROACH_MD, approach),
                (
                    paths::COMPLETION_REPORT_MD,
                    generate::progress_report(name, task_type),
                ),
            ]
        }
    }
}

/// Create `.flow/NN_<name>/` under `root` and populate it.
///
/// The name is validated before anything touches disk. Files already written
/// are left in place if a later write fails.
pub fn create_task(root: &Path, req: &CreateTaskRequest) -> Result<CreatedTask> {
    paths::validate_task_name(&req.name)?;

    let state_dir = paths::state_dir(root);
    io::ensure_dir(&state_dir)?;

    let cfg = Config::load(root)?;
    let project_files = vec![
        project::ensure_project_context(root)?,
        agents::ensure_agents_md(root, &cfg)?,
    ];

    let number = numbering::next_sequence_number(&state_dir)?;
    if number > MAX_SEQUENCE {
        return Err(FlowError::SequenceExhausted(number));
    }

    let dir_name = paths::task_dir_name(number, &req.name);
    let path = state_dir.join(&dir_name);
    match std::fs::create_dir(&path) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
            return Err(FlowError::TaskDirExists(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    }

    let mut files_created = Vec::with_capacity(3);
    for (file, content) in render_artifacts(&req.name, req.task_type, &req.source) {
        io::atomic_write(&path.join(file), content.as_bytes())?;
        files_created.push(file.to_string());
    }

    TaskManifest::new(number, &req.name, req.task_type, req.source.clone()).save(&path)?;

    tracing::info!(
        task = %dir_name,
        task_type = %req.task_type,
        source = req.source.kind(),
        "task created"
    );

    Ok(CreatedTask {
        number,
        name: req.name.clone(),
        dir_name,
        path,
        task_type: req.task_type,
        source: req.source.kind(),
        files_created,
        project_files,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::FileStatus;
    use crate::scan;
    use crate::types::InferredType;
    use crate::validate;
    use tempfile::TempDir;

    fn template(name: &str, task_type: TaskType) -> CreateTaskRequest {
        CreateTaskRequest {
            name: name.to_string(),
            task_type,
            source: ContentSource::Template { summary: None },
        }
    }

    #[test]
    fn options_fall_back_to_config() {
        let cfg = Config {
            default_task_type: TaskType::Research,
            auto_generate: true,
            ..Config::default()
        };
        let req = CreateTaskRequest::from_options(&cfg, "spike", Some("nonsense"), None, None);
        assert_eq!(req.task_type, TaskType::Research);
        assert_eq!(
            req.source,
            ContentSource::Generated {
                description: "spike".into()
            }
        );

        let req = CreateTaskRequest::from_options(
            &Config::default(),
            "login",
            Some("BUG"),
            Some("  fix it "),
            None,
        );
        assert_eq!(req.task_type, TaskType::Bug);
        assert_eq!(
            req.source,
            ContentSource::Template {
                summary: Some("fix it".into())
            }
        );
    }

    #[test]
    fn sequential_creates_number_from_zero() {
        let dir = TempDir::new().unwrap();
        for (i, name) in ["a", "b", "c", "d"].iter().enumerate() {
            let t = create_task(dir.path(), &template(name, TaskType::Feature)).unwrap();
            assert_eq!(t.number, i as u32);
            assert_eq!(t.dir_name, format!("{i:02}_{name}"));
        }
    }

    #[test]
    fn bug_in_empty_project() {
        let dir = TempDir::new().unwrap();
        let t = create_task(dir.path(), &template("login", TaskType::Bug)).unwrap();
        assert_eq!(t.dir_name, "00_login");
        assert_eq!(
            t.files_created,
            vec!["BUSINESS_CONTEXT.md", "APPROACH.md", "COMPLETION_REPORT.md"]
        );

        let bc = std::fs::read_to_string(t.path.join("BUSINESS_CONTEXT.md")).unwrap();
        assert!(bc.contains("Critical"));
        assert!(dir.path().join(".flow/00_login/task.yaml").exists());
        assert!(dir.path().join(".flow/PROJECT_CONTEXT.md").exists());
        assert!(dir.path().join("AGENTS.md").exists());
        assert!(t.project_files.iter().all(|f| f.status == FileStatus::Created));
    }

    #[test]
    fn created_tasks_validate_cleanly() {
        let dir = TempDir::new().unwrap();
        create_task(dir.path(), &template("tpl", TaskType::Improvement)).unwrap();
        create_task(
            dir.path(),
            &CreateTaskRequest {
                name: "gen".into(),
                task_type: TaskType::Research,
                source: ContentSource::Generated {
                    description: "Compare caching strategies".into(),
                },
            },
        )
        .unwrap();

        for name in ["tpl", "gen"] {
            let report = validate::validate_task(dir.path(), name).unwrap();
            assert!(report.is_valid(), "{name}: {report:?}");
        }
    }

    #[test]
    fn listing_uses_manifest_type() {
        let dir = TempDir::new().unwrap();
        create_task(dir.path(), &template("FEATURE_crash", TaskType::Bug)).unwrap();
        let tasks = scan::list_tasks(dir.path()).unwrap();
        assert_eq!(tasks[0].task_type, InferredType::Known(TaskType::Bug));
    }

    #[test]
    fn existing_project_files_are_not_overwritten() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow")).unwrap();
        std::fs::write(dir.path().join(".flow/PROJECT_CONTEXT.md"), "mine").unwrap();
        std::fs::write(dir.path().join(".flow/AGENTS.md"), "agents").unwrap();

        let t = create_task(dir.path(), &template("x", TaskType::Feature)).unwrap();
        assert!(t.project_files.iter().all(|f| f.status == FileStatus::Exists));
        assert_eq!(
            std::fs::read_to_string(dir.path().join(".flow/PROJECT_CONTEXT.md")).unwrap(),
            "mine"
        );
        assert!(!dir.path().join("AGENTS.md").exists());
    }

    #[test]
    fn invalid_name_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let err = create_task(dir.path(), &template("../escape", TaskType::Feature)).unwrap_err();
        assert!(matches!(err, FlowError::InvalidTaskName { .. }));
        assert!(!dir.path().join(".flow").exists());
    }

    #[test]
    fn placeholder_or_padded_names_are_rejected() {
        let dir = TempDir::new().unwrap();
        for name in ["{{WIP}}", "login "] {
            let err = create_task(dir.path(), &template(name, TaskType::Feature)).unwrap_err();
            assert!(matches!(err, FlowError::InvalidTaskName { .. }), "{name:?}");
        }
        assert!(!dir.path().join(".flow").exists());
    }

    #[test]
    fn sequence_exhausted_past_99() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow/99_last")).unwrap();
        let err = create_task(dir.path(), &template("next", TaskType::Feature)).unwrap_err();
        assert!(matches!(err, FlowError::SequenceExhausted(100)));
        assert!(!dir.path().join(".flow/100_next").exists());
    }

    #[test]
    fn same_name_twice_gets_new_number_and_becomes_ambiguous() {
        let dir = TempDir::new().unwrap();
        create_task(dir.path(), &template("auth", TaskType::Feature)).unwrap();
        let second = create_task(dir.path(), &template("auth", TaskType::Feature)).unwrap();
        assert_eq!(second.dir_name, "01_auth");
        let err = validate::validate_task(dir.path(), "auth").unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::AmbiguousMatch);
    }

    #[test]
    fn agents_location_follows_config() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow")).unwrap();
        std::fs::write(
            dir.path().join(".flow/config.yaml"),
            "agents_location: state_dir\n",
        )
        .unwrap();
        create_task(dir.path(), &template("x", TaskType::Feature)).unwrap();
        assert!(dir.path().join(".flow/AGENTS.md").exists());
        assert!(!dir.path().join("AGENTS.md").exists());
    }
}
