use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("no .flow directory found in {0}: run 'flow init' or create a task first")]
    StateDirMissing(String),

    #[error("task '{0}' not found: list tasks to see available names")]
    TaskNotFound(String),

    #[error("task name '{name}' is ambiguous: matches {}", candidates.join(", "))]
    AmbiguousTask {
        name: String,
        candidates: Vec<String>,
    },

    #[error("task directory already exists: {0}")]
    TaskDirExists(String),

    #[error("invalid task name '{name}': {reason}")]
    InvalidTaskName { name: String, reason: String },

    #[error("invalid task type '{0}': expected one of feature, bug, improvement, research")]
    InvalidTaskType(String),

    #[error("sequence exhausted: next task number would be {0}, but task numbers are two digits (00-99)")]
    SequenceExhausted(u32),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Coarse error classification exposed to tool callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    AmbiguousMatch,
    Io,
    MalformedArtifact,
    InvalidInput,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::NotFound => "not_found",
            ErrorKind::AmbiguousMatch => "ambiguous_match",
            ErrorKind::Io => "io",
            ErrorKind::MalformedArtifact => "malformed_artifact",
            ErrorKind::InvalidInput => "invalid_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FlowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            FlowError::StateDirMissing(_)
            | FlowError::TaskNotFound(_)
            | FlowError::PathNotFound(_) => ErrorKind::NotFound,
            FlowError::AmbiguousTask { .. } => ErrorKind::AmbiguousMatch,
            FlowError::InvalidTaskName { .. }
            | FlowError::InvalidTaskType(_)
            | FlowError::SequenceExhausted(_)
            | FlowError::InvalidArguments(_) => ErrorKind::InvalidInput,
            FlowError::TaskDirExists(_) | FlowError::Io(_) => ErrorKind::Io,
            FlowError::Yaml(_) | FlowError::Json(_) => ErrorKind::MalformedArtifact,
        }
    }
}

pub type Result<T> = std::result::Result<T, FlowError>;
