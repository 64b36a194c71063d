use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// TaskType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    #[default]
    Feature,
    Bug,
    Improvement,
    Research,
}

/// Fixed presentation table keyed by task type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeProfile {
    pub icon: &'static str,
    pub category: &'static str,
    pub priority: &'static str,
    pub complexity: &'static str,
    pub focus: &'static str,
    pub description: &'static str,
    pub estimate: &'static str,
    pub risk: &'static str,
    pub status: &'static str,
    pub phase: &'static str,
    pub objective: &'static str,
}

impl TaskType {
    /// Priority order used by keyword inference.
    pub fn all() -> &'static [TaskType] {
        &[
            TaskType::Feature,
            TaskType::Bug,
            TaskType::Improvement,
            TaskType::Research,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TaskType::Feature => "feature",
            TaskType::Bug => "bug",
            TaskType::Improvement => "improvement",
            TaskType::Research => "research",
        }
    }

    pub fn profile(self) -> TypeProfile {
        match self {
            TaskType::Feature => TypeProfile {
                icon: "✨",
                category: "Feature",
                priority: "High",
                complexity: "Medium",
                focus: "New functionality",
                description: "New functionality",
                estimate: "1-2 days",
                risk: "Medium",
                status: "In Development",
                phase: "Implementation",
                objective: "Implement the new functionality as specified",
            },
            TaskType::Bug => TypeProfile {
                icon: "🐛",
                category: "Bug Fix",
                priority: "Critical",
                complexity: "Low",
                focus: "Problem correction",
                description: "Bug fix",
                estimate: "2-4 hours",
                risk: "Low",
                status: "Fixing",
                phase: "Debug",
                objective: "Fix the reported bug and make sure there are no regressions",
            },
            TaskType::Improvement => TypeProfile {
                icon: "🔧",
                category: "Improvement",
                priority: "Medium",
                complexity: "Medium",
                focus: "Enhancement of existing behavior",
                description: "Improvement of existing functionality",
                estimate: "4-8 hours",
                risk: "Medium",
                status: "Optimizing",
                phase: "Improvement",
                objective: "Optimize the existing functionality for better performance",
            },
            TaskType::Research => TypeProfile {
                icon: "🔬",
                category: "Research",
                priority: "Low",
                complexity: "High",
                focus: "Investigation",
                description: "Research and investigation",
                estimate: "1-3 days",
                risk: "Medium",
                status: "Investigating",
                phase: "Research",
                objective: "Conduct the investigation and document the findings",
            },
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = crate::error::FlowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "feature" => Ok(TaskType::Feature),
            "bug" => Ok(TaskType::Bug),
            "improvement" => Ok(TaskType::Improvement),
            "research" => Ok(TaskType::Research),
            _ => Err(crate::error::FlowError::InvalidTaskType(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// InferredType
// ---------------------------------------------------------------------------

/// Task type as displayed by listings; `Unknown` when nothing identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InferredType {
    Known(TaskType),
    Unknown,
}

impl InferredType {
    pub fn as_str(self) -> &'static str {
        match self {
            InferredType::Known(t) => t.as_str(),
            InferredType::Unknown => "unknown",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            InferredType::Known(t) => t.profile().icon,
            InferredType::Unknown => "📝",
        }
    }
}

impl Serialize for InferredType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TaskStatus
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    InProgress,
    Complete,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Complete => "complete",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskStatus::InProgress => "🔄 In Progress",
            TaskStatus::Complete => "✅ Complete",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ContentSource
// ---------------------------------------------------------------------------

/// Where a task's artifact text came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ContentSource {
    /// Static templates with placeholder substitution.
    Template {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        summary: Option<String>,
    },
    /// Prose synthesized from a description.
    Generated { description: String },
}

impl ContentSource {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentSource::Template { .. } => "template",
            ContentSource::Generated { .. } => "generated",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("BUG".parse::<TaskType>().unwrap(), TaskType::Bug);
        assert_eq!(" research ".parse::<TaskType>().unwrap(), TaskType::Research);
        assert!("chore".parse::<TaskType>().is_err());
    }

    #[test]
    fn bug_and_research_frame_opposite_ends() {
        let bug = TaskType::Bug.profile();
        let research = TaskType::Research.profile();
        assert_eq!(bug.priority, "Critical");
        assert_eq!(bug.complexity, "Low");
        assert_eq!(research.priority, "Low");
        assert_eq!(research.complexity, "High");
    }

    #[test]
    fn content_source_serializes_with_kind_tag() {
        let src = ContentSource::Generated {
            description: "fix login".into(),
        };
        let yaml = serde_yaml::to_string(&src).unwrap();
        assert!(yaml.contains("kind: generated"));
        assert_eq!(src.kind(), "generated");
    }
}
