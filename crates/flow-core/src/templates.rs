//! Static artifact templates and placeholder substitution.
//!
//! Templates use `{{TOKEN}}` placeholders. [`render`] replaces every known
//! token; anything left behind is reported by validation as an unresolved
//! placeholder.

use crate::types::TaskType;
use regex::Regex;
use std::sync::OnceLock;

pub const TOKEN_TASK_NAME: &str = "{{TASK_NAME}}";
pub const TOKEN_TASK_TYPE: &str = "{{TASK_TYPE}}";
pub const TOKEN_TASK_ICON: &str = "{{TASK_ICON}}";
pub const TOKEN_TASK_DESCRIPTION: &str = "{{TASK_DESCRIPTION}}";
pub const TOKEN_TASK_PRIORITY: &str = "{{TASK_PRIORITY}}";
pub const TOKEN_TASK_CATEGORY: &str = "{{TASK_CATEGORY}}";
pub const TOKEN_SUMMARY: &str = "{{SUMMARY}}";
pub const TOKEN_DATE: &str = "{{DATE}}";

const DEFAULT_SUMMARY: &str = "_Describe the goal of this task in one or two sentences._";

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_re() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| Regex::new(r"\{\{[A-Z][A-Z0-9_]*\}\}").unwrap())
}

// ---------------------------------------------------------------------------
// TemplateVars
// ---------------------------------------------------------------------------

/// Values substituted into a template.
#[derive(Debug, Clone)]
pub struct TemplateVars {
    pub task_name: String,
    pub task_type: TaskType,
    pub summary: Option<String>,
    pub date: String,
}

impl TemplateVars {
    pub fn new(task_name: &str, task_type: TaskType) -> Self {
        Self {
            task_name: task_name.to_string(),
            task_type,
            summary: None,
            date: today(),
        }
    }

    pub fn with_summary(mut self, summary: Option<String>) -> Self {
        self.summary = summary.filter(|s| !s.trim().is_empty());
        self
    }

    fn pairs(&self) -> [(&'static str, String); 8] {
        let profile = self.task_type.profile();
        [
            (TOKEN_TASK_NAME, self.task_name.clone()),
            (TOKEN_TASK_TYPE, self.task_type.as_str().to_string()),
            (TOKEN_TASK_ICON, profile.icon.to_string()),
            (TOKEN_TASK_DESCRIPTION, profile.description.to_string()),
            (TOKEN_TASK_PRIORITY, profile.priority.to_string()),
            (TOKEN_TASK_CATEGORY, profile.category.to_string()),
            (
                TOKEN_SUMMARY,
                self.summary
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SUMMARY.to_string()),
            ),
            (TOKEN_DATE, self.date.clone()),
        ]
    }
}

/// Current UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

/// Replace every known placeholder in `template`.
pub fn render(template: &str, vars: &TemplateVars) -> String {
    let mut out = template.to_string();
    for (token, value) in vars.pairs() {
        out = out.replace(token, &value);
    }
    out
}

/// Distinct `{{TOKEN}}` placeholders still present in `content`, in order of
/// first appearance.
pub fn unresolved_placeholders(content: &str) -> Vec<String> {
    let mut found: Vec<String> = Vec::new();
    for m in placeholder_re().find_iter(content) {
        if !found.iter().any(|f| f == m.as_str()) {
            found.push(m.as_str().to_string());
        }
    }
    found
}

// ---------------------------------------------------------------------------
// Task artifact templates
// ---------------------------------------------------------------------------

pub const BUSINESS_CONTEXT_TEMPLATE: &str = r#"# Business Context: {{TASK_NAME}}

{{TASK_ICON}} **Type**: {{TASK_TYPE}}
**Category**: {{TASK_CATEGORY}}
**Priority**: {{TASK_PRIORITY}}

## Overview

{{SUMMARY}}

### User Story
**As a** user of the system
**I want** _the capability this task delivers_
**So that** _the outcome it enables_

## Behavioral Specification (Gherkin)

### Scenario 1: Main flow
**Given** the system is in its normal state
**When** the user performs the main action
**Then** the expected result is produced

### Scenario 2: Error case
**Given** the required preconditions are not met
**When** the user performs the action
**Then** a clear error message is shown
**And** no data is changed

## Acceptance Criteria

- [ ] **AC1**: _First observable outcome_
- [ ] **AC2**: _Second observable outcome_
- [ ] **AC3**: Errors are reported clearly

## Success Metrics

- _How will we know this work paid off?_

---
**Created**: {{DATE}}
**Owner**: _unassigned_
"#;

pub const APPROACH_TEMPLATE: &str = r#"# Technical Approach: {{TASK_NAME}}

{{TASK_ICON}} {{TASK_DESCRIPTION}} | **Priority**: {{TASK_PRIORITY}}

## Solution Overview

{{SUMMARY}}

## Architecture

### Components Affected
| Component | Responsibility | Impact |
|-----------|----------------|--------|
| _component_ | _what it does_ | _low / medium / high_ |

### Data Flow
1. _Input_
2. _Processing_
3. _Output_

## Implementation Plan

### Phase 1: Preparation
- [ ] Review the business context
- [ ] Identify dependencies

### Phase 2: Implementation
- [ ] Implement the core change
- [ ] Handle error paths

### Phase 3: Verification
- [ ] Unit tests
- [ ] Integration tests

## Testing Strategy

- **Unit**: _scope_
- **Integration**: _scope_

## Risks and Mitigations

| Risk | Impact | Mitigation |
|------|--------|------------|
| _risk_ | _impact_ | _mitigation_ |

---
**Last updated**: {{DATE}}
"#;

pub const COMPLETION_REPORT_TEMPLATE: &str = r#"# Completion Report: {{TASK_NAME}}

{{TASK_ICON}} **Category**: {{TASK_CATEGORY}}

## Summary

| Field | Value |
|-------|-------|
| **Task** | {{TASK_NAME}} |
| **Started** | {{DATE}} |
| **Finished** | _pending_ |

## Work Log

### {{DATE}} - Task created
- [x] Task context initialized
- [ ] Implementation
- [ ] Review

## Acceptance Criteria Validation

- [ ] **AC1**: _result_
- [ ] **AC2**: _result_
- [ ] **AC3**: _result_

## Deviations from the Approach

_None recorded._

## Lessons Learned

- _Fill in once the task is done._
"#;

// ---------------------------------------------------------------------------
// Agents file
// ---------------------------------------------------------------------------

pub const AGENTS_START_MARKER: &str = "<!-- flow:start -->";
pub const AGENTS_END_MARKER: &str = "<!-- flow:end -->";

pub const AGENTS_HEADER: &str = "# AGENTS.md\n\nInstructions for AI coding assistants working in this repository.\n\n";

const AGENTS_SECTION_BODY: &str = r#"## Flow Workflow

This project organizes work with Flow. Every task lives in `.flow/NN_<name>/`
and carries three documents:

- `BUSINESS_CONTEXT.md`: what to build and why, with Gherkin scenarios
- `APPROACH.md`: how it will be built
- `COMPLETION_REPORT.md`: what was actually done

Project-wide conventions are in `.flow/PROJECT_CONTEXT.md`. Read it first.

### Working on a task

1. Read `BUSINESS_CONTEXT.md` and confirm the acceptance criteria.
2. Write or refine `APPROACH.md` before changing code.
3. Implement, keeping changes scoped to the task.
4. Record the work, issues found and deviations in `COMPLETION_REPORT.md`.
5. Run `flow validate <task>` and fix every reported issue.

### Commands

- `flow <name> --type <feature|bug|improvement|research>`: create a task
- `flow list`: list tasks with their status
- `flow validate <name>`: check a task's documents
- `flow status`: project summary
"#;

/// The managed section, markers included.
pub fn agents_section() -> String {
    format!("{AGENTS_START_MARKER}\n{AGENTS_SECTION_BODY}{AGENTS_END_MARKER}")
}

/// A fresh `AGENTS.md`.
pub fn agents_document() -> String {
    format!("{AGENTS_HEADER}{}\n", agents_section())
}
