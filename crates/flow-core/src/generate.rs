//! Synthesized artifact prose.
//!
//! Used when a task is created with auto-generation and by the generator
//! tools. Every document is keyed off [`TaskType::profile`], so a bug reads
//! as urgent and narrow while research reads as open-ended.

use crate::scan::infer_type_from_text;
use crate::templates::today;
use crate::types::{InferredType, TaskType};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Business context
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BusinessContextRequest<'a> {
    pub task_name: &'a str,
    pub description: &'a str,
    pub user_story: Option<&'a str>,
    pub acceptance_criteria: &'a [String],
    pub task_type: TaskType,
}

pub fn business_context(req: &BusinessContextRequest<'_>) -> String {
    let p = req.task_type.profile();
    let mut out = String::new();

    out.push_str(&format!("# Business Context: {}\n\n", req.task_name));
    out.push_str(&format!("{} **Type**: {}\n", p.icon, req.task_type));
    out.push_str(&format!("**Category**: {}\n", p.category));
    out.push_str(&format!("**Priority**: {}\n\n", p.priority));

    out.push_str("## Overview\n\n### User Story\n");
    match req.user_story.filter(|s| !s.trim().is_empty()) {
        Some(story) => {
            out.push_str(&format!("{}\n", story.trim()));
        }
        None => {
            out.push_str(&format!(
                "**As a** user of the system\n**I want** {}\n**So that** my work is faster and more reliable\n",
                lowercase_first(req.description.trim())
            ));
        }
    }
    out.push_str(&format!("\n### Description\n{}\n\n", req.description.trim()));
    out.push_str(&format!("### Value\n{}\n", business_value(req.task_type)));
    out.push_str(&format!("- **Priority**: {} - {}\n\n", p.priority, p.category));

    out.push_str("## Behavioral Specification (Gherkin)\n\n");
    out.push_str(primary_scenario(req.task_type));
    out.push_str("\n\n");
    out.push_str(
        "### Scenario 2: Error case\n\
         **Given** the user lacks the required permissions\n\
         **When** they attempt the action\n\
         **Then** a clear error message is shown\n\
         **And** the action is not performed\n\n\
         ### Scenario 3: Input validation\n\
         **Given** the input is invalid\n\
         **When** the action is attempted\n\
         **Then** the user is told which input is wrong\n\
         **And** can correct it and retry\n\n",
    );

    out.push_str("## Acceptance Criteria\n\n");
    if req.acceptance_criteria.is_empty() {
        out.push_str(default_criteria(req.task_type));
        out.push('\n');
    } else {
        for (i, criterion) in req.acceptance_criteria.iter().enumerate() {
            out.push_str(&format!("- [ ] **AC{}**: {}\n", i + 1, criterion.trim()));
        }
    }

    out.push_str(
        "\n## Success Metrics\n\n\
         - **Reliability**: error rate below 1%\n\
         - **Responsiveness**: actions complete in under 2 seconds\n\
         - **Adoption**: the change is used by the people it was built for\n\n",
    );

    out.push_str(&format!(
        "---\n**Last updated**: {}\n**Owner**: _unassigned_\n**Status**: {}\n",
        today(),
        p.status
    ));
    out
}

fn business_value(t: TaskType) -> &'static str {
    match t {
        TaskType::Feature => {
            "- **Impact**: adds a capability users currently lack\n\
             - **Metrics**: user satisfaction and time saved per workflow"
        }
        TaskType::Bug => {
            "- **Impact**: restores correct behavior and user trust\n\
             - **Metrics**: fewer support tickets for this defect\n\
             - **Urgency**: the defect affects core functionality"
        }
        TaskType::Improvement => {
            "- **Impact**: makes an existing workflow faster or easier\n\
             - **Metrics**: measured before/after performance and usability"
        }
        TaskType::Research => {
            "- **Impact**: informs upcoming decisions with evidence\n\
             - **Metrics**: quality of the data and relevance of the conclusions"
        }
    }
}

fn primary_scenario(t: TaskType) -> &'static str {
    match t {
        TaskType::Feature => {
            "### Scenario 1: Main flow\n\
             **Given** the user is signed in\n\
             **And** has the required permissions\n\
             **When** they perform the main action\n\
             **Then** they receive the expected result\n\
             **And** the action is recorded"
        }
        TaskType::Bug => {
            "### Scenario 1: Defect no longer reproduces\n\
             **Given** the conditions that used to trigger the defect\n\
             **When** the user repeats the triggering action\n\
             **Then** the system behaves correctly\n\
             **And** the reported error does not occur"
        }
        TaskType::Improvement => {
            "### Scenario 1: Enhanced behavior\n\
             **Given** the user relies on the existing workflow\n\
             **When** they use it after the change\n\
             **Then** it is measurably faster or simpler\n\
             **And** existing behavior is preserved"
        }
        TaskType::Research => {
            "### Scenario 1: Investigation\n\
             **Given** the open questions are written down\n\
             **When** the investigation is carried out\n\
             **Then** each question has an evidence-backed answer\n\
             **And** the findings are documented"
        }
    }
}

fn default_criteria(t: TaskType) -> &'static str {
    match t {
        TaskType::Feature => {
            "- [ ] **AC1**: The functionality works as described\n\
             - [ ] **AC2**: Errors are handled and reported clearly\n\
             - [ ] **AC3**: The behavior is covered by automated tests"
        }
        TaskType::Bug => {
            "- [ ] **AC1**: The reported defect is fixed\n\
             - [ ] **AC2**: No regressions in related functionality\n\
             - [ ] **AC3**: A regression test reproduces the original defect"
        }
        TaskType::Improvement => {
            "- [ ] **AC1**: The enhancement meets its target\n\
             - [ ] **AC2**: Existing behavior is unchanged\n\
             - [ ] **AC3**: Before/after measurements are recorded"
        }
        TaskType::Research => {
            "- [ ] **AC1**: The methodology is documented\n\
             - [ ] **AC2**: Data was collected and analyzed\n\
             - [ ] **AC3**: Conclusions and recommendations are written up"
        }
    }
}

// ---------------------------------------------------------------------------
// Approach
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ApproachRequest<'a> {
    pub task_name: &'a str,
    pub business_context: &'a str,
    pub tech_stack: &'a [String],
    pub architecture: Option<&'a str>,
    /// Inferred from `business_context` when `None`.
    pub task_type: Option<TaskType>,
}

/// Type declared by a `**Type**: <type>` line, else keyword inference, else
/// `Feature`.
pub fn detect_type(business_context: &str) -> TaskType {
    for line in business_context.lines() {
        if let Some((_, rest)) = line.split_once("**Type**:") {
            if let Ok(t) = rest.trim().parse::<TaskType>() {
                return t;
            }
        }
    }
    match infer_type_from_text(business_context) {
        InferredType::Known(t) => t,
        InferredType::Unknown => TaskType::Feature,
    }
}

pub fn approach(req: &ApproachRequest<'_>) -> String {
    let task_type = req
        .task_type
        .unwrap_or_else(|| detect_type(req.business_context));
    let p = task_type.profile();
    let mut out = String::new();

    out.push_str(&format!("# Technical Approach: {}\n\n", req.task_name));
    out.push_str(&format!("{} **Type**: {}\n\n", p.icon, task_type));

    out.push_str("## Solution Overview\n\n");
    out.push_str(&format!("### Objective\n{} for {}\n\n", p.focus, req.task_name));
    if let Some(summary) = first_description_line(req.business_context) {
        out.push_str(&format!("### Context\n{summary}\n\n"));
    }
    out.push_str(&format!(
        "### Estimate\n- **Complexity**: {}\n- **Time**: {}\n- **Risk**: {}\n\n",
        p.complexity, p.estimate, p.risk
    ));

    out.push_str("## Architecture\n\n");
    match req.architecture.filter(|a| !a.trim().is_empty()) {
        Some(arch) => {
            out.push_str(&format!("{}\n\n", arch.trim()));
        }
        None => {
            out.push_str(architecture_outline(task_type));
            out.push_str("\n\n");
        }
    }
    if !req.tech_stack.is_empty() {
        out.push_str("### Technology\n");
        for tech in req.tech_stack {
            out.push_str(&format!("- {}\n", tech.trim()));
        }
        out.push('\n');
    }

    out.push_str("## Implementation Plan\n\n");
    out.push_str(implementation_steps(task_type));
    out.push_str("\n\n## Testing Strategy\n\n");
    out.push_str(testing_strategy(task_type));
    out.push_str(
        "\n\n## Risks and Mitigations\n\n\
         | Risk | Mitigation |\n\
         |------|------------|\n\
         | Regressions in related code | Run the full test suite before merging |\n\
         | Scope creep | Keep changes tied to the acceptance criteria |\n\n",
    );
    out.push_str(&format!("---\n**Last updated**: {}\n", today()));
    out
}

fn first_description_line(business_context: &str) -> Option<&str> {
    let mut lines = business_context.lines();
    lines.find(|l| l.trim() == "### Description")?;
    lines.map(str::trim).find(|l| !l.is_empty())
}

fn architecture_outline(t: TaskType) -> &'static str {
    match t {
        TaskType::Feature => {
            "### Components\n\
             1. **Entry point**: receives and validates the request\n\
             2. **Service layer**: applies the business rules\n\
             3. **Storage**: persists the resulting state\n\n\
             ```\n\
             validate input -> check permissions -> apply rules -> persist -> respond\n\
             ```"
        }
        TaskType::Bug => {
            "### Components\n\
             1. **Root cause**: the component that misbehaves\n\
             2. **Blast radius**: components that depend on it\n\
             3. **Fix**: the smallest change that corrects the behavior\n\n\
             ```\n\
             reproduce -> isolate root cause -> fix -> add regression test -> verify\n\
             ```"
        }
        TaskType::Improvement => {
            "### Components\n\
             1. **Baseline**: current measurements\n\
             2. **Hot spots**: where time or effort is lost\n\
             3. **Changes**: targeted optimizations\n\n\
             ```\n\
             measure -> find bottleneck -> optimize -> measure again\n\
             ```"
        }
        TaskType::Research => {
            "### Components\n\
             1. **Hypotheses**: what we expect to learn\n\
             2. **Data collection**: sources and method\n\
             3. **Analysis**: how results are interpreted\n\n\
             ```\n\
             define questions -> collect data -> analyze -> document -> recommend\n\
             ```"
        }
    }
}

fn implementation_steps(t: TaskType) -> &'static str {
    match t {
        TaskType::Feature => {
            "### 1. Data model\n- [ ] Define the types involved\n- [ ] Add validation rules\n\n\
             ### 2. Interface\n- [ ] Define inputs and outputs\n- [ ] Map errors to clear messages\n\n\
             ### 3. Logic\n- [ ] Implement the main flow\n- [ ] Wire up integrations"
        }
        TaskType::Bug => {
            "### 1. Analysis\n- [ ] Document reproduction steps\n- [ ] Identify the root cause\n\n\
             ### 2. Minimal fix\n- [ ] Apply the fix\n- [ ] Confirm the defect is gone\n\n\
             ### 3. Hardening\n- [ ] Add a regression test\n- [ ] Check related code paths"
        }
        TaskType::Improvement => {
            "### 1. Baseline\n- [ ] Measure current behavior\n- [ ] Set a target\n\n\
             ### 2. Changes\n- [ ] Optimize the identified hot spots\n\n\
             ### 3. Validation\n- [ ] Compare against the baseline"
        }
        TaskType::Research => {
            "### 1. Method\n- [ ] State the hypotheses\n- [ ] Choose data sources\n\n\
             ### 2. Collection\n- [ ] Gather the data\n\n\
             ### 3. Analysis\n- [ ] Interpret the results\n- [ ] Write recommendations"
        }
    }
}

fn testing_strategy(t: TaskType) -> &'static str {
    match t {
        TaskType::Feature => {
            "- [ ] Unit tests for the business rules\n\
             - [ ] Integration tests for the full flow\n\
             - [ ] Acceptance tests for each Gherkin scenario"
        }
        TaskType::Bug => {
            "- [ ] Test that reproduces the original defect\n\
             - [ ] Edge cases around the fix\n\
             - [ ] Full regression run"
        }
        TaskType::Improvement => {
            "- [ ] Before/after benchmarks\n\
             - [ ] Full regression run"
        }
        TaskType::Research => {
            "- [ ] Repeat key experiments\n\
             - [ ] Cross-check conclusions against the raw data"
        }
    }
}

// ---------------------------------------------------------------------------
// Completion report
// ---------------------------------------------------------------------------

/// Optional figures reported when a task is finished.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub files_changed: Option<u64>,
    #[serde(default)]
    pub lines_added: Option<u64>,
    #[serde(default)]
    pub lines_removed: Option<u64>,
    #[serde(default)]
    pub test_coverage: Option<f64>,
}

impl ReportMetrics {
    fn is_empty(&self) -> bool {
        *self == ReportMetrics::default()
    }
}

#[derive(Debug, Clone)]
pub struct CompletionReportRequest<'a> {
    pub task_name: &'a str,
    pub work_done: &'a [String],
    pub issues_found: &'a [String],
    pub deviations: &'a [String],
    pub metrics: &'a ReportMetrics,
}

/// Report for a finished task.
pub fn completion_report(req: &CompletionReportRequest<'_>) -> String {
    let date = today();
    let m = req.metrics;
    let mut out = String::new();

    out.push_str(&format!("# Completion Report: {}\n\n", req.task_name));
    out.push_str("## Summary\n\n| Field | Value |\n|-------|-------|\n");
    out.push_str(&format!("| **Task** | {} |\n", req.task_name));
    out.push_str("| **Status** | ✅ Complete |\n");
    out.push_str(&format!("| **Finished** | {date} |\n"));
    out.push_str(&format!(
        "| **Duration** | {} |\n\n",
        m.duration.as_deref().unwrap_or("not recorded")
    ));
    out.push_str(&format!(
        "{} work item(s) completed, {} issue(s) fixed along the way.\n\n",
        req.work_done.len(),
        req.issues_found.len()
    ));

    out.push_str("## References\n\n- [BUSINESS_CONTEXT.md](./BUSINESS_CONTEXT.md)\n- [APPROACH.md](./APPROACH.md)\n\n");

    out.push_str("## Work Log\n\n");
    out.push_str(&format!("### {date}\n"));
    if req.work_done.is_empty() {
        out.push_str("- _No work items recorded._\n");
    }
    for item in req.work_done {
        out.push_str(&format!("- **DONE**: {}\n", item.trim()));
    }
    if !req.issues_found.is_empty() {
        out.push_str("\n### Issues fixed\n");
        for issue in req.issues_found {
            out.push_str(&format!("- **FIXED**: {}\n", issue.trim()));
        }
    }

    out.push_str("\n## Deviations from the Approach\n\n");
    if req.deviations.is_empty() {
        out.push_str("_No significant deviations from the plan._\n");
    } else {
        out.push_str("| Deviation | Reason |\n|-----------|--------|\n");
        for d in req.deviations {
            out.push_str(&format!("| {} | _to be documented_ |\n", d.trim()));
        }
    }

    out.push_str("\n## Metrics\n\n");
    if m.is_empty() {
        out.push_str("_No metrics recorded._\n");
    } else {
        if let Some(n) = m.files_changed {
            out.push_str(&format!("- **Files changed**: {n}\n"));
        }
        if let Some(n) = m.lines_added {
            out.push_str(&format!("- **Lines added**: {n}\n"));
        }
        if let Some(n) = m.lines_removed {
            out.push_str(&format!("- **Lines removed**: {n}\n"));
        }
        if let Some(c) = m.test_coverage {
            out.push_str(&format!("- **Test coverage**: {c}%\n"));
        }
        if let Some(d) = &m.duration {
            out.push_str(&format!("- **Duration**: {d}\n"));
        }
    }

    out.push_str(
        "\n## Final Checklist\n\n\
         - [x] Acceptance criteria met\n\
         - [x] Tests passing\n\
         - [x] Documentation updated\n",
    );
    out
}

/// In-progress report written when a task is created with auto-generation.
pub fn progress_report(task_name: &str, task_type: TaskType) -> String {
    let p = task_type.profile();
    let date = today();
    format!(
        "# Completion Report: {task_name}\n\n\
         ## Current Status\n\n\
         **Status**: {status}\n\
         **Phase**: {phase}\n\
         **Started**: {date}\n\
         **Owner**: _unassigned_\n\n\
         ## Objectives\n\n\
         {objective}\n\n\
         ### Success Criteria\n\
         - [ ] Implemented and tested as specified\n\
         - [ ] All tests passing\n\
         - [ ] Documentation updated\n\
         - [ ] Code review approved\n\n\
         ## Work Log\n\n\
         ### {date} - Task created\n\
         - [x] Task context initialized\n\
         - [x] Documents generated\n\
         - [ ] Detailed requirements analysis\n\
         - [ ] Implementation\n\n\
         ## Risks and Blockers\n\n\
         - No blockers identified yet\n\n\
         ## Notes\n\n\
         - _Technical decisions go here as they are made._\n",
        status = p.status,
        phase = p.phase,
        objective = p.objective,
    )
}

fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::templates::unresolved_placeholders;
    use crate::validate::count_section_headers;

    fn bc(task_type: TaskType, criteria: &[String]) -> String {
        business_context(&BusinessContextRequest {
            task_name: "login",
            description: "Fix the login redirect",
            user_story: None,
            acceptance_criteria: criteria,
            task_type,
        })
    }

    #[test]
    fn bug_business_context_is_critical() {
        let doc = bc(TaskType::Bug, &[]);
        assert!(doc.contains("**Priority**: Critical"));
        assert!(doc.contains("Given") && doc.contains("When") && doc.contains("Then"));
        assert!(unresolved_placeholders(&doc).is_empty());
    }

    #[test]
    fn generated_business_context_infers_its_own_type() {
        for t in TaskType::all() {
            let doc = bc(*t, &[]);
            assert_eq!(infer_type_from_text(&doc), InferredType::Known(*t), "{t}");
        }
    }

    #[test]
    fn acceptance_criteria_are_numbered() {
        let criteria = vec!["Redirects to dashboard".to_string(), "Keeps session".to_string()];
        let doc = bc(TaskType::Feature, &criteria);
        assert!(doc.contains("**AC1**: Redirects to dashboard"));
        assert!(doc.contains("**AC2**: Keeps session"));
    }

    #[test]
    fn user_story_overrides_default() {
        let doc = business_context(&BusinessContextRequest {
            task_name: "x",
            description: "d",
            user_story: Some("As an admin I want audit logs"),
            acceptance_criteria: &[],
            task_type: TaskType::Feature,
        });
        assert!(doc.contains("As an admin I want audit logs"));
        assert!(!doc.contains("**As a** user"));
    }

    #[test]
    fn approach_type_comes_from_business_context() {
        let ctx = bc(TaskType::Bug, &[]);
        let doc = approach(&ApproachRequest {
            task_name: "login",
            business_context: &ctx,
            tech_stack: &["Rust".to_string()],
            architecture: None,
            task_type: None,
        });
        assert!(doc.contains("**Complexity**: Low"));
        assert!(doc.contains("Problem correction for login"));
        assert!(doc.contains("Fix the login redirect"));
        assert!(doc.contains("- Rust"));
        assert!(count_section_headers(&doc) >= 3);
    }

    #[test]
    fn detect_type_without_declaration_uses_keywords() {
        assert_eq!(detect_type("this is a research spike"), TaskType::Research);
        assert_eq!(detect_type("nothing to see"), TaskType::Feature);
        assert_eq!(detect_type("**Type**: improvement\nfeature"), TaskType::Improvement);
    }

    #[test]
    fn completion_report_lists_work_and_metrics() {
        let metrics = ReportMetrics {
            files_changed: Some(4),
            test_coverage: Some(87.5),
            ..ReportMetrics::default()
        };
        let doc = completion_report(&CompletionReportRequest {
            task_name: "login",
            work_done: &["Fixed redirect".to_string()],
            issues_found: &[],
            deviations: &["Skipped caching".to_string()],
            metrics: &metrics,
        });
        assert!(doc.contains("**DONE**: Fixed redirect"));
        assert!(doc.contains("| Skipped caching |"));
        assert!(doc.contains("**Files changed**: 4"));
        assert!(doc.contains("**Test coverage**: 87.5%"));
        assert!(!doc.contains("Issues fixed"));
    }

    #[test]
    fn progress_report_uses_type_phase() {
        let doc = progress_report("login", TaskType::Research);
        assert!(doc.contains("**Phase**: Research"));
        assert!(doc.contains("Conduct the investigation"));
    }
}
