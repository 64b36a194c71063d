//! Plain-text renderings shared by the MCP tools and the human CLI output.
//!
//! Nothing here emits ANSI colour: tool results travel over JSON-RPC.

use flow_core::agents::{AgentsCheck, AgentsUpdate};
use flow_core::analyze::{CodebaseAnalysis, TreeLine};
use flow_core::project::{FileOutcome, InitReport};
use flow_core::scan::{ProjectStatus, TaskInfo, TaskSummary};
use flow_core::types::{InferredType, TaskType};
use flow_core::validate::ValidationReport;
use flow_core::writer::CreatedTask;

fn rule() -> String {
    "─".repeat(50)
}

pub fn created_task(t: &CreatedTask) -> String {
    format!(
        "✅ Task \"{}\" created successfully!\n\
         📁 Location: {}\n\
         📄 Files created: {}\n\
         🏷️ Type: {}",
        t.name,
        t.path.display(),
        t.files_created.join(", "),
        t.task_type,
    )
}

pub fn task_line(t: &TaskSummary) -> String {
    format!(
        "{} {} {} {}",
        t.entry.number_label(),
        t.task_type.icon(),
        t.entry.name,
        t.status.label()
    )
}

pub fn task_list(tasks: &[TaskSummary], initialized: bool) -> String {
    if !initialized {
        return "⚠️ No .flow directory found. Run \"create_task\" to initialize.".to_string();
    }
    if tasks.is_empty() {
        return "📝 No tasks found. Create your first task with \"create_task\".".to_string();
    }

    let mut out = format!("📋 Existing Tasks:\n{}\n", rule());
    for t in tasks {
        out.push_str(&task_line(t));
        out.push('\n');
    }
    out.push_str(&format!("{}\nTotal: {} task(s)", rule(), tasks.len()));
    out
}

pub fn validation(report: &ValidationReport) -> String {
    let mut out = format!(
        "🔍 Validating task: {}\n📁 Path: {}\n{}\n",
        report.task.name,
        report.task.path.display(),
        rule()
    );
    for artifact in &report.artifacts {
        let status = if artifact.is_valid() {
            "✅ Valid"
        } else {
            "❌ Issues"
        };
        out.push_str(&format!("{status} {}\n", artifact.file));
        for issue in &artifact.issues {
            out.push_str(&format!("   └─ {issue}\n"));
        }
    }
    out.push_str(&rule());
    out.push('\n');
    if report.is_valid() {
        out.push_str("✅ Task structure is valid!");
    } else {
        out.push_str("❌ Task structure has issues that need to be fixed.");
    }
    out
}

pub fn task_info(info: &TaskInfo) -> String {
    let entry = &info.task.entry;
    let mut out = format!(
        "📋 Task Information: {}\n📁 Path: {}\n🔢 Number: {}\n",
        entry.name,
        entry.path.display(),
        entry.number_label()
    );
    out.push_str(&format!(
        "{} Type: {} | Status: {}\n",
        info.task.task_type.icon(),
        info.task.task_type,
        info.task.status.label()
    ));
    if let Some(m) = &info.manifest {
        out.push_str(&format!("🗓️ Created: {}\n", m.created_at.format("%Y-%m-%d %H:%M UTC")));
    }
    out.push_str(&rule());
    out.push('\n');
    for artifact in info.artifacts.iter().filter(|a| a.exists) {
        out.push_str(&format!("\n📄 {}:\n", artifact.file));
        for line in &artifact.head {
            out.push_str(line);
            out.push('\n');
        }
    }
    out
}

pub fn project_status(s: &ProjectStatus) -> String {
    if !s.initialized {
        return "⚠️ No .flow directory found. Project not initialized.".to_string();
    }
    let mut out = format!("📊 Project Status\n{}\n", rule());
    out.push_str(&format!("📈 Total Tasks: {}\n", s.total));
    out.push_str(&format!("✅ Completed: {}\n", s.complete));
    out.push_str(&format!("🔄 In Progress: {}\n", s.in_progress));
    out.push_str(&format!("📊 Completion Rate: {}%\n\n", s.completion_rate));
    out.push_str("📋 Task Types:\n");
    let t = &s.by_type;
    let rows = [
        (InferredType::Known(TaskType::Feature), "Features", t.feature),
        (InferredType::Known(TaskType::Bug), "Bugs", t.bug),
        (InferredType::Known(TaskType::Improvement), "Improvements", t.improvement),
        (InferredType::Known(TaskType::Research), "Research", t.research),
        (InferredType::Unknown, "Unknown", t.unknown),
    ];
    for (kind, label, count) in rows {
        out.push_str(&format!("{} {label}: {count}\n", kind.icon()));
    }
    out
}

fn file_line(out: &mut String, label: &str, f: &FileOutcome) {
    out.push_str(&format!("  {label}: {} ({})\n", f.path.display(), f.status.as_str()));
}

pub fn init_report(r: &InitReport) -> String {
    let mut out = format!("🚀 Flow project initialized in {}\n", r.root.display());
    if !r.state_dir_created {
        out.push_str("ℹ️ .flow directory already exists; existing files were kept\n");
    }
    file_line(&mut out, "Project context", &r.project_context);
    file_line(&mut out, "Config", &r.config);
    file_line(&mut out, "Agents", &r.agents);
    if !r.sections.is_empty() {
        out.push_str(&format!("📝 Sections provided: {}\n", r.sections.join(", ")));
    }
    out
}

pub fn agents_check(c: &AgentsCheck, show_details: bool) -> String {
    let mut out = format!(
        "🔍 AGENTS.md check\n📁 Path: {}\n📍 Location: {}\n",
        c.path.display(),
        c.location
    );
    let marker = if c.state.needs_update() { "⚠️" } else { "✅" };
    out.push_str(&format!("{marker} {}\n", c.state.describe()));
    if c.state.needs_update() {
        out.push_str("Run \"update_agents_template\" to refresh the Flow section.\n");
    }
    if show_details {
        if let Some(current) = &c.current_section {
            out.push_str(&format!("\n--- current section ---\n{current}\n"));
        }
        out.push_str(&format!("\n--- template section ---\n{}\n", c.template_section));
    }
    out
}

pub fn agents_update(u: &AgentsUpdate) -> String {
    let mut out = format!("✅ AGENTS.md {}: {}\n", u.action.as_str(), u.path.display());
    if let Some(backup) = &u.backup {
        out.push_str(&format!("💾 Backup: {}\n", backup.display()));
    }
    out
}

pub fn analysis(a: &CodebaseAnalysis) -> String {
    let mut out = format!("🔍 Codebase Analysis: {}\n{}\n", a.root.display(), rule());

    for m in &a.manifests {
        out.push_str(&format!("\n📦 {}\n", m.file));
        if let Some(name) = &m.name {
            out.push_str(&format!("  Name: {name}\n"));
        }
        if let Some(version) = &m.version {
            out.push_str(&format!("  Version: {version}\n"));
        }
        if let Some(desc) = &m.description {
            out.push_str(&format!("  Description: {desc}\n"));
        }
        if m.dependency_count > 0 {
            out.push_str(&format!("  Dependencies ({}):\n", m.dependency_count));
            for dep in &m.dependencies {
                out.push_str(&format!("    - {dep}\n"));
            }
            let hidden = m.dependency_count.saturating_sub(m.dependencies.len());
            if hidden > 0 {
                out.push_str(&format!("    ... and {hidden} more\n"));
            }
        }
    }

    out.push_str("\n📁 Structure:\n");
    for line in &a.tree {
        let (depth, text) = match line {
            TreeLine::Dir { depth, name } => (*depth, format!("📁 {name}/")),
            TreeLine::File { depth, name } => (*depth, format!("📄 {name}")),
            TreeLine::MoreDirs { depth, count } => (*depth, format!("... {count} more directories")),
            TreeLine::MoreFiles { depth, count } => (*depth, format!("... {count} more files")),
        };
        out.push_str(&format!("{}{text}\n", "  ".repeat(depth + 1)));
    }

    if !a.config_files.is_empty() {
        out.push_str("\n⚙️ Configuration Files:\n");
        for f in &a.config_files {
            out.push_str(&format!("  ✅ {f}\n"));
        }
    }

    out.push_str(&format!("\n📊 File Statistics ({} files):\n", a.total_files));
    for ext in &a.extensions {
        out.push_str(&format!("  {}: {} files\n", ext.extension, ext.count));
    }
    out
}
