//! Lightweight codebase survey used to seed project context.

use crate::error::{FlowError, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_EXCLUDES: &[&str] = &["node_modules", "target", "dist", "build", ".git"];

const MANIFEST_FILES: &[&str] = &["Cargo.toml", "package.json", "pyproject.toml", "go.mod"];

const CONFIG_FILES: &[&str] = &[
    "rustfmt.toml",
    "clippy.toml",
    "rust-toolchain.toml",
    "tsconfig.json",
    "eslint.config.js",
    ".eslintrc.js",
    "jest.config.js",
    "vite.config.js",
    "webpack.config.js",
    "next.config.js",
    "tailwind.config.js",
    ".editorconfig",
    "Dockerfile",
    "docker-compose.yml",
    "Makefile",
];

const MAX_DEPENDENCIES_SHOWN: usize = 10;
const MAX_EXTENSIONS_SHOWN: usize = 10;

#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    pub max_depth: usize,
    pub entries_per_level: usize,
    /// Directory names skipped in addition to [`DEFAULT_EXCLUDES`].
    pub exclude: Vec<String>,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            max_depth: 3,
            entries_per_level: 5,
            exclude: Vec::new(),
        }
    }
}

impl AnalyzeOptions {
    /// Add exclusions given as directory globs (`dist/**`, `**/vendor/`).
    /// Only the directory name survives; anything else with a wildcard is
    /// ignored.
    pub fn exclude_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for pattern in patterns {
            let name = pattern
                .as_ref()
                .trim()
                .trim_start_matches("**/")
                .trim_end_matches("/**")
                .trim_matches('/');
            if name.is_empty() || name.contains('*') || name.contains('/') {
                tracing::debug!(pattern = pattern.as_ref(), "ignoring exclude pattern");
                continue;
            }
            self.exclude.push(name.to_string());
        }
        self
    }

    fn is_excluded(&self, name: &str) -> bool {
        DEFAULT_EXCLUDES.contains(&name) || self.exclude.iter().any(|e| e == name)
    }
}

// ---------------------------------------------------------------------------
// Result types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectManifest {
    pub file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub dependency_count: usize,
    /// At most ten, in file order.
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeLine {
    Dir { depth: usize, name: String },
    File { depth: usize, name: String },
    MoreDirs { depth: usize, count: usize },
    MoreFiles { depth: usize, count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtensionCount {
    pub extension: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CodebaseAnalysis {
    pub root: PathBuf,
    pub manifests: Vec<ProjectManifest>,
    pub tree: Vec<TreeLine>,
    pub config_files: Vec<String>,
    pub total_files: usize,
    pub extensions: Vec<ExtensionCount>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

pub fn analyze(path: &Path, opts: &AnalyzeOptions) -> Result<CodebaseAnalysis> {
    if !path.is_dir() {
        return Err(FlowError::PathNotFound(path.display().to_string()));
    }

    let manifests = MANIFEST_FILES
        .iter()
        .filter(|f| path.join(f).is_file())
        .map(|f| read_manifest(&path.join(f), f))
        .collect::<Result<Vec<_>>>()?;

    let mut tree = Vec::new();
    walk_tree(path, 0, opts, &mut tree);

    let config_files = CONFIG_FILES
        .iter()
        .filter(|f| path.join(f).exists())
        .map(|f| f.to_string())
        .collect();

    let (total_files, extensions) = count_extensions(path, opts);

    tracing::debug!(path = %path.display(), total_files, "analyzed codebase");
    Ok(CodebaseAnalysis {
        root: path.to_path_buf(),
        manifests,
        tree,
        config_files,
        total_files,
        extensions,
    })
}

fn walk_tree(dir: &Path, depth: usize, opts: &AnalyzeOptions, out: &mut Vec<TreeLine>) {
    if depth >= opts.max_depth {
        return;
    }
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        if entry.file_type().is_dir() {
            if !opts.is_excluded(&name) {
                dirs.push((name, entry.into_path()));
            }
        } else if entry.file_type().is_file() {
            files.push(name);
        }
    }

    let limit = opts.entries_per_level;
    for (name, path) in dirs.iter().take(limit) {
        out.push(TreeLine::Dir {
            depth,
            name: name.clone(),
        });
        walk_tree(path, depth + 1, opts, out);
    }
    if dirs.len() > limit {
        out.push(TreeLine::MoreDirs {
            depth,
            count: dirs.len() - limit,
        });
    }
    for name in files.iter().take(limit) {
        out.push(TreeLine::File {
            depth,
            name: name.clone(),
        });
    }
    if files.len() > limit {
        out.push(TreeLine::MoreFiles {
            depth,
            count: files.len() - limit,
        });
    }
}

fn count_extensions(root: &Path, opts: &AnalyzeOptions) -> (usize, Vec<ExtensionCount>) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut total = 0;

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| {
            if e.depth() == 0 || !e.file_type().is_dir() {
                return true;
            }
            !opts.is_excluded(&e.file_name().to_string_lossy())
        })
        .filter_map(|e| e.ok());

    for entry in walker {
        if !entry.file_type().is_file() {
            continue;
        }
        total += 1;
        let ext = entry
            .path()
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_else(|| "(none)".to_string());
        *counts.entry(ext).or_default() += 1;
    }

    let mut sorted: Vec<ExtensionCount> = counts
        .into_iter()
        .map(|(extension, count)| ExtensionCount { extension, count })
        .collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
    sorted.truncate(MAX_EXTENSIONS_SHOWN);
    (total, sorted)
}

// ---------------------------------------------------------------------------
// Manifests
// ---------------------------------------------------------------------------

fn read_manifest(path: &Path, file: &str) -> Result<ProjectManifest> {
    let content = std::fs::read_to_string(path)?;
    let mut m = match file {
        "package.json" => package_json(&content),
        "go.mod" => go_mod(&content),
        _ => toml_manifest(&content),
    };
    m.file = file.to_string();
    Ok(m)
}

fn package_json(content: &str) -> ProjectManifest {
    let Ok(v) = serde_json::from_str::<serde_json::Value>(content) else {
        tracing::warn!("package.json is not valid JSON");
        return ProjectManifest::default();
    };
    let field = |k: &str| v.get(k).and_then(|x| x.as_str()).map(str::to_string);
    let deps: Vec<String> = v
        .get("dependencies")
        .and_then(|d| d.as_object())
        .map(|d| {
            d.iter()
                .map(|(name, ver)| format!("{name}: {}", ver.as_str().unwrap_or("*")))
                .collect()
        })
        .unwrap_or_default();
    ProjectManifest {
        file: String::new(),
        name: field("name"),
        version: field("version"),
        description: field("description"),
        dependency_count: deps.len(),
        dependencies: deps.into_iter().take(MAX_DEPENDENCIES_SHOWN).collect(),
    }
}

/// Cargo.toml reads `[package]` and `[dependencies]`; pyproject.toml reads the
/// PEP 621 `[project]` table, then `[tool.poetry]`.
fn toml_manifest(content: &str) -> ProjectManifest {
    let doc = match toml::from_str::<toml::Value>(content) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!(error = %e, "manifest is not valid TOML");
            return ProjectManifest::default();
        }
    };
    let table = ["package", "project"]
        .iter()
        .find_map(|k| doc.get(k))
        .or_else(|| doc.get("tool").and_then(|t| t.get("poetry")));
    let field = |k: &str| {
        table
            .and_then(|t| t.get(k))
            .and_then(|v| v.as_str())
            .map(str::to_string)
    };

    let nested = table.and_then(|t| t.get("dependencies"));
    let deps: Vec<String> = match (doc.get("dependencies"), nested) {
        (Some(toml::Value::Table(t)), _) | (None, Some(toml::Value::Table(t))) => {
            t.keys().cloned().collect()
        }
        (None, Some(toml::Value::Array(a))) => a
            .iter()
            .filter_map(|d| d.as_str())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    };

    ProjectManifest {
        file: String::new(),
        name: field("name"),
        version: field("version"),
        description: field("description"),
        dependency_count: deps.len(),
        dependencies: deps.into_iter().take(MAX_DEPENDENCIES_SHOWN).collect(),
    }
}

fn go_mod(content: &str) -> ProjectManifest {
    let mut m = ProjectManifest::default();
    let mut deps = Vec::new();
    let mut in_require = false;
    for line in content.lines().map(str::trim) {
        if let Some(module) = line.strip_prefix("module ") {
            m.name = Some(module.trim().to_string());
        } else if let Some(go) = line.strip_prefix("go ") {
            m.version = Some(go.trim().to_string());
        } else if line == "require (" {
            in_require = true;
        } else if line == ")" {
            in_require = false;
        } else if in_require && !line.is_empty() {
            deps.push(line.to_string());
        } else if let Some(dep) = line.strip_prefix("require ") {
            deps.push(dep.trim().to_string());
        }
    }
    m.dependency_count = deps.len();
    m.dependencies = deps.into_iter().take(MAX_DEPENDENCIES_SHOWN).collect();
    m
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let p = root.join(rel);
        std::fs::create_dir_all(p.parent().unwrap()).unwrap();
        std::fs::write(p, content).unwrap();
    }

    #[test]
    fn missing_path_is_not_found() {
        let dir = TempDir::new().unwrap();
        let err = analyze(&dir.path().join("nope"), &AnalyzeOptions::default()).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::NotFound);
    }

    #[test]
    fn reads_cargo_manifest() {
        let dir = TempDir::new().unwrap();
        touch(
            dir.path(),
            "Cargo.toml",
            "[package]\nname = \"demo\"\nversion = \"0.2.0\"\n\n[dependencies]\nserde = \"1\"\nanyhow = \"1\"\n",
        );
        let a = analyze(dir.path(), &AnalyzeOptions::default()).unwrap();
        let m = &a.manifests[0];
        assert_eq!(m.file, "Cargo.toml");
        assert_eq!(m.name.as_deref(), Some("demo"));
        assert_eq!(m.version.as_deref(), Some("0.2.0"));
        assert_eq!(m.dependencies, vec!["anyhow", "serde"]);
    }

    #[test]
    fn cargo_manifest_ignores_trailing_comments() {
        let m = toml_manifest(
            "[package]\nname = \"demo\" # the crate\ndescription = \"x = y\"\n\n[dependencies]\nserde = { version = \"1\", features = [\"derive\"] }\n",
        );
        assert_eq!(m.name.as_deref(), Some("demo"));
        assert_eq!(m.description.as_deref(), Some("x = y"));
        assert_eq!(m.dependencies, vec!["serde"]);
    }

    #[test]
    fn pyproject_dependency_array() {
        let m = toml_manifest(
            "[project]\nname = \"svc\"\nversion = \"0.1.0\"\ndependencies = [\"requests>=2\", \"flask==3.0\"]\n",
        );
        assert_eq!(m.name.as_deref(), Some("svc"));
        assert_eq!(m.dependency_count, 2);
        assert_eq!(m.dependencies, vec!["requests>=2", "flask==3.0"]);
    }

    #[test]
    fn poetry_dependency_table() {
        let m = toml_manifest(
            "[tool.poetry]\nname = \"legacy\"\n\n[tool.poetry.dependencies]\npython = \"^3.11\"\n",
        );
        assert_eq!(m.name.as_deref(), Some("legacy"));
        assert_eq!(m.dependencies, vec!["python"]);
    }

    #[test]
    fn invalid_toml_yields_empty_manifest() {
        let m = toml_manifest("[package\nname = ");
        assert!(m.name.is_none());
        assert_eq!(m.dependency_count, 0);
    }

    #[test]
    fn reads_package_json() {
        let dir = TempDir::new().unwrap();
        touch(
            dir.path(),
            "package.json",
            r#"{"name":"web","version":"1.0.0","dependencies":{"react":"^18"}}"#,
        );
        let a = analyze(dir.path(), &AnalyzeOptions::default()).unwrap();
        assert_eq!(a.manifests[0].name.as_deref(), Some("web"));
        assert_eq!(a.manifests[0].dependencies, vec!["react: ^18"]);
    }

    #[test]
    fn excluded_dirs_are_not_counted() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "src/main.rs", "");
        touch(dir.path(), "src/lib.rs", "");
        touch(dir.path(), "target/debug/out.rs", "");
        touch(dir.path(), "node_modules/x/index.js", "");
        touch(dir.path(), "vendor/skip.rs", "");
        touch(dir.path(), "README", "");

        let opts = AnalyzeOptions {
            exclude: vec!["vendor".into()],
            ..AnalyzeOptions::default()
        };
        let a = analyze(dir.path(), &opts).unwrap();
        assert_eq!(a.total_files, 3);
        assert_eq!(
            a.extensions[0],
            ExtensionCount {
                extension: ".rs".into(),
                count: 2
            }
        );
        assert!(a.extensions.iter().any(|e| e.extension == "(none)"));
        assert!(!a.tree.iter().any(|l| matches!(l, TreeLine::Dir { name, .. } if name == "target")));
    }

    #[test]
    fn tree_truncates_each_level() {
        let dir = TempDir::new().unwrap();
        for i in 0..7 {
            touch(dir.path(), &format!("f{i}.txt"), "");
        }
        touch(dir.path(), ".hidden", "");
        let a = analyze(dir.path(), &AnalyzeOptions::default()).unwrap();
        let files = a
            .tree
            .iter()
            .filter(|l| matches!(l, TreeLine::File { .. }))
            .count();
        assert_eq!(files, 5);
        assert!(a.tree.contains(&TreeLine::MoreFiles { depth: 0, count: 2 }));
    }

    #[test]
    fn tree_stops_at_max_depth() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "a/b/c/d/deep.txt", "");
        let a = analyze(dir.path(), &AnalyzeOptions::default()).unwrap();
        assert!(a.tree.contains(&TreeLine::Dir { depth: 2, name: "c".into() }));
        assert!(!a.tree.iter().any(|l| matches!(l, TreeLine::Dir { name, .. } if name == "d")));
    }

    #[test]
    fn exclude_patterns_reduce_to_directory_names() {
        let opts = AnalyzeOptions::default().exclude_patterns(["dist/**", "**/vendor/", "*.log", "a/b"]);
        assert_eq!(opts.exclude, vec!["dist", "vendor"]);
    }

    #[test]
    fn go_mod_module_name() {
        let m = go_mod("module example.com/app\n\ngo 1.22\n\nrequire (\n\tgithub.com/x/y v1.0.0\n)\n");
        assert_eq!(m.name.as_deref(), Some("example.com/app"));
        assert_eq!(m.version.as_deref(), Some("1.22"));
        assert_eq!(m.dependency_count, 1);
    }

    #[test]
    fn config_files_detected() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "rustfmt.toml", "");
        touch(dir.path(), "Makefile", "");
        let a = analyze(dir.path(), &AnalyzeOptions::default()).unwrap();
        assert_eq!(a.config_files, vec!["rustfmt.toml", "Makefile"]);
    }
}
