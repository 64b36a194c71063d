use flow_core::paths::STATE_DIR;
use std::path::{Path, PathBuf};

/// Resolve the project root directory.
///
/// Priority:
/// 1. `--root` flag / `FLOW_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.flow/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_upward(&cwd, STATE_DIR)
        .or_else(|| find_upward(&cwd, ".git"))
        .unwrap_or(cwd)
}

/// First ancestor of `start` (inclusive) containing a `marker` directory.
fn find_upward(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

/// Resolve a tool's `workingDirectory` against the server root. Relative
/// paths are joined onto `root`; absent means `root` itself.
pub fn resolve_working_dir(root: &Path, working_directory: Option<&str>) -> PathBuf {
    match working_directory.map(str::trim).filter(|s| !s.is_empty()) {
        Some(wd) => {
            let p = Path::new(wd);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root.join(p)
            }
        }
        None => root.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn finds_flow_dir_from_nested_path() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join(".flow")).unwrap();
        let subdir = dir.path().join("src/deep");
        std::fs::create_dir_all(&subdir).unwrap();

        assert_eq!(find_upward(&subdir, ".flow").unwrap(), dir.path());
        assert!(find_upward(&subdir, ".nothing-here").is_none());
    }

    #[test]
    fn working_dir_resolution() {
        let root = Path::new("/srv/project");
        assert_eq!(resolve_working_dir(root, None), root);
        assert_eq!(resolve_working_dir(root, Some("  ")), root);
        assert_eq!(resolve_working_dir(root, Some("sub/app")), root.join("sub/app"));
        assert_eq!(resolve_working_dir(root, Some("/abs")), Path::new("/abs"));
    }
}
