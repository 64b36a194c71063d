use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Atomically write `data` to `path` using a tempfile in the same directory.
/// A reader never observes a half-written artifact.
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    tracing::debug!(path = %path.display(), bytes = data.len(), "wrote file");
    Ok(())
}

/// Create a directory and all parents, idempotent.
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path)?;
    Ok(())
}

/// Write a file only if it does not already exist. Returns true if written.
pub fn write_if_missing(path: &Path, data: &[u8]) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    atomic_write(path, data)?;
    Ok(true)
}

/// Replace the text between `start_marker` and `end_marker` (markers included).
/// `None` when either marker is missing.
pub fn splice_between_markers(
    content: &str,
    start_marker: &str,
    end_marker: &str,
    replacement: &str,
) -> Option<String> {
    let start_pos = content.find(start_marker)?;
    let search_from = start_pos + start_marker.len();
    let end_offset = content[search_from..].find(end_marker)?;
    let end_pos = search_from + end_offset + end_marker.len();

    let mut updated = String::with_capacity(content.len());
    updated.push_str(&content[..start_pos]);
    updated.push_str(replacement);
    updated.push_str(&content[end_pos..]);
    Some(updated)
}

/// Return the text between `start_marker` and `end_marker` (markers included).
pub fn extract_between_markers<'a>(
    content: &'a str,
    start_marker: &str,
    end_marker: &str,
) -> Option<&'a str> {
    let start_pos = content.find(start_marker)?;
    let search_from = start_pos + start_marker.len();
    let end_offset = content[search_from..].find(end_marker)?;
    Some(&content[start_pos..search_from + end_offset + end_marker.len()])
}

/// Copy `path` to `<path>.bak`, overwriting any previous backup.
pub fn backup_file(path: &Path) -> Result<PathBuf> {
    let mut name = path.as_os_str().to_os_string();
    name.push(".bak");
    let backup = PathBuf::from(name);
    std::fs::copy(path, &backup)?;
    Ok(backup)
}

/// First `n` lines of a text file.
pub fn read_head(path: &Path, n: usize) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)?;
    Ok(content.lines().take(n).map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/c/NOTES.md");
        atomic_write(&path, b"data").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "data");
    }

    #[test]
    fn write_if_missing_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("existing.md");
        std::fs::write(&path, b"original").unwrap();
        let written = write_if_missing(&path, b"new").unwrap();
        assert!(!written);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "original");
    }

    #[test]
    fn splice_keeps_surrounding_text() {
        let content = "head\n<!-- a -->old<!-- b -->\ntail";
        let out = splice_between_markers(content, "<!-- a -->", "<!-- b -->", "NEW").unwrap();
        assert_eq!(out, "head\nNEW\ntail");
    }

    #[test]
    fn splice_without_end_marker_is_none() {
        assert!(splice_between_markers("<!-- a --> dangling", "<!-- a -->", "<!-- b -->", "x")
            .is_none());
    }

    #[test]
    fn extract_includes_markers() {
        let content = "x [s]body[e] y";
        assert_eq!(
            extract_between_markers(content, "[s]", "[e]"),
            Some("[s]body[e]")
        );
    }

    #[test]
    fn backup_file_copies_next_to_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("AGENTS.md");
        std::fs::write(&path, "mine").unwrap();
        let backup = backup_file(&path).unwrap();
        assert_eq!(backup, dir.path().join("AGENTS.md.bak"));
        assert_eq!(std::fs::read_to_string(backup).unwrap(), "mine");
    }

    #[test]
    fn read_head_limits_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, "1\n2\n3\n4\n5\n6\n7").unwrap();
        assert_eq!(read_head(&path, 5).unwrap(), vec!["1", "2", "3", "4", "5"]);
    }
}
