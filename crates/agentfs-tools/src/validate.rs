//! Path checks and small helpers shared by every tool.

use agentfs_core::{ToolError, ToolResult};
use std::fs;
use std::path::Path;
use tracing::debug;

pub fn require_directory(path: &str) -> ToolResult<&Path> {
    let dir = Path::new(path);
    if dir.is_dir() {
        Ok(dir)
    } else {
        Err(ToolError::NotADirectory {
            path: path.to_string(),
        })
    }
}

pub fn require_file(path: &str) -> ToolResult<&Path> {
    let file = Path::new(path);
    if file.is_file() {
        Ok(file)
    } else {
        Err(ToolError::NotAFile {
            path: path.to_string(),
        })
    }
}

/// Creates the missing parent directories of `path`. `action` names the
/// step in the error if this fails.
pub fn create_parent_dirs(path: &Path, action: &str) -> ToolResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            debug!("Creating parent directory: {:?}", parent);
            fs::create_dir_all(parent).map_err(|e| ToolError::io(action, e))?;
        }
    }
    Ok(())
}

/// Fails with [`ToolError::SameFile`] when `destination` exists and is the
/// same file as `source`, through an alias path or a hard link.
pub fn ensure_distinct(source: &Path, destination: &Path, action: &str) -> ToolResult<()> {
    if !destination.exists() {
        return Ok(());
    }
    let same = same_file::is_same_file(source, destination).map_err(|e| ToolError::io(action, e))?;
    if same {
        return Err(ToolError::SameFile {
            action: action.to_string(),
            from: source.display().to_string(),
            to: destination.display().to_string(),
        });
    }
    Ok(())
}

/// First `max_chars` characters of `content` (not bytes).
pub fn truncate_chars(content: &str, max_chars: Option<usize>) -> &str {
    match max_chars.and_then(|max| content.char_indices().nth(max)) {
        Some((byte_idx, _)) => &content[..byte_idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_require_directory() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("plain.txt");
        fs::write(&file, "x").unwrap();

        let dir_str = temp_dir.path().to_str().unwrap();
        assert!(require_directory(dir_str).is_ok());

        let err = require_directory(file.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, ToolError::NotADirectory { .. }));
        assert!(require_file(dir_str).is_err());
        assert!(require_file(file.to_str().unwrap()).is_ok());
    }

    #[test]
    fn test_create_parent_dirs_nested() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("a").join("b").join("c.txt");
        create_parent_dirs(&target, "creating directories").unwrap();
        assert!(temp_dir.path().join("a").join("b").is_dir());
        assert!(!target.exists());
    }

    #[test]
    fn test_create_parent_dirs_bare_file_name() {
        create_parent_dirs(Path::new("just-a-name.txt"), "creating directories").unwrap();
    }

    #[test]
    fn test_ensure_distinct_detects_aliases() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        let alias = temp_dir.path().join(".").join("a.txt");
        let other = temp_dir.path().join("b.txt");

        assert!(matches!(
            ensure_distinct(&file, &alias, "copying file"),
            Err(ToolError::SameFile { .. })
        ));
        assert!(ensure_distinct(&file, &other, "copying file").is_ok());
        fs::write(&other, "x").unwrap();
        assert!(ensure_distinct(&file, &other, "copying file").is_ok());
    }

    #[test]
    fn test_truncate_chars_counts_characters() {
        assert_eq!(truncate_chars("héllo wörld", Some(4)), "héll");
        assert_eq!(truncate_chars("short", Some(10)), "short");
        assert_eq!(truncate_chars("short", Some(0)), "");
        assert_eq!(truncate_chars("short", None), "short");
    }
}
