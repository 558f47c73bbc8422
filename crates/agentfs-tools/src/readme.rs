use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use tracing::debug;

pub const DEFAULT_README: &str = "README.md";

#[derive(Debug, Clone, Deserialize)]
pub struct ReadmeArgs {
    pub directory: String,
    #[serde(default)]
    pub max_chars: Option<usize>,
}

impl ReadmeArgs {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            max_chars: None,
        }
    }

    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }
}

/// Reads only the README of a directory, without mapping the directory.
#[derive(Debug, Clone)]
pub struct ReadmeTool {
    file_name: String,
}

impl ReadmeTool {
    pub fn new() -> Self {
        Self::with_file_name(DEFAULT_README)
    }

    pub fn with_file_name(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }
}

impl Default for ReadmeTool {
    fn default() -> Self {
        Self::new()
    }
}

impl Tool for ReadmeTool {
    type Args = ReadmeArgs;

    fn name(&self) -> &'static str {
        "ReadmeReaderTool"
    }

    fn description(&self) -> &'static str {
        "Reads the README.md file of a directory. Cheaper than mapping the whole directory \
         when only the project overview is needed."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Directory containing the README.md file."
                },
                "max_chars": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Return at most this many characters."
                }
            },
            "required": ["directory"]
        })
    }

    fn run(&self, args: ReadmeArgs) -> ToolResult<String> {
        let dir = validate::require_directory(&args.directory)?;
        let readme = dir.join(&self.file_name);
        if !readme.is_file() {
            return Err(ToolError::ReadmeNotFound {
                file_name: self.file_name.clone(),
                directory: args.directory,
            });
        }

        debug!("Reading {:?}", readme);
        let content = fs::read_to_string(&readme)
            .map_err(|e| ToolError::io(format!("reading {}", self.file_name), e))?;
        Ok(validate::truncate_chars(&content, args.max_chars).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_valid_readme() {
        let temp_dir = TempDir::new().unwrap();
        let content = "This is the README for the project.";
        fs::write(temp_dir.path().join("README.md"), content).unwrap();

        let result = ReadmeTool::new()
            .run(ReadmeArgs::new(temp_dir.path().to_str().unwrap()))
            .unwrap();
        assert_eq!(result, content);
    }

    #[test]
    fn test_missing_readme() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().to_str().unwrap();
        let result = ReadmeTool::new().call(json!({ "directory": dir }));
        assert_eq!(
            result,
            format!("Error: README.md not found in directory '{}'.", dir)
        );
    }

    #[test]
    fn test_invalid_directory() {
        let result = ReadmeTool::new().call(json!({ "directory": "/non_existent_directory_path" }));
        assert!(result.starts_with("Error: The provided path"));
    }

    #[test]
    fn test_max_chars() {
        let temp_dir = TempDir::new().unwrap();
        let content = "This is a long README file content used for testing.";
        fs::write(temp_dir.path().join("README.md"), content).unwrap();

        let result = ReadmeTool::new()
            .run(ReadmeArgs::new(temp_dir.path().to_str().unwrap()).with_max_chars(Some(10)))
            .unwrap();
        assert_eq!(result, "This is a ");
    }

    #[test]
    fn test_custom_file_name() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.rst"), "rst readme").unwrap();
        let dir = temp_dir.path().to_str().unwrap();

        assert!(ReadmeTool::new().run(ReadmeArgs::new(dir)).is_err());
        let result = ReadmeTool::with_file_name("README.rst")
            .run(ReadmeArgs::new(dir))
            .unwrap();
        assert_eq!(result, "rst readme");
    }

    #[test]
    fn test_non_utf8_readme_reports_read_error() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("README.md"), [0xff, 0xfe, 0x00]).unwrap();
        let result = ReadmeTool::new().call(json!({ "directory": temp_dir.path() }));
        assert!(result.starts_with("Error reading README.md: "));
    }
}
