//! Line-oriented editing: create a file, insert lines, or replace a range.
//!
//! Lines keep their terminators, so a splice never rewrites bytes outside
//! the lines it touches. Every edit re-reads and rewrites the whole file.

use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct FileEditorArgs {
    pub file_path: String,
    pub action: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub start_line: Option<i64>,
    #[serde(default)]
    pub end_line: Option<i64>,
}

/// A validated edit. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRequest {
    Create {
        content: String,
    },
    Insert {
        content: String,
        before_line: Option<usize>,
    },
    Replace {
        content: String,
        start_line: usize,
        end_line: usize,
    },
}

impl FileEditorArgs {
    pub fn new(file_path: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            action: action.into(),
            content: None,
            start_line: None,
            end_line: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_lines(mut self, start_line: Option<i64>, end_line: Option<i64>) -> Self {
        self.start_line = start_line;
        self.end_line = end_line;
        self
    }

    pub fn validate(&self) -> ToolResult<EditRequest> {
        match self.action.as_str() {
            "new" => Ok(EditRequest::Create {
                content: self.content.clone().unwrap_or_default(),
            }),
            "insert" => {
                let content = self.required_content()?;
                let before_line = match self.start_line {
                    Some(line) if line < 1 => {
                        return Err(ToolError::invalid("start_line must be at least 1."))
                    }
                    Some(line) => Some(to_index(line)),
                    None => None,
                };
                Ok(EditRequest::Insert {
                    content,
                    before_line,
                })
            }
            "update" => {
                let content = self.required_content()?;
                let (start, end) = match (self.start_line, self.end_line) {
                    (Some(start), Some(end)) => (start, end),
                    _ => {
                        return Err(ToolError::missing(
                            "start_line and end_line are required for update action.",
                        ))
                    }
                };
                if start < 1 || end < start {
                    return Err(ToolError::invalid("Invalid start_line or end_line values."));
                }
                Ok(EditRequest::Replace {
                    content,
                    start_line: to_index(start),
                    end_line: to_index(end),
                })
            }
            _ => Err(ToolError::invalid(
                "Invalid action specified. Must be 'new', 'insert', or 'update'.",
            )),
        }
    }

    fn required_content(&self) -> ToolResult<String> {
        self.content.clone().ok_or_else(|| {
            ToolError::missing(format!(
                "content is required for '{}' action.",
                self.action
            ))
        })
    }
}

fn to_index(line: i64) -> usize {
    usize::try_from(line).unwrap_or(usize::MAX)
}

/// Splits after every `\n`, keeping terminators. A final line without a
/// terminator is kept as is.
pub fn split_lines(content: &str) -> Vec<&str> {
    content.split_inclusive('\n').collect()
}

/// Inserts `content` before line `before_line`, or appends when `None`.
/// A line past the end is clamped to an append. Returns the new text and
/// the 1-based line the content now starts at.
pub fn insert_lines(existing: &str, content: &str, before_line: Option<usize>) -> (String, usize) {
    let mut lines: Vec<String> = split_lines(existing).into_iter().map(String::from).collect();
    let new_lines = split_lines(content);

    let index = match before_line {
        Some(line) => line.saturating_sub(1).min(lines.len()),
        None => {
            if !new_lines.is_empty() {
                if let Some(last) = lines.last_mut() {
                    if !last.ends_with('\n') {
                        last.push('\n');
                    }
                }
            }
            lines.len()
        }
    };

    lines.splice(index..index, new_lines.into_iter().map(String::from));
    (lines.concat(), index + 1)
}

/// Replaces lines `start_line..=end_line` with the lines of `content`.
pub fn replace_lines(
    existing: &str,
    content: &str,
    start_line: usize,
    end_line: usize,
) -> ToolResult<String> {
    let mut lines = split_lines(existing);
    if end_line > lines.len() {
        return Err(ToolError::LineOutOfRange {
            end_line,
            total: lines.len(),
        });
    }
    lines.splice(start_line - 1..end_line, split_lines(content));
    Ok(lines.concat())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileEditorTool;

impl FileEditorTool {
    pub fn new() -> Self {
        Self
    }

    fn create(&self, path: &Path, file_path: &str, content: &str) -> ToolResult<String> {
        if path.exists() {
            return Err(ToolError::FileExists {
                path: file_path.to_string(),
            });
        }
        validate::create_parent_dirs(path, "editing file")?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|e| ToolError::io("editing file", e))?;
        file.write_all(content.as_bytes())
            .map_err(|e| ToolError::io("editing file", e))?;

        info!("Created file {}", file_path);
        Ok(format!("Successfully created new file '{}'.", file_path))
    }

    fn read_existing(&self, path: &Path, file_path: &str) -> ToolResult<String> {
        if !path.is_file() {
            return Err(ToolError::FileMissing {
                path: file_path.to_string(),
            });
        }
        fs::read_to_string(path).map_err(|e| ToolError::io("editing file", e))
    }

    fn write_back(&self, path: &Path, text: &str) -> ToolResult<()> {
        fs::write(path, text).map_err(|e| ToolError::io("editing file", e))
    }
}

impl Tool for FileEditorTool {
    type Args = FileEditorArgs;

    fn name(&self) -> &'static str {
        "FileEditorTool"
    }

    fn description(&self) -> &'static str {
        "Creates or edits a text file line by line.\n\
         - new: creates a file with the given content; fails if the file exists.\n\
         - insert: inserts content before start_line in an existing file, or appends \
         when start_line is omitted.\n\
         - update: replaces lines start_line through end_line (inclusive) with content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to create or edit."
                },
                "action": {
                    "type": "string",
                    "enum": ["new", "insert", "update"],
                    "description": "Edit to perform."
                },
                "content": {
                    "type": "string",
                    "description": "Text to write. Optional for 'new', required otherwise."
                },
                "start_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "1-based line. Insert before it, or first line to replace."
                },
                "end_line": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Last line to replace (inclusive). Required for 'update'."
                }
            },
            "required": ["file_path", "action"]
        })
    }

    fn run(&self, args: FileEditorArgs) -> ToolResult<String> {
        let request = args.validate()?;
        let path = Path::new(&args.file_path);
        debug!("Editing {} with {:?}", args.file_path, request);

        match request {
            EditRequest::Create { content } => self.create(path, &args.file_path, &content),
            EditRequest::Insert {
                content,
                before_line,
            } => {
                let existing = self.read_existing(path, &args.file_path)?;
                let (updated, line) = insert_lines(&existing, &content, before_line);
                self.write_back(path, &updated)?;
                Ok(format!(
                    "Successfully inserted content into file '{}' at line {}.",
                    args.file_path, line
                ))
            }
            EditRequest::Replace {
                content,
                start_line,
                end_line,
            } => {
                let existing = self.read_existing(path, &args.file_path)?;
                let updated = replace_lines(&existing, &content, start_line, end_line)?;
                self.write_back(path, &updated)?;
                Ok(format!(
                    "Successfully updated lines {} to {} in file '{}'.",
                    start_line, end_line, args.file_path
                ))
            }
        }
    }
}
