use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use tracing::debug;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadFileArgs {
    pub file_path: String,
    #[serde(default)]
    pub max_chars: Option<usize>,
    #[serde(default = "default_true")]
    pub inject_line_numbers: bool,
}

impl ReadFileArgs {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            max_chars: None,
            inject_line_numbers: true,
        }
    }

    pub fn with_max_chars(mut self, max_chars: Option<usize>) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn with_line_numbers(mut self, inject: bool) -> Self {
        self.inject_line_numbers = inject;
        self
    }
}

/// Prefixes every line with `"{n}: "`, 1-based. Line terminators are
/// normalised to `\n` and a trailing terminator is dropped.
pub fn number_lines(content: &str) -> String {
    content
        .lines()
        .enumerate()
        .map(|(idx, line)| format!("{}: {}", idx + 1, line))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileReaderTool;

impl FileReaderTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FileReaderTool {
    type Args = ReadFileArgs;

    fn name(&self) -> &'static str {
        "FileReaderTool"
    }

    fn description(&self) -> &'static str {
        "Reads a text file. Each line is prefixed with its 1-based line number unless \
         inject_line_numbers is false. max_chars limits how much of the file is read; \
         it is applied before the line numbers are added."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to read."
                },
                "max_chars": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Read at most this many characters of the file."
                },
                "inject_line_numbers": {
                    "type": "boolean",
                    "description": "Prefix each line with '<n>: '. Defaults to true."
                }
            },
            "required": ["file_path"]
        })
    }

    fn run(&self, args: ReadFileArgs) -> ToolResult<String> {
        let path = validate::require_file(&args.file_path)?;
        let content =
            fs::read_to_string(path).map_err(|e| ToolError::io("reading file", e))?;
        debug!("Read {} bytes from {}", content.len(), args.file_path);

        let content = validate::truncate_chars(&content, args.max_chars);
        if args.inject_line_numbers {
            Ok(number_lines(content))
        } else {
            Ok(content.to_string())
        }
    }
}
