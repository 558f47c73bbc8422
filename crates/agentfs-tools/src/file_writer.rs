use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct WriteFileArgs {
    pub file_path: String,
    pub content: String,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl WriteFileArgs {
    pub fn new(file_path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
            content: content.into(),
            overwrite: true,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileWriterTool;

impl FileWriterTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FileWriterTool {
    type Args = WriteFileArgs;

    fn name(&self) -> &'static str {
        "WriteFileTool"
    }

    fn description(&self) -> &'static str {
        "Writes content to a file, creating missing parent directories. Existing files are \
         replaced unless overwrite is false."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path of the file to write."
                },
                "content": {
                    "type": "string",
                    "description": "Exact content to write."
                },
                "overwrite": {
                    "type": "boolean",
                    "description": "Replace an existing file. Defaults to true."
                }
            },
            "required": ["file_path", "content"]
        })
    }

    fn run(&self, args: WriteFileArgs) -> ToolResult<String> {
        let path = Path::new(&args.file_path);
        if path.exists() && !args.overwrite {
            return Err(ToolError::OverwriteDisabled {
                path: args.file_path,
            });
        }

        validate::create_parent_dirs(path, "creating directories for file")?;

        if args.overwrite {
            fs::write(path, args.content.as_bytes())
                .map_err(|e| ToolError::io("writing file", e))?;
        } else {
            // Fails if the file appeared since the existence check.
            let mut file = OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(path)
                .map_err(|e| ToolError::io("writing file", e))?;
            file.write_all(args.content.as_bytes())
                .map_err(|e| ToolError::io("writing file", e))?;
        }

        debug!("Wrote {} bytes", args.content.len());
        info!("Wrote file {}", args.file_path);
        Ok(format!("Successfully wrote to file '{}'.", args.file_path))
    }
}
