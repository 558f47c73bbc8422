use crate::traits::Tool;
use agentfs_core::{ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateDirectoryArgs {
    pub directory: String,
}

impl CreateDirectoryArgs {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

/// `mkdir -p`. Succeeds when the directory already exists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CreateDirectoryTool;

impl CreateDirectoryTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for CreateDirectoryTool {
    type Args = CreateDirectoryArgs;

    fn name(&self) -> &'static str {
        "CreateDirectoryTool"
    }

    fn description(&self) -> &'static str {
        "Creates a directory at the specified path, including missing parents."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "directory": {
                    "type": "string",
                    "description": "Path of the directory to create."
                }
            },
            "required": ["directory"]
        })
    }

    fn run(&self, args: CreateDirectoryArgs) -> ToolResult<String> {
        fs::create_dir_all(&args.directory)
            .map_err(|e| ToolError::io("creating directory", e))?;
        info!("Created directory {}", args.directory);
        Ok(format!("Successfully created directory '{}'.", args.directory))
    }
}
