use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize)]
pub struct RenameFileArgs {
    pub source_path: String,
    pub destination_path: String,
    #[serde(default)]
    pub overwrite: bool,
}

impl RenameFileArgs {
    pub fn new(source_path: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            overwrite: false,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FileRenameTool;

impl FileRenameTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FileRenameTool {
    type Args = RenameFileArgs;

    fn name(&self) -> &'static str {
        "FileRenameTool"
    }

    fn description(&self) -> &'static str {
        "Renames or moves a file, creating missing destination directories. Fails if the \
         destination exists unless overwrite is true."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source_path": {
                    "type": "string",
                    "description": "File to rename or move."
                },
                "destination_path": {
                    "type": "string",
                    "description": "New path of the file."
                },
                "overwrite": {
                    "type": "boolean",
                    "description": "Remove an existing destination first. Defaults to false."
                }
            },
            "required": ["source_path", "destination_path"]
        })
    }

    fn run(&self, args: RenameFileArgs) -> ToolResult<String> {
        let source = Path::new(&args.source_path);
        let destination = Path::new(&args.destination_path);

        if !source.is_file() {
            return Err(ToolError::SourceMissing {
                path: args.source_path,
            });
        }
        if destination.exists() {
            if !args.overwrite {
                return Err(ToolError::DestinationExists {
                    path: args.destination_path,
                });
            }
            // Removing an alias of the source would delete the file itself.
            let same = same_file::is_same_file(source, destination)
                .map_err(|e| ToolError::io("renaming file", e))?;
            if !same {
                debug!("Removing existing destination {}", args.destination_path);
                fs::remove_file(destination)
                    .map_err(|e| ToolError::io("removing existing destination file", e))?;
            }
        }

        validate::create_parent_dirs(destination, "creating destination directory")?;
        fs::rename(source, destination).map_err(|e| ToolError::io("renaming file", e))?;

        info!("Renamed {} to {}", args.source_path, args.destination_path);
        Ok(format!(
            "Successfully renamed file from '{}' to '{}'.",
            args.source_path, args.destination_path
        ))
    }
}
