use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult};
use filetime::FileTime;
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize)]
pub struct CopyFileArgs {
    pub source_path: String,
    pub destination_path: String,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

impl CopyFileArgs {
    pub fn new(source_path: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            destination_path: destination_path.into(),
            overwrite: true,
        }
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }
}

/// Copies a file's bytes, permission bits and access/modification times.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileCopyTool;

impl FileCopyTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for FileCopyTool {
    type Args = CopyFileArgs;

    fn name(&self) -> &'static str {
        "FileCopyTool"
    }

    fn description(&self) -> &'static str {
        "Copies a file to a new location, creating missing destination directories. \
         An existing destination is replaced unless overwrite is false."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "source_path": {
                    "type": "string",
                    "description": "File to copy."
                },
                "destination_path": {
                    "type": "string",
                    "description": "Where to place the copy."
                },
                "overwrite": {
                    "type": "boolean",
                    "description": "Replace an existing destination. Defaults to true."
                }
            },
            "required": ["source_path", "destination_path"]
        })
    }

    fn run(&self, args: CopyFileArgs) -> ToolResult<String> {
        let source = Path::new(&args.source_path);
        if !source.is_file() {
            return Err(ToolError::SourceMissing {
                path: args.source_path,
            });
        }

        let destination = copy_target(source, Path::new(&args.destination_path));
        if destination.exists() && !args.overwrite {
            return Err(ToolError::DestinationExists {
                path: destination.display().to_string(),
            });
        }
        validate::ensure_distinct(source, &destination, "copying file")?;

        validate::create_parent_dirs(&destination, "creating destination directory")?;
        let bytes = fs::copy(source, &destination).map_err(|e| ToolError::io("copying file", e))?;
        copy_times(source, &destination).map_err(|e| ToolError::io("copying file", e))?;

        info!(
            "Copied {} bytes from {} to {:?}",
            bytes, args.source_path, destination
        );
        Ok(format!(
            "Successfully copied file from '{}' to '{}'.",
            args.source_path, args.destination_path
        ))
    }
}

/// An existing directory as destination means "into that directory".
fn copy_target(source: &Path, destination: &Path) -> PathBuf {
    match source.file_name() {
        Some(name) if destination.is_dir() => destination.join(name),
        _ => destination.to_path_buf(),
    }
}

fn copy_times(source: &Path, destination: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    filetime::set_file_times(
        destination,
        FileTime::from_last_access_time(&metadata),
        FileTime::from_last_modification_time(&metadata),
    )
}
