//! File-system tools for coding agents.
//!
//! Each tool takes a typed argument struct (or the equivalent JSON object)
//! and produces either a success string or an `"Error..."` string. The
//! [`Tool`] trait carries the synchronous implementation and [`AsyncTool`]
//! exposes it to async callers.

pub mod create_directory;
pub mod file_copy;
pub mod file_editor;
pub mod file_reader;
pub mod file_rename;
pub mod file_writer;
pub mod readme;
pub mod traits;
pub mod tree;
pub mod validate;

pub use create_directory::{CreateDirectoryArgs, CreateDirectoryTool};
pub use file_copy::{CopyFileArgs, FileCopyTool};
pub use file_editor::{EditRequest, FileEditorArgs, FileEditorTool};
pub use file_reader::{FileReaderTool, ReadFileArgs};
pub use file_rename::{FileRenameTool, RenameFileArgs};
pub use file_writer::{FileWriterTool, WriteFileArgs};
pub use readme::{ReadmeArgs, ReadmeTool};
pub use traits::{AsyncTool, Tool};
pub use tree::{DirContents, DirectoryTreeArgs, DirectoryTreeTool, TreeNode, TreeOptions};

use agentfs_core::ToolDefinition;

/// Definitions of every tool, in the order agents usually need them.
pub fn definitions() -> Vec<ToolDefinition> {
    vec![
        DirectoryTreeTool.definition(),
        ReadmeTool::new().definition(),
        FileReaderTool.definition(),
        FileWriterTool.definition(),
        FileEditorTool.definition(),
        FileCopyTool.definition(),
        FileRenameTool.definition(),
        CreateDirectoryTool.definition(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_definitions_are_unique_and_complete() {
        let defs = definitions();
        assert_eq!(defs.len(), 8);

        let names: HashSet<_> = defs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names.len(), defs.len());
        assert!(names.contains("DirectoryMapperTool"));
        assert!(names.contains("FileEditorTool"));
    }

    #[test]
    fn test_required_parameters_are_declared() {
        for def in definitions() {
            let properties = def.parameters["properties"]
                .as_object()
                .unwrap_or_else(|| panic!("{} has no properties", def.name));
            for required in def.parameters["required"].as_array().unwrap() {
                let key = required.as_str().unwrap();
                assert!(
                    properties.contains_key(key),
                    "{} requires undeclared parameter {}",
                    def.name,
                    key
                );
            }
        }
    }
}
