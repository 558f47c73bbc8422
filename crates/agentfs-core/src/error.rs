use thiserror::Error;

/// Failure of a single tool invocation.
///
/// Precondition variants carry the exact wording agents already match on.
/// `Io` wraps an underlying file-system fault together with the verb phrase
/// describing what was being attempted.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("The provided path '{path}' is not a valid directory.")]
    NotADirectory { path: String },

    #[error("The provided path '{path}' is not a valid file.")]
    NotAFile { path: String },

    #[error("{file_name} not found in directory '{directory}'.")]
    ReadmeNotFound { file_name: String, directory: String },

    #[error("Source file '{path}' does not exist.")]
    SourceMissing { path: String },

    #[error("File '{path}' does not exist.")]
    FileMissing { path: String },

    #[error("File '{path}' already exists.")]
    FileExists { path: String },

    #[error("File '{path}' already exists and overwrite is disabled.")]
    OverwriteDisabled { path: String },

    #[error("Destination file '{path}' already exists and overwrite is disabled.")]
    DestinationExists { path: String },

    #[error("{0}")]
    MissingArgument(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("end_line {end_line} exceeds total number of lines in file (file has {total} lines).")]
    LineOutOfRange { end_line: usize, total: usize },

    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),

    /// Both paths name the same file, so copying or replacing would
    /// destroy it.
    #[error("{action}: '{from}' and '{to}' are the same file")]
    SameFile {
        action: String,
        from: String,
        to: String,
    },

    #[error("{action}: {source}")]
    Io {
        action: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Tool task failed: {0}")]
    Task(String),
}

impl ToolError {
    pub fn io(action: impl Into<String>, source: std::io::Error) -> Self {
        ToolError::Io {
            action: action.into(),
            source,
        }
    }

    pub fn missing(msg: impl Into<String>) -> Self {
        ToolError::MissingArgument(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        ToolError::InvalidArgument(msg.into())
    }

    /// True for failures caused by the arguments or the state of the file
    /// system before anything was attempted.
    pub fn is_precondition(&self) -> bool {
        !matches!(self, ToolError::Io { .. } | ToolError::Task(_))
    }

    /// Renders the `"Error: ..."` / `"Error <verb>ing ...: ..."` string
    /// returned to calling agents.
    pub fn to_legacy_string(&self) -> String {
        match self {
            ToolError::Io { .. } | ToolError::SameFile { .. } => format!("Error {}", self),
            _ => format!("Error: {}", self),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Invalid value for field {field}: {value}")]
    InvalidValue { field: String, value: String },
}

pub type ToolResult<T> = std::result::Result<T, ToolError>;
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
