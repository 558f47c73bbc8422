use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Name, description and JSON-schema parameters of a tool, in the shape
/// agent frameworks expect when tools are advertised to a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Output encoding of the directory tree renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeFormat {
    #[default]
    Ascii,
    Json,
}

impl TreeFormat {
    /// Case-insensitive; anything other than `json` means ascii.
    pub fn parse_lenient(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            TreeFormat::Json
        } else {
            if !value.trim().eq_ignore_ascii_case("ascii") {
                tracing::warn!("Unrecognized tree format '{}', falling back to ascii", value);
            }
            TreeFormat::Ascii
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TreeFormat::Ascii => "ascii",
            TreeFormat::Json => "json",
        }
    }
}

impl fmt::Display for TreeFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for TreeFormat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TreeFormat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(TreeFormat::parse_lenient(&raw))
    }
}
