//! Directory tree renderer.
//!
//! A directory is scanned once into a [`TreeNode`] and then rendered either
//! as an indented box-drawing tree or as nested JSON. Both encodings are
//! produced from the same scan, so they always agree on which names are
//! present.

use crate::traits::Tool;
use crate::validate;
use agentfs_core::{ToolError, ToolResult, TreeFormat};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{json, Value};
use std::io;
use std::path::Path;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

pub const HIDDEN_MARKER: u8 = b'.';

const PERMISSION_DENIED: &str = "Permission Denied";
const TEE: &str = "├── ";
const ELBOW: &str = "└── ";
const PIPE: &str = "│   ";
const BLANK: &str = "    ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeNode {
    File { name: String },
    Directory { name: String, contents: DirContents },
}

/// What is known about a directory's children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirContents {
    /// Children sorted by name, hidden entries already filtered.
    Listed(Vec<TreeNode>),
    /// Not expanded because the maximum depth was reached.
    DepthLimit,
    PermissionDenied,
    /// Listing failed for another reason; holds the I/O message.
    Unreadable(String),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TreeOptions {
    pub show_hidden: bool,
    /// 1-based; the root is level 1. `None` means unlimited.
    pub max_depth: Option<usize>,
}

impl TreeNode {
    /// Scans the directory at `root`. The caller has already checked that it
    /// is a directory; listing failures below it become sentinels instead of
    /// errors.
    pub fn scan(root: &Path, options: &TreeOptions) -> TreeNode {
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        scan_directory(root, name, 1, options)
    }

    fn label(&self) -> String {
        match self {
            TreeNode::File { name } => name.clone(),
            TreeNode::Directory { name, .. } => format!("{}/", name),
        }
    }

    pub fn to_ascii(&self) -> String {
        let mut lines = vec![self.label()];
        if let TreeNode::Directory { contents, .. } = self {
            push_contents(contents, "", &mut lines);
        }
        lines.join("\n")
    }

    pub fn to_json(&self) -> ToolResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ToolError::io("rendering tree", e.into()))
    }

    pub fn render(&self, format: TreeFormat) -> ToolResult<String> {
        match format {
            TreeFormat::Ascii => Ok(self.to_ascii()),
            TreeFormat::Json => self.to_json(),
        }
    }
}

fn scan_directory(path: &Path, name: String, level: usize, options: &TreeOptions) -> TreeNode {
    if options.max_depth.is_some_and(|max| level >= max) {
        return TreeNode::Directory {
            name,
            contents: DirContents::DepthLimit,
        };
    }

    let contents = match list_entries(path, options.show_hidden) {
        Ok(entries) => DirContents::Listed(
            entries
                .into_iter()
                .map(|entry| {
                    let child_name = entry.file_name().to_string_lossy().into_owned();
                    if entry.file_type().is_dir() {
                        scan_directory(entry.path(), child_name, level + 1, options)
                    } else {
                        TreeNode::File { name: child_name }
                    }
                })
                .collect(),
        ),
        Err(e) if e.kind() == io::ErrorKind::PermissionDenied => {
            warn!("Permission denied listing {:?}", path);
            DirContents::PermissionDenied
        }
        Err(e) => {
            warn!("Failed to list {:?}: {}", path, e);
            DirContents::Unreadable(e.to_string())
        }
    };

    TreeNode::Directory { name, contents }
}

/// Immediate children of `dir`, sorted by file name. Symlinks are not
/// followed.
fn list_entries(dir: &Path, show_hidden: bool) -> io::Result<Vec<DirEntry>> {
    debug!("Listing {:?} (show_hidden: {})", dir, show_hidden);
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || show_hidden || !is_hidden(entry))
        .collect::<Result<Vec<_>, walkdir::Error>>()
        .map_err(io::Error::from)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().as_encoded_bytes().first() == Some(&HIDDEN_MARKER)
}

fn push_contents(contents: &DirContents, prefix: &str, lines: &mut Vec<String>) {
    match contents {
        DirContents::Listed(children) => {
            let count = children.len();
            for (idx, child) in children.iter().enumerate() {
                let last = idx + 1 == count;
                let connector = if last { ELBOW } else { TEE };
                lines.push(format!("{}{}{}", prefix, connector, child.label()));

                if let TreeNode::Directory { contents, .. } = child {
                    let child_prefix = format!("{}{}", prefix, if last { BLANK } else { PIPE });
                    push_contents(contents, &child_prefix, lines);
                }
            }
        }
        DirContents::DepthLimit => {}
        DirContents::PermissionDenied => {
            lines.push(format!("{}{}[{}]", prefix, BLANK, PERMISSION_DENIED));
        }
        DirContents::Unreadable(msg) => {
            lines.push(format!("{}{}[Error: {}]", prefix, BLANK, msg));
        }
    }
}

impl Serialize for TreeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TreeNode::File { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("type", "file")?;
                map.end()
            }
            TreeNode::Directory { name, contents } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("name", name)?;
                map.serialize_entry("type", "directory")?;
                match contents {
                    DirContents::Listed(children) => map.serialize_entry("children", children)?,
                    DirContents::DepthLimit => {
                        map.serialize_entry("children", &Vec::<TreeNode>::new())?
                    }
                    DirContents::PermissionDenied => {
                        map.serialize_entry("error", PERMISSION_DENIED)?
                    }
                    DirContents::Unreadable(msg) => map.serialize_entry("error", msg)?,
                }
                map.end()
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryTreeArgs {
    #[serde(alias = "directory")]
    pub root: String,
    #[serde(default, alias = "output_format")]
    pub format: TreeFormat,
    #[serde(default)]
    pub show_hidden: bool,
    #[serde(default)]
    pub depth: Option<usize>,
}

impl DirectoryTreeArgs {
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            format: TreeFormat::default(),
            show_hidden: false,
            depth: None,
        }
    }

    pub fn with_format(mut self, format: TreeFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn with_depth(mut self, depth: Option<usize>) -> Self {
        self.depth = depth;
        self
    }

    pub fn validate(&self) -> ToolResult<()> {
        if self.depth == Some(0) {
            return Err(ToolError::invalid("depth must be at least 1."));
        }
        Ok(())
    }
}

/// Maps a directory's files and folders as an ascii tree or as JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectoryTreeTool;

impl DirectoryTreeTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for DirectoryTreeTool {
    type Args = DirectoryTreeArgs;

    fn name(&self) -> &'static str {
        "DirectoryMapperTool"
    }

    fn description(&self) -> &'static str {
        "Maps the files and folders under a directory. Returns an ascii tree by default, \
         or a nested JSON document when format is 'json'. Hidden entries are skipped unless \
         show_hidden is true; depth limits how many levels are expanded (the root is level 1)."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "root": {
                    "type": "string",
                    "description": "Path of the directory to map."
                },
                "format": {
                    "type": "string",
                    "enum": ["ascii", "json"],
                    "description": "Output format. Defaults to 'ascii'."
                },
                "show_hidden": {
                    "type": "boolean",
                    "description": "Include entries whose name starts with '.'. Defaults to false."
                },
                "depth": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum depth to expand; the root is level 1. Unlimited if omitted."
                }
            },
            "required": ["root"]
        })
    }

    fn run(&self, args: DirectoryTreeArgs) -> ToolResult<String> {
        args.validate()?;
        let root = validate::require_directory(&args.root)?;
        debug!(
            "Mapping {:?} as {} (show_hidden: {}, depth: {:?})",
            root, args.format, args.show_hidden, args.depth
        );

        let options = TreeOptions {
            show_hidden: args.show_hidden,
            max_depth: args.depth,
        };
        TreeNode::scan(root, &options).render(args.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::AsyncTool;
    use std::collections::BTreeSet;
    use std::fs;
    use tempfile::TempDir;

    /// temp/root/{a.txt, sub/{b.txt, deeper/c.txt}, z.txt, .hidden/{h.txt}, .env}
    fn sample_tree() -> (TempDir, String) {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("root");
        fs::create_dir_all(root.join("sub").join("deeper")).unwrap();
        fs::create_dir_all(root.join(".hidden")).unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("z.txt"), "z").unwrap();
        fs::write(root.join("sub").join("b.txt"), "b").unwrap();
        fs::write(root.join("sub").join("deeper").join("c.txt"), "c").unwrap();
        fs::write(root.join(".hidden").join("h.txt"), "h").unwrap();
        fs::write(root.join(".env"), "SECRET=1").unwrap();
        let root = root.to_str().unwrap().to_string();
        (temp_dir, root)
    }

    fn run(args: DirectoryTreeArgs) -> String {
        DirectoryTreeTool.run(args).unwrap()
    }

    fn json_names(node: &Value, names: &mut BTreeSet<String>) {
        names.insert(node["name"].as_str().unwrap().to_string());
        if let Some(children) = node.get("children").and_then(Value::as_array) {
            for child in children {
                json_names(child, names);
            }
        }
    }

    fn ascii_names(output: &str) -> BTreeSet<String> {
        output
            .lines()
            .map(|line| {
                line.trim_start_matches(|c| "│├└─ ".contains(c))
                    .trim_end_matches('/')
                    .to_string()
            })
            .collect()
    }

    #[test]
    fn test_ascii_layout() {
        let (_temp_dir, root) = sample_tree();
        let output = run(DirectoryTreeArgs::new(&root));

        let expected = [
            "root/",
            "├── a.txt",
            "├── sub/",
            "│   ├── b.txt",
            "│   └── deeper/",
            "│       └── c.txt",
            "└── z.txt",
        ]
        .join("\n");
        assert_eq!(output, expected);
    }

    #[test]
    fn test_json_layout() {
        let (_temp_dir, root) = sample_tree();
        let output = run(DirectoryTreeArgs::new(&root).with_format(TreeFormat::Json));
        let parsed: Value = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["name"], "root");
        assert_eq!(parsed["type"], "directory");
        let children: Vec<&str> = parsed["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(children, vec!["a.txt", "sub", "z.txt"]);
        assert_eq!(parsed["children"][0]["type"], "file");
        assert!(parsed["children"][0].get("children").is_none());
        assert_eq!(parsed["children"][1]["children"][1]["name"], "deeper");
    }

    #[test]
    fn test_ascii_and_json_agree_on_names() {
        let (_temp_dir, root) = sample_tree();
        for show_hidden in [false, true] {
            for depth in [None, Some(1), Some(2), Some(3)] {
                let args = DirectoryTreeArgs::new(&root)
                    .with_hidden(show_hidden)
                    .with_depth(depth);
                let ascii = run(args.clone());
                let json: Value =
                    serde_json::from_str(&run(args.with_format(TreeFormat::Json))).unwrap();

                let mut from_json = BTreeSet::new();
                json_names(&json, &mut from_json);
                assert_eq!(ascii_names(&ascii), from_json, "hidden={show_hidden} depth={depth:?}");
            }
        }
    }

    #[test]
    fn test_hidden_entries_filtered_at_every_level() {
        let (_temp_dir, root) = sample_tree();
        fs::write(Path::new(&root).join("sub").join(".cache"), "").unwrap();

        let hidden_off = run(DirectoryTreeArgs::new(&root));
        assert!(!hidden_off.contains(".env"));
        assert!(!hidden_off.contains(".hidden"));
        assert!(!hidden_off.contains(".cache"));
        assert!(!hidden_off.contains("h.txt"));

        let hidden_on = run(DirectoryTreeArgs::new(&root).with_hidden(true));
        assert!(hidden_on.contains(".env"));
        assert!(hidden_on.contains(".hidden/"));
        assert!(hidden_on.contains(".cache"));
        assert!(hidden_on.contains("h.txt"));
        assert!(hidden_on.lines().nth(1).unwrap().ends_with(".env"));
    }

    #[test]
    fn test_hidden_root_is_still_listed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join(".config");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("settings.toml"), "").unwrap();

        let output = run(DirectoryTreeArgs::new(root.to_str().unwrap()));
        assert_eq!(output, ".config/\n└── settings.toml");
    }

    #[test]
    fn test_depth_one_shows_only_root() {
        let (_temp_dir, root) = sample_tree();
        let output = run(DirectoryTreeArgs::new(&root).with_depth(Some(1)));
        assert_eq!(output, "root/");

        let json: Value = serde_json::from_str(&run(
            DirectoryTreeArgs::new(&root)
                .with_depth(Some(1))
                .with_format(TreeFormat::Json),
        ))
        .unwrap();
        assert_eq!(json["children"], json!([]));
    }

    #[test]
    fn test_depth_two_stops_below_first_level() {
        let (_temp_dir, root) = sample_tree();
        let output = run(DirectoryTreeArgs::new(&root).with_depth(Some(2)));
        assert!(output.contains("sub/"));
        assert!(!output.contains("b.txt"));
        assert!(!output.contains("deeper"));

        let json: Value = serde_json::from_str(&run(
            DirectoryTreeArgs::new(&root)
                .with_depth(Some(2))
                .with_format(TreeFormat::Json),
        ))
        .unwrap();
        let sub = json["children"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["name"] == "sub")
            .unwrap();
        assert_eq!(sub["children"], json!([]));
    }

    #[test]
    fn test_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        let empty = temp_dir.path().join("empty_dir");
        fs::create_dir(&empty).unwrap();
        assert_eq!(run(DirectoryTreeArgs::new(empty.to_str().unwrap())), "empty_dir/");
    }

    #[test]
    fn test_invalid_root() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("nope");
        let result = DirectoryTreeTool.call(json!({ "root": missing.to_str().unwrap() }));
        assert!(result.starts_with("Error: The provided path"));
        assert!(result.ends_with("is not a valid directory."));

        let file = temp_dir.path().join("file.txt");
        fs::write(&file, "").unwrap();
        let result = DirectoryTreeTool.call(json!({ "root": file.to_str().unwrap() }));
        assert!(result.starts_with("Error:"));
    }

    #[test]
    fn test_zero_depth_rejected() {
        let (_temp_dir, root) = sample_tree();
        let err = DirectoryTreeTool
            .run(DirectoryTreeArgs::new(&root).with_depth(Some(0)))
            .unwrap_err();
        assert_eq!(err.to_legacy_string(), "Error: depth must be at least 1.");
    }

    #[test]
    fn test_argument_aliases_and_lenient_format() {
        let (_temp_dir, root) = sample_tree();
        let output = DirectoryTreeTool.call(json!({
            "directory": root,
            "output_format": "JSON"
        }));
        let parsed: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["type"], "directory");

        let fallback = DirectoryTreeTool.call(json!({ "root": root, "format": "yaml" }));
        assert!(fallback.starts_with("root/\n"));
    }

    #[test]
    fn test_permission_denied_sentinel() {
        let tree = TreeNode::Directory {
            name: "base".to_string(),
            contents: DirContents::Listed(vec![
                TreeNode::Directory {
                    name: "protected".to_string(),
                    contents: DirContents::PermissionDenied,
                },
                TreeNode::File {
                    name: "visible.txt".to_string(),
                },
            ]),
        };

        assert_eq!(
            tree.to_ascii(),
            "base/\n├── protected/\n│       [Permission Denied]\n└── visible.txt"
        );

        let json: Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(
            json["children"][0],
            json!({ "name": "protected", "type": "directory", "error": "Permission Denied" })
        );
        assert_eq!(json["children"][1]["name"], "visible.txt");
    }

    #[test]
    fn test_unreadable_sentinel() {
        let tree = TreeNode::Directory {
            name: "gone".to_string(),
            contents: DirContents::Unreadable("No such file or directory".to_string()),
        };
        assert_eq!(tree.to_ascii(), "gone/\n    [Error: No such file or directory]");
        let json: Value = serde_json::from_str(&tree.to_json().unwrap()).unwrap();
        assert_eq!(json["error"], "No such file or directory");
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_becomes_permission_sentinel() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("base");
        let locked = root.join("locked");
        fs::create_dir_all(&locked).unwrap();
        fs::create_dir_all(root.join("open")).unwrap();
        fs::write(locked.join("secret.txt"), "s").unwrap();
        fs::write(root.join("open").join("f.txt"), "f").unwrap();

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        // Privileged users can still list the directory.
        let still_readable = fs::read_dir(&locked).is_ok();
        let tree = TreeNode::scan(&root, &TreeOptions::default());
        let json = run(DirectoryTreeArgs::new(root.to_str().unwrap()).with_format(TreeFormat::Json));
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
        if still_readable {
            return;
        }

        assert_eq!(
            tree.to_ascii(),
            "base/\n├── locked/\n│       [Permission Denied]\n└── open/\n    └── f.txt"
        );
        let json: Value = serde_json::from_str(&json).unwrap();
        assert_eq!(json["children"][0]["error"], "Permission Denied");
        assert_eq!(json["children"][1]["children"][0]["name"], "f.txt");
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_non_utf8_hidden_names_are_filtered() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("raw");
        fs::create_dir(&root).unwrap();
        fs::write(root.join(OsStr::from_bytes(b".\xffhidden")), "h").unwrap();
        fs::write(root.join("shown.txt"), "s").unwrap();

        let output = run(DirectoryTreeArgs::new(root.to_str().unwrap()));
        assert_eq!(output, "raw/\n└── shown.txt");

        let with_hidden = run(DirectoryTreeArgs::new(root.to_str().unwrap()).with_hidden(true));
        assert_eq!(with_hidden.lines().count(), 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_not_followed() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("loop");
        fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&root, root.join("self")).unwrap();

        let output = run(DirectoryTreeArgs::new(root.to_str().unwrap()));
        assert_eq!(output, "loop/\n└── self");
    }

    #[tokio::test]
    async fn test_async_facade_matches_sync() {
        let (_temp_dir, root) = sample_tree();
        let sync = run(DirectoryTreeArgs::new(&root));
        let asynchronous = DirectoryTreeTool
            .run_async(DirectoryTreeArgs::new(&root))
            .await
            .unwrap();
        assert_eq!(sync, asynchronous);
    }
}
