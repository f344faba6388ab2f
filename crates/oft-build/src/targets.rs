/// Build graph nodes and emitted build units
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A node handed to or produced by a builder
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// A regular file
    File(PathBuf),
    /// A directory
    Dir(PathBuf),
    /// A path whose kind is not decided yet
    Entry(PathBuf),
    /// A tracked configuration value; changes to it trigger rebuilds
    Value(String),
}

impl Node {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn dir(path: impl Into<PathBuf>) -> Self {
        Self::Dir(path.into())
    }

    pub fn entry(path: impl Into<PathBuf>) -> Self {
        Self::Entry(path.into())
    }

    pub fn value(value: impl Into<String>) -> Self {
        Self::Value(value.into())
    }

    /// Get the path of a file system node
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::File(path) | Self::Dir(path) | Self::Entry(path) => Some(path),
            Self::Value(_) => None,
        }
    }

    /// Final path component as UTF-8, if any
    pub fn file_name(&self) -> Option<&str> {
        self.path()?.file_name()?.to_str()
    }

    /// Whether the path ends with `suffix` (compared as text, like `.class`)
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.path()
            .map(|p| p.to_string_lossy().ends_with(suffix))
            .unwrap_or(false)
    }

    /// Whether the node can be used where a directory is expected
    pub fn is_dir_like(&self) -> bool {
        matches!(self, Self::Dir(_) | Self::Entry(_))
    }

    /// Whether the node can be used where a file is expected
    pub fn is_file_like(&self) -> bool {
        matches!(self, Self::File(_) | Self::Entry(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) | Self::Dir(path) | Self::Entry(path) => {
                write!(f, "{}", path.display())
            }
            Self::Value(value) => write!(f, "{}", value),
        }
    }
}

/// "`target` is out of date whenever `on` changes"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub target: PathBuf,
    pub on: Node,
}

/// Targets, sources and extra dependencies predicted by a builder
///
/// This is what the orchestrator registers in its graph. It depends only on
/// the declared targets and sources, never on file contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emission {
    pub targets: Vec<Node>,
    pub sources: Vec<Node>,
    pub dependencies: Vec<Dependency>,
}

impl Emission {
    /// Create an emission without extra dependencies
    pub fn new(targets: Vec<Node>, sources: Vec<Node>) -> Self {
        Self {
            targets,
            sources,
            dependencies: Vec::new(),
        }
    }

    /// Declare that `target` depends on `on`
    pub fn depends(&mut self, target: impl Into<PathBuf>, on: Node) {
        self.dependencies.push(Dependency {
            target: target.into(),
            on,
        });
    }

    /// Paths of all file system targets, in emission order
    pub fn target_paths(&self) -> Vec<&Path> {
        self.targets.iter().filter_map(Node::path).collect()
    }

    /// Paths of all file system sources, in emission order
    pub fn source_paths(&self) -> Vec<&Path> {
        self.sources.iter().filter_map(Node::path).collect()
    }

    /// Extra dependencies declared for one target
    pub fn dependencies_of(&self, target: &Path) -> Vec<&Node> {
        self.dependencies
            .iter()
            .filter(|d| d.target == target)
            .map(|d| &d.on)
            .collect()
    }

    /// First target path; builders with a single output use this
    pub fn primary_target(&self) -> Option<&Path> {
        self.targets.first().and_then(Node::path)
    }
}
