//! Infuser descriptor
//!
//! The infuser is a Java program built elsewhere in the source tree. Its
//! jar, run-time class-path and main class are described by `infuser.toml`
//! in the parent of the tools directory.

use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name of the infuser descriptor
pub const INFUSER_DESCRIPTOR: &str = "infuser.toml";

/// Where the infuser lives and how to launch it
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InfuserDescriptor {
    /// Packaged infuser; only used as a rebuild trigger for infusion outputs
    pub jar: PathBuf,

    /// Class-path needed to run the infuser
    #[serde(default)]
    pub classpath: Vec<PathBuf>,

    /// Fully qualified main class
    pub main_class: String,
}

impl InfuserDescriptor {
    /// Expected descriptor location for a tools directory
    pub fn descriptor_path(tools_dir: &Path) -> PathBuf {
        tools_dir.join("..").join(INFUSER_DESCRIPTOR)
    }

    /// Find and load the descriptor belonging to `tools_dir`
    pub fn locate(tools_dir: &Path) -> ConfigResult<Self> {
        let path = Self::descriptor_path(tools_dir);
        if !path.is_file() {
            return Err(ConfigError::InfuserNotFound(path));
        }
        Self::load_from_file(&path)
    }

    /// Load a descriptor; relative paths resolve against its directory
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::InfuserNotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let mut descriptor: Self =
            toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
                file: path.to_path_buf(),
                error: e,
            })?;

        if descriptor.main_class.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "main_class".to_string(),
                reason: "main class cannot be empty".to_string(),
            });
        }

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        descriptor.jar = resolve(base, &descriptor.jar);
        descriptor.classpath = descriptor
            .classpath
            .iter()
            .map(|entry| resolve(base, entry))
            .collect();

        Ok(descriptor)
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
