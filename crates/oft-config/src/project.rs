//! Project Configuration (oft.toml)
//!
//! Handles project-level configuration stored in `oft.toml` at the project root.

use crate::java::JavaConfig;
use crate::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from oft.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ProjectConfig {
    /// Java toolchain settings
    #[serde(default)]
    pub java: JavaConfig,

    /// Manifest generation settings
    #[serde(default)]
    pub manifest: ManifestConfig,

    /// Location of the build tools (infuser etc.)
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Manifest configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ManifestConfig {
    /// Entry point written as `Main-Class`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mainclass: Option<String>,

    /// Entries written as `Class-Path`; falls back to `java.classpath`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classpath: Option<Vec<String>>,
}

/// Tools configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    /// Tools directory; the infuser descriptor lives in its parent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load project configuration from a file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::TomlParseError {
            file: path.to_path_buf(),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the project configuration
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, program) in [
            ("java.java", &self.java.java),
            ("java.javac", &self.java.javac),
            ("java.jar", &self.java.jar),
        ] {
            if program.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "program cannot be empty".to_string(),
                });
            }
        }

        for (field, entries) in [
            ("java.bootclasspath", &self.java.bootclasspath),
            ("java.classpath", &self.java.classpath),
            ("java.sourcepath", &self.java.sourcepath),
        ] {
            validate_path_list(field, entries)?;
        }

        if let Some(mainclass) = &self.manifest.mainclass {
            if mainclass.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: "manifest.mainclass".to_string(),
                    reason: "main class cannot be empty".to_string(),
                });
            }
        }

        if let Some(classpath) = &self.manifest.classpath {
            validate_path_list("manifest.classpath", classpath)?;
        }

        Ok(())
    }
}

/// Path lists are joined with `:` or spaces later, so entries must be non-empty
fn validate_path_list(field: &str, entries: &[String]) -> ConfigResult<()> {
    if entries.iter().any(|e| e.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            field: field.to_string(),
            reason: "entries cannot be empty".to_string(),
        });
    }
    Ok(())
}
