//! Configuration Loader
//!
//! Handles loading and merging configuration from multiple sources with proper precedence.

use crate::infuser::InfuserDescriptor;
use crate::java::JavaConfig;
use crate::project::{ManifestConfig, ProjectConfig};
use crate::ConfigResult;
use std::env;
use std::path::{Path, PathBuf};

/// Name of the project configuration file
pub const CONFIG_FILE_NAME: &str = "oft.toml";

/// Separator used by the `JAVA*PATH` environment variables
const PATH_LIST_SEPARATOR: char = ':';

/// Configuration loader
///
/// Loads configuration from multiple sources and merges them with proper precedence:
/// 1. Built-in defaults - lowest priority
/// 2. Project config (./oft.toml) - overrides defaults
/// 3. Environment variables - overrides project
pub struct ConfigLoader {
    /// Skip environment overrides (used when the caller owns the environment)
    ignore_env: bool,
}

/// Merged configuration result
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Java toolchain settings, default flags applied
    pub java: JavaConfig,

    /// Manifest settings
    pub manifest: ManifestConfig,

    /// Tools directory, resolved against the project root
    pub tools_dir: Option<PathBuf>,

    /// Project root directory (where oft.toml was found)
    pub project_root: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            java: JavaConfig::default().with_default_flags(),
            manifest: ManifestConfig::default(),
            tools_dir: None,
            project_root: None,
        }
    }
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { ignore_env: false }
    }

    /// Do not read environment variables
    pub fn without_env(mut self) -> Self {
        self.ignore_env = true;
        self
    }

    /// Load configuration starting from the given directory
    ///
    /// Walks up the directory tree to find oft.toml, then applies
    /// environment overrides.
    pub fn load_from_directory(&self, start_dir: &Path) -> ConfigResult<Config> {
        let (project_root, project_config) = self.find_project_config(start_dir)?;
        Ok(self.resolve(project_config, project_root))
    }

    /// Load configuration from a specific project config file
    pub fn load_from_file(&self, config_path: &Path) -> ConfigResult<Config> {
        let project_config = ProjectConfig::load_from_file(config_path)?;
        let project_root = config_path.parent().map(|p| p.to_path_buf());
        Ok(self.resolve(project_config, project_root))
    }

    /// Find project configuration by walking up directory tree
    ///
    /// Returns (project_root, project_config); defaults when nothing is found
    fn find_project_config(
        &self,
        start_dir: &Path,
    ) -> ConfigResult<(Option<PathBuf>, ProjectConfig)> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);

            if config_path.exists() {
                let project_config = ProjectConfig::load_from_file(&config_path)?;
                return Ok((Some(current), project_config));
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => return Ok((None, ProjectConfig::default())),
            }
        }
    }

    fn resolve(&self, project: ProjectConfig, project_root: Option<PathBuf>) -> Config {
        let project = if self.ignore_env {
            project
        } else {
            apply_env_overrides(project, |key| env::var(key).ok())
        };

        let tools_dir = project.tools.dir.map(|dir| match &project_root {
            Some(root) if dir.is_relative() => root.join(dir),
            _ => dir,
        });

        Config {
            java: project.java.with_default_flags(),
            manifest: project.manifest,
            tools_dir,
            project_root,
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply environment variable overrides to project config
///
/// `lookup` returns the value of a variable; empty values are treated as
/// unset. A relative `OT_SCONS_TOOLS` is resolved against the current
/// directory, not the project root.
pub fn apply_env_overrides<F>(mut config: ProjectConfig, lookup: F) -> ProjectConfig
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(javac) = lookup("JAVAC") {
        config.java.javac = javac;
    }
    if let Some(jar) = lookup("JAR") {
        config.java.jar = jar;
    }
    if let Some(flags) = lookup("JAVACFLAGS") {
        config.java.javacflags = flags.split_whitespace().map(str::to_string).collect();
    }
    if let Some(paths) = lookup("JAVABOOTCLASSPATH") {
        config.java.bootclasspath = split_path_list(&paths);
    }
    if let Some(paths) = lookup("JAVACLASSPATH") {
        config.java.classpath = split_path_list(&paths);
    }
    if let Some(paths) = lookup("JAVASOURCEPATH") {
        config.java.sourcepath = split_path_list(&paths);
    }
    if let Some(tools) = lookup("OT_SCONS_TOOLS") {
        let tools = PathBuf::from(tools);
        config.tools.dir = Some(match env::current_dir() {
            Ok(cwd) if tools.is_relative() => cwd.join(tools),
            _ => tools,
        });
    }

    config
}

fn split_path_list(value: &str) -> Vec<String> {
    value
        .split(PATH_LIST_SEPARATOR)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

impl Config {
    /// Get the project root directory
    pub fn project_root(&self) -> Option<&Path> {
        self.project_root.as_deref()
    }

    /// Check if this is a project (has oft.toml)
    pub fn is_project(&self) -> bool {
        self.project_root.is_some()
    }

    /// Manifest entry point, if configured
    pub fn main_class(&self) -> Option<&str> {
        self.manifest.mainclass.as_deref()
    }

    /// Manifest class-path, falling back to the compiler class-path
    pub fn manifest_classpath(&self) -> &[String] {
        self.manifest
            .classpath
            .as_deref()
            .unwrap_or(&self.java.classpath)
    }

    /// Load the infuser descriptor for the configured tools directory
    ///
    /// Returns `Ok(None)` when no tools directory is configured.
    pub fn infuser(&self) -> ConfigResult<Option<InfuserDescriptor>> {
        self.tools_dir
            .as_deref()
            .map(InfuserDescriptor::locate)
            .transpose()
    }
}
