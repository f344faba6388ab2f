//! Ostfriesentee tool configuration
//!
//! Provides the settings consumed by the `oft-build` builders:
//! - Java toolchain settings (`javac`, `jar`, flags and path lists)
//! - Manifest options (main class, class-path)
//! - The tools directory and the infuser descriptor found next to it
//!
//! # Configuration Hierarchy
//!
//! Configuration is loaded and merged in the following order (later overrides earlier):
//! 1. Built-in defaults
//! 2. Project config (./oft.toml, searched upwards)
//! 3. Environment variables (`JAVAC`, `JAR`, `JAVACFLAGS`, `JAVABOOTCLASSPATH`,
//!    `JAVACLASSPATH`, `JAVASOURCEPATH`, `OT_SCONS_TOOLS`)
//!
//! # Example
//!
//! ```no_run
//! use oft_config::ConfigLoader;
//! use std::path::Path;
//!
//! let loader = ConfigLoader::new();
//! let config = loader.load_from_directory(Path::new(".")).unwrap();
//! println!("javac: {}", config.java.javac);
//! ```

pub mod infuser;
pub mod java;
pub mod loader;
pub mod project;

use std::path::PathBuf;
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid TOML syntax in {file}: {error}")]
    TomlParseError {
        file: PathBuf,
        error: toml::de::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("Could not find the infuser. `{}` does not exist.", .0.display())]
    InfuserNotFound(PathBuf),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

// Re-export main types
pub use infuser::InfuserDescriptor;
pub use java::{append_unique, JavaConfig, DEFAULT_JAVAC_FLAGS};
pub use loader::{Config, ConfigLoader, CONFIG_FILE_NAME};
pub use project::{ManifestConfig, ProjectConfig, ToolsConfig};
