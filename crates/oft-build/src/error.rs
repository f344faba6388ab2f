/// Build tool error types
use oft_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0}")]
    InvalidTarget(String),

    #[error("{builder} source `{}` {reason}", path.display())]
    InvalidSource {
        builder: &'static str,
        path: PathBuf,
        reason: String,
    },

    #[error("Invalid infusion target `{}`", .0.display())]
    InvalidOutput(PathBuf),

    #[error("`{}` must be a {expected}", path.display())]
    WrongNodeKind {
        path: PathBuf,
        expected: &'static str,
    },

    #[error("Unknown builder: {0}")]
    UnknownBuilder(String),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to run `{command}`: {error}")]
    CommandSpawn { command: String, error: String },

    #[error("`{command}` failed with exit code {exit_code}\n{output}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        output: String,
    },

    #[error("I/O error at {path}: {error}")]
    IoError {
        path: PathBuf,
        error: std::io::Error,
    },
}

impl BuildError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            error,
        }
    }

    /// Create an invalid source error
    pub fn invalid_source(
        builder: &'static str,
        path: impl Into<PathBuf>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidSource {
            builder,
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a wrong node kind error
    pub fn wrong_kind(path: impl Into<PathBuf>, expected: &'static str) -> Self {
        Self::WrongNodeKind {
            path: path.into(),
            expected,
        }
    }

    /// Whether this is a mistake in the build definition
    ///
    /// Fatal errors must stop the whole build: retrying or continuing with
    /// other units cannot fix them. Tool failures and I/O errors only fail
    /// the unit that hit them.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidTarget(_)
                | Self::InvalidSource { .. }
                | Self::InvalidOutput(_)
                | Self::WrongNodeKind { .. }
                | Self::UnknownBuilder(_)
                | Self::Config(_)
        )
    }
}
