//! Structured tool invocations and their execution
//!
//! Builders describe tool runs as a [`CommandLine`] (program plus argument
//! list) instead of a concatenated shell string. An [`Executor`] supplied by
//! the orchestrator runs them: [`ProcessExecutor`] spawns real processes,
//! [`RecordingExecutor`] only records what would run.

use crate::error::{BuildError, BuildResult};
use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// A program and its arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Create a command without arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append a path argument
    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    /// Render as a single shell-like line for logs and progress output
    pub fn render(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn quote(arg: &str) -> Cow<'_, str> {
    let needs_quotes = arg.is_empty()
        || arg
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '\'');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", arg.replace('"', "\\\"")))
    } else {
        Cow::Borrowed(arg)
    }
}

/// Result of running a command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    /// Exit code
    pub exit_code: i32,
    /// Stdout output
    pub stdout: String,
    /// Stderr output
    pub stderr: String,
    /// Execution time
    pub execution_time: Duration,
}

impl CommandOutput {
    /// Output of a command that was not actually run
    pub fn skipped() -> Self {
        Self {
            exit_code: 0,
            stdout: String::new(),
            stderr: String::new(),
            execution_time: Duration::ZERO,
        }
    }

    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Get combined output
    pub fn output(&self) -> String {
        let mut output = String::new();
        if !self.stdout.is_empty() {
            output.push_str("STDOUT:\n");
            output.push_str(&self.stdout);
            output.push('\n');
        }
        if !self.stderr.is_empty() {
            output.push_str("STDERR:\n");
            output.push_str(&self.stderr);
        }
        output
    }
}

/// Execution primitives provided by the orchestrator
pub trait Executor {
    /// Run a command to completion; a non-zero exit is an error
    fn execute(&mut self, command: &CommandLine) -> BuildResult<CommandOutput>;

    /// Create a directory and its parents; existing directories are fine
    fn create_dir(&mut self, path: &Path) -> BuildResult<()>;

    /// Write `contents` to `path`, replacing any existing file
    fn write_file(&mut self, path: &Path, contents: &str) -> BuildResult<()>;
}

/// Runs commands as child processes, one at a time
#[derive(Debug, Default)]
pub struct ProcessExecutor {
    /// Working directory for spawned commands
    working_dir: Option<PathBuf>,
    /// Echo captured stdout
    verbose: bool,
}

impl ProcessExecutor {
    /// Create new process executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands in `dir` instead of the current directory
    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Relative paths are taken from the working directory, like commands
    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.working_dir {
            Some(dir) if path.is_relative() => dir.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl Executor for ProcessExecutor {
    fn execute(&mut self, command: &CommandLine) -> BuildResult<CommandOutput> {
        let rendered = command.render();
        info!("{}", rendered);

        let start = Instant::now();

        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        if let Some(dir) = &self.working_dir {
            process.current_dir(dir);
        }

        let output = process
            .spawn()
            .map_err(|e| BuildError::CommandSpawn {
                command: rendered.clone(),
                error: e.to_string(),
            })?
            .wait_with_output()
            .map_err(|e| BuildError::CommandSpawn {
                command: rendered.clone(),
                error: e.to_string(),
            })?;

        let result = CommandOutput {
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            execution_time: start.elapsed(),
        };

        if self.verbose && !result.stdout.is_empty() {
            println!("{}", result.stdout);
        }
        if !result.stderr.is_empty() {
            warn!("{}", result.stderr.trim_end());
        }

        debug!(
            "`{}` finished in {:.2}s",
            command.program,
            result.execution_time.as_secs_f64()
        );

        if !result.success() {
            return Err(BuildError::CommandFailed {
                command: rendered,
                exit_code: result.exit_code,
                output: result.output(),
            });
        }

        Ok(result)
    }

    fn create_dir(&mut self, path: &Path) -> BuildResult<()> {
        let path = self.resolve(path);
        std::fs::create_dir_all(&path).map_err(|e| BuildError::io(&path, e))
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> BuildResult<()> {
        let path = self.resolve(path);
        debug!("Writing {}", path.display());
        std::fs::write(&path, contents).map_err(|e| BuildError::io(&path, e))
    }
}

/// Records commands, directories and file writes instead of performing them
///
/// Useful for dry runs. A program can be marked as failing to exercise
/// error paths without a real toolchain.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    /// Commands in execution order
    pub commands: Vec<CommandLine>,
    /// Directories in creation order
    pub directories: Vec<PathBuf>,
    /// Written files and their contents, in write order
    pub files: Vec<(PathBuf, String)>,
    failing_program: Option<String>,
}

impl RecordingExecutor {
    /// Create new recording executor
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every invocation of `program` fail with exit code 1
    pub fn with_failing_program(mut self, program: impl Into<String>) -> Self {
        self.failing_program = Some(program.into());
        self
    }

    /// Rendered commands, in execution order
    pub fn rendered(&self) -> Vec<String> {
        self.commands.iter().map(CommandLine::render).collect()
    }
}

impl Executor for RecordingExecutor {
    fn execute(&mut self, command: &CommandLine) -> BuildResult<CommandOutput> {
        info!("{}", command);
        self.commands.push(command.clone());

        if self.failing_program.as_deref() == Some(command.program.as_str()) {
            return Err(BuildError::CommandFailed {
                command: command.render(),
                exit_code: 1,
                output: String::new(),
            });
        }

        Ok(CommandOutput::skipped())
    }

    fn create_dir(&mut self, path: &Path) -> BuildResult<()> {
        self.directories.push(path.to_path_buf());
        Ok(())
    }

    fn write_file(&mut self, path: &Path, contents: &str) -> BuildResult<()> {
        self.files.push((path.to_path_buf(), contents.to_string()));
        Ok(())
    }
}
