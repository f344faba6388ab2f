//! Infusion builder
//!
//! An infusion turns compiled classes and header descriptors into the
//! infusion archive (`.di`), its header (`.dih`) and the C glue
//! (`jlib_<name>.c`, `jlib_<name>.h`). The work is done by the external
//! infuser; this module only predicts its outputs and builds its command
//! line.
//!
//! For an output directory `build/foo` the outputs are:
//!
//! | output                | flag |
//! |-----------------------|------|
//! | `build/foo/foo.dih`   | `-h` |
//! | `build/foo/foo.di`    | `-o` |
//! | `build/foo/jlib_foo.c`| `-c` |
//! | `build/foo/jlib_foo.h`| `-d` |

use crate::builder::Builder;
use crate::command::{CommandLine, Executor};
use crate::error::{BuildError, BuildResult};
use crate::targets::{Emission, Node};

use oft_config::InfuserDescriptor;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Accepted input suffixes
const SOURCE_SUFFIXES: [&str; 2] = [".class", ".dih"];

/// Output file names; `{}` is the infusion name
const OUTPUT_TEMPLATES: [(&str, &str); 4] = [
    ("", ".dih"),
    ("", ".di"),
    ("jlib_", ".c"),
    ("jlib_", ".h"),
];

#[cfg(windows)]
const CLASSPATH_SEPARATOR: &str = ";";
#[cfg(not(windows))]
const CLASSPATH_SEPARATOR: &str = ":";

/// The external infuser and how to launch it
#[derive(Debug, Clone, PartialEq)]
pub struct InfuserTool {
    /// Java launcher
    pub java: String,
    /// Packaged infuser, a rebuild trigger for every output
    pub jar: PathBuf,
    /// Run-time class-path
    pub classpath: Vec<PathBuf>,
    /// Main class
    pub main_class: String,
}

impl InfuserTool {
    pub fn from_descriptor(descriptor: InfuserDescriptor, java: impl Into<String>) -> Self {
        Self {
            java: java.into(),
            jar: descriptor.jar,
            classpath: descriptor.classpath,
            main_class: descriptor.main_class,
        }
    }

    /// Find the infuser belonging to a tools directory
    pub fn locate(tools_dir: &Path, java: impl Into<String>) -> BuildResult<Self> {
        let descriptor = InfuserDescriptor::locate(tools_dir)?;
        Ok(Self::from_descriptor(descriptor, java))
    }

    /// Class-path joined with the platform separator
    pub fn classpath_string(&self) -> String {
        self.classpath
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(CLASSPATH_SEPARATOR)
    }

    /// `java -cp <classpath> <main class>`
    pub fn base_command(&self) -> CommandLine {
        CommandLine::new(&self.java)
            .arg("-cp")
            .arg(self.classpath_string())
            .arg(&self.main_class)
    }
}

/// Infuser flag announcing the role of an output file
pub fn infusion_flag(path: &Path) -> BuildResult<&'static str> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("dih") => Ok("-h"),
        Some("di") => Ok("-o"),
        Some("h") => Ok("-d"),
        Some("c") => Ok("-c"),
        _ => Err(BuildError::InvalidOutput(path.to_path_buf())),
    }
}

/// Name of an infusion: the base name of its output directory
pub fn infusion_name(output_dir: &Path) -> BuildResult<String> {
    output_dir
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            BuildError::InvalidTarget(format!(
                "Cannot derive an infusion name from `{}`",
                output_dir.display()
            ))
        })
}

/// The four outputs of the infusion written to `output_dir`
pub fn infusion_outputs(output_dir: &Path) -> BuildResult<Vec<PathBuf>> {
    let name = infusion_name(output_dir)?;
    Ok(OUTPUT_TEMPLATES
        .iter()
        .map(|(prefix, suffix)| output_dir.join(format!("{}{}{}", prefix, name, suffix)))
        .collect())
}

/// Pack `.di` files into an archive linked in as a C array
///
/// Not implemented: logs a warning and produces nothing.
pub fn infusion_archive_object(sources: &[Node]) -> Vec<Node> {
    warn!(
        "InfusionArchiveObject is not implemented; ignoring {} source(s)",
        sources.len()
    );
    Vec::new()
}

/// Builder registered as `Infusion`
#[derive(Debug, Clone)]
pub struct InfusionBuilder {
    infuser: InfuserTool,
}

impl InfusionBuilder {
    pub fn new(infuser: InfuserTool) -> Self {
        Self { infuser }
    }

    pub fn infuser(&self) -> &InfuserTool {
        &self.infuser
    }

    /// Name taken from the directory holding the emitted outputs
    fn emitted_name(emission: &Emission) -> BuildResult<String> {
        let first = emission
            .primary_target()
            .ok_or_else(|| BuildError::InvalidTarget("Infusion has no outputs".to_string()))?;
        infusion_name(first.parent().unwrap_or_else(|| Path::new("")))
    }

    /// Full infuser invocation for an emitted infusion
    ///
    /// Outputs are passed in emission order, each after its flag, followed by
    /// `-n <name>` and the sources.
    pub fn command(&self, emission: &Emission) -> BuildResult<CommandLine> {
        let mut command = self.infuser.base_command();

        for target in emission.target_paths() {
            let flag = infusion_flag(target)?;
            command = command.arg(flag).path_arg(target);
        }

        command = command.arg("-n").arg(Self::emitted_name(emission)?);

        for source in emission.source_paths() {
            command = command.path_arg(source);
        }

        Ok(command)
    }
}

impl Builder for InfusionBuilder {
    fn name(&self) -> &'static str {
        "Infusion"
    }

    fn emit(&self, targets: Vec<Node>, sources: Vec<Node>) -> BuildResult<Emission> {
        if targets.len() != 1 {
            return Err(BuildError::InvalidTarget(
                "Infusion needs exactly one output directory!".to_string(),
            ));
        }

        let output_dir = match &targets[0] {
            Node::Dir(path) | Node::Entry(path) => path.clone(),
            other => {
                return Err(BuildError::wrong_kind(
                    other.path().map(Path::to_path_buf).unwrap_or_default(),
                    "directory",
                ))
            }
        };

        for source in &sources {
            if !SOURCE_SUFFIXES.iter().any(|suffix| source.has_suffix(suffix)) {
                return Err(BuildError::invalid_source(
                    "Infusion",
                    source.to_string(),
                    "is neither *.class nor *.dih",
                ));
            }
        }

        let outputs = infusion_outputs(&output_dir)?;
        let mut emission = Emission::new(outputs.iter().cloned().map(Node::File).collect(), sources);
        for output in outputs {
            emission.depends(output, Node::file(&self.infuser.jar));
        }

        debug!(
            "Infusion `{}` -> {} outputs",
            output_dir.display(),
            emission.targets.len()
        );
        Ok(emission)
    }

    fn display(&self, emission: &Emission) -> String {
        let name = Self::emitted_name(emission).unwrap_or_default();
        format!("Infusing: '{}'", name)
    }

    fn execute(&self, emission: &Emission, executor: &mut dyn Executor) -> BuildResult<()> {
        let command = self.command(emission)?;
        executor.execute(&command)?;
        Ok(())
    }
}
