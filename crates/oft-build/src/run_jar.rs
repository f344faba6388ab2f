//! Run a jar as a pseudo target
use crate::command::{CommandLine, CommandOutput, Executor};
use crate::error::{BuildError, BuildResult};
use crate::targets::Node;

use oft_config::JavaConfig;
use std::path::{Path, PathBuf};

/// Name of the pseudo target
pub const RUN_JAR_TARGET: &str = "run_jar_file";

/// `java -jar <jar> <parameters>` bound to a pseudo target
///
/// The target is never a file, so it is always considered out of date.
#[derive(Debug, Clone, PartialEq)]
pub struct RunJarCommand {
    pub name: String,
    pub jar: PathBuf,
    pub command: CommandLine,
}

impl RunJarCommand {
    /// The jar is the only source
    pub fn sources(&self) -> Vec<Node> {
        vec![Node::file(&self.jar)]
    }

    pub fn always_build(&self) -> bool {
        true
    }

    pub fn run(&self, executor: &mut dyn Executor) -> BuildResult<CommandOutput> {
        executor.execute(&self.command)
    }
}

/// Build the run command for `jar`, which is made absolute
pub fn run_jar<I, S>(java: &JavaConfig, jar: &Path, parameters: I) -> BuildResult<RunJarCommand>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let jar = if jar.is_absolute() {
        jar.to_path_buf()
    } else {
        let cwd = std::env::current_dir().map_err(|e| BuildError::io(jar, e))?;
        cwd.join(jar)
    };

    let command = CommandLine::new(&java.java)
        .arg("-jar")
        .path_arg(&jar)
        .args(parameters);

    Ok(RunJarCommand {
        name: RUN_JAR_TARGET.to_string(),
        jar,
        command,
    })
}
