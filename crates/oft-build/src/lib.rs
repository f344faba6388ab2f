//! Ostfriesentee build tools
//!
//! Builders that plug into an external build orchestrator:
//! - `Infusion`: runs the infuser over `.class`/`.dih` inputs and predicts
//!   its four outputs (`N.dih`, `N.di`, `jlib_N.c`, `jlib_N.h`)
//! - `JavaToJar`: compiles Java sources into `<jar dir>/class` and packs them
//!   into a jar without predicting individual `.class` files
//! - `Manifest`: writes a `MANIFEST.MF` from the configured main class and
//!   class-path
//! - `run_jar`: a pseudo target running a jar with `java -jar`
//!
//! Every builder works in two phases. `Builder::emit` predicts outputs from
//! the declared targets and sources without touching the file system;
//! `Builder::execute` renders the tool invocations and runs them through an
//! [`Executor`] supplied by the orchestrator.

pub mod builder;
pub mod command;
pub mod discovery;
pub mod error;
pub mod flags;
pub mod infusion;
pub mod java;
pub mod manifest;
pub mod run_jar;
pub mod targets;

// Re-export main types
pub use builder::{Builder, BuilderRegistry};
pub use command::{CommandLine, CommandOutput, Executor, ProcessExecutor, RecordingExecutor};
pub use discovery::find_files;
pub use error::{BuildError, BuildResult};
pub use flags::{flag_args, flag_if_not_empty};
pub use infusion::{infusion_archive_object, infusion_flag, InfuserTool, InfusionBuilder};
pub use java::JavaToJarBuilder;
pub use manifest::ManifestBuilder;
pub use run_jar::{run_jar, RunJarCommand, RUN_JAR_TARGET};
pub use targets::{Dependency, Emission, Node};

// Re-export oft-config types for convenience
pub use oft_config::{Config, ConfigLoader, JavaConfig};
