//! Manifest builder
use crate::builder::Builder;
use crate::command::Executor;
use crate::error::{BuildError, BuildResult};
use crate::targets::{Emission, Node};

use oft_config::Config;
use std::path::{Path, PathBuf};

/// Suffix added to manifest targets that have none
pub const MANIFEST_SUFFIX: &str = ".MF";

/// Builder registered as `Manifest`
///
/// Writes `Manifest-Version`, an optional `Main-Class` and `Class-Path`. The
/// main class and class-path are not files, so the emission declares them as
/// value dependencies: changing either regenerates the manifest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManifestBuilder {
    main_class: Option<String>,
    classpath: Vec<String>,
}

impl ManifestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Main class and class-path from the configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            main_class: config.main_class().map(str::to_string),
            classpath: config.manifest_classpath().to_vec(),
        }
    }

    pub fn with_main_class(mut self, main_class: impl Into<String>) -> Self {
        self.main_class = Some(main_class.into());
        self
    }

    pub fn with_classpath<I, S>(mut self, classpath: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.classpath = classpath.into_iter().map(Into::into).collect();
        self
    }

    /// Manifest text
    pub fn content(&self) -> String {
        let mut manifest = String::from("Manifest-Version: 1.0\n");
        if let Some(main_class) = &self.main_class {
            manifest.push_str(&format!("Main-Class: {}\n", main_class));
        }
        manifest.push_str(&format!("Class-Path: {}\n", self.classpath.join(" ")));
        manifest
    }

    fn with_suffix(path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            let mut name = path.as_os_str().to_os_string();
            name.push(MANIFEST_SUFFIX);
            PathBuf::from(name)
        }
    }
}

impl Builder for ManifestBuilder {
    fn name(&self) -> &'static str {
        "Manifest"
    }

    fn emit(&self, targets: Vec<Node>, _sources: Vec<Node>) -> BuildResult<Emission> {
        if targets.len() != 1 {
            return Err(BuildError::InvalidTarget(
                "Manifest needs exactly one target!".to_string(),
            ));
        }
        let target = match &targets[0] {
            Node::File(path) | Node::Entry(path) => Self::with_suffix(path),
            other => {
                return Err(BuildError::wrong_kind(
                    other.path().map(Path::to_path_buf).unwrap_or_default(),
                    "file",
                ))
            }
        };

        let mut emission = Emission::new(vec![Node::File(target.clone())], Vec::new());
        if let Some(main_class) = &self.main_class {
            emission.depends(&target, Node::value(main_class));
        }
        emission.depends(&target, Node::value(self.classpath.join(" ")));
        Ok(emission)
    }

    fn display(&self, _emission: &Emission) -> String {
        "Manifest".to_string()
    }

    fn execute(&self, emission: &Emission, executor: &mut dyn Executor) -> BuildResult<()> {
        let target = emission
            .primary_target()
            .ok_or_else(|| BuildError::InvalidTarget("Manifest has no target".to_string()))?;

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            executor.create_dir(parent)?;
        }
        executor.write_file(target, &self.content())
    }
}
