//! Builder interface and registry
use crate::command::Executor;
use crate::error::{BuildError, BuildResult};
use crate::infusion::{InfuserTool, InfusionBuilder};
use crate::java::JavaToJarBuilder;
use crate::manifest::ManifestBuilder;
use crate::targets::{Emission, Node};

use oft_config::Config;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// A build step the orchestrator can schedule
///
/// `emit` is cheap and pure: it predicts outputs from the declared targets
/// and sources. `execute` renders the tool invocations and runs them; it is
/// only called when the orchestrator decides the outputs are out of date.
pub trait Builder {
    /// Name the builder is registered under
    fn name(&self) -> &'static str;

    /// Validate the declaration and predict outputs
    fn emit(&self, targets: Vec<Node>, sources: Vec<Node>) -> BuildResult<Emission>;

    /// Progress message; empty when the executed commands speak for themselves
    fn display(&self, emission: &Emission) -> String;

    /// Produce the outputs of `emission`
    fn execute(&self, emission: &Emission, executor: &mut dyn Executor) -> BuildResult<()>;
}

/// Builders available to a build, by name
#[derive(Default)]
pub struct BuilderRegistry {
    builders: BTreeMap<&'static str, Box<dyn Builder>>,
}

impl BuilderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the standard builders for `config`
    ///
    /// `JavaToJar` and `Manifest` are always available. `Infusion` is only
    /// registered when a tools directory is configured, and then the infuser
    /// descriptor must exist.
    pub fn from_config(config: &Config) -> BuildResult<Self> {
        let mut registry = Self::new();
        registry.register(Box::new(JavaToJarBuilder::new(config.java.clone())));
        registry.register(Box::new(ManifestBuilder::from_config(config)));

        if let Some(tools_dir) = &config.tools_dir {
            let infuser = InfuserTool::locate(tools_dir, &config.java.java)?;
            registry.register(Box::new(InfusionBuilder::new(infuser)));
        }

        debug!("Registered builders: {}", registry.names().join(", "));
        Ok(registry)
    }

    /// Register a builder, replacing one with the same name
    pub fn register(&mut self, builder: Box<dyn Builder>) {
        self.builders.insert(builder.name(), builder);
    }

    /// Look up a builder
    pub fn get(&self, name: &str) -> BuildResult<&dyn Builder> {
        self.builders
            .get(name)
            .map(|b| b.as_ref())
            .ok_or_else(|| BuildError::UnknownBuilder(name.to_string()))
    }

    /// Check whether a builder is registered
    pub fn contains(&self, name: &str) -> bool {
        self.builders.contains_key(name)
    }

    /// Registered builder names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        self.builders.keys().copied().collect()
    }

    /// Run the emission phase of a builder
    pub fn emit(&self, name: &str, targets: Vec<Node>, sources: Vec<Node>) -> BuildResult<Emission> {
        let emission = self.get(name)?.emit(targets, sources)?;
        debug!(
            "{} emitted {} target(s) from {} source(s)",
            name,
            emission.targets.len(),
            emission.sources.len()
        );
        Ok(emission)
    }

    /// Emit and then execute a single unit
    ///
    /// Fatal errors from the emission phase are returned before anything
    /// runs.
    pub fn build(
        &self,
        name: &str,
        targets: Vec<Node>,
        sources: Vec<Node>,
        executor: &mut dyn Executor,
    ) -> BuildResult<Emission> {
        let builder = self.get(name)?;
        let emission = self.emit(name, targets, sources)?;

        let message = builder.display(&emission);
        if !message.is_empty() {
            info!("{}", message);
        }

        builder.execute(&emission, executor)?;
        Ok(emission)
    }
}
