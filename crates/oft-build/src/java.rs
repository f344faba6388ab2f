//! Java to jar builder
//!
//! `javac` may write several `.class` files for one `.java` file, so the
//! classes cannot be predicted reliably from the sources. This builder does
//! not try: it declares the jar as the only output of all Java sources,
//! compiles everything into `<jar dir>/class` and packs that directory.

use crate::builder::Builder;
use crate::command::{CommandLine, Executor};
use crate::discovery::find_files;
use crate::error::{BuildError, BuildResult};
use crate::flags::flag_args;
use crate::targets::{Emission, Node};

use oft_config::JavaConfig;
use std::path::{Path, PathBuf};

/// File name a source must have to be used as the jar manifest
pub const MANIFEST_FILE_NAME: &str = "MANIFEST.MF";

/// Builder registered as `JavaToJar`
#[derive(Debug, Clone)]
pub struct JavaToJarBuilder {
    java: JavaConfig,
}

impl JavaToJarBuilder {
    pub fn new(java: JavaConfig) -> Self {
        Self { java }
    }

    /// Directory the classes are compiled into: `class` next to the jar
    pub fn class_dir(archive: &Path) -> PathBuf {
        archive
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join("class")
    }

    fn archive(emission: &Emission) -> BuildResult<&Path> {
        emission
            .primary_target()
            .ok_or_else(|| BuildError::InvalidTarget("JavaToJar has no archive target".to_string()))
    }

    fn java_sources(emission: &Emission) -> Vec<&Path> {
        emission
            .source_paths()
            .into_iter()
            .filter(|p| p.extension().and_then(|s| s.to_str()) == Some("java"))
            .collect()
    }

    fn manifest(emission: &Emission) -> Option<&Path> {
        emission
            .source_paths()
            .into_iter()
            .find(|p| p.file_name().and_then(|n| n.to_str()) == Some(MANIFEST_FILE_NAME))
    }

    /// `javac` invocation compiling every Java source into the class dir
    ///
    /// `-bootclasspath`, `-classpath` and `-sourcepath` are only passed when
    /// configured.
    pub fn javac_command(&self, emission: &Emission) -> BuildResult<CommandLine> {
        let class_dir = Self::class_dir(Self::archive(emission)?);

        let mut command = CommandLine::new(&self.java.javac)
            .args(self.java.javacflags.iter().cloned())
            .args(flag_args("-bootclasspath", &self.java.bootclasspath, None))
            .args(flag_args("-classpath", &self.java.classpath, None))
            .args(flag_args("-sourcepath", &self.java.sourcepath, None))
            .arg("-d")
            .path_arg(&class_dir);

        for source in Self::java_sources(emission) {
            command = command.path_arg(source);
        }

        Ok(command)
    }

    /// `jar` invocation packing the class dir, with the manifest if any
    pub fn jar_command(&self, emission: &Emission) -> BuildResult<CommandLine> {
        let archive = Self::archive(emission)?;
        let class_dir = Self::class_dir(archive);
        let manifest = Self::manifest(emission);

        let mut command = CommandLine::new(&self.java.jar)
            .arg(if manifest.is_some() { "cfm" } else { "cf" })
            .path_arg(archive);
        if let Some(manifest) = manifest {
            command = command.path_arg(manifest);
        }

        Ok(command.arg("-C").path_arg(&class_dir).arg("."))
    }
}

impl Builder for JavaToJarBuilder {
    fn name(&self) -> &'static str {
        "JavaToJar"
    }

    fn emit(&self, targets: Vec<Node>, sources: Vec<Node>) -> BuildResult<Emission> {
        if targets.len() != 1 {
            return Err(BuildError::InvalidTarget(
                "JavaToJar needs exactly one archive!".to_string(),
            ));
        }
        let archive = match &targets[0] {
            Node::File(path) | Node::Entry(path) => path.clone(),
            other => {
                return Err(BuildError::wrong_kind(
                    other.path().map(Path::to_path_buf).unwrap_or_default(),
                    "file",
                ))
            }
        };

        let manifests: Vec<Node> = sources
            .iter()
            .filter(|s| s.is_file_like() && s.file_name() == Some(MANIFEST_FILE_NAME))
            .map(|s| Node::file(s.path().unwrap_or_else(|| Path::new(""))))
            .collect();
        if manifests.len() > 1 {
            return Err(BuildError::invalid_source(
                "JavaToJar",
                manifests[1].to_string(),
                format!("is a second manifest for `{}`", archive.display()),
            ));
        }

        let mut emitted_sources = find_files(&sources, "java");
        emitted_sources.extend(manifests);

        Ok(Emission::new(vec![Node::File(archive)], emitted_sources))
    }

    fn display(&self, _emission: &Emission) -> String {
        String::new()
    }

    fn execute(&self, emission: &Emission, executor: &mut dyn Executor) -> BuildResult<()> {
        let class_dir = Self::class_dir(Self::archive(emission)?);
        let javac = self.javac_command(emission)?;
        let jar = self.jar_command(emission)?;

        executor.create_dir(&class_dir)?;
        executor.execute(&javac)?;
        executor.execute(&jar)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn emission(sources: &[&str]) -> Emission {
        Emission::new(
            vec![Node::file("out/app.jar")],
            sources.iter().map(|s| Node::file(*s)).collect(),
        )
    }

    #[test]
    fn test_class_dir() {
        assert_eq!(
            JavaToJarBuilder::class_dir(Path::new("out/app.jar")),
            PathBuf::from("out/class")
        );
        assert_eq!(
            JavaToJarBuilder::class_dir(Path::new("app.jar")),
            PathBuf::from("class")
        );
    }

    #[test]
    fn test_javac_command_minimal() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        let command = builder
            .javac_command(&emission(&["src/A.java", "src/B.java", "META-INF/MANIFEST.MF"]))
            .unwrap();
        assert_eq!(command.render(), "javac -d out/class src/A.java src/B.java");
    }

    #[test]
    fn test_javac_command_with_paths() {
        let builder = JavaToJarBuilder::new(JavaConfig {
            javacflags: strings(&["-encoding", "utf8"]),
            bootclasspath: strings(&["lib/rt.jar"]),
            classpath: strings(&["lib/a.jar", "lib/b.jar"]),
            sourcepath: strings(&["src"]),
            ..Default::default()
        });
        let command = builder.javac_command(&emission(&["src/A.java"])).unwrap();
        assert_eq!(
            command.render(),
            "javac -encoding utf8 -bootclasspath lib/rt.jar -classpath lib/a.jar:lib/b.jar \
             -sourcepath src -d out/class src/A.java"
        );
    }

    #[test]
    fn test_jar_command_with_manifest() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        let command = builder
            .jar_command(&emission(&["A.java", "META-INF/MANIFEST.MF"]))
            .unwrap();
        assert_eq!(
            command.render(),
            "jar cfm out/app.jar META-INF/MANIFEST.MF -C out/class ."
        );
    }

    #[test]
    fn test_jar_command_without_manifest() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        let command = builder.jar_command(&emission(&["A.java"])).unwrap();
        assert_eq!(command.render(), "jar cf out/app.jar -C out/class .");
    }

    #[test]
    fn test_emit_drops_unrelated_sources() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        let emitted = builder
            .emit(
                vec![Node::entry("out/app.jar")],
                vec![
                    Node::file("A.java"),
                    Node::file("README"),
                    Node::file("MANIFEST.MF"),
                ],
            )
            .unwrap();

        assert_eq!(emitted.targets, vec![Node::file("out/app.jar")]);
        assert_eq!(
            emitted.sources,
            vec![Node::file("A.java"), Node::file("MANIFEST.MF")]
        );
    }

    #[test]
    fn test_emit_rejects_second_manifest() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        let err = builder
            .emit(
                vec![Node::file("out/app.jar")],
                vec![Node::file("a/MANIFEST.MF"), Node::file("b/MANIFEST.MF")],
            )
            .unwrap_err();
        assert!(err.is_fatal());
        assert_eq!(
            err.to_string(),
            "JavaToJar source `b/MANIFEST.MF` is a second manifest for `out/app.jar`"
        );
    }

    #[test]
    fn test_emit_requires_single_archive() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        assert!(builder.emit(Vec::new(), vec![Node::file("A.java")]).is_err());
        assert!(builder
            .emit(vec![Node::dir("out")], vec![Node::file("A.java")])
            .is_err());
    }

    #[test]
    fn test_display_is_empty() {
        let builder = JavaToJarBuilder::new(JavaConfig::default());
        assert_eq!(builder.display(&emission(&["A.java"])), "");
    }
}
