//! Java packaging and manifest tests
//!
//! Runs the `JavaToJar` and `Manifest` builders end to end, through the
//! registry, against recorded and real (fake toolchain) executors.

use oft_build::{
    run_jar, BuildError, Builder, BuilderRegistry, Config, JavaConfig, JavaToJarBuilder,
    ManifestBuilder, Node, ProcessExecutor, RecordingExecutor,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Create a project with the given files
fn create_project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (file_path, content) in files {
        let full_path = dir.path().join(file_path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }
    dir
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ============================================================================
// JavaToJar
// ============================================================================

#[test]
fn test_packaging_example_with_manifest() {
    let builder = JavaToJarBuilder::new(JavaConfig::default());
    let emission = builder
        .emit(
            vec![Node::file("out/app.jar")],
            vec![
                Node::file("A.java"),
                Node::file("B.java"),
                Node::file("MANIFEST.MF"),
            ],
        )
        .unwrap();

    let mut executor = RecordingExecutor::new();
    builder.execute(&emission, &mut executor).unwrap();

    assert_eq!(executor.directories, vec![PathBuf::from("out/class")]);
    assert_eq!(
        executor.rendered(),
        vec![
            "javac -d out/class A.java B.java",
            "jar cfm out/app.jar MANIFEST.MF -C out/class .",
        ]
    );
}

#[test]
fn test_packaging_example_without_manifest() {
    let builder = JavaToJarBuilder::new(JavaConfig::default());
    let emission = builder
        .emit(
            vec![Node::file("out/app.jar")],
            vec![Node::file("A.java"), Node::file("B.java")],
        )
        .unwrap();

    let jar = builder.jar_command(&emission).unwrap();
    assert_eq!(jar.args[0], "cf");
    assert!(!jar.render().contains("MANIFEST"));
}

#[test]
fn test_sources_discovered_in_directories() {
    let project = create_project(&[
        ("src/org/example/App.java", "class App {}"),
        ("src/org/example/util/Strings.java", "class Strings {}"),
        ("src/org/example/notes.txt", "not java"),
        ("META-INF/MANIFEST.MF", "Manifest-Version: 1.0\n"),
    ]);
    let root = project.path();

    let builder = JavaToJarBuilder::new(JavaConfig::default());
    let emission = builder
        .emit(
            vec![Node::entry(root.join("out/app.jar"))],
            vec![
                Node::entry(root.join("src")),
                Node::entry(root.join("META-INF/MANIFEST.MF")),
            ],
        )
        .unwrap();

    assert_eq!(
        emission.sources,
        vec![
            Node::file(root.join("src/org/example/App.java")),
            Node::file(root.join("src/org/example/util/Strings.java")),
            Node::file(root.join("META-INF/MANIFEST.MF")),
        ]
    );

    let javac = builder.javac_command(&emission).unwrap();
    assert_eq!(javac.args.len(), 4);
    assert_eq!(javac.args[0], "-d");
    assert_eq!(PathBuf::from(&javac.args[1]), root.join("out/class"));
}

#[test]
fn test_configured_flags_reach_javac() {
    let config = Config {
        java: JavaConfig {
            classpath: strings(&["lib/a.jar", "lib/b.jar"]),
            ..Default::default()
        }
        .with_default_flags(),
        ..Default::default()
    };
    let registry = BuilderRegistry::from_config(&config).unwrap();
    let mut executor = RecordingExecutor::new();

    registry
        .build(
            "JavaToJar",
            vec![Node::file("out/app.jar")],
            vec![Node::file("Main.java")],
            &mut executor,
        )
        .unwrap();

    assert_eq!(
        executor.rendered()[0],
        "javac -encoding utf8 -Xlint:deprecation -Xlint:unchecked \
         -classpath lib/a.jar:lib/b.jar -d out/class Main.java"
    );
}

#[test]
fn test_compile_failure_skips_packaging() {
    let builder = JavaToJarBuilder::new(JavaConfig::default());
    let emission = builder
        .emit(vec![Node::file("out/app.jar")], vec![Node::file("A.java")])
        .unwrap();
    let mut executor = RecordingExecutor::new().with_failing_program("javac");

    let err = builder.execute(&emission, &mut executor).unwrap_err();

    assert!(matches!(err, BuildError::CommandFailed { .. }));
    assert_eq!(executor.commands.len(), 1);
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    let mut permissions = fs::metadata(path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions).unwrap();
}

#[cfg(unix)]
#[test]
fn test_packaging_with_fake_toolchain() {
    let project = create_project(&[("src/App.java", "class App {}")]);
    let root = project.path();

    // javac: touch a class file in the directory following -d
    let javac = root.join("fake-javac");
    write_script(
        &javac,
        r#"while [ "$#" -gt 0 ]; do
  if [ "$1" = "-d" ]; then touch "$2/App.class"; fi
  shift
done"#,
    );
    // jar: record the arguments as the archive contents
    let jar = root.join("fake-jar");
    write_script(&jar, r#"echo "$@" > "$2""#);

    let builder = JavaToJarBuilder::new(JavaConfig {
        javac: javac.display().to_string(),
        jar: jar.display().to_string(),
        ..Default::default()
    });
    let emission = builder
        .emit(
            vec![Node::file(root.join("out/app.jar"))],
            vec![Node::dir(root.join("src"))],
        )
        .unwrap();

    let mut executor = ProcessExecutor::new();
    builder.execute(&emission, &mut executor).unwrap();

    assert!(root.join("out/class/App.class").is_file());
    let archive = fs::read_to_string(root.join("out/app.jar")).unwrap();
    assert!(archive.starts_with("cf "));
    let expected_tail = format!("-C {} .", root.join("out/class").display());
    assert!(archive.trim_end().ends_with(&expected_tail));
}

// ============================================================================
// Manifest
// ============================================================================

#[test]
fn test_manifest_example() {
    let builder = ManifestBuilder::new()
        .with_main_class("App")
        .with_classpath(["a.jar", "b.jar"]);
    assert_eq!(
        builder.content(),
        "Manifest-Version: 1.0\nMain-Class: App\nClass-Path: a.jar b.jar\n"
    );

    let builder = ManifestBuilder::new().with_classpath(["a.jar", "b.jar"]);
    assert_eq!(
        builder.content(),
        "Manifest-Version: 1.0\nClass-Path: a.jar b.jar\n"
    );
}

#[test]
fn test_manifest_then_jar_through_registry() {
    let project = create_project(&[("src/App.java", "class App {}")]);
    let root = project.path();

    let mut config = Config::default();
    config.manifest.mainclass = Some("App".to_string());
    config.java.classpath = strings(&["lib/dep.jar"]);
    let registry = BuilderRegistry::from_config(&config).unwrap();
    let mut executor = RecordingExecutor::new();

    let manifest = registry
        .build(
            "Manifest",
            vec![Node::entry(root.join("build/META-INF/MANIFEST"))],
            Vec::new(),
            &mut executor,
        )
        .unwrap();
    let manifest_path = manifest.primary_target().unwrap().to_path_buf();

    assert_eq!(manifest_path, root.join("build/META-INF/MANIFEST.MF"));
    assert!(!manifest_path.exists());
    assert_eq!(executor.directories, vec![root.join("build/META-INF")]);
    assert_eq!(
        executor.files,
        vec![(
            manifest_path.clone(),
            "Manifest-Version: 1.0\nMain-Class: App\nClass-Path: lib/dep.jar\n".to_string()
        )]
    );

    let jar = registry
        .build(
            "JavaToJar",
            vec![Node::file(root.join("build/app.jar"))],
            vec![Node::dir(root.join("src")), Node::file(&manifest_path)],
            &mut executor,
        )
        .unwrap();
    assert_eq!(jar.sources.len(), 2);
    assert!(executor.rendered().last().unwrap().contains(" cfm "));
}

#[cfg(unix)]
#[test]
fn test_manifest_then_jar_in_working_dir() {
    let project = create_project(&[("src/App.java", "class App {}")]);
    let root = project.path();

    let javac = root.join("fake-javac");
    write_script(
        &javac,
        r#"while [ "$#" -gt 0 ]; do
  if [ "$1" = "-d" ]; then touch "$2/App.class"; fi
  shift
done"#,
    );
    let jar = root.join("fake-jar");
    write_script(&jar, r#"echo "$@" > "$2""#);

    let mut config = Config::default();
    config.manifest.mainclass = Some("App".to_string());
    config.java.javac = javac.display().to_string();
    config.java.jar = jar.display().to_string();
    let registry = BuilderRegistry::from_config(&config).unwrap();
    let mut executor = ProcessExecutor::new().with_working_dir(root);

    let manifest = registry
        .build(
            "Manifest",
            vec![Node::entry("build/META-INF/MANIFEST")],
            Vec::new(),
            &mut executor,
        )
        .unwrap();
    let manifest_path = manifest.primary_target().unwrap().to_path_buf();
    assert_eq!(manifest_path, PathBuf::from("build/META-INF/MANIFEST.MF"));
    assert_eq!(
        fs::read_to_string(root.join(&manifest_path)).unwrap(),
        "Manifest-Version: 1.0\nMain-Class: App\nClass-Path: \n"
    );

    // Sources are discovered from the caller's side, so they are absolute
    registry
        .build(
            "JavaToJar",
            vec![Node::file("build/app.jar")],
            vec![Node::dir(root.join("src")), Node::file(&manifest_path)],
            &mut executor,
        )
        .unwrap();

    assert!(root.join("build/class/App.class").is_file());
    let archive = fs::read_to_string(root.join("build/app.jar")).unwrap();
    assert_eq!(
        archive.trim_end(),
        "cfm build/app.jar build/META-INF/MANIFEST.MF -C build/class ."
    );
}

// ============================================================================
// RunJar
// ============================================================================

#[test]
fn test_run_jar_pseudo_target() {
    let run = run_jar(&JavaConfig::default(), Path::new("/srv/app.jar"), ["-v"]).unwrap();
    let mut executor = RecordingExecutor::new();

    run.run(&mut executor).unwrap();

    assert_eq!(run.name, "run_jar_file");
    assert_eq!(executor.rendered(), vec!["java -jar /srv/app.jar -v"]);
}
