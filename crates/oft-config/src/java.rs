//! Java toolchain settings
//!
//! Mirrors the construction variables the Java builders read: the program
//! names for `java`, `javac` and `jar`, the extra `javac` flags, and the
//! boot class-path, class-path and source-path lists.

use serde::{Deserialize, Serialize};

/// Flags every `javac` invocation gets unless they are already configured
pub const DEFAULT_JAVAC_FLAGS: [&str; 4] =
    ["-encoding", "utf8", "-Xlint:deprecation", "-Xlint:unchecked"];

/// Java toolchain configuration (`[java]` in oft.toml)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields, default)]
pub struct JavaConfig {
    /// Java launcher used to run jars and the infuser (default: "java")
    pub java: String,

    /// Java compiler (default: "javac")
    pub javac: String,

    /// Archiver (default: "jar")
    pub jar: String,

    /// Extra compiler flags, passed through verbatim
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub javacflags: Vec<String>,

    /// Entries for `-bootclasspath`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bootclasspath: Vec<String>,

    /// Entries for `-classpath`; also the manifest's fallback class-path
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub classpath: Vec<String>,

    /// Entries for `-sourcepath`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sourcepath: Vec<String>,
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            java: "java".to_string(),
            javac: "javac".to_string(),
            jar: "jar".to_string(),
            javacflags: Vec::new(),
            bootclasspath: Vec::new(),
            classpath: Vec::new(),
            sourcepath: Vec::new(),
        }
    }
}

impl JavaConfig {
    /// Append the default `javac` flags that are not configured yet
    pub fn with_default_flags(mut self) -> Self {
        append_unique(&mut self.javacflags, DEFAULT_JAVAC_FLAGS);
        self
    }
}

/// Append each value that `list` does not already contain
///
/// Membership is checked per element, so `["-encoding", "utf8"]` appended to
/// a list already holding `-encoding` only adds `utf8`.
pub fn append_unique<I, S>(list: &mut Vec<String>, values: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for value in values {
        let value = value.into();
        if !list.contains(&value) {
            list.push(value);
        }
    }
}
