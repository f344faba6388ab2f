//! Optional `javac` path flags
//!
//! A flag such as `-classpath` is only passed when there is something to put
//! after it. Values are joined with `:`.

/// Arguments for `flag`, or nothing when there are no values and no default
///
/// A non-empty `default` is used verbatim when `values` is empty.
pub fn flag_args(flag: &str, values: &[String], default: Option<&str>) -> Vec<String> {
    if !values.is_empty() {
        vec![flag.to_string(), values.join(":")]
    } else {
        match default {
            Some(default) if !default.is_empty() => vec![flag.to_string(), default.to_string()],
            _ => Vec::new(),
        }
    }
}

/// Same as [`flag_args`], rendered as `" <flag> <values>"` or `""`
pub fn flag_if_not_empty(flag: &str, values: &[String], default: Option<&str>) -> String {
    let args = flag_args(flag, values, default);
    if args.is_empty() {
        String::new()
    } else {
        format!(" {}", args.join(" "))
    }
}
