//! Source file discovery

use crate::targets::Node;
use std::path::Path;
use walkdir::WalkDir;

/// Collect files with `extension` from `sources`
///
/// Directories are searched recursively, in file name order. Files are kept
/// when their extension matches; everything else is dropped.
pub fn find_files(sources: &[Node], extension: &str) -> Vec<Node> {
    let mut found = Vec::new();

    for source in sources {
        let Some(path) = source.path() else {
            continue;
        };

        if matches!(source, Node::Dir(_)) || path.is_dir() {
            for entry in WalkDir::new(path)
                .follow_links(false)
                .sort_by_file_name()
                .into_iter()
                .filter_map(|e| e.ok())
            {
                if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                    found.push(Node::file(entry.path()));
                }
            }
        } else if has_extension(path, extension) {
            found.push(Node::file(path));
        }
    }

    found
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some(extension)
}
