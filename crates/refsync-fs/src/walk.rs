//! Candidate-file enumeration for the input paths.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Expands each input path into candidate files: files pass through,
/// directories are walked (recursively, or top-level only when `recurse` is
/// false). Paths that do not exist are logged and skipped.
pub fn collect_files(paths: &[PathBuf], recurse: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            walk_dir(path, recurse, &mut files);
        } else {
            tracing::warn!(path = %path.display(), "input path does not exist, skipping");
        }
    }
    files
}

fn walk_dir(dir: &Path, recurse: bool, files: &mut Vec<PathBuf>) {
    let max_depth = if recurse { usize::MAX } else { 1 };
    for entry in WalkDir::new(dir).max_depth(max_depth) {
        match entry {
            Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) => tracing::warn!(dir = %dir.display(), error = %e, "walk error, skipping entry"),
        }
    }
}
