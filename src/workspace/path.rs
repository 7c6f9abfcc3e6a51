//! Workspace path helpers
//!
//! Folder paths start and end with `/` (root is exactly `/`). File paths are
//! their folder's path followed by the file name. Containment is decided
//! segment by segment, never by raw string prefix, so `/abc/` does not
//! contain `/abcdef/x.js`.

use crate::error::{ClassroomError, ClassroomResult};

/// Path separator
pub const SEPARATOR: char = '/';

/// Root folder path
pub const ROOT: &str = "/";

/// Check that a single file or folder name is usable
pub fn validate_name(name: &str) -> ClassroomResult<()> {
    if name.is_empty() {
        return Err(ClassroomError::invalid_name(name, "name is empty"));
    }
    if name.contains(SEPARATOR) {
        return Err(ClassroomError::invalid_name(name, "name contains '/'"));
    }
    if name == "." || name == ".." {
        return Err(ClassroomError::invalid_name(name, "reserved name"));
    }
    Ok(())
}

/// Normalize a folder path to `/a/b/` form
///
/// Accepts `a/b`, `/a/b`, `a/b/` and collapses repeated separators.
pub fn normalize_folder(path: &str) -> ClassroomResult<String> {
    let segments = segments(path);
    for segment in &segments {
        if *segment == "." || *segment == ".." {
            return Err(ClassroomError::invalid_path(path, "relative segments are not allowed"));
        }
    }
    Ok(join_folder(&segments))
}

/// Build a folder path from its segments
pub fn join_folder(segments: &[&str]) -> String {
    let mut path = String::from(ROOT);
    for segment in segments {
        path.push_str(segment);
        path.push(SEPARATOR);
    }
    path
}

/// Non-empty segments of a path
pub fn segments(path: &str) -> Vec<&str> {
    path.split(SEPARATOR).filter(|s| !s.is_empty()).collect()
}

/// Parent folder of a folder path; `None` for root
pub fn parent_folder(folder_path: &str) -> Option<String> {
    let segments = segments(folder_path);
    let (_, parents) = segments.split_last()?;
    Some(join_folder(parents))
}

/// Folder containing a file path
pub fn file_folder(file_path: &str) -> String {
    match file_path.rfind(SEPARATOR) {
        Some(index) => file_path[..=index].to_string(),
        None => ROOT.to_string(),
    }
}

/// Replace the last segment of a file path
pub fn with_file_name(file_path: &str, name: &str) -> String {
    format!("{}{}", file_folder(file_path), name)
}

/// Whether `path` is `folder` itself or lies anywhere beneath it
pub fn is_within(folder: &str, path: &str) -> bool {
    let folder = segments(folder);
    let path = segments(path);
    path.len() >= folder.len() && path.iter().zip(&folder).all(|(a, b)| a == b)
}
