//! Lexical path helpers shared by the listing and the file operations.
//!
//! None of these touch the filesystem. Listing lines are always relative
//! names, so joining never lets a name escape upwards past the root.

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};

/// Join a listing name onto a directory.
///
/// Leading separators on `name` are ignored, `.` segments are dropped and
/// `..` pops one segment (never above the root). The result carries no
/// trailing separator.
pub fn join(dir: &Path, name: &str) -> PathBuf {
    let relative = name.trim_start_matches(is_separator);
    normalize(&dir.join(relative))
}

/// Lexically normalize a path: resolve `.` and `..` without touching the disk.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                // pop() is a no-op at the root, which is exactly what we want
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Parent directory, or the path itself at the filesystem root.
pub fn dirname(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => path.to_path_buf(),
    }
}

/// Final path segment, empty at the root.
pub fn basename(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Remove a single trailing separator from a listing line.
pub fn strip_trailing_slash(line: &str) -> &str {
    line.strip_suffix('/')
        .or_else(|| line.strip_suffix(MAIN_SEPARATOR))
        .unwrap_or(line)
}

/// Whether a user-entered name asks for a directory.
pub fn has_trailing_separator(name: &str) -> bool {
    name.ends_with('/') || name.ends_with(MAIN_SEPARATOR)
}

fn is_separator(c: char) -> bool {
    c == '/' || c == MAIN_SEPARATOR
}
