//! Lexical path helpers.
//!
//! Manifests written on Windows use `\` in `Include` attributes, so both
//! separators are accepted everywhere. Nothing here touches the disk.

use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

static DRIVE_OR_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z]+:(\\|/)").expect("static pattern is valid"));

/// Returns `true` if `path` is drive-letter or scheme absolute (`C:\..`,
/// `file:/..`) or absolute on the current platform.
#[must_use]
pub fn is_absolute(path: &str) -> bool {
    DRIVE_OR_SCHEME.is_match(path) || Path::new(path).is_absolute()
}

/// Folds `.` and `..` segments and unifies separators.
///
/// `..` never climbs above the root or drive prefix.
#[must_use]
pub fn normalize(path: &str) -> PathBuf {
    let unified = unify_separators(path);
    let mut out = PathBuf::new();
    let mut depth = 0usize;
    for component in Path::new(&unified).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                if depth > 0 {
                    out.pop();
                    depth -= 1;
                }
            }
            Component::Normal(part) => {
                out.push(part);
                depth += 1;
            }
        }
    }
    out
}

/// Resolves a reference `include` against the directory of `project_path`.
#[must_use]
pub fn resolve_include(project_path: &Path, include: &str) -> PathBuf {
    let include = include.trim();
    if is_absolute(include) {
        return normalize(include);
    }
    let dir = project_path.parent().unwrap_or(project_path);
    let joined = format!("{}/{}", dir.display(), include);
    normalize(&joined)
}

#[cfg(windows)]
fn unify_separators(path: &str) -> String {
    path.replace('/', "\\")
}

#[cfg(not(windows))]
fn unify_separators(path: &str) -> String {
    path.replace('\\', "/")
}
