//! Lexical path helpers shared by the sourcemap index and the resolver.
//!
//! Nothing in here touches the file system: module names are compared as
//! strings, so every real path has to be brought into one canonical spelling
//! before it is used as a map key.

use camino::Utf8Component;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use directories::BaseDirs;

use crate::SCRIPT_EXTENSIONS;

/// Remove `.` segments and fold `..` segments into their parent.
///
/// Adapted from the `path-clean` crate, <https://github.com/danreeves/path-clean>,
/// Copyright (c) 2018 Dan Reeves, used under the MIT license.
///
/// `..` directly under the root is dropped, `..` at the start of a relative
/// path is kept. An empty result becomes `.`.
#[must_use]
pub fn normalize_path(path: &Utf8Path) -> Utf8PathBuf {
    let mut out: Vec<Utf8Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Utf8Component::CurDir => {}
            Utf8Component::ParentDir => match out.last() {
                Some(Utf8Component::RootDir | Utf8Component::Prefix(_)) => {}
                Some(Utf8Component::Normal(_)) => {
                    out.pop();
                }
                None | Some(Utf8Component::CurDir | Utf8Component::ParentDir) => {
                    out.push(component);
                }
            },
            other => out.push(other),
        }
    }

    if out.is_empty() {
        Utf8PathBuf::from(".")
    } else {
        out.iter().map(Utf8Component::as_str).collect()
    }
}

/// Expand a leading `~` to the current user's home directory.
///
/// Paths without a leading `~`, or hosts without a home directory, are
/// returned unchanged.
#[must_use]
pub fn expand_home(path: &str) -> Utf8PathBuf {
    let rest = match path.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(['/', '\\']) => rest,
        _ => return Utf8PathBuf::from(path),
    };

    let home = BaseDirs::new()
        .and_then(|dirs| Utf8PathBuf::from_path_buf(dirs.home_dir().to_path_buf()).ok());

    match home {
        Some(home) => home.join(rest.trim_start_matches(['/', '\\'])),
        None => Utf8PathBuf::from(path),
    }
}

/// Whether the path ends in one of the Luau source extensions.
#[must_use]
pub fn has_script_extension(path: &Utf8Path) -> bool {
    path.extension()
        .is_some_and(|ext| SCRIPT_EXTENSIONS.contains(&ext))
}

/// Whether the path names an `init.luau` / `init.lua` directory module.
#[must_use]
pub fn is_init_file(path: &Utf8Path) -> bool {
    has_script_extension(path) && path.file_stem() == Some("init")
}

/// `path` relative to `base` when it lives underneath it.
#[must_use]
pub fn relative_to<'a>(path: &'a Utf8Path, base: &Utf8Path) -> Option<&'a Utf8Path> {
    path.strip_prefix(base)
        .ok()
        .filter(|relative| !relative.as_str().is_empty())
}
