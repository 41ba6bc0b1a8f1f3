//! Conversions between document uris and file system paths.

use camino::Utf8Path;
use camino::Utf8PathBuf;
use url::Url;

/// Convert a `file://` URL to a [`Utf8PathBuf`].
///
/// Handles percent-encoding and Windows drive letters. Non-`file` schemes and
/// paths that are not valid UTF-8 yield `None`.
#[must_use]
pub fn url_to_path(url: &Url) -> Option<Utf8PathBuf> {
    if url.scheme() != "file" {
        return None;
    }

    let path = percent_encoding::percent_decode_str(url.path())
        .decode_utf8()
        .ok()?;

    #[cfg(windows)]
    let path = {
        // Remove leading '/' for paths like /C:/...
        path.strip_prefix('/').unwrap_or(&path).to_string()
    };

    Some(Utf8PathBuf::from(&*path))
}

/// Convert an absolute [`Utf8Path`] to a `file://` URL.
#[must_use]
pub fn path_to_url(path: &Utf8Path) -> Option<Url> {
    if !path.is_absolute() {
        return None;
    }
    Url::from_file_path(path.as_std_path()).ok()
}

/// Key under which a document uri is stored in the managed document table.
///
/// `Url` parsing already lowercases the scheme and host; on top of that
/// trailing separators are trimmed, and on case-insensitive platforms the
/// whole string is lowercased so differently cased spellings of one file
/// collapse to one key.
#[must_use]
pub fn normalize_uri(url: &Url) -> String {
    let mut key = url.as_str().to_string();

    let minimum = key.len() - url.path().len() + 1;
    while key.len() > minimum && key.ends_with('/') {
        key.pop();
    }

    if cfg!(any(windows, target_os = "macos")) {
        key = key.to_lowercase();
    }

    key
}
