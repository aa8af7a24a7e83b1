//! URL to filesystem path resolution.

use crate::publish::INDEX_FILE;
use percent_encoding::percent_decode_str;
use std::{
    borrow::Cow,
    path::{Path, PathBuf},
};

/// Resolve a request URL to a file under `serve_root`.
///
/// Rejects `..` segments and anything whose canonical path leaves the
/// root (symlinks included). Directories resolve to their `index.html`.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url);
    if clean.split(['/', '\\']).any(|segment| segment == "..") {
        return None;
    }

    let canonical = serve_root.join(&clean).canonicalize().ok()?;
    let root = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }
    let index = canonical.join(INDEX_FILE);
    (canonical.is_dir() && index.is_file()).then_some(index)
}

/// Strip query and fragment, percent-decode, trim slashes.
fn normalize_url(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .unwrap_or(Cow::Borrowed(""));
    decoded.trim_matches('/').to_string()
}
