//! Best-effort asset mirroring.

use crate::log;
use jwalk::WalkDir;
use std::{
    fs,
    path::{Path, PathBuf},
    thread::{self, JoinHandle},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetMirrorError {
    #[error("cannot copy `{}` to `{}`", .from.display(), .to.display())]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot walk `{}`: {message}", .dir.display())]
    Walk { dir: PathBuf, message: String },

    #[error("asset mirror thread panicked")]
    Panicked,
}

/// Background copy of a deck's `assets/` directory.
#[derive(Debug)]
pub struct AssetMirror {
    handle: JoinHandle<Result<usize, AssetMirrorError>>,
}

impl AssetMirror {
    /// Copy `from` into `to` on a separate thread; failures are logged there.
    pub fn spawn(from: PathBuf, to: PathBuf) -> Self {
        let handle = thread::spawn(move || {
            let result = copy_tree(&from, &to);
            match &result {
                Ok(copied) => crate::debug!("assets"; "mirrored {} file(s) to {}", copied, to.display()),
                Err(e) => log!("assets"; "{}", e),
            }
            result
        });
        Self { handle }
    }

    /// Wait for the copy; returns the number of files written.
    pub fn wait(self) -> Result<usize, AssetMirrorError> {
        self.handle
            .join()
            .map_err(|_| AssetMirrorError::Panicked)?
    }
}

/// Recursively copy `from` into `to`, skipping files that are already current.
///
/// Returns the number of files copied.
pub fn copy_tree(from: &Path, to: &Path) -> Result<usize, AssetMirrorError> {
    let copy_err = |from: &Path, to: &Path, source| AssetMirrorError::Copy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    fs::create_dir_all(to).map_err(|e| copy_err(from, to, e))?;

    let mut copied = 0;
    for entry in WalkDir::new(from).sort(true).skip_hidden(false) {
        let entry = entry.map_err(|e| AssetMirrorError::Walk {
            dir: from.to_path_buf(),
            message: e.to_string(),
        })?;
        let source = entry.path();
        let Ok(rel) = source.strip_prefix(from) else {
            continue;
        };
        if rel.as_os_str().is_empty() {
            continue;
        }
        let target = to.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| copy_err(&source, &target, e))?;
        } else if entry.file_type().is_file() && !is_current(&source, &target) {
            fs::copy(&source, &target).map_err(|e| copy_err(&source, &target, e))?;
            copied += 1;
        }
    }
    Ok(copied)
}

/// Target exists with the same length and is at least as new as the source.
fn is_current(source: &Path, target: &Path) -> bool {
    let (Ok(src), Ok(dst)) = (fs::metadata(source), fs::metadata(target)) else {
        return false;
    };
    match (src.modified(), dst.modified()) {
        (Ok(s), Ok(d)) => src.len() == dst.len() && d >= s,
        _ => false,
    }
}
