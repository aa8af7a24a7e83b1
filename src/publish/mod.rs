//! Artifact publisher.
//!
//! Writes the rendered deck to `<serving-root>/index.html` and mirrors the
//! deck's `assets/` beside it.
//!
//! ```text
//! stage(html)  -> .index.html.<tag>.tmp   (banner + html, fsync'd)
//! commit()     -> rename over index.html  (readers never see a partial file)
//! mirror()     -> background copy of assets/, best-effort
//! ```

mod assets;

pub use assets::AssetMirror;

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Served file name inside the serving root.
pub const INDEX_FILE: &str = "index.html";

/// Non-rendering notice prepended to every published page.
pub const BANNER: &str = "<!-- Generated by ponyshow. Do not edit: this file is overwritten on every change to the deck source. -->\n";

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("cannot write `{}`", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PublishError {
    fn write(path: &Path, source: std::io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Writes artifacts into one fixed serving root.
#[derive(Debug, Clone)]
pub struct Publisher {
    serve_root: PathBuf,
}

impl Publisher {
    pub fn new(serve_root: impl Into<PathBuf>) -> Self {
        Self {
            serve_root: serve_root.into(),
        }
    }

    pub fn serve_root(&self) -> &Path {
        &self.serve_root
    }

    pub fn index_path(&self) -> PathBuf {
        self.serve_root.join(INDEX_FILE)
    }

    /// Write `BANNER + html` to a private temp file, flushed to disk.
    ///
    /// `tag` keeps concurrently staged cycles apart.
    pub fn stage(&self, html: &str, tag: u64) -> Result<Staged, PublishError> {
        fs::create_dir_all(&self.serve_root)
            .map_err(|e| PublishError::write(&self.serve_root, e))?;

        let tmp = self.serve_root.join(format!(".{INDEX_FILE}.{tag}.tmp"));
        let write = || -> std::io::Result<()> {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&tmp)?;
            file.write_all(BANNER.as_bytes())?;
            file.write_all(html.as_bytes())?;
            file.flush()?;
            file.sync_all()
        };

        if let Err(e) = write() {
            let _ = fs::remove_file(&tmp);
            return Err(PublishError::write(&tmp, e));
        }

        Ok(Staged {
            tmp,
            target: self.index_path(),
        })
    }

    /// Stage and commit in one go.
    pub fn publish(&self, html: &str) -> Result<PathBuf, PublishError> {
        self.stage(html, 0)?.commit()
    }

    /// Start mirroring `deck_assets` into `<serving-root>/assets` in the background.
    ///
    /// Returns `None` when the deck has no assets directory.
    pub fn mirror_assets(&self, deck_assets: &Path) -> Option<AssetMirror> {
        deck_assets
            .is_dir()
            .then(|| AssetMirror::spawn(deck_assets.to_path_buf(), self.serve_root.join("assets")))
    }
}

/// A fully written artifact waiting to replace `index.html`.
#[derive(Debug)]
#[must_use = "a staged artifact is published only by `commit`"]
pub struct Staged {
    tmp: PathBuf,
    target: PathBuf,
}

impl Staged {
    /// Atomically replace `index.html` with the staged file.
    pub fn commit(self) -> Result<PathBuf, PublishError> {
        fs::rename(&self.tmp, &self.target).map_err(|e| {
            let _ = fs::remove_file(&self.tmp);
            PublishError::write(&self.target, e)
        })?;
        Ok(self.target)
    }

    /// Drop the staged file without publishing it.
    pub fn discard(self) {
        let _ = fs::remove_file(&self.tmp);
    }
}
