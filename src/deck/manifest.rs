//! Deck manifest (`package.json` next to `deck.md`).

use serde::{Deserialize, Serialize};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Manifest file name expected beside every deck source.
pub const MANIFEST_FILE: &str = "package.json";

/// A deck manifest that failed to load. The entry is dropped from the catalog.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("cannot read manifest `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("malformed manifest `{}`", .0.display())]
    Parse(PathBuf, #[source] serde_json::Error),
}

impl ManifestError {
    pub fn path(&self) -> &Path {
        match self {
            Self::Io(path, _) | Self::Parse(path, _) => path,
        }
    }
}

/// Deck author, either `"Jane <jane@example.com>"` or `{ "name": .., "email": .. }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Author {
    Name(String),
    Detailed {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        email: Option<String>,
    },
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Detailed { name, email: Some(email) } => write!(f, "{name} <{email}>"),
            Self::Detailed { name, email: None } => f.write_str(name),
        }
    }
}

/// Metadata describing one deck.
///
/// Unknown fields (npm's `version`, `repository`, `license`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Short label used for sorting and the selection list.
    pub filename: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Author>,
    /// Locale the primary `deck.md` is written in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Theme reference; falls back to the configured theme.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
}

impl Manifest {
    /// Read and parse the manifest in `deck_dir`.
    pub fn load(deck_dir: &Path) -> Result<Self, ManifestError> {
        let path = deck_dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|err| ManifestError::Io(path.clone(), err))?;
        serde_json::from_str(&content).map_err(|err| ManifestError::Parse(path, err))
    }

    /// Author as display text, empty when absent.
    pub fn author_label(&self) -> String {
        self.author.as_ref().map(ToString::to_string).unwrap_or_default()
    }
}
