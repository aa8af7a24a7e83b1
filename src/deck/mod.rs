//! Deck discovery.
//!
//! A deck is a directory holding a `deck.md` source and a `package.json`
//! manifest, with optional `locales/<code>.md` variants and an `assets/` dir.
//!
//! ```text
//! scan(root) -> ScanReport { catalog, skipped } -> select() -> DeckEntry
//! ```

pub mod manifest;
mod scan;
mod select;

pub use manifest::{MANIFEST_FILE, Manifest, ManifestError};
pub use scan::scan;
pub use select::{DeckSelector, PromptSelector, Selection, select};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Primary source file name.
pub const DECK_FILE: &str = "deck.md";
/// Directory holding localized variants of the source.
pub const LOCALES_DIR: &str = "locales";
/// Directory holding static assets mirrored next to the served HTML.
pub const ASSETS_DIR: &str = "assets";

/// Failures that stop the `run` command before anything is rendered.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("doesn't exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no decks found in {}", .root.display())]
    EmptyCatalog { root: PathBuf, skipped: usize },
}

/// One discoverable presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckEntry {
    /// Absolute path of `deck.md`.
    pub source_path: PathBuf,
    /// The deck's root directory.
    pub parent_dir: PathBuf,
    pub manifest: Manifest,
    /// Locale requested for this session (`run --locale`).
    pub locale: Option<String>,
}

impl DeckEntry {
    pub fn new(source_path: PathBuf, parent_dir: PathBuf, manifest: Manifest) -> Self {
        Self {
            source_path,
            parent_dir,
            manifest,
            locale: None,
        }
    }

    /// Attach the session's locale override.
    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale.filter(|l| !l.trim().is_empty());
        self
    }

    pub fn assets_dir(&self) -> PathBuf {
        self.parent_dir.join(ASSETS_DIR)
    }

    /// `<parentDir>/locales/<code>.md`
    pub fn locale_source(&self, code: &str) -> PathBuf {
        self.parent_dir.join(LOCALES_DIR).join(format!("{code}.md"))
    }

    /// Deck root relative to `base`, for log lines.
    pub fn display_path(&self, base: &Path) -> String {
        self.source_path
            .strip_prefix(base)
            .unwrap_or(&self.source_path)
            .display()
            .to_string()
    }
}

/// Decks ordered by manifest `filename`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<DeckEntry>,
}

impl Catalog {
    /// Wrap entries that are already sorted.
    pub(crate) fn new(entries: Vec<DeckEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DeckEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DeckEntry> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<DeckEntry> {
        self.entries
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn entry(filename: &str) -> DeckEntry {
        let dir = PathBuf::from("/decks").join(filename);
        DeckEntry::new(
            dir.join(DECK_FILE),
            dir,
            Manifest {
                filename: filename.into(),
                title: format!("Title {filename}"),
                description: "d".into(),
                author: None,
                locale: None,
                theme: None,
            },
        )
    }

    #[test]
    fn test_locale_source() {
        let deck = entry("intro");
        assert_eq!(
            deck.locale_source("de"),
            PathBuf::from("/decks/intro/locales/de.md")
        );
        assert_eq!(deck.assets_dir(), PathBuf::from("/decks/intro/assets"));
    }

    #[test]
    fn test_blank_locale_is_none() {
        assert_eq!(entry("a").with_locale(Some("  ".into())).locale, None);
        assert_eq!(
            entry("a").with_locale(Some("de".into())).locale.as_deref(),
            Some("de")
        );
    }

    #[test]
    fn test_display_path() {
        let deck = entry("intro");
        assert_eq!(deck.display_path(Path::new("/decks")), "intro/deck.md");
        assert_eq!(deck.display_path(Path::new("/other")), "/decks/intro/deck.md");
    }
}
