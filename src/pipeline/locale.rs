//! Localized source selection.

use crate::deck::DeckEntry;
use std::{
    fs, io,
    path::{Path, PathBuf},
};

/// Which file a cycle should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceChoice {
    /// `deck.md`, or an existing `locales/<code>.md`.
    Ready(PathBuf),
    /// A locale was requested whose file does not exist yet.
    MissingLocale { localized: PathBuf, primary: PathBuf },
}

/// Pick the source file for `entry`.
///
/// A locale override only applies when it differs from the manifest's own
/// locale; the locales directory is not touched otherwise.
pub fn resolve_source(entry: &DeckEntry) -> SourceChoice {
    let Some(code) = entry.locale.as_deref() else {
        return SourceChoice::Ready(entry.source_path.clone());
    };
    if entry.manifest.locale.as_deref() == Some(code) {
        return SourceChoice::Ready(entry.source_path.clone());
    }

    let localized = entry.locale_source(code);
    if localized.is_file() {
        SourceChoice::Ready(localized)
    } else {
        SourceChoice::MissingLocale {
            localized,
            primary: entry.source_path.clone(),
        }
    }
}

/// Seed `localized` with a verbatim copy of `primary`.
pub fn create_locale_file(primary: &Path, localized: &Path) -> io::Result<()> {
    if let Some(parent) = localized.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::copy(primary, localized).map(|_| ())
}
