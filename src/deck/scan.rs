//! Recursive deck discovery.

use super::{Catalog, DeckEntry, DECK_FILE, LocateError, Manifest, ManifestError};
use crate::{debug, log};
use jwalk::WalkDir;
use std::{cmp::Ordering, path::Path};

/// Result of a successful scan: the sorted catalog plus the decks left out.
#[derive(Debug)]
pub struct ScanReport {
    pub catalog: Catalog,
    /// Decks whose manifest failed to load.
    pub skipped: Vec<ManifestError>,
}

/// Scan `root` for deck directories.
///
/// A malformed manifest only drops that deck. Fails with `NotFound` when
/// `root` is missing and `EmptyCatalog` when no valid deck was found.
pub fn scan(root: &Path) -> Result<ScanReport, LocateError> {
    if !root.is_dir() {
        return Err(LocateError::NotFound(root.to_path_buf()));
    }

    let mut entries = Vec::new();
    let mut skipped = Vec::new();

    for entry in WalkDir::new(root).sort(true).skip_hidden(false) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                log!("scan"; "skipping unreadable path: {}", err);
                continue;
            }
        };
        if !entry.file_type().is_file() || entry.file_name() != DECK_FILE {
            continue;
        }

        let source_path = entry.path();
        if is_hidden(root, &source_path) {
            continue;
        }
        let Some(parent_dir) = source_path.parent().map(Path::to_path_buf) else {
            continue;
        };

        match Manifest::load(&parent_dir) {
            Ok(manifest) => {
                debug!("scan"; "found {}", source_path.display());
                entries.push(DeckEntry::new(source_path, parent_dir, manifest));
            }
            Err(err) => {
                log!("error"; "{}: {}", err, source_error(&err));
                skipped.push(err);
            }
        }
    }

    sort_entries(&mut entries);

    if entries.is_empty() {
        return Err(LocateError::EmptyCatalog {
            root: root.to_path_buf(),
            skipped: skipped.len(),
        });
    }

    Ok(ScanReport {
        catalog: Catalog::new(entries),
        skipped,
    })
}

/// Whether any component below `root` is a dotfile (`.git`, `.cache`, ...).
fn is_hidden(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| c.as_os_str().to_string_lossy().starts_with('.'))
}

fn source_error(err: &ManifestError) -> String {
    match err {
        ManifestError::Io(_, e) => e.to_string(),
        ManifestError::Parse(_, e) => e.to_string(),
    }
}

/// Sort by manifest `filename`, then source path for a stable order.
fn sort_entries(entries: &mut [DeckEntry]) {
    entries.sort_by(|a, b| {
        locale_compare(&a.manifest.filename, &b.manifest.filename)
            .then_with(|| a.source_path.cmp(&b.source_path))
    });
}

/// Locale-aware string ordering.
///
/// Accents and case are folded first (`Émile` sorts with `emile`), the raw
/// strings only break ties.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let fold = |s: &str| deunicode::deunicode(s).to_lowercase();
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn write_deck(root: &Path, dir: &str, filename: &str) -> PathBuf {
        let deck = root.join(dir);
        fs::create_dir_all(&deck).unwrap();
        fs::write(deck.join(DECK_FILE), format!("# {filename}")).unwrap();
        fs::write(
            deck.join("package.json"),
            format!(r#"{{"filename":"{filename}","title":"T {filename}","description":"d"}}"#),
        )
        .unwrap();
        deck
    }

    fn write_broken_deck(root: &Path, dir: &str) {
        let deck = root.join(dir);
        fs::create_dir_all(&deck).unwrap();
        fs::write(deck.join(DECK_FILE), "# broken").unwrap();
        fs::write(deck.join("package.json"), "{ not json").unwrap();
    }

    fn filenames(report: &ScanReport) -> Vec<&str> {
        report
            .catalog
            .iter()
            .map(|e| e.manifest.filename.as_str())
            .collect()
    }

    #[test]
    fn test_valid_and_malformed() {
        let temp = TempDir::new().unwrap();
        write_deck(temp.path(), "b", "zebra");
        write_deck(temp.path(), "nested/deeper/a", "apple");
        write_deck(temp.path(), "c", "Mango");
        write_broken_deck(temp.path(), "broken");
        write_broken_deck(temp.path(), "nested/broken");

        let report = scan(temp.path()).unwrap();
        assert_eq!(report.catalog.len(), 3);
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(filenames(&report), vec!["apple", "Mango", "zebra"]);
    }

    #[test]
    fn test_manifest_missing_is_skipped() {
        let temp = TempDir::new().unwrap();
        write_deck(temp.path(), "ok", "ok");
        let lonely = temp.path().join("lonely");
        fs::create_dir_all(&lonely).unwrap();
        fs::write(lonely.join(DECK_FILE), "# alone").unwrap();

        let report = scan(temp.path()).unwrap();
        assert_eq!(filenames(&report), vec!["ok"]);
        assert!(matches!(report.skipped[0], ManifestError::Io(..)));
    }

    #[test]
    fn test_entry_paths() {
        let temp = TempDir::new().unwrap();
        let deck = write_deck(temp.path(), "intro", "intro");

        let report = scan(temp.path()).unwrap();
        let entry = &report.catalog.entries()[0];
        assert_eq!(entry.parent_dir, deck);
        assert_eq!(entry.source_path, deck.join(DECK_FILE));
        assert_eq!(entry.locale, None);
    }

    #[test]
    fn test_directories_without_deck_ignored() {
        let temp = TempDir::new().unwrap();
        let other = temp.path().join("notes");
        fs::create_dir_all(&other).unwrap();
        fs::write(other.join("readme.md"), "hi").unwrap();
        fs::write(
            other.join("package.json"),
            r#"{"filename":"x","title":"x","description":"x"}"#,
        )
        .unwrap();

        assert!(matches!(
            scan(temp.path()),
            Err(LocateError::EmptyCatalog { skipped: 0, .. })
        ));
    }

    #[test]
    fn test_empty_dir_is_empty_catalog_not_not_found() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            scan(temp.path()),
            Err(LocateError::EmptyCatalog { .. })
        ));
    }

    #[test]
    fn test_only_malformed_is_empty_catalog() {
        let temp = TempDir::new().unwrap();
        write_broken_deck(temp.path(), "broken");
        assert!(matches!(
            scan(temp.path()),
            Err(LocateError::EmptyCatalog { skipped: 1, .. })
        ));
    }

    #[test]
    fn test_hidden_dirs_skipped() {
        let temp = TempDir::new().unwrap();
        write_deck(temp.path(), "visible", "visible");
        write_deck(temp.path(), ".git/hooks", "hidden");

        let report = scan(temp.path()).unwrap();
        assert_eq!(filenames(&report), vec!["visible"]);
    }

    #[test]
    fn test_missing_root() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope");
        assert!(matches!(scan(&missing), Err(LocateError::NotFound(p)) if p == missing));
    }

    #[test]
    fn test_stable_across_scans() {
        let temp = TempDir::new().unwrap();
        // identical filenames, order falls back to path
        write_deck(temp.path(), "two", "same");
        write_deck(temp.path(), "one", "same");
        write_deck(temp.path(), "three", "alpha");

        let first: Vec<_> = scan(temp.path())
            .unwrap()
            .catalog
            .iter()
            .map(|e| e.source_path.clone())
            .collect();
        for _ in 0..3 {
            let again: Vec<_> = scan(temp.path())
                .unwrap()
                .catalog
                .iter()
                .map(|e| e.source_path.clone())
                .collect();
            assert_eq!(first, again);
        }
        assert!(first[1].ends_with("one/deck.md"));
    }

    #[test]
    fn test_locale_compare() {
        assert_eq!(locale_compare("apple", "Banana"), Ordering::Less);
        assert_eq!(locale_compare("Émile", "emma"), Ordering::Less);
        assert_eq!(locale_compare("zoe", "Émile"), Ordering::Greater);
        assert_ne!(locale_compare("a", "A"), Ordering::Equal);
    }
}
