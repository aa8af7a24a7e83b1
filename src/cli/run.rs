//! `pony run`: locate a deck, publish it and start the preview session.
//!
//! ```text
//! scan -> select -> first cycle -> bind ws + http -> banner -> serve + watch
//! ```

use super::{args::RunArgs, prompt::confirm};
use crate::{
    actor::{Coordinator, coordinator::CHANNEL_BUFFER},
    config::{AppPaths, Settings},
    deck::{self, DeckEntry, DeckSelector, PromptSelector, Selection},
    log,
    pipeline::{CycleOutcome, Pipeline, RenderSession, create_locale_file},
    publish::Publisher,
    reload,
    render::MarkdownRenderer,
    serve::{self, ServeContext},
};
use anyhow::{Context, Result};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::mpsc;

/// Settings merged with command-line overrides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    pub http: SocketAddr,
    pub ws: SocketAddr,
    pub open_browser: bool,
    pub locale_label: String,
}

impl RunOptions {
    pub fn new(args: &RunArgs, settings: &Settings) -> Self {
        let http_port = args.port.unwrap_or_else(|| settings.http_port());
        let ws_port = args.wsport.unwrap_or(settings.wsport);
        Self {
            http: SocketAddr::new(settings.interface, http_port),
            ws: SocketAddr::new(settings.interface, ws_port),
            open_browser: settings.open_browser && !args.no_open,
            locale_label: args.locale.clone().unwrap_or_else(|| settings.locale.clone()),
        }
    }
}

/// Entry point for `pony run`.
pub fn run_deck(args: &RunArgs, paths: &AppPaths) -> Result<()> {
    paths.ensure()?;
    let settings = Settings::load(&paths.config_file())?;
    let options = RunOptions::new(args, &settings);

    let root = search_root(args.path.as_deref())?;
    let Some(entry) = locate(&root, &mut PromptSelector::stdio())? else {
        return Ok(());
    };
    let entry = entry.with_locale(args.locale.clone());
    crate::debug!("run"; "selected {}", entry.display_path(&root));

    let session = Arc::new(RenderSession::new(entry));
    let pipeline = Pipeline::new(
        Arc::new(MarkdownRenderer),
        Publisher::new(paths.workspace()),
        paths.config_file(),
    );

    // the preview only starts on top of a complete index.html
    match pipeline.run_cycle(&session) {
        CycleOutcome::Published { .. } | CycleOutcome::Superseded => {}
        CycleOutcome::MissingLocale { localized, primary } => {
            return offer_locale_file(&localized, &primary);
        }
        CycleOutcome::Failed(e) => {
            return Err(e).with_context(|| {
                format!("cannot publish {}", session.entry().source_path.display())
            });
        }
    }

    let (ws_tx, ws_rx) = mpsc::channel(CHANNEL_BUFFER);
    let ws_addr = reload::start_ws_server_with_channel(options.ws, ws_tx.clone())?;
    let server = serve::bind(
        options.http.ip(),
        options.http.port(),
        ServeContext {
            serve_root: paths.workspace(),
            ws_port: ws_addr.port(),
        },
    )?;

    let url = server.url();
    serve::print_banner(session.entry(), &options.locale_label, &url);
    if options.open_browser {
        serve::open_browser(&url);
    }

    let coordinator = Coordinator::new(pipeline, session).with_ws_channel(ws_tx, ws_rx);
    server.run(coordinator)
}

/// `PATH` resolved against the current directory.
fn search_root(path: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("cannot read current directory")?;
    Ok(match path {
        Some(p) => cwd.join(p),
        None => cwd,
    })
}

/// Scan `root` and pick a deck. `None` means there is nothing to present;
/// the reason has already been reported.
pub fn locate(root: &Path, selector: &mut dyn DeckSelector) -> Result<Option<DeckEntry>> {
    let report = match deck::scan(root) {
        Ok(report) => report,
        Err(e) => {
            log!("run"; "{}", e);
            return Ok(None);
        }
    };
    if !report.skipped.is_empty() {
        log!("run"; "skipped {} deck(s) with unreadable manifests", report.skipped.len());
    }

    match deck::select(report.catalog, selector)? {
        Selection::Cancelled => {
            log!("run"; "cancelled");
            Ok(None)
        }
        selection => Ok(selection.into_entry()),
    }
}

/// Ask whether to seed a missing locale file from `deck.md`, then stop.
fn offer_locale_file(localized: &Path, primary: &Path) -> Result<()> {
    log!("run"; "file doesn't exist: {}", localized.display());
    if confirm("Create a new language file?")? {
        create_locale_file(primary, localized)
            .with_context(|| format!("cannot create {}", localized.display()))?;
        log!("run"; "file created. You can now localize {}", localized.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Catalog, DECK_FILE, MANIFEST_FILE};
    use std::{fs, io};
    use tempfile::TempDir;

    struct Unreachable;

    impl DeckSelector for Unreachable {
        fn choose(&mut self, _: &Catalog) -> io::Result<Option<usize>> {
            panic!("selector must not be asked");
        }
    }

    struct Cancel;

    impl DeckSelector for Cancel {
        fn choose(&mut self, _: &Catalog) -> io::Result<Option<usize>> {
            Ok(None)
        }
    }

    fn write_deck(root: &Path, name: &str) {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(DECK_FILE), "# hi").unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            format!(r#"{{"filename":"{name}","title":"T","description":"d"}}"#),
        )
        .unwrap();
    }

    #[test]
    fn test_run_options() {
        let settings = Settings::default();
        let args = RunArgs {
            port: Some(3000),
            locale: Some("de".into()),
            no_open: true,
            ..RunArgs::default()
        };
        let options = RunOptions::new(&args, &settings);
        assert_eq!(options.http.port(), 3000);
        assert_eq!(options.ws.port(), 8081);
        assert!(!options.open_browser);
        assert_eq!(options.locale_label, "de");

        let options = RunOptions::new(&RunArgs::default(), &settings);
        assert!(options.open_browser);
        assert_eq!(options.locale_label, "en");
    }

    #[test]
    fn test_locate_missing_root() {
        let temp = TempDir::new().unwrap();
        let found = locate(&temp.path().join("nope"), &mut Unreachable).unwrap();
        assert!(found.is_none());
    }

    #[test]
    fn test_locate_empty_root() {
        let temp = TempDir::new().unwrap();
        assert!(locate(temp.path(), &mut Unreachable).unwrap().is_none());
    }

    #[test]
    fn test_locate_single_deck_auto_selected() {
        let temp = TempDir::new().unwrap();
        write_deck(temp.path(), "intro");

        let entry = locate(temp.path(), &mut Unreachable).unwrap().unwrap();
        assert_eq!(entry.manifest.filename, "intro");
    }

    #[test]
    fn test_locate_cancelled() {
        let temp = TempDir::new().unwrap();
        write_deck(temp.path(), "intro");
        write_deck(temp.path(), "outro");

        assert!(locate(temp.path(), &mut Cancel).unwrap().is_none());
    }

    #[test]
    fn test_search_root() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(search_root(None).unwrap(), cwd);
        assert_eq!(search_root(Some(Path::new("talks"))).unwrap(), cwd.join("talks"));
    }
}
