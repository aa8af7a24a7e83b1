//! Filesystem actor.
//!
//! Every relevant notify event becomes exactly one [`PublishMsg::Changed`];
//! there is no debouncing.

use super::messages::PublishMsg;
use crate::utils::path::{is_temp_file, normalize_path};
use notify::{
    Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher,
    event::ModifyKind,
};
use std::{
    fmt,
    path::{Path, PathBuf},
    sync::mpsc as std_mpsc,
};
use tokio::sync::mpsc;

type NotifyResult = notify::Result<Event>;

/// A live recursive subscription. Dropping it stops the watch.
pub struct WatchHandle {
    root: PathBuf,
    _watcher: RecommendedWatcher,
}

impl WatchHandle {
    /// Start watching `root` recursively, forwarding raw events to `tx`.
    pub fn watch(root: &Path, tx: std_mpsc::Sender<NotifyResult>) -> notify::Result<Self> {
        let mut watcher = notify::recommended_watcher(move |res| {
            let _ = tx.send(res);
        })?;
        watcher.watch(root, RecursiveMode::Recursive)?;

        Ok(Self {
            root: root.to_path_buf(),
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl fmt::Debug for WatchHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatchHandle").field("root", &self.root).finish()
    }
}

/// Turns notify events into publish requests.
pub struct FsActor {
    notify_rx: std_mpsc::Receiver<NotifyResult>,
    publish_tx: mpsc::Sender<PublishMsg>,
}

impl FsActor {
    pub fn new(notify_rx: std_mpsc::Receiver<NotifyResult>, publish_tx: mpsc::Sender<PublishMsg>) -> Self {
        Self {
            notify_rx,
            publish_tx,
        }
    }

    /// Run until the watch handle is dropped or the PublishActor goes away.
    pub async fn run(self) {
        let notify_rx = self.notify_rx;
        let publish_tx = self.publish_tx;
        let (async_tx, mut async_rx) = mpsc::channel::<Event>(64);

        // notify is sync; bridge it onto the runtime
        std::thread::spawn(move || {
            while let Ok(result) = notify_rx.recv() {
                match result {
                    Ok(event) => {
                        if async_tx.blocking_send(event).is_err() {
                            break;
                        }
                    }
                    Err(e) => crate::log!("watch"; "notify error: {}", e),
                }
            }
        });

        while let Some(event) = async_rx.recv().await {
            let Some(paths) = relevant_paths(&event) else {
                continue;
            };
            for path in &paths {
                crate::debug!("watch"; "{:?}: {}", event.kind, path.display());
            }
            if publish_tx.send(PublishMsg::Changed { paths }).await.is_err() {
                break;
            }
        }
        crate::debug!("watch"; "stopped");
    }
}

/// Paths of an event worth a publish cycle, or `None` to ignore it.
///
/// Access and metadata-only events are dropped, as are events that only
/// touch editor swap/backup files.
pub fn relevant_paths(event: &Event) -> Option<Vec<PathBuf>> {
    match event.kind {
        EventKind::Access(_) | EventKind::Modify(ModifyKind::Metadata(_)) => return None,
        _ => {}
    }

    let paths: Vec<PathBuf> = event
        .paths
        .iter()
        .filter(|p| !is_temp_file(p))
        .map(|p| normalize_path(p))
        .collect();

    (!paths.is_empty() || event.paths.is_empty()).then_some(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, MetadataKind};
    use std::{fs, time::Duration};
    use tempfile::TempDir;

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    #[test]
    fn test_content_change_is_relevant() {
        let ev = event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            "/decks/intro/deck.md",
        );
        assert_eq!(
            relevant_paths(&ev),
            Some(vec![PathBuf::from("/decks/intro/deck.md")])
        );

        let ev = event(EventKind::Create(CreateKind::File), "/decks/intro/assets/a.png");
        assert!(relevant_paths(&ev).is_some());
    }

    #[test]
    fn test_access_and_metadata_ignored() {
        let ev = event(EventKind::Access(AccessKind::Any), "/decks/intro/deck.md");
        assert_eq!(relevant_paths(&ev), None);

        let ev = event(
            EventKind::Modify(ModifyKind::Metadata(MetadataKind::WriteTime)),
            "/decks/intro/deck.md",
        );
        assert_eq!(relevant_paths(&ev), None);
    }

    #[test]
    fn test_temp_files_ignored() {
        for name in ["deck.md.swp", "deck.md~", "4913", ".#deck.md"] {
            let ev = event(
                EventKind::Create(CreateKind::File),
                &format!("/decks/intro/{name}"),
            );
            assert_eq!(relevant_paths(&ev), None, "{name}");
        }

        // a rename pairing a temp file with the real one still counts
        let ev = Event::new(EventKind::Modify(ModifyKind::Any))
            .add_path(PathBuf::from("/decks/intro/deck.md.tmp"))
            .add_path(PathBuf::from("/decks/intro/deck.md"));
        assert_eq!(
            relevant_paths(&ev),
            Some(vec![PathBuf::from("/decks/intro/deck.md")])
        );
    }

    #[tokio::test]
    async fn test_edit_sends_changed() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().canonicalize().unwrap();
        fs::write(root.join("deck.md"), "# one").unwrap();

        let (notify_tx, notify_rx) = std_mpsc::channel();
        let handle = WatchHandle::watch(&root, notify_tx).unwrap();
        assert_eq!(handle.root(), root);

        let (publish_tx, mut publish_rx) = mpsc::channel(16);
        let actor = tokio::spawn(FsActor::new(notify_rx, publish_tx).run());

        fs::write(root.join("deck.md"), "# two").unwrap();

        let msg = tokio::time::timeout(Duration::from_secs(5), publish_rx.recv())
            .await
            .expect("no change event");
        assert!(matches!(msg, Some(PublishMsg::Changed { .. })));

        // dropping the handle ends the actor
        drop(handle);
        tokio::time::timeout(Duration::from_secs(5), actor)
            .await
            .unwrap()
            .unwrap();
    }
}
