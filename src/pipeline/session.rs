use crate::{actor::fs::WatchHandle, deck::DeckEntry};
use parking_lot::{Mutex, MutexGuard};
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::SystemTime,
};

/// State of one live preview: the selected deck and everything that
/// changes while it is being watched.
///
/// Owned by the `run` command and shared with the actors behind an `Arc`.
/// The connected browser client is not kept here: the `WsActor` holds it
/// in its `ReloadChannel`.
#[derive(Debug)]
pub struct RenderSession {
    entry: DeckEntry,
    /// Bumped at the start of every cycle; only the newest cycle commits.
    generation: AtomicU64,
    commit: Mutex<()>,
    last_rendered_at: Mutex<Option<SystemTime>>,
    watch: Mutex<Option<WatchHandle>>,
}

impl RenderSession {
    pub fn new(entry: DeckEntry) -> Self {
        Self {
            entry,
            generation: AtomicU64::new(0),
            commit: Mutex::new(()),
            last_rendered_at: Mutex::new(None),
            watch: Mutex::new(None),
        }
    }

    pub fn entry(&self) -> &DeckEntry {
        &self.entry
    }

    /// Claim a new generation for a cycle that is about to start.
    pub fn begin_cycle(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation() == generation
    }

    /// Serializes the check-then-rename at the end of a cycle.
    pub(crate) fn lock_commit(&self) -> MutexGuard<'_, ()> {
        self.commit.lock()
    }

    pub(crate) fn mark_rendered(&self) {
        *self.last_rendered_at.lock() = Some(SystemTime::now());
    }

    pub fn last_rendered_at(&self) -> Option<SystemTime> {
        *self.last_rendered_at.lock()
    }

    /// Install the session's file watcher, stopping any previous one first.
    pub fn attach_watch(&self, handle: WatchHandle) {
        let mut slot = self.watch.lock();
        drop(slot.take());
        *slot = Some(handle);
    }

    /// Stop watching.
    pub fn detach_watch(&self) -> bool {
        self.watch.lock().take().is_some()
    }

    pub fn is_watching(&self) -> bool {
        self.watch.lock().is_some()
    }
}
