// watcher/mod.rs
//! Keeps a [`PathIndex`] coherent under bursty filesystem activity.
//!
//! Built directly on `notify`'s recommended watcher rather than a
//! pre-packaged debouncer crate. The common debouncer crates in this
//! ecosystem (`notify-debouncer-mini`) coalesce events down to "this
//! path changed" and discard the event kind, which loses the
//! distinction between a modify and a delete that land in the same
//! window. We need that distinction, so the debounce state machine is
//! hand-rolled here; the thread/channel plumbing otherwise mirrors the
//! dedicated-thread-plus-mpsc style used elsewhere in this codebase's
//! ancestry.

mod pending;

use crate::index::PathIndex;
use crate::indexer::{relative_slash_path, stat_entry, Indexer};
use notify::event::RenameMode;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher as NotifyWatcher};
use pending::{PathChange, PendingSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Runs a debounced `notify` watcher against a root directory, applying
/// coalesced changes to a shared [`PathIndex`].
pub struct FsWatcher {
    join_handle: Option<thread::JoinHandle<()>>,
    shutdown: Arc<AtomicBool>,
    alive: Arc<AtomicBool>,
    // Keeps the OS watcher itself alive for the duration of the thread;
    // dropped (and thus unwatched) only on `stop`.
    _notify_watcher_holder: (),
}

impl FsWatcher {
    /// Spawns the watcher thread. The initial scan must already have
    /// populated `index` (the watcher only applies deltas).
    pub fn spawn(root: PathBuf, index: Arc<PathIndex>, debounce_window: Duration, follow_symlinks: bool) -> notify::Result<Self> {
        let (raw_tx, raw_rx) = mpsc::channel::<notify::Result<Event>>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let alive = Arc::new(AtomicBool::new(true));

        let mut notify_watcher: RecommendedWatcher = notify::recommended_watcher(move |res| {
            let _ = raw_tx.send(res);
        })?;
        notify_watcher.watch(&root, RecursiveMode::Recursive)?;

        let shutdown_for_thread = Arc::clone(&shutdown);
        let alive_for_thread = Arc::clone(&alive);
        let indexer = Indexer::new(follow_symlinks);

        let join_handle = thread::spawn(move || {
            // Move the OS watcher into the thread so it lives exactly as
            // long as the debounce loop does.
            let _notify_watcher = notify_watcher;
            run_debounce_loop(
                &root,
                &index,
                &indexer,
                raw_rx,
                debounce_window,
                &shutdown_for_thread,
            );
            alive_for_thread.store(false, Ordering::Release);
        });

        Ok(Self {
            join_handle: Some(join_handle),
            shutdown,
            alive,
            _notify_watcher_holder: (),
        })
    }

    /// Whether the watcher thread is still running.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Signals the watcher thread to stop and joins it. Best-effort:
    /// any events already queued in the channel are drained before the
    /// thread exits, but no new OS events are observed after the
    /// underlying watcher is dropped.
    pub fn stop(mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for FsWatcher {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Release);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }
}

/// Main body of the watcher thread: owns the per-path `Stable -> Pending
/// -> Applying -> Stable` state machine and the deadline-ordered timer.
fn run_debounce_loop(
    root: &Path,
    index: &Arc<PathIndex>,
    indexer: &Indexer,
    raw_rx: mpsc::Receiver<notify::Result<Event>>,
    debounce_window: Duration,
    shutdown: &Arc<AtomicBool>,
) {
    let mut pending = PendingSet::new();

    loop {
        if shutdown.load(Ordering::Acquire) {
            break;
        }

        let wait = pending.next_deadline_wait(debounce_window);
        match raw_rx.recv_timeout(wait) {
            Ok(Ok(event)) => {
                record_event(root, &event, &mut pending, debounce_window);
            }
            Ok(Err(err)) => {
                tracing::warn!(error = %err, "watcher observed an error event");
            }
            Err(RecvTimeoutError::Timeout) => {
                // fall through to apply any elapsed deadlines below
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }

        for change in pending.take_elapsed() {
            apply_change(root, index, indexer, change);
        }
    }

    // Best-effort drain: apply whatever had already arrived before shutdown.
    while let Ok(Ok(event)) = raw_rx.try_recv() {
        record_event(root, &event, &mut pending, debounce_window);
    }
    for change in pending.take_all() {
        apply_change(root, index, indexer, change);
    }
}

/// Maps one raw `notify::Event` onto the per-path pending set. A rename
/// event carrying both its source and destination path is split into a
/// remove on the old path and a create on the new one, preserving kind
/// instead of collapsing to a generic "changed".
fn record_event(root: &Path, event: &Event, pending: &mut PendingSet, debounce_window: Duration) {
    match &event.kind {
        EventKind::Create(_) => {
            for path in &event.paths {
                pending.record(path.clone(), PathChange::Upsert, debounce_window);
            }
        }
        EventKind::Modify(notify::event::ModifyKind::Name(RenameMode::Both)) if event.paths.len() == 2 => {
            pending.record(event.paths[0].clone(), PathChange::Remove, debounce_window);
            pending.record(event.paths[1].clone(), PathChange::Upsert, debounce_window);
        }
        EventKind::Modify(notify::event::ModifyKind::Name(_)) => {
            // Single-sided rename notification; ambiguous without the
            // pair, so stat-and-reconcile each path individually.
            for path in &event.paths {
                pending.record(path.clone(), PathChange::Upsert, debounce_window);
            }
        }
        EventKind::Modify(_) => {
            for path in &event.paths {
                pending.record(path.clone(), PathChange::Upsert, debounce_window);
            }
        }
        EventKind::Remove(_) => {
            for path in &event.paths {
                pending.record(path.clone(), PathChange::Remove, debounce_window);
            }
        }
        EventKind::Any | EventKind::Access(_) | EventKind::Other => {
            for path in &event.paths {
                pending.record(path.clone(), PathChange::Rescan, debounce_window);
            }
            if event.paths.is_empty() {
                pending.record(root.to_path_buf(), PathChange::Rescan, debounce_window);
            }
        }
    }
}

/// Applies one coalesced change to the index: create/modify re-stats
/// and inserts, remove deletes, rescan walks the containing directory.
/// A failing stat is treated as "does not exist" and the path is
/// removed, matching the failure policy in the component design.
fn apply_change(root: &Path, index: &Arc<PathIndex>, indexer: &Indexer, change: (PathBuf, PathChange)) {
    let (path, kind) = change;
    match kind {
        PathChange::Upsert => {
            let Some(relative) = relative_slash_path(root, &path) else {
                return;
            };
            match stat_entry(root, &path) {
                Some(entry) => index.insert(entry),
                None => index.remove(&relative),
            }
        }
        PathChange::Remove => {
            if let Some(relative) = relative_slash_path(root, &path) {
                index.remove(&relative);
            }
        }
        PathChange::Rescan => {
            let dir = if path.is_dir() {
                path
            } else {
                path.parent().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf())
            };
            indexer.rescan_directory(root, &dir, index);
        }
    }
}
