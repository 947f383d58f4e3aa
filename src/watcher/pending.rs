// watcher/pending.rs
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// The kind of change coalesced for a path, applied once its debounce
/// deadline elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathChange {
    /// Create or modify: re-stat and insert/update.
    Upsert,
    /// Delete or rename-out: remove the entry.
    Remove,
    /// Overflow or otherwise unclear: rescan the containing directory.
    Rescan,
}

impl PathChange {
    /// Later-observed kinds take priority within one debounce window,
    /// except that a pending `Rescan` is never downgraded by a plain
    /// upsert/remove observed afterward — a directory-level rescan
    /// already subsumes any single-path kind.
    fn coalesce(self, incoming: PathChange) -> PathChange {
        if self == PathChange::Rescan {
            self
        } else {
            incoming
        }
    }
}

struct Entry {
    kind: PathChange,
    deadline: Instant,
}

/// Per-path debounce state: `Stable` paths have no entry here; a path
/// enters `Pending` on its first event and is returned by
/// `take_elapsed` once its deadline passes, which is the `Applying`
/// step from the caller's point of view. Events recorded for a path
/// while it isn't present here (because it was just popped) naturally
/// create a fresh `Pending` entry, satisfying "events observed during
/// application accumulate into a new pending".
pub struct PendingSet {
    paths: HashMap<PathBuf, Entry>,
    timers: BinaryHeap<Reverse<(Instant, PathBuf)>>,
}

impl PendingSet {
    pub fn new() -> Self {
        Self {
            paths: HashMap::new(),
            timers: BinaryHeap::new(),
        }
    }

    /// Records an observed event for `path`, extending its deadline and
    /// coalescing its kind with whatever was already pending.
    pub fn record(&mut self, path: PathBuf, kind: PathChange, debounce_window: Duration) {
        let deadline = Instant::now() + debounce_window;
        let entry = self.paths.entry(path.clone()).or_insert(Entry { kind, deadline });
        entry.kind = entry.kind.coalesce(kind);
        entry.deadline = deadline;
        self.timers.push(Reverse((deadline, path)));
    }

    /// How long the caller should block on the event channel before
    /// re-checking for elapsed deadlines: the time until the nearest
    /// deadline, or `debounce_window` itself if nothing is pending (an
    /// arbitrary idle wait, since nothing is scheduled).
    pub fn next_deadline_wait(&self, idle_wait: Duration) -> Duration {
        match self.timers.peek() {
            Some(Reverse((deadline, _))) => deadline.saturating_duration_since(Instant::now()),
            None => idle_wait,
        }
    }

    /// Removes and returns every path whose deadline has elapsed,
    /// together with its coalesced kind. Stale heap entries (superseded
    /// by a later `record` for the same path) are discarded here by
    /// comparing against the path's current deadline.
    pub fn take_elapsed(&mut self) -> Vec<(PathBuf, PathChange)> {
        let now = Instant::now();
        let mut ready = Vec::new();
        while let Some(Reverse((deadline, _))) = self.timers.peek() {
            if *deadline > now {
                break;
            }
            let Reverse((deadline, path)) = self.timers.pop().unwrap();
            let Some(current) = self.paths.get(&path) else {
                continue;
            };
            if current.deadline != deadline {
                // stale heap entry; the live one is still scheduled
                continue;
            }
            let entry = self.paths.remove(&path).expect("checked above");
            ready.push((path, entry.kind));
        }
        ready
    }

    /// Drains every still-pending path regardless of deadline, used
    /// during best-effort shutdown drain.
    pub fn take_all(&mut self) -> Vec<(PathBuf, PathChange)> {
        self.timers.clear();
        self.paths.drain().map(|(path, entry)| (path, entry.kind)).collect()
    }
}
