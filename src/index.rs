// index.rs
use crate::entry::PathEntry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

/// The central, concurrently-accessed catalog of every non-ignored path
/// beneath a `FileSystem`'s root.
///
/// Backed by a `DashMap` so many readers and the single watcher writer
/// never contend on one global lock. The ordered listing view required
/// by `list`/`glob` is derived on demand by collecting and sorting keys
/// rather than kept incrementally sorted: the documented workload is
/// read-heavy enough that paying a sort per query beats maintaining a
/// second always-sorted structure under every mutation.
pub struct PathIndex {
    entries: DashMap<String, PathEntry>,
    generation: AtomicU64,
    ready: AtomicBool,
    ready_lock: Mutex<()>,
    ready_cond: Condvar,
}

impl PathIndex {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            generation: AtomicU64::new(0),
            ready: AtomicBool::new(false),
            ready_lock: Mutex::new(()),
            ready_cond: Condvar::new(),
        }
    }

    /// Inserts or overwrites the entry for `relative_path`, bumping the
    /// generation counter.
    pub fn insert(&self, entry: PathEntry) {
        self.entries.insert(entry.relative_path.clone(), entry);
        self.bump_generation();
    }

    /// Removes the entry for `relative_path`, if present, bumping the
    /// generation counter regardless.
    pub fn remove(&self, relative_path: &str) {
        self.entries.remove(relative_path);
        self.bump_generation();
    }

    /// Clears every entry, e.g. ahead of a full `refresh` rescan.
    pub fn clear(&self) {
        self.entries.clear();
        self.bump_generation();
    }

    pub fn get(&self, relative_path: &str) -> Option<PathEntry> {
        self.entries.get(relative_path).map(|r| r.clone())
    }

    /// Records a freshly-computed binary heuristic for an entry already in
    /// the index. A no-op if the entry has since been removed — the
    /// heuristic is only ever a grep-side optimization, never load-bearing.
    pub fn mark_binary(&self, relative_path: &str, value: bool) {
        if let Some(entry) = self.entries.get(relative_path) {
            entry.set_is_binary(value);
        }
    }

    pub fn contains(&self, relative_path: &str) -> bool {
        self.entries.contains_key(relative_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns every `relative_path`, sorted lexicographically, for
    /// deterministic listing.
    pub fn sorted_paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self.entries.iter().map(|r| r.key().clone()).collect();
        paths.sort_unstable();
        paths
    }

    /// Snapshots every entry matching `predicate`, sorted by
    /// `relative_path`.
    pub fn sorted_entries_where<F>(&self, predicate: F) -> Vec<PathEntry>
    where
        F: Fn(&PathEntry) -> bool,
    {
        let mut matched: Vec<PathEntry> = self
            .entries
            .iter()
            .filter(|r| predicate(r.value()))
            .map(|r| r.value().clone())
            .collect();
        matched.sort_unstable_by(|a, b| a.relative_path.cmp(&b.relative_path));
        matched
    }

    fn bump_generation(&self) {
        self.generation.fetch_add(1, Ordering::Release);
    }

    /// Current generation counter, for callers that want to detect
    /// staleness across two observations.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Marks the initial scan complete and wakes every `wait_ready`
    /// waiter.
    pub fn set_ready(&self) {
        let _guard = self.ready_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.ready.store(true, Ordering::Release);
        self.ready_cond.notify_all();
    }

    /// Clears readiness ahead of a `refresh` rescan.
    pub fn set_not_ready(&self) {
        let _guard = self.ready_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.ready.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    /// Blocks the caller until the index becomes ready or `timeout`
    /// elapses, whichever comes first. Backed by a condvar so waiters
    /// are woken directly on `set_ready` rather than polling in a tight
    /// loop.
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        if self.is_ready() {
            return true;
        }
        let deadline = Instant::now() + timeout;
        self.wait_ready_inner(deadline)
    }

    fn wait_ready_inner(&self, deadline: Instant) -> bool {
        let mut guard = self.ready_lock.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            if self.ready.load(Ordering::Acquire) {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next_guard, timeout_result) = self
                .ready_cond
                .wait_timeout(guard, deadline - now)
                .unwrap_or_else(|e| e.into_inner());
            guard = next_guard;
            if timeout_result.timed_out() && !self.ready.load(Ordering::Acquire) {
                return false;
            }
        }
    }
}

impl Default for PathIndex {
    fn default() -> Self {
        Self::new()
    }
}
