// lib.rs
// `deny`, not `forbid`: the mmap-backed line reader (C7) needs one
// `unsafe` block (`Mmap::map` can't promise the backing file won't be
// truncated out from under us — the same race any concurrent
// reader/writer pair already tolerates under §5) and annotates it with
// a scoped `#[allow(unsafe_code)]`, which `forbid` would reject outright.
#![deny(unsafe_code)]

#[cfg(feature = "async")]
pub mod asyncfs;
pub mod editor;
pub mod entry;
pub mod error;
pub mod grep;
pub mod index;
pub mod indexer;
pub mod options;
pub mod patterns;
pub mod reader;
pub mod watcher;
pub mod windows;
pub mod writer;

pub use crate::entry::{FileMetadata, PathEntry, SearchResult};
pub use crate::error::{FsError, FsResult};
pub use crate::options::{FileSystemOptions, FileSystemOptionsBuilder};
pub use crate::patterns::Patterns;

use crate::index::PathIndex;
use crate::indexer::Indexer;
use crate::watcher::FsWatcher;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// In-process filesystem accelerator: a live, watched [`PathIndex`] with
/// glob, grep, and batch I/O fanned out over it.
///
/// Construction starts the initial recursive scan on a background thread
/// and, if requested, a debounced watcher thread that keeps the index
/// coherent thereafter. Every other operation here is a blocking call —
/// the async façade ([`asyncfs::FileSystemAsync`], behind the `async`
/// feature) is a thin `spawn_blocking` wrapper around this type, not an
/// independent implementation.
pub struct FileSystem {
    root: PathBuf,
    index: Arc<PathIndex>,
    indexer: Indexer,
    watcher: Mutex<Option<FsWatcher>>,
    options: FileSystemOptions,
    closed: AtomicBool,
}

impl FileSystem {
    /// Opens `root`, starting the initial scan immediately and, per
    /// `options.auto_watch`, a background watcher. `root` must already
    /// exist and be a directory.
    pub fn open(root: impl AsRef<Path>, options: FileSystemOptions) -> FsResult<Self> {
        let root = root.as_ref();
        let metadata = fs::metadata(root).map_err(|_| FsError::InvalidRoot(root.to_path_buf()))?;
        if !metadata.is_dir() {
            return Err(FsError::InvalidRoot(root.to_path_buf()));
        }
        let root = root.canonicalize().unwrap_or_else(|_| root.to_path_buf());

        let index = Arc::new(PathIndex::new());
        let indexer = Indexer::new(options.follow_symlinks);

        {
            let index = Arc::clone(&index);
            let scan_root = root.clone();
            let follow_symlinks = options.follow_symlinks;
            thread::spawn(move || {
                Indexer::new(follow_symlinks).scan(&scan_root, &index);
            });
        }

        let watcher = if options.auto_watch {
            match FsWatcher::spawn(root.clone(), Arc::clone(&index), options.debounce_window, options.follow_symlinks) {
                Ok(watcher) => Some(watcher),
                Err(err) => {
                    tracing::warn!(error = %err, "failed to start watcher, continuing without one");
                    None
                }
            }
        } else {
            None
        };

        Ok(Self {
            root,
            index,
            indexer,
            watcher: Mutex::new(watcher),
            options,
            closed: AtomicBool::new(false),
        })
    }

    /// Convenience constructor: `auto_watch: true`, otherwise default
    /// options.
    pub fn open_default(root: impl AsRef<Path>) -> FsResult<Self> {
        Self::open(
            root,
            FileSystemOptions {
                auto_watch: true,
                ..FileSystemOptions::default()
            },
        )
    }

    /// Blocks until the initial scan completes or `timeout` elapses,
    /// whichever comes first. Returns whether the index is ready.
    pub fn wait_ready(&self, timeout: Duration) -> bool {
        self.index.wait_ready(timeout)
    }

    pub fn is_ready(&self) -> bool {
        self.index.is_ready()
    }

    /// Whether the watcher thread is alive. Always `false` if
    /// `auto_watch` was `false` or the watcher failed to start.
    pub fn is_watching(&self) -> bool {
        self.watcher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(FsWatcher::is_alive)
    }

    /// Lists entries whose `relative_path` matches `pattern`, sorted
    /// lexicographically. `only_files` excludes directory entries.
    pub fn list(&self, pattern: &str, only_files: bool) -> FsResult<Vec<String>> {
        self.ensure_open()?;
        let patterns = Patterns::compile(pattern)?;
        Ok(self
            .index
            .sorted_entries_where(|e| (!only_files || !e.is_dir) && patterns.is_match(&e.relative_path))
            .into_iter()
            .map(|e| e.relative_path)
            .collect())
    }

    /// `list(pattern, only_files: true)`.
    pub fn glob(&self, pattern: &str) -> FsResult<Vec<String>> {
        self.list(pattern, true)
    }

    /// Reads an entire file as UTF-8. `encoding` is accepted for
    /// interface parity with the reference implementation; only UTF-8 is
    /// actually decoded (spec.md §9).
    pub fn read_file(&self, path: &str, _encoding: &str) -> FsResult<String> {
        self.ensure_open()?;
        let (_, absolute) = self.resolve(path)?;
        reader::read_file(&absolute)
    }

    /// Reads many paths in parallel. Failures (missing, permission,
    /// decode) are omitted from the result rather than failing the call.
    pub fn read_batch<S: AsRef<str>>(&self, paths: &[S]) -> FsResult<HashMap<String, String>> {
        self.ensure_open()?;
        let items: Vec<(String, PathBuf)> = paths.iter().filter_map(|p| self.resolve(p.as_ref()).ok()).collect();
        Ok(reader::read_batch(&items))
    }

    /// Lines `[start_line, start_line + count)`, 0-indexed, half-open.
    /// `count = None` reads to end-of-file.
    pub fn read_lines(&self, path: &str, start_line: usize, count: Option<usize>) -> FsResult<Vec<String>> {
        self.ensure_open()?;
        let (_, absolute) = self.resolve(path)?;
        reader::read_lines(&absolute, start_line, count, self.options.mmap_threshold_bytes)
    }

    /// Reads up to `limit` bytes starting at `offset`. An offset at or
    /// beyond end-of-file yields an empty string, not an error.
    pub fn read_file_range(&self, path: &str, offset: u64, limit: u64) -> FsResult<String> {
        self.ensure_open()?;
        let (_, absolute) = self.resolve(path)?;
        reader::read_file_range(&absolute, offset, limit)
    }

    /// Atomic write: temp file in the target's directory, fsync, rename
    /// onto the target. The rename is the commit point.
    pub fn write_file(&self, path: &str, content: &str) -> FsResult<bool> {
        self.ensure_open()?;
        let (_, absolute) = self.resolve(path)?;
        writer::Writer::write_atomic(&absolute, content)
    }

    /// Direct write: truncate, write, close. No fsync, no temp file;
    /// lossy on crash.
    pub fn write_file_fast(&self, path: &str, content: &str) -> FsResult<bool> {
        self.ensure_open()?;
        let (_, absolute) = self.resolve(path)?;
        writer::Writer::write_fast(&absolute, content)
    }

    /// Unique-match text replacement. See [`editor::edit_replace`] for the
    /// strict/lenient policy.
    pub fn edit_replace(&self, path: &str, old_text: &str, new_text: &str, strict: bool) -> FsResult<bool> {
        self.ensure_open()?;
        let (_, absolute) = self.resolve(path)?;
        editor::edit_replace(&absolute, old_text, new_text, strict)
    }

    /// Regex search over files selected by `glob_pattern`, bounded by
    /// `max_results` (a soft cap — see [`grep::grep`]).
    pub fn grep(&self, query: &str, glob_pattern: &str, case_sensitive: bool, max_results: usize) -> FsResult<Vec<SearchResult>> {
        self.ensure_open()?;
        grep::grep(&self.index, query, glob_pattern, case_sensitive, max_results, self.options.max_grep_file_bytes)
    }

    /// Metadata as currently known to the index. Reflects the filesystem
    /// as of the last scan/watcher application, not necessarily the
    /// current instant (spec.md §3 invariant 4).
    pub fn get_metadata(&self, path: &str) -> FsResult<FileMetadata> {
        self.ensure_open()?;
        let (relative, absolute) = self.resolve(path)?;
        self.index
            .get(&relative)
            .map(|entry| FileMetadata::from(&entry))
            .ok_or(FsError::NotFound(absolute))
    }

    /// Forces a full rescan, useful after bulk external changes the
    /// watcher might coalesce away or miss entirely (e.g. changes made
    /// while `auto_watch` was `false`).
    pub fn refresh(&self) -> FsResult<()> {
        self.ensure_open()?;
        self.index.clear();
        self.indexer.scan(&self.root, &self.index);
        Ok(())
    }

    /// Stops the watcher (best-effort drain of queued events) and marks
    /// the handle inert. Subsequent calls fail with [`FsError::Closed`].
    pub fn close(&self) -> FsResult<()> {
        self.ensure_open()?;
        self.closed.store(true, Ordering::Release);
        if let Some(watcher) = self.watcher.lock().unwrap_or_else(|e| e.into_inner()).take() {
            watcher.stop();
        }
        Ok(())
    }

    fn ensure_open(&self) -> FsResult<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(FsError::Closed)
        } else {
            Ok(())
        }
    }

    /// Normalizes a caller-supplied path (relative, or absolute within
    /// root) into `(relative_path, absolute_path)`. An absolute path
    /// outside root has no entry to resolve to and is reported as
    /// not-found; the out-of-root fallback that services such paths is
    /// an external collaborator, not part of this core (spec.md §1).
    fn resolve(&self, path: &str) -> FsResult<(String, PathBuf)> {
        let candidate = Path::new(path);
        if candidate.is_absolute() {
            match indexer::relative_slash_path(&self.root, candidate) {
                Some(relative) => Ok((relative, candidate.to_path_buf())),
                None => Err(FsError::NotFound(candidate.to_path_buf())),
            }
        } else {
            let relative = path.replace('\\', "/");
            let relative = relative.strip_prefix("./").unwrap_or(&relative).to_string();
            let absolute = self.root.join(&relative);
            Ok((relative, absolute))
        }
    }
}
