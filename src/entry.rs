// entry.rs
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// One catalog entry for a file or directory beneath the index root.
///
/// Cloning an entry is cheap for the plain fields; `is_binary` is shared
/// via an `Arc`-free atomic so concurrent readers and the watcher's
/// re-stat never need to take a lock just to flip a cached flag.
#[derive(Debug)]
pub struct PathEntry {
    /// Canonical forward-slash path relative to the index root. The index key.
    pub relative_path: String,
    /// OS-native absolute path, used for all I/O.
    pub absolute_path: PathBuf,
    /// Byte length at last stat.
    pub size: u64,
    /// Modification time at last stat.
    pub mtime: SystemTime,
    /// True for directories.
    pub is_dir: bool,
    is_binary: BinaryFlag,
}

/// Lazily-computed, sticky binary heuristic.
///
/// Three states packed into one atomic: unknown, known-text, known-binary.
/// Once known, it is never cleared except by re-stat (size change) or
/// removal, matching §3 invariant 5.
#[derive(Debug)]
struct BinaryFlag(AtomicU64);

const BINARY_UNKNOWN: u64 = 0;
const BINARY_FALSE: u64 = 1;
const BINARY_TRUE: u64 = 2;

impl BinaryFlag {
    fn unknown() -> Self {
        Self(AtomicU64::new(BINARY_UNKNOWN))
    }

    fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Acquire) {
            BINARY_FALSE => Some(false),
            BINARY_TRUE => Some(true),
            _ => None,
        }
    }

    fn set(&self, value: bool) {
        self.0.store(
            if value { BINARY_TRUE } else { BINARY_FALSE },
            Ordering::Release,
        );
    }

    fn clear(&self) {
        self.0.store(BINARY_UNKNOWN, Ordering::Release);
    }
}

impl PathEntry {
    /// Builds a fresh entry from a stat result. `is_binary` starts unknown.
    pub fn new(relative_path: String, absolute_path: PathBuf, size: u64, mtime: SystemTime, is_dir: bool) -> Self {
        Self {
            relative_path,
            absolute_path,
            size,
            mtime,
            is_dir,
            is_binary: BinaryFlag::unknown(),
        }
    }

    /// The cached binary heuristic, if it has been computed.
    pub fn is_binary(&self) -> Option<bool> {
        self.is_binary.get()
    }

    /// Records the outcome of a binary-heuristic scan (null byte in the
    /// first 512 bytes of the file).
    pub fn set_is_binary(&self, value: bool) {
        self.is_binary.set(value);
    }

    /// Re-stats this entry in place: updates size/mtime and drops the
    /// cached binary flag so grep re-derives it on next access.
    pub fn restat(&mut self, size: u64, mtime: SystemTime) {
        self.size = size;
        self.mtime = mtime;
        self.is_binary.clear();
    }
}

impl Clone for PathEntry {
    fn clone(&self) -> Self {
        let cloned = Self {
            relative_path: self.relative_path.clone(),
            absolute_path: self.absolute_path.clone(),
            size: self.size,
            mtime: self.mtime,
            is_dir: self.is_dir,
            is_binary: BinaryFlag::unknown(),
        };
        if let Some(v) = self.is_binary() {
            cloned.set_is_binary(v);
        }
        cloned
    }
}

/// Public metadata record returned by [`crate::FileSystem::get_metadata`].
#[derive(Debug, Clone)]
pub struct FileMetadata {
    pub relative_path: String,
    pub absolute_path: PathBuf,
    pub size: u64,
    pub mtime: SystemTime,
    pub is_dir: bool,
    pub is_binary: Option<bool>,
}

impl From<&PathEntry> for FileMetadata {
    fn from(entry: &PathEntry) -> Self {
        Self {
            relative_path: entry.relative_path.clone(),
            absolute_path: entry.absolute_path.clone(),
            size: entry.size,
            mtime: entry.mtime,
            is_dir: entry.is_dir,
            is_binary: entry.is_binary(),
        }
    }
}

/// One matching line produced by [`crate::FileSystem::grep`].
///
/// Value type; never stored in the index.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub file: String,
    /// 1-based line number.
    pub line_number: u64,
    pub content: String,
    /// Present but may be empty; population is implementation-defined (see §9 Open Question).
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
}
