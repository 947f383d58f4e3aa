// options.rs
use std::time::Duration;

/// Configuration options for a [`crate::FileSystem`] handle.
///
/// This struct allows fine-grained control over indexing, watching, and
/// matching behavior at construction time.
#[derive(Clone, Debug)]
pub struct FileSystemOptions {
    /// Whether to start a background watcher after the initial scan.
    pub auto_watch: bool,

    /// How long to hold a path in `Pending` before applying its coalesced
    /// change to the index. Spec recommends 100-300ms; default sits at
    /// the low end of that range.
    pub debounce_window: Duration,

    /// Files larger than this are treated as binary by `grep` without
    /// inspecting their contents.
    pub max_grep_file_bytes: u64,

    /// Reads at or above this size are served via `memmap2` instead of a
    /// buffered read.
    pub mmap_threshold_bytes: u64,

    /// Whether traversal and the watcher follow symbolic links.
    pub follow_symlinks: bool,
}

impl Default for FileSystemOptions {
    fn default() -> Self {
        Self {
            auto_watch: false,
            debounce_window: Duration::from_millis(150),
            max_grep_file_bytes: 10 * 1024 * 1024,
            mmap_threshold_bytes: 1024 * 1024,
            follow_symlinks: false,
        }
    }
}

/// Builder for [`FileSystemOptions`] for fluent configuration
///
/// This builder pattern allows for clean, readable configuration
/// with method chaining.
pub struct FileSystemOptionsBuilder(FileSystemOptions);

impl Default for FileSystemOptionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystemOptionsBuilder {
    /// Creates a new builder with default options
    pub fn new() -> Self {
        Self(FileSystemOptions::default())
    }

    /// Sets whether a background watcher starts after the initial scan
    pub fn auto_watch(mut self, v: bool) -> Self {
        self.0.auto_watch = v;
        self
    }

    /// Sets the debounce window held before a coalesced change is applied
    pub fn debounce_window(mut self, d: Duration) -> Self {
        self.0.debounce_window = d;
        self
    }

    /// Sets the size above which `grep` treats a file as binary outright
    pub fn max_grep_file_bytes(mut self, v: u64) -> Self {
        self.0.max_grep_file_bytes = v;
        self
    }

    /// Sets the size at or above which reads are served via mmap
    pub fn mmap_threshold_bytes(mut self, v: u64) -> Self {
        self.0.mmap_threshold_bytes = v;
        self
    }

    /// Sets whether to follow symbolic links
    pub fn follow_symlinks(mut self, v: bool) -> Self {
        self.0.follow_symlinks = v;
        self
    }

    /// Builds the final FileSystemOptions instance
    pub fn build(self) -> FileSystemOptions {
        self.0
    }
}
