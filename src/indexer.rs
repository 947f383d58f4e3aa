// indexer.rs
use crate::entry::PathEntry;
use crate::index::PathIndex;
use ignore::{WalkBuilder, WalkState};
use std::path::Path;
use std::sync::Arc;

/// Performs the initial recursive scan of a root, and targeted rescans of
/// individual directories on the Watcher's behalf.
///
/// Traversal is handed to `ignore::WalkBuilder::build_parallel`, which
/// natively honors `.gitignore`, `.ignore`, global gitignore, and parent
/// ignore files discovered from each visited entry's ancestors — the
/// same traversal semantics agents already expect from ripgrep-family
/// tools. Worker threads insert directly into the shared `DashMap`
/// behind `PathIndex`; there is no intermediate buffering step.
pub struct Indexer {
    follow_symlinks: bool,
}

impl Indexer {
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }

    /// Walks `root` recursively and populates `index` with one entry per
    /// non-ignored file and directory. Marks the index ready when done.
    /// Per-entry errors (permission denied, broken symlinks) are logged
    /// and skipped; they never abort the walk.
    pub fn scan(&self, root: &Path, index: &Arc<PathIndex>) {
        index.set_not_ready();
        let walker = WalkBuilder::new(root)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .ignore(true)
            .parents(true)
            .follow_links(self.follow_symlinks)
            .filter_entry(|entry| entry.file_name().to_str() != Some(".git"))
            .build_parallel();

        let root = root.to_path_buf();
        walker.run(|| {
            let index = Arc::clone(index);
            let root = root.clone();
            Box::new(move |result| {
                match result {
                    Ok(dir_entry) => {
                        if dir_entry.depth() == 0 {
                            // the root itself; not a catalog entry
                            return WalkState::Continue;
                        }
                        if let Some(entry) = stat_entry(&root, dir_entry.path()) {
                            index.insert(entry);
                        }
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "skipping unreadable entry during scan");
                    }
                }
                WalkState::Continue
            })
        });

        index.set_ready();
    }

    /// Rescans a single directory, used by the Watcher to resolve
    /// overflow/unknown events whose exact effect is unclear.
    pub fn rescan_directory(&self, root: &Path, dir: &Path, index: &PathIndex) {
        let walker = WalkBuilder::new(dir)
            .hidden(false)
            .git_ignore(true)
            .git_exclude(true)
            .git_global(true)
            .ignore(true)
            .parents(true)
            .follow_links(self.follow_symlinks)
            .max_depth(Some(1))
            .filter_entry(|entry| entry.file_name().to_str() != Some(".git"))
            .build();

        for result in walker {
            match result {
                Ok(dir_entry) => {
                    if dir_entry.path() == dir {
                        continue;
                    }
                    if let Some(entry) = stat_entry(root, dir_entry.path()) {
                        index.insert(entry);
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "skipping unreadable entry during rescan");
                }
            }
        }
    }
}

/// Stats `path` and builds a `PathEntry` relative to `root`. Returns
/// `None` (logging a warning) if the stat fails.
pub fn stat_entry(root: &Path, path: &Path) -> Option<PathEntry> {
    let metadata = match path.symlink_metadata() {
        Ok(m) => m,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "stat failed, skipping");
            return None;
        }
    };
    let relative = relative_slash_path(root, path)?;
    let is_dir = metadata.is_dir();
    let size = metadata.len();
    let mtime = metadata.modified().unwrap_or(std::time::SystemTime::UNIX_EPOCH);
    Some(PathEntry::new(relative, path.to_path_buf(), size, mtime, is_dir))
}

/// Converts `path` into a canonical forward-slash string relative to
/// `root`. Returns `None` if `path` does not live under `root`.
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let as_str = relative.to_string_lossy();
    if cfg!(windows) && as_str.contains('\\') {
        Some(as_str.replace('\\', "/"))
    } else {
        Some(as_str.into_owned())
    }
}
