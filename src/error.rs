// error.rs
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by [`crate::FileSystem`] operations.
///
/// Operations that service many items (`read_batch`, `grep`) recover
/// per-item and skip failures silently; these variants are only ever
/// returned by single-item operations.
#[derive(Error, Debug)]
pub enum FsError {
    /// The handle was used after [`crate::FileSystem::close`].
    #[error("filesystem handle is closed")]
    Closed,

    /// The constructor's root does not exist or is not a directory.
    #[error("invalid root: {0}")]
    InvalidRoot(PathBuf),

    /// The target path has no entry at operation time.
    #[error("not found: {0}")]
    NotFound(PathBuf),

    /// Bytes read from a file were not valid UTF-8.
    #[error("cannot decode {path} as UTF-8: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: std::str::Utf8Error,
    },

    /// An underlying OS error during read/write/rename/fsync/traversal.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// A glob pattern failed to compile.
    #[error("invalid glob pattern: {0}")]
    BadGlob(#[from] globset::Error),

    /// A regex pattern failed to compile.
    #[error("invalid regex pattern: {0}")]
    BadPattern(#[from] regex::Error),

    /// `edit_replace` in strict mode found more than one occurrence.
    #[error("'{needle}' is not unique in {path} ({count} occurrences)")]
    NotUnique {
        path: PathBuf,
        needle: String,
        count: usize,
    },

    /// `edit_replace` in strict mode found zero occurrences.
    #[error("'{needle}' not found in {path}")]
    NotFoundStrict { path: PathBuf, needle: String },

    /// Brace expansion exceeded the configured maximum nesting depth.
    #[error("brace expansion exceeded maximum nesting depth")]
    BraceExpansionDepth,

    /// Brace expansion exceeded the configured maximum expansion count.
    #[error("brace expansion exceeded maximum expansions")]
    BraceExpansionCount,

    /// A regex pattern exceeded the complexity guard (length or group
    /// count) used as a ReDoS mitigation before compilation is attempted.
    #[error("regex pattern exceeds the configured complexity limit")]
    RegexTooComplex,
}

pub type FsResult<T> = Result<T, FsError>;
