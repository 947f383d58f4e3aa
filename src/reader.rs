// reader.rs
//! Content-reading operations: whole-file reads, the parallel batch reader
//! (C6), and the byte-range/line-range reader (C7).
//!
//! These operate directly against disk rather than the index — the index
//! catalogs paths and stat metadata only, never content (spec.md §1
//! non-goals). A read racing a concurrent write may observe either the
//! pre- or post-write bytes; that race is inherent to "no write-through"
//! and is left to the caller, matching §5's shared-resource policy.

use crate::error::{FsError, FsResult};
use memmap2::Mmap;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Reads an entire file as UTF-8. Invalid sequences are a hard error here
/// (unlike [`read_lines`], which tolerates them) because the whole-file
/// contract has no smaller unit to fall back to.
pub fn read_file(absolute: &Path) -> FsResult<String> {
    let bytes = read_bytes(absolute)?;
    decode_strict(absolute, bytes)
}

fn read_bytes(absolute: &Path) -> FsResult<Vec<u8>> {
    fs::read(absolute).map_err(|e| map_io_not_found(absolute, e))
}

fn decode_strict(absolute: &Path, bytes: Vec<u8>) -> FsResult<String> {
    std::str::from_utf8(&bytes)
        .map(|_| ())
        .map_err(|source| FsError::Decode {
            path: absolute.to_path_buf(),
            source,
        })?;
    // Safety net above already validated; `from_utf8` is cheap to call twice
    // compared to the I/O that dominates this path, and avoids unsafe.
    Ok(String::from_utf8(bytes).expect("validated above"))
}

fn map_io_not_found(path: &Path, err: std::io::Error) -> FsError {
    if err.kind() == std::io::ErrorKind::NotFound {
        FsError::NotFound(path.to_path_buf())
    } else {
        FsError::Io(err)
    }
}

/// Parallel batch read over `(relative_path, absolute_path)` pairs.
/// Duplicates are allowed; failures (missing, permission, decode) are
/// skipped silently, matching the single-read's "best effort over many
/// paths" contract. Parallelism is bounded by rayon's global pool, i.e.
/// hardware concurrency by default.
pub fn read_batch(items: &[(String, PathBuf)]) -> HashMap<String, String> {
    items
        .par_iter()
        .filter_map(|(relative, absolute)| {
            read_file(absolute).ok().map(|content| (relative.clone(), content))
        })
        .collect()
}

/// Byte-range read: seeks to `offset`, reads up to `limit` bytes, decodes
/// as UTF-8. An offset at or beyond end-of-file yields an empty string,
/// never an error.
pub fn read_file_range(absolute: &Path, offset: u64, limit: u64) -> FsResult<String> {
    let mut file = File::open(absolute).map_err(|e| map_io_not_found(absolute, e))?;
    let len = file.metadata().map_err(FsError::Io)?.len();
    if offset >= len {
        return Ok(String::new());
    }
    file.seek(SeekFrom::Start(offset)).map_err(FsError::Io)?;
    let mut buf = Vec::with_capacity(limit.min(len - offset) as usize);
    file.take(limit).read_to_end(&mut buf).map_err(FsError::Io)?;
    decode_strict(absolute, buf)
}

/// Returns lines `[start_line, start_line+count)` (0-indexed, half-open;
/// `count = None` reads to end-of-file). Trailing `\r`/`\n` are stripped.
/// Invalid UTF-8 is replaced lossily per line rather than erroring — the
/// external-interface table lists only `not-found` for this operation.
///
/// Files at or above `mmap_threshold` bytes are read via a memory map so
/// the whole file is never buffered into a `Vec<u8>`; smaller files use a
/// plain buffered read. Line splitting is identical on both paths.
pub fn read_lines(absolute: &Path, start_line: usize, count: Option<usize>, mmap_threshold: u64) -> FsResult<Vec<String>> {
    if count == Some(0) {
        // Touch the file so a missing path still surfaces not-found.
        let _ = File::open(absolute).map_err(|e| map_io_not_found(absolute, e))?;
        return Ok(Vec::new());
    }

    let file = File::open(absolute).map_err(|e| map_io_not_found(absolute, e))?;
    let len = file.metadata().map_err(FsError::Io)?.len();

    let lines = if len >= mmap_threshold {
        // SAFETY: the file is opened read-only for the duration of this
        // call and not mutated by this process; external mutation during
        // the mmap's lifetime is the same race any concurrent reader/writer
        // pair already has to tolerate per §5.
        #[allow(unsafe_code)]
        let mmap = unsafe { Mmap::map(&file) }.map_err(FsError::Io)?;
        split_lines(&mmap)
    } else {
        drop(file);
        let bytes = read_bytes(absolute)?;
        split_lines(&bytes)
    };

    Ok(slice_lines(&lines, start_line, count))
}

/// Splits `bytes` on `\n`, stripping a trailing `\r` from each line and
/// dropping the final empty segment produced by a trailing newline (so a
/// file ending in `\n` reports N lines, not N+1).
fn split_lines(bytes: &[u8]) -> Vec<String> {
    let mut parts: Vec<&[u8]> = bytes.split(|&b| b == b'\n').collect();
    if bytes.last() == Some(&b'\n') {
        parts.pop();
    }
    parts
        .into_iter()
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            String::from_utf8_lossy(line).into_owned()
        })
        .collect()
}

fn slice_lines(lines: &[String], start_line: usize, count: Option<usize>) -> Vec<String> {
    if start_line >= lines.len() {
        return Vec::new();
    }
    let end = match count {
        Some(c) => (start_line + c).min(lines.len()),
        None => lines.len(),
    };
    if end <= start_line {
        return Vec::new();
    }
    lines[start_line..end].to_vec()
}
