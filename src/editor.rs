// editor.rs
//! Unique-match text replacement (C9). Always writes back through the
//! atomic writer (§4.6): a half-written edit is worse than a half-written
//! arbitrary write, since it corrupts text a caller believed was already
//! verified unique.

use crate::error::{FsError, FsResult};
use crate::reader;
use crate::writer::Writer;
use std::path::Path;

/// Replaces `old_text` with `new_text` in the file at `absolute`.
///
/// - Zero occurrences: `Err(NotFoundStrict)` in strict mode, `Ok(false)`
///   otherwise.
/// - More than one occurrence: `Err(NotUnique)` in strict mode (the
///   message carries the count); otherwise only the first occurrence is
///   replaced.
/// - Exactly one occurrence: replaced and written back; `Ok(true)`.
pub fn edit_replace(absolute: &Path, old_text: &str, new_text: &str, strict: bool) -> FsResult<bool> {
    let content = reader::read_file(absolute)?;
    let count = content.matches(old_text).count();

    match count {
        0 => {
            if strict {
                Err(FsError::NotFoundStrict {
                    path: absolute.to_path_buf(),
                    needle: old_text.to_string(),
                })
            } else {
                Ok(false)
            }
        }
        1 => {
            let replaced = content.replace(old_text, new_text);
            Writer::write_atomic(absolute, &replaced)?;
            Ok(true)
        }
        n => {
            if strict {
                Err(FsError::NotUnique {
                    path: absolute.to_path_buf(),
                    needle: old_text.to_string(),
                    count: n,
                })
            } else {
                let replaced = content.replacen(old_text, new_text, 1);
                Writer::write_atomic(absolute, &replaced)?;
                Ok(true)
            }
        }
    }
}
