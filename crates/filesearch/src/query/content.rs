//! Chunked file content search with line tracking.
//!
//! Files are read in fixed-size chunks; lines are reconstructed across chunk
//! boundaries so a match is always reported against a complete line. The
//! cancellation flag is checked once per chunk.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use memchr::memchr;

use crate::cancel::CancelFlag;

/// Longest match line retained in a result, in characters.
const MATCH_LINE_MAX_CHARS: usize = 200;

/// The first matching line of a content search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentMatch {
    /// The matching line, trimmed and truncated to 200 characters.
    pub line: String,
    /// 1-based line number.
    pub line_number: usize,
}

/// Scans `path` for the first line containing `needle`.
///
/// Binary files (per [`super::text_file::is_text_file`]) are never scanned.
/// Read errors and cancellation both surface as "no match"; the caller's
/// loop observes the cancellation flag at its own boundaries.
pub fn find_first_match(
    path: &Path,
    needle: &str,
    case_sensitive: bool,
    chunk_size: usize,
    cancel: &CancelFlag,
) -> Option<ContentMatch> {
    if !super::text_file::is_text_file(path) {
        return None;
    }

    let needle_adjusted = if case_sensitive {
        needle.to_string()
    } else {
        needle.to_lowercase()
    };

    let mut file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            log::debug!("content search failed for {}: {}", path.display(), error);
            return None;
        }
    };

    let mut chunk = vec![0u8; chunk_size.max(1)];
    let mut carry: Vec<u8> = Vec::new();
    let mut line_number = 0usize;

    loop {
        if cancel.is_cancelled() {
            return None;
        }
        let read = match file.read(&mut chunk) {
            Ok(0) => break,
            Ok(read) => read,
            Err(error) => {
                log::debug!("content search failed for {}: {}", path.display(), error);
                return None;
            }
        };
        carry.extend_from_slice(&chunk[..read]);

        let mut start = 0usize;
        while let Some(offset) = memchr(b'\n', &carry[start..]) {
            let end = start + offset;
            line_number += 1;
            if let Some(found) =
                line_match(&carry[start..end], &needle_adjusted, case_sensitive, line_number)
            {
                return Some(found);
            }
            start = end + 1;
        }
        // keep the incomplete trailing line for the next chunk
        carry.drain(..start);
    }

    if !carry.is_empty() {
        line_number += 1;
        return line_match(&carry, &needle_adjusted, case_sensitive, line_number);
    }
    None
}

fn line_match(
    raw: &[u8],
    needle: &str,
    case_sensitive: bool,
    line_number: usize,
) -> Option<ContentMatch> {
    let line = String::from_utf8_lossy(raw);
    let matched = if case_sensitive {
        line.contains(needle)
    } else {
        line.to_lowercase().contains(needle)
    };
    if !matched {
        return None;
    }
    Some(ContentMatch {
        line: line.trim().chars().take(MATCH_LINE_MAX_CHARS).collect(),
        line_number,
    })
}
