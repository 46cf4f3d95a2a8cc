//! Unit-boundary alignment of decode chunks.
//!
//! A naive chunk boundary can fall between a marker and the symbol it binds
//! to. Such a chunk is extended by one character to take the symbol, and the
//! next chunk starts one character later.
//!
//! The carry is a single step. It is sound only while a chunk never ends
//! on a marker *after* being extended, which holds for well-formed text
//! (a marker is always followed by a symbol) and non-final chunks of at
//! least two characters. `CHUNK_SIZE` keeps every non-final chunk far above
//! that. Malformed text with consecutive markers at a boundary may decode
//! differently in parallel than single-threaded.

use std::ops::Range;

use crate::alphabet;

/// Align naive `ranges` over `text` so no unit straddles two ranges.
///
/// `ranges` must be ordered, disjoint and contiguous, as produced by
/// [`super::WorkerInfo::ranges`]. The result has the same number of ranges,
/// each clamped to `text.len()`; a range may become empty.
pub fn align(text: &[u8], ranges: &[Range<usize>]) -> Vec<Range<usize>> {
    let total_len = text.len();
    let mut pad_next = false;
    let mut aligned = Vec::with_capacity(ranges.len());

    for (index, range) in ranges.iter().enumerate() {
        let mut start = range.start;
        let mut end = range.end;

        if pad_next {
            start += 1;
            pad_next = false;
        }

        if range.end > range.start && alphabet::is_marker(text[range.end - 1]) {
            end = (end + 1).min(total_len);
            pad_next = true;
            tracing::trace!(chunk = index, boundary = range.end, "marker at chunk boundary");
        }

        aligned.push(start.min(end)..end);
    }

    aligned
}
