//! Chunk-parallel encode and decode.
//!
//! Input is split by [`plan`] into at most `concurrency_budget + 1` chunks.
//! Each chunk is coded on its own scoped thread and the per-chunk outputs
//! are returned in chunk order. Concatenating them ([`flatten`],
//! [`flatten_text`]) gives exactly the single-threaded result, for any
//! worker count.
//!
//! Decode chunks are first passed through [`align`] so that no chunk starts
//! or ends between a marker and its symbol.
//!
//! Every call takes a deadline. If the workers have not all finished when
//! it elapses, the call fails with [`crate::Qb64Error::Timeout`] after cancelling
//! and joining the outstanding workers.

mod align;
mod join;
mod partition;

use std::time::Duration;

use crate::chunk::{decode_chunk, encode_chunk};
use crate::Qb64Result;

pub use align::align;
pub use partition::{plan, WorkerInfo, CHUNK_SIZE};

/// Default multiple of available hardware parallelism used as the
/// concurrency budget.
pub const DEFAULT_SCALE: usize = 4;

/// Options controlling parallel encode/decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelOptions {
    /// Concurrency budget. 0 = auto (`scale` x available parallelism).
    pub threads: usize,
    /// Multiple of available parallelism used when `threads` is 0.
    pub scale: usize,
}

impl Default for ParallelOptions {
    fn default() -> Self {
        ParallelOptions {
            threads: 0,
            scale: DEFAULT_SCALE,
        }
    }
}

impl ParallelOptions {
    /// Options with an explicit concurrency budget.
    pub fn with_threads(threads: usize) -> Self {
        ParallelOptions {
            threads,
            ..Default::default()
        }
    }

    /// Resolve the effective concurrency budget (never less than 1).
    pub fn concurrency_budget(&self) -> usize {
        if self.threads == 0 {
            let available = std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1);
            available.saturating_mul(self.scale).max(1)
        } else {
            self.threads
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Encode `data` in parallel with default options.
///
/// Returns one text per chunk, in chunk order.
pub fn encode_parallel(data: &[u8], deadline: Duration) -> Qb64Result<Vec<String>> {
    encode_parallel_with_options(data, deadline, &ParallelOptions::default())
}

/// Encode `data` in parallel under `options`.
pub fn encode_parallel_with_options(
    data: &[u8],
    deadline: Duration,
    options: &ParallelOptions,
) -> Qb64Result<Vec<String>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let info = plan(data.len(), options.concurrency_budget());
    tracing::debug!(
        bytes = data.len(),
        workers = info.workers,
        chunk_size = info.chunk_size,
        "parallel encode"
    );

    let ranges = info.ranges(data.len());
    let slots = join::run_chunks(&ranges, deadline, |range, cancel| {
        encode_chunk(data, range, cancel)
    })?;

    // Encoding has no data errors; a slot can only hold `Cancelled`, which
    // run_chunks never returns without a timeout.
    slots.into_iter().collect()
}

/// Decode `text` in parallel with default options.
///
/// Returns one byte buffer per aligned chunk, in chunk order.
pub fn decode_parallel(text: &str, deadline: Duration) -> Qb64Result<Vec<Vec<u8>>> {
    decode_parallel_with_options(text, deadline, &ParallelOptions::default())
}

/// Decode `text` in parallel under `options`.
///
/// An invalid character in any chunk fails the whole call, but only after
/// every chunk has been attempted. The reported error is the one from the
/// lowest-numbered failing chunk, so it does not depend on scheduling.
pub fn decode_parallel_with_options(
    text: &str,
    deadline: Duration,
    options: &ParallelOptions,
) -> Qb64Result<Vec<Vec<u8>>> {
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let info = plan(text.len(), options.concurrency_budget());
    tracing::debug!(
        chars = text.len(),
        workers = info.workers,
        chunk_size = info.chunk_size,
        "parallel decode"
    );

    let ranges = align(text.as_bytes(), &info.ranges(text.len()));
    let slots = join::run_chunks(&ranges, deadline, |range, cancel| {
        decode_chunk(text, range, cancel)
    })?;

    let failed = slots.iter().filter(|slot| slot.is_err()).count();
    if failed > 0 {
        tracing::debug!(failed, chunks = slots.len(), "invalid data in parallel decode");
    }

    slots.into_iter().collect()
}

/// Concatenate per-chunk byte buffers.
pub fn flatten(chunks: &[Vec<u8>]) -> Vec<u8> {
    let size = chunks.iter().map(Vec::len).sum();
    let mut output = Vec::with_capacity(size);
    for chunk in chunks {
        output.extend_from_slice(chunk);
    }
    output
}

/// Concatenate per-chunk texts.
pub fn flatten_text(chunks: &[String]) -> String {
    chunks.concat()
}
