//! Worker count and chunk size planning.

use std::ops::Range;

/// Nominal chunk size in units (input bytes for encode, text characters
/// for decode).
pub const CHUNK_SIZE: usize = 4096;

/// How one call splits its input among workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerInfo {
    pub workers: usize,
    pub chunk_size: usize,
}

impl WorkerInfo {
    /// Naive chunk ranges over `total_len` units, one per worker.
    ///
    /// The last range always ends at `total_len`, so the ranges are disjoint
    /// and cover the whole input.
    pub fn ranges(&self, total_len: usize) -> Vec<Range<usize>> {
        (0..self.workers)
            .map(|i| {
                let start = (i * self.chunk_size).min(total_len);
                let end = if i + 1 == self.workers {
                    total_len
                } else {
                    ((i + 1) * self.chunk_size).min(total_len)
                };
                start..end
            })
            .collect()
    }
}

/// Plan the split of `total_len` units under `concurrency_budget` workers.
///
/// Inputs that need more than `concurrency_budget` nominal chunks are split
/// into `concurrency_budget` larger chunks, plus one more worker for the
/// remainder when the length does not divide evenly.
///
/// Callers short-circuit empty input; `total_len == 0` plans zero workers.
pub fn plan(total_len: usize, concurrency_budget: usize) -> WorkerInfo {
    let budget = concurrency_budget.max(1);
    let workers = total_len.div_ceil(CHUNK_SIZE);

    if workers > budget {
        let chunk_size = total_len / budget;
        let workers = if budget * chunk_size < total_len {
            budget + 1
        } else {
            budget
        };
        WorkerInfo {
            workers,
            chunk_size,
        }
    } else {
        WorkerInfo {
            workers,
            chunk_size: CHUNK_SIZE,
        }
    }
}
