//! Quartile-offset binary-to-text codec.
//!
//! Every input byte is shifted into the unsigned range `[0, 256)` and split
//! into a quartile (0-3) and a 6-bit value. The value is written as one
//! symbol from a 64-character alphabet. Quartiles 1-3 are announced by a
//! one-character marker placed immediately before the symbol.
//!
//! The [`parallel`] module partitions large inputs into chunks, codes them
//! on scoped worker threads and reassembles the result in chunk order, so
//! the output never depends on how many workers ran.

pub mod alphabet;
pub mod chunk;
pub mod parallel;

#[cfg(test)]
mod validation;

use std::time::Duration;

pub use chunk::{decode, decode_range, encode, encode_range};
pub use parallel::{
    decode_parallel, decode_parallel_with_options, encode_parallel, encode_parallel_with_options,
    flatten, flatten_text, ParallelOptions,
};

/// Error types for qb64 operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Qb64Error {
    /// A character that is neither an alphabet symbol nor a control marker.
    ///
    /// `offset` is the byte offset of the character in the decoded text.
    #[error("invalid symbol {symbol:?} at offset {offset}")]
    InvalidSymbol { symbol: char, offset: usize },
    /// Parallel workers did not all finish before the deadline.
    #[error("parallel workers did not finish within {deadline:?}")]
    Timeout { deadline: Duration },
    /// A worker thread panicked while coding its chunk.
    #[error("worker for chunk {chunk} panicked")]
    WorkerPanicked { chunk: usize },
    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(String),
    /// A worker stopped early because its call was cancelled.
    #[error("chunk work cancelled")]
    Cancelled,
}

pub type Qb64Result<T> = Result<T, Qb64Error>;
