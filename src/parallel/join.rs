//! Per-call worker group with a deadline join.
//!
//! One scoped thread per chunk. Each worker sends `(index, result)` on a
//! channel and the coordinator files it into the slot for that index, so the
//! returned vector is in chunk order regardless of completion order.
//!
//! When the deadline passes the coordinator raises the shared cancellation
//! flag, which the chunk codec polls, and joins every worker before
//! returning. No worker outlives the call.

use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, ScopedJoinHandle};
use std::time::{Duration, Instant};

use crate::{Qb64Error, Qb64Result};

/// Run `work` once per range on its own thread and collect the per-chunk
/// results in range order.
///
/// Returns `Err` only for coordination failures (timeout, panic, spawn).
/// Per-chunk codec errors are left in their slots for the caller to
/// aggregate.
pub(crate) fn run_chunks<T, F>(
    ranges: &[Range<usize>],
    deadline: Duration,
    work: F,
) -> Qb64Result<Vec<Qb64Result<T>>>
where
    T: Send,
    F: Fn(Range<usize>, &AtomicBool) -> Qb64Result<T> + Sync,
{
    let started = Instant::now();
    let cancel = AtomicBool::new(false);
    let num_chunks = ranges.len();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<(usize, Qb64Result<T>)>();
        let mut handles: Vec<ScopedJoinHandle<'_, ()>> = Vec::with_capacity(num_chunks);

        for (index, range) in ranges.iter().cloned().enumerate() {
            let tx = tx.clone();
            let work = &work;
            let cancel = &cancel;
            let spawned = thread::Builder::new()
                .name(format!("qb64-worker-{index}"))
                .spawn_scoped(scope, move || {
                    let result = work(range, cancel);
                    // The coordinator may have stopped listening after a timeout.
                    let _ = tx.send((index, result));
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    cancel.store(true, Ordering::Relaxed);
                    join_all(handles)?;
                    return Err(Qb64Error::Spawn(e.to_string()));
                }
            }
        }
        drop(tx);

        let mut slots: Vec<Option<Qb64Result<T>>> = (0..num_chunks).map(|_| None).collect();
        let mut received = 0;
        while received < num_chunks {
            let remaining = deadline.saturating_sub(started.elapsed());
            match rx.recv_timeout(remaining) {
                Ok((index, result)) => {
                    slots[index] = Some(result);
                    received += 1;
                }
                Err(RecvTimeoutError::Timeout) => {
                    cancel.store(true, Ordering::Relaxed);
                    tracing::debug!(
                        finished = received,
                        outstanding = num_chunks - received,
                        ?deadline,
                        "deadline elapsed, cancelling workers"
                    );
                    join_all(handles)?;
                    return Err(Qb64Error::Timeout { deadline });
                }
                // Every sender is gone: some worker died before reporting.
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }

        join_all(handles)?;

        slots
            .into_iter()
            .enumerate()
            .map(|(chunk, slot)| slot.ok_or(Qb64Error::WorkerPanicked { chunk }))
            .collect()
    })
}

/// Join every handle, reporting the first worker that panicked.
fn join_all(handles: Vec<ScopedJoinHandle<'_, ()>>) -> Qb64Result<()> {
    let mut panicked = None;
    for (chunk, handle) in handles.into_iter().enumerate() {
        if handle.join().is_err() && panicked.is_none() {
            panicked = Some(chunk);
        }
    }
    match panicked {
        Some(chunk) => Err(Qb64Error::WorkerPanicked { chunk }),
        None => Ok(()),
    }
}
