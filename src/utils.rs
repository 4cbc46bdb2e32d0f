//! Assorted utilities and helpers.

use std::cmp::Ordering;

use crate::error::CompareError;
use crate::traits::Comparator;

/// Smallest cutoff the default heuristic will pick.
pub const MIN_SEQUENTIAL_CUTOFF: usize = 64;

/// Target number of forked leaf subtrees per worker.
const TASKS_PER_WORKER: usize = 8;

/// Pick a sequential cutoff for a slice of `len` elements on `workers`
/// threads.
///
/// Aims for a few leaf subtrees per worker so work stealing can balance
/// load, without forking ranges too small to pay for the task.
#[inline]
pub fn default_sequential_cutoff(len: usize, workers: usize) -> usize {
    if len <= 1 {
        return 1;
    }
    let parts = workers.max(1).saturating_mul(TASKS_PER_WORKER);
    len.div_ceil(parts).max(MIN_SEQUENTIAL_CUTOFF)
}

/// Number of workers the engine will fork onto from the calling thread.
#[inline]
pub fn available_workers() -> usize {
    #[cfg(feature = "parallel")]
    {
        rayon::current_num_threads()
    }
    #[cfg(not(feature = "parallel"))]
    {
        1
    }
}

/// Check that every adjacent pair of `slice` is in order under `cmp`.
pub fn is_sorted_by<E, C>(slice: &[E], cmp: &C) -> Result<bool, CompareError>
where
    C: Comparator<E> + ?Sized,
{
    for pair in slice.windows(2) {
        if cmp.compare(&pair[0], &pair[1])? == Ordering::Greater {
            return Ok(false);
        }
    }
    Ok(true)
}
