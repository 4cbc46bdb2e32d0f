//! Fork-join merge sort engine.
//!
//! Every non-leaf range is split into two halves. Halves longer than the
//! sequential cutoff are forked with `rayon::join`; shorter ones run inline on
//! the current worker. Once both halves have returned, the parent merges them
//! through a scratch buffer.
//!
//! The cancellation token and the internal abort flag are checked when a task
//! starts and again after its join. A task that sees either one fired returns
//! an error instead of merging, so no merge ever runs above an interrupted
//! subtree.
//!
//! The engine is generic over any [`Comparator`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
#[cfg(feature = "parallel")]
use std::sync::Arc;

use crate::cancel::CancellationToken;
use crate::error::SortError;
use crate::merge::merge_halves;
use crate::range::SortRange;
use crate::traits::{Comparator, NaturalOrder};
use crate::utils::{available_workers, default_sequential_cutoff};
#[cfg(feature = "parallel")]
use rayon::join;

/// Parallel merge sort engine for a comparator `C`.
///
/// Typical usage:
/// ```
/// use parsort::SortEngine;
///
/// let mut v = vec![5, 3, 8, 1, 9, 2];
/// let engine = SortEngine::default();
/// let sorted = engine.sort(&mut v).unwrap();
/// assert_eq!(sorted, &[1, 2, 3, 5, 8, 9]);
/// ```
pub struct SortEngine<C = NaturalOrder> {
    comparator: C,
    cutoff: Option<usize>,
    token: CancellationToken,
    #[cfg(feature = "parallel")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

/// Counters collected during one successful run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Number of elements sorted.
    pub len: usize,
    /// Child tasks forked through the join primitive (two per forking range).
    pub tasks: usize,
    /// Merges committed.
    pub merges: usize,
    /// Deepest recursion level reached; the full range is level 0.
    pub depth: usize,
    /// Sequential cutoff the run used.
    pub cutoff: usize,
}

impl Default for SortEngine<NaturalOrder> {
    fn default() -> Self {
        Self::new(NaturalOrder)
    }
}

impl<C> SortEngine<C> {
    /// Create an engine whose cutoff is picked per call from the slice length
    /// and the worker count.
    pub fn new(comparator: C) -> Self {
        Self::from_parts(comparator, None, CancellationToken::new())
    }

    /// Create an engine with an explicit sequential cutoff.
    ///
    /// A cutoff of 1 forks down to single-element leaves.
    ///
    /// # Panics
    /// Panics if `cutoff == 0`.
    pub fn with_cutoff(comparator: C, cutoff: usize) -> Self {
        assert!(cutoff > 0, "cutoff must be positive");
        Self::from_parts(comparator, Some(cutoff), CancellationToken::new())
    }

    pub(crate) fn from_parts(comparator: C, cutoff: Option<usize>, token: CancellationToken) -> Self {
        Self {
            comparator,
            cutoff,
            token,
            #[cfg(feature = "parallel")]
            pool: None,
        }
    }

    #[cfg(feature = "parallel")]
    pub(crate) fn with_pool(mut self, pool: rayon::ThreadPool) -> Self {
        self.pool = Some(Arc::new(pool));
        self
    }

    /// Replace the cancellation token observed by later runs.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    /// The explicit cutoff, or `None` when it is picked per call.
    pub fn cutoff(&self) -> Option<usize> {
        self.cutoff
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Worker count of the dedicated pool, if one was configured.
    pub fn threads(&self) -> Option<usize> {
        #[cfg(feature = "parallel")]
        {
            self.pool.as_ref().map(|pool| pool.current_num_threads())
        }
        #[cfg(not(feature = "parallel"))]
        {
            None
        }
    }

    fn resolve_cutoff(&self, len: usize) -> usize {
        self.cutoff
            .unwrap_or_else(|| default_sequential_cutoff(len, available_workers()))
    }
}

/// State shared by every task of one run.
struct RunContext<'a, C> {
    comparator: &'a C,
    token: &'a CancellationToken,
    cutoff: usize,
    aborted: AtomicBool,
    tasks: AtomicUsize,
    merges: AtomicUsize,
    depth: AtomicUsize,
}

impl<'a, C> RunContext<'a, C> {
    fn new(comparator: &'a C, token: &'a CancellationToken, cutoff: usize) -> Self {
        Self {
            comparator,
            token,
            cutoff,
            aborted: AtomicBool::new(false),
            tasks: AtomicUsize::new(0),
            merges: AtomicUsize::new(0),
            depth: AtomicUsize::new(0),
        }
    }

    #[inline]
    fn should_stop(&self) -> bool {
        self.aborted.load(Ordering::Acquire) || self.token.is_cancelled()
    }

    /// Checked before a task splits its range and again after the join.
    #[inline]
    fn checkpoint(&self, _range: SortRange) -> Result<(), SortError> {
        if self.should_stop() {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                start = _range.start,
                end = _range.end,
                "stop observed, range left unmerged"
            );
            return Err(SortError::Interrupted);
        }
        Ok(())
    }

    #[inline]
    fn enter(&self, depth: usize) {
        self.depth.fetch_max(depth, Ordering::Relaxed);
    }

    #[inline]
    fn forks(&self, range: SortRange) -> bool {
        let fork = range.len() > self.cutoff;
        if fork {
            self.tasks.fetch_add(2, Ordering::Relaxed);
        }
        fork
    }

    fn commit_merge<E: Clone>(&self, slice: &mut [E], range: SortRange) -> Result<(), SortError>
    where
        C: Comparator<E>,
    {
        #[cfg(feature = "tracing")]
        let span = tracing::trace_span!("merge", start = range.start, end = range.end);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        match merge_halves(slice, range.mid_offset(), self.comparator) {
            Ok(()) => {
                self.merges.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Err(err) => {
                self.aborted.store(true, Ordering::Release);
                #[cfg(feature = "tracing")]
                tracing::warn!(
                    start = range.start,
                    end = range.end,
                    error = err.message(),
                    "comparator failed, aborting sort"
                );
                Err(SortError::Comparison(err))
            }
        }
    }

    fn into_stats(self, len: usize) -> SortStats {
        SortStats {
            len,
            tasks: self.tasks.into_inner(),
            merges: self.merges.into_inner(),
            depth: self.depth.into_inner(),
            cutoff: self.cutoff,
        }
    }
}

/// Fold the outcomes of two sibling tasks into one.
#[inline]
fn join_outcomes(
    left: Result<(), SortError>,
    right: Result<(), SortError>,
) -> Result<(), SortError> {
    match (left, right) {
        (Ok(()), Ok(())) => Ok(()),
        (Err(l), Err(r)) => Err(l.dominant(r)),
        (Err(e), Ok(())) | (Ok(()), Err(e)) => Err(e),
    }
}

#[cfg(all(feature = "parallel", feature = "tracing"))]
fn fork_halves<E, C>(
    ctx: &RunContext<'_, C>,
    left: &mut [E],
    right: &mut [E],
    left_range: SortRange,
    right_range: SortRange,
    depth: usize,
) -> Result<(), SortError>
where
    E: Clone + Send,
    C: Comparator<E> + Sync,
{
    let left_span = tracing::trace_span!(
        "sort_left",
        start = left_range.start,
        end = left_range.end,
        depth
    );
    let right_span = tracing::trace_span!(
        "sort_right",
        start = right_range.start,
        end = right_range.end,
        depth
    );
    let (l, r) = join(
        move || left_span.in_scope(|| sort_range(ctx, left, left_range, depth)),
        move || right_span.in_scope(|| sort_range(ctx, right, right_range, depth)),
    );
    join_outcomes(l, r)
}

#[cfg(all(feature = "parallel", not(feature = "tracing")))]
fn fork_halves<E, C>(
    ctx: &RunContext<'_, C>,
    left: &mut [E],
    right: &mut [E],
    left_range: SortRange,
    right_range: SortRange,
    depth: usize,
) -> Result<(), SortError>
where
    E: Clone + Send,
    C: Comparator<E> + Sync,
{
    let (l, r) = join(
        || sort_range(ctx, left, left_range, depth),
        || sort_range(ctx, right, right_range, depth),
    );
    join_outcomes(l, r)
}

#[cfg(all(not(feature = "parallel"), feature = "tracing"))]
fn fork_halves<E, C>(
    ctx: &RunContext<'_, C>,
    left: &mut [E],
    right: &mut [E],
    left_range: SortRange,
    right_range: SortRange,
    depth: usize,
) -> Result<(), SortError>
where
    E: Clone,
    C: Comparator<E>,
{
    let left_span = tracing::trace_span!(
        "sort_left",
        start = left_range.start,
        end = left_range.end,
        depth
    );
    let l = left_span.in_scope(|| sort_range(ctx, left, left_range, depth));
    let right_span = tracing::trace_span!(
        "sort_right",
        start = right_range.start,
        end = right_range.end,
        depth
    );
    let r = right_span.in_scope(|| sort_range(ctx, right, right_range, depth));
    join_outcomes(l, r)
}

#[cfg(all(not(feature = "parallel"), not(feature = "tracing")))]
fn fork_halves<E, C>(
    ctx: &RunContext<'_, C>,
    left: &mut [E],
    right: &mut [E],
    left_range: SortRange,
    right_range: SortRange,
    depth: usize,
) -> Result<(), SortError>
where
    E: Clone,
    C: Comparator<E>,
{
    join_outcomes(
        sort_range(ctx, left, left_range, depth),
        sort_range(ctx, right, right_range, depth),
    )
}

/// Sort `slice`, which holds the elements of `range`, and merge it in place.
#[cfg(feature = "parallel")]
fn sort_range<E, C>(
    ctx: &RunContext<'_, C>,
    slice: &mut [E],
    range: SortRange,
    depth: usize,
) -> Result<(), SortError>
where
    E: Clone + Send,
    C: Comparator<E> + Sync,
{
    ctx.enter(depth);
    if range.is_leaf() {
        return Ok(());
    }
    ctx.checkpoint(range)?;

    let (left_range, right_range) = range.split();
    let (left, right) = slice.split_at_mut(range.mid_offset());
    if ctx.forks(range) {
        fork_halves(ctx, left, right, left_range, right_range, depth + 1)?;
    } else {
        sort_range(ctx, left, left_range, depth + 1)?;
        sort_range(ctx, right, right_range, depth + 1)?;
    }

    ctx.checkpoint(range)?;
    ctx.commit_merge(slice, range)
}

/// Sort `slice`, which holds the elements of `range`, and merge it in place.
#[cfg(not(feature = "parallel"))]
fn sort_range<E, C>(
    ctx: &RunContext<'_, C>,
    slice: &mut [E],
    range: SortRange,
    depth: usize,
) -> Result<(), SortError>
where
    E: Clone,
    C: Comparator<E>,
{
    ctx.enter(depth);
    if range.is_leaf() {
        return Ok(());
    }
    ctx.checkpoint(range)?;

    let (left_range, right_range) = range.split();
    let (left, right) = slice.split_at_mut(range.mid_offset());
    if ctx.forks(range) {
        fork_halves(ctx, left, right, left_range, right_range, depth + 1)?;
    } else {
        sort_range(ctx, left, left_range, depth + 1)?;
        sort_range(ctx, right, right_range, depth + 1)?;
    }

    ctx.checkpoint(range)?;
    ctx.commit_merge(slice, range)
}

#[cfg(feature = "parallel")]
impl<C> SortEngine<C> {
    /// Sort `slice` in place and hand it back.
    ///
    /// On `Err` the slice is still a permutation of the input, but its order
    /// is unspecified. Keep a copy of the input if you need to retry.
    ///
    /// # Panics
    /// A panic raised by the comparator propagates to the caller.
    pub fn sort<'s, E>(&self, slice: &'s mut [E]) -> Result<&'s mut [E], SortError>
    where
        E: Clone + Send,
        C: Comparator<E> + Sync,
    {
        self.sort_with_stats(slice)?;
        Ok(slice)
    }

    /// Sort `slice` in place and report what the run did.
    pub fn sort_with_stats<E>(&self, slice: &mut [E]) -> Result<SortStats, SortError>
    where
        E: Clone + Send,
        C: Comparator<E> + Sync,
    {
        match &self.pool {
            Some(pool) => pool.install(|| self.run(slice)),
            None => self.run(slice),
        }
    }

    fn run<E>(&self, slice: &mut [E]) -> Result<SortStats, SortError>
    where
        E: Clone + Send,
        C: Comparator<E> + Sync,
    {
        let len = slice.len();
        let cutoff = self.resolve_cutoff(len);
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("parsort_run", len, cutoff);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let ctx = RunContext::new(&self.comparator, &self.token, cutoff);
        sort_range(&ctx, slice, SortRange::full(len), 0)?;
        Ok(ctx.into_stats(len))
    }
}

#[cfg(not(feature = "parallel"))]
impl<C> SortEngine<C> {
    /// Sort `slice` in place and hand it back (serial execution).
    ///
    /// On `Err` the slice is still a permutation of the input, but its order
    /// is unspecified. Keep a copy of the input if you need to retry.
    ///
    /// # Panics
    /// A panic raised by the comparator propagates to the caller.
    pub fn sort<'s, E>(&self, slice: &'s mut [E]) -> Result<&'s mut [E], SortError>
    where
        E: Clone,
        C: Comparator<E>,
    {
        self.sort_with_stats(slice)?;
        Ok(slice)
    }

    /// Sort `slice` in place and report what the run did.
    pub fn sort_with_stats<E>(&self, slice: &mut [E]) -> Result<SortStats, SortError>
    where
        E: Clone,
        C: Comparator<E>,
    {
        let len = slice.len();
        let cutoff = self.resolve_cutoff(len);
        #[cfg(feature = "tracing")]
        let span = tracing::info_span!("parsort_run", len, cutoff);
        #[cfg(feature = "tracing")]
        let _enter = span.enter();

        let ctx = RunContext::new(&self.comparator, &self.token, cutoff);
        sort_range(&ctx, slice, SortRange::full(len), 0)?;
        Ok(ctx.into_stats(len))
    }
}

/// Sort `slice` by its natural order with a default engine.
///
/// ```
/// let mut v = vec![3, 1, 2];
/// parsort::sort(&mut v).unwrap();
/// assert_eq!(v, [1, 2, 3]);
/// ```
#[cfg(feature = "parallel")]
pub fn sort<E: Ord + Clone + Send>(slice: &mut [E]) -> Result<&mut [E], SortError> {
    SortEngine::default().sort(slice)
}

/// Sort `slice` with `comparator` on a default engine.
#[cfg(feature = "parallel")]
pub fn sort_by<E, C>(slice: &mut [E], comparator: C) -> Result<&mut [E], SortError>
where
    E: Clone + Send,
    C: Comparator<E> + Sync,
{
    SortEngine::new(comparator).sort(slice)
}

/// Sort `slice` by its natural order with a default engine.
///
/// ```
/// let mut v = vec![3, 1, 2];
/// parsort::sort(&mut v).unwrap();
/// assert_eq!(v, [1, 2, 3]);
/// ```
#[cfg(not(feature = "parallel"))]
pub fn sort<E: Ord + Clone>(slice: &mut [E]) -> Result<&mut [E], SortError> {
    SortEngine::default().sort(slice)
}

/// Sort `slice` with `comparator` on a default engine.
#[cfg(not(feature = "parallel"))]
pub fn sort_by<E, C>(slice: &mut [E], comparator: C) -> Result<&mut [E], SortError>
where
    E: Clone,
    C: Comparator<E>,
{
    SortEngine::new(comparator).sort(slice)
}
