//! Fork-join parallel merge sort
//!
//! This crate sorts a mutable slice in place by recursively splitting it into
//! halves, sorting the halves concurrently, and merging the sorted halves
//! back together.
//!
//! ## Core idea
//! 1. Every range longer than one element is split at its midpoint.
//! 2. Ranges above the sequential cutoff fork both halves with
//!    `rayon::join`; smaller ones recurse inline.
//! 3. Once both halves have returned, the parent merges them through a
//!    scratch buffer. Ties take the left element, so the sort is stable.
//!
//! A [`CancellationToken`] is checked by every task before it splits and
//! again after its join. A task that sees it fired skips its merge and
//! reports [`SortError::Interrupted`], and so does every ancestor. A failing
//! [`Comparator`] aborts the run the same way with
//! [`SortError::Comparison`]. Either way, the slice is left as a permutation
//! of the input.
//!
//! ## Quick start
//! ```
//! use parsort::{ByKey, SortEngine};
//!
//! let mut v = vec![(4, 'a'), (4, 'b'), (2, 'c'), (2, 'd')];
//! SortEngine::new(ByKey(|p: &(u32, char)| p.0)).sort(&mut v).unwrap();
//! assert_eq!(v, [(2, 'c'), (2, 'd'), (4, 'a'), (4, 'b')]);
//! ```
//!
//! ## Features
//! - `parallel` (default): fork with rayon. Without it the same recursion
//!   runs on the calling thread.
//! - `tracing`: spans per run, range and merge.

pub mod builder;
pub mod cancel;
pub mod engine;
pub mod error;
pub mod merge;
pub mod range;
pub mod traits;
pub mod utils;

pub use crate::builder::SortEngineBuilder;
pub use crate::cancel::CancellationToken;
pub use crate::engine::{sort, sort_by, SortEngine, SortStats};
pub use crate::error::{CompareError, SortError};
pub use crate::traits::{ByKey, Comparator, FnComparator, NaturalOrder, TryFnComparator};
