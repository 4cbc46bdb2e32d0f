//! Merge of two adjacent sorted runs through a scratch buffer.

use std::cmp::Ordering;

use crate::error::CompareError;
use crate::traits::Comparator;

/// Merge `slice[..mid]` and `slice[mid..]`, both already sorted, into one
/// sorted run.
///
/// Ties take the left element, which keeps the sort stable. The merged run is
/// built in a scratch buffer and copied back only once every comparison has
/// succeeded; on `Err` the slice is left exactly as it was.
///
/// # Panics
/// Panics if `mid > slice.len()`.
pub fn merge_halves<E, C>(slice: &mut [E], mid: usize, cmp: &C) -> Result<(), CompareError>
where
    E: Clone,
    C: Comparator<E> + ?Sized,
{
    let (left, right) = slice.split_at(mid);
    if left.is_empty() || right.is_empty() {
        return Ok(());
    }

    let mut scratch: Vec<E> = Vec::with_capacity(slice.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if cmp.compare(&left[i], &right[j])? != Ordering::Greater {
            scratch.push(left[i].clone());
            i += 1;
        } else {
            scratch.push(right[j].clone());
            j += 1;
        }
    }
    // One run is exhausted; the rest of the other is already in order.
    scratch.extend_from_slice(&left[i..]);
    scratch.extend_from_slice(&right[j..]);

    slice.clone_from_slice(&scratch);
    Ok(())
}
