//! Comparison capability used by the engine.
//!
//! To sort a custom element type with a custom order, implement
//! [`Comparator`] for a small struct that carries whatever the order needs
//! (a key extractor, a locale, a lookup table). The engine only ever asks for
//! a three-way answer between two elements of the slice it is sorting.
//!
//! Ready-made comparators:
//! - [`NaturalOrder`]: the element's own [`Ord`].
//! - [`FnComparator`]: any `Fn(&E, &E) -> Ordering`.
//! - [`TryFnComparator`]: a closure that may fail with [`CompareError`].
//! - [`ByKey`]: order by an extracted `Ord` key.

use std::cmp::Ordering;

use crate::error::CompareError;

/// A total order over `E`.
///
/// The order must be consistent (transitive, antisymmetric). The engine
/// assumes this and does not check it; an inconsistent order still yields a
/// permutation of the input, just not a sorted one.
///
/// Returning `Err` aborts the sort: no merge that depends on the failed
/// comparison is committed.
pub trait Comparator<E: ?Sized> {
    /// Compare `a` to `b`.
    fn compare(&self, a: &E, b: &E) -> Result<Ordering, CompareError>;
}

impl<E: ?Sized, C: Comparator<E> + ?Sized> Comparator<E> for &C {
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Result<Ordering, CompareError> {
        (**self).compare(a, b)
    }
}

/// Ascending order according to `E: Ord`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NaturalOrder;

impl<E: Ord + ?Sized> Comparator<E> for NaturalOrder {
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Result<Ordering, CompareError> {
        Ok(a.cmp(b))
    }
}

/// Infallible closure comparator.
#[derive(Clone, Copy)]
pub struct FnComparator<F>(pub F);

impl<E, F> Comparator<E> for FnComparator<F>
where
    F: Fn(&E, &E) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Result<Ordering, CompareError> {
        Ok((self.0)(a, b))
    }
}

/// Fallible closure comparator.
#[derive(Clone, Copy)]
pub struct TryFnComparator<F>(pub F);

impl<E, F> Comparator<E> for TryFnComparator<F>
where
    F: Fn(&E, &E) -> Result<Ordering, CompareError>,
{
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Result<Ordering, CompareError> {
        (self.0)(a, b)
    }
}

/// Orders elements by a key extracted from each one.
#[derive(Clone, Copy)]
pub struct ByKey<F>(pub F);

impl<E, K, F> Comparator<E> for ByKey<F>
where
    F: Fn(&E) -> K,
    K: Ord,
{
    #[inline]
    fn compare(&self, a: &E, b: &E) -> Result<Ordering, CompareError> {
        Ok((self.0)(a).cmp(&(self.0)(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_order_matches_ord() {
        assert_eq!(NaturalOrder.compare(&1, &2), Ok(Ordering::Less));
        assert_eq!(NaturalOrder.compare("b", "a"), Ok(Ordering::Greater));
        assert_eq!(NaturalOrder.compare(&7u8, &7u8), Ok(Ordering::Equal));
    }

    #[test]
    fn closure_comparators() {
        let desc = FnComparator(|a: &i32, b: &i32| b.cmp(a));
        assert_eq!(desc.compare(&1, &2), Ok(Ordering::Greater));

        let nan_aware = TryFnComparator(|a: &f64, b: &f64| {
            a.partial_cmp(b)
                .ok_or_else(|| CompareError::new("unordered float"))
        });
        assert_eq!(nan_aware.compare(&1.0, &2.0), Ok(Ordering::Less));
        assert!(nan_aware.compare(&f64::NAN, &2.0).is_err());
    }

    #[test]
    fn by_key_ignores_payload() {
        let by_first = ByKey(|p: &(u32, char)| p.0);
        assert_eq!(by_first.compare(&(4, 'a'), &(4, 'b')), Ok(Ordering::Equal));
        assert_eq!(by_first.compare(&(2, 'z'), &(4, 'a')), Ok(Ordering::Less));
    }

    #[test]
    fn reference_forwards() {
        let cmp = NaturalOrder;
        let by_ref = &cmp;
        assert_eq!(Comparator::<i32>::compare(&by_ref, &3, &3), Ok(Ordering::Equal));
    }
}
