//! Index ranges assigned to sort tasks.
//!
//! Each `SortRange` is a half-open interval [start, end) of the input slice.
//! Splitting a range always yields two adjacent ranges whose union is the
//! original one, so the ranges of one recursion level never overlap.

/// Half-open interval [start, end) of slice indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortRange {
    /// Inclusive start index.
    pub start: usize,
    /// Exclusive end index.
    pub end: usize,
}

impl SortRange {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {start} past end {end}");
        Self { start, end }
    }

    /// Range covering a whole slice of length `len`.
    #[inline]
    pub fn full(len: usize) -> Self {
        Self::new(0, len)
    }

    /// Number of indices in the range.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true if the range is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// A leaf holds at most one element and is sorted by definition.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.len() <= 1
    }

    /// Offset of the split point relative to `start`.
    #[inline]
    pub fn mid_offset(&self) -> usize {
        self.len() / 2
    }

    /// Split into two adjacent halves whose lengths differ by at most one.
    #[inline]
    pub fn split(&self) -> (SortRange, SortRange) {
        let mid = self.start + self.mid_offset();
        (SortRange::new(self.start, mid), SortRange::new(mid, self.end))
    }
}

#[cfg(test)]
mod tests {
    use super::SortRange;

    #[test]
    fn zero_length_range_is_empty() {
        let r = SortRange::new(5, 5);
        assert_eq!(r.len(), 0);
        assert!(r.is_empty());
        assert!(r.is_leaf());
    }

    #[test]
    fn typical_range_len() {
        let r = SortRange::new(2, 7);
        assert_eq!(r.len(), 5);
        assert!(!r.is_empty());
        assert!(!r.is_leaf());
    }

    #[test]
    fn split_is_adjacent_and_balanced() {
        for len in 2..64 {
            let r = SortRange::new(10, 10 + len);
            let (left, right) = r.split();
            assert_eq!(left.start, r.start);
            assert_eq!(left.end, right.start);
            assert_eq!(right.end, r.end);
            assert!(left.len().abs_diff(right.len()) <= 1);
            assert!(!left.is_empty() && !right.is_empty());
        }
    }
}
