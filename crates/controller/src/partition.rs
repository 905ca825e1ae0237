//! Deterministic work partitioning.
//!
//! Both functions uphold the same contract: for a fixed input and worker
//! count, the per-worker slices are pairwise disjoint, their union recovers
//! the input exactly, and repeated calls return identical results. The
//! controller relies on nothing beyond that.
//!
//! Discrete sequences are sliced round-robin (worker `i` takes elements
//! `i, i+total, i+2*total, ...`) so short lists - proxy pools are often
//! shorter than the worker count - still spread as evenly as possible.
//! Numeric ranges are sliced into contiguous blocks, with the remainder
//! spread over the lowest-indexed workers.

use yantra_common::IdRange;

/// Worker `index`'s slice of `items`, out of `total` workers.
///
/// With `total > items.len()` the tail workers receive empty slices.
#[must_use]
pub fn slice_of<T: Clone>(items: &[T], index: usize, total: usize) -> Vec<T> {
    assert!(total > 0, "worker count must be at least 1");
    assert!(index < total, "worker index out of range");
    items.iter().skip(index).step_by(total).cloned().collect()
}

/// Worker `index`'s contiguous sub-interval of `range`, out of `total`.
///
/// An empty input range yields empty sub-ranges for every worker.
#[must_use]
pub fn slice_of_range(range: &IdRange, index: usize, total: usize) -> IdRange {
    assert!(total > 0, "worker count must be at least 1");
    assert!(index < total, "worker index out of range");

    let len = range.len();
    let base = len / total as u64;
    let rem = len % total as u64;
    let index = index as u64;

    // Workers below `rem` take one extra identifier each.
    let start = range.start + index * base + index.min(rem);
    let extra = u64::from(index < rem);
    IdRange::new(start, start + base + extra)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Union of all slices must reconstruct the input, no dupes, no holes.
    #[test]
    fn list_slices_cover_without_overlap() {
        let items: Vec<u32> = (0..37).collect();
        for total in 1..=8 {
            let mut seen: Vec<u32> = (0..total)
                .flat_map(|i| slice_of(&items, i, total))
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, items, "total={total}");
        }
    }

    #[test]
    fn list_slices_are_deterministic() {
        let items: Vec<u32> = (0..100).collect();
        assert_eq!(slice_of(&items, 3, 7), slice_of(&items, 3, 7));
    }

    #[test]
    fn more_workers_than_items_leaves_tail_empty() {
        let items = vec![10, 20];
        assert_eq!(slice_of(&items, 0, 5), vec![10]);
        assert_eq!(slice_of(&items, 1, 5), vec![20]);
        assert!(slice_of(&items, 4, 5).is_empty());
    }

    #[test]
    fn range_slices_cover_without_overlap() {
        let range = IdRange::new(1000, 1037);
        for total in 1..=8 {
            let slices: Vec<IdRange> =
                (0..total).map(|i| slice_of_range(&range, i, total)).collect();
            // Contiguous: each slice starts where the previous one ended.
            let mut cursor = range.start;
            for s in &slices {
                assert_eq!(s.start, cursor, "total={total}");
                cursor = s.end;
            }
            assert_eq!(cursor, range.end, "total={total}");
            // Sizes differ by at most one identifier.
            let min = slices.iter().map(IdRange::len).min().unwrap();
            let max = slices.iter().map(IdRange::len).max().unwrap();
            assert!(max - min <= 1, "total={total}");
        }
    }

    #[test]
    fn range_slices_are_deterministic() {
        let range = IdRange::new(0, 1_000_000);
        assert_eq!(slice_of_range(&range, 2, 5), slice_of_range(&range, 2, 5));
    }

    #[test]
    fn empty_range_yields_empty_slices() {
        let range = IdRange::new(42, 42);
        for i in 0..4 {
            assert!(slice_of_range(&range, i, 4).is_empty());
        }
    }
}
