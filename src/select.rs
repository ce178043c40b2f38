//! Order-statistic selection: quickselect and bounded-heap top-k.

use core::cmp::Ordering;

use crate::heap;
use crate::pivot::median_of_three;
use crate::quicksort::partition;
use crate::smallsort::insertion_sort;

/// Reorders `v` so that `v[nth]` holds the value it would hold if the whole
/// slice were sorted, everything before it compares not-greater than it, and
/// everything after compares not-less. Neither side is sorted.
///
/// `nth == v.len()` is a no-op. Expected *O*(*n*); the partition recursion is
/// single-sided and, unlike [`sort`](crate::sort), deliberately not
/// depth-limited, so adversarial pivot sequences can reach *O*(*n*²).
///
/// # Examples
///
/// ```
/// let mut v = [7, 2, 9, 4, 1];
/// sortcore::nth_element(&mut v, 2);
///
/// assert_eq!(v[2], 4);
/// assert!(v[..2].iter().all(|e| *e <= 4));
/// assert!(v[3..].iter().all(|e| *e >= 4));
/// ```
pub fn nth_element<T>(v: &mut [T], nth: usize)
where
    T: Ord,
{
    nth_element_impl(v, nth, &mut |a, b| a.lt(b));
}

/// Like [`nth_element`] with a comparator defining the order.
pub fn nth_element_by<T, F>(v: &mut [T], nth: usize, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    nth_element_impl(v, nth, &mut |a, b| compare(a, b) == Ordering::Less);
}

/// Sorts the `mid` smallest elements of `v` ascending into `v[..mid]`,
/// leaving `v[mid..]` in unspecified order. *O*(*n* \* log(*mid*)).
///
/// # Examples
///
/// ```
/// let mut v = [9, 1, 5, 3, 7, 2];
/// sortcore::partial_sort(&mut v, 3);
/// assert_eq!(&v[..3], &[1, 2, 3]);
/// ```
pub fn partial_sort<T>(v: &mut [T], mid: usize)
where
    T: Ord,
{
    partial_sort_impl(v, mid, &mut |a, b| a.lt(b));
}

/// Like [`partial_sort`] with a comparator defining the order.
pub fn partial_sort_by<T, F>(v: &mut [T], mid: usize, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    partial_sort_impl(v, mid, &mut |a, b| compare(a, b) == Ordering::Less);
}

/// Writes the `min(src.len(), dst.len())` smallest elements of `src` into
/// `dst`, sorted ascending, without touching `src`. Returns the number of
/// elements written.
///
/// # Examples
///
/// ```
/// let src = [9, 1, 5, 3, 7];
/// let mut dst = [0; 3];
/// let written = sortcore::partial_sort_copy(&src, &mut dst);
///
/// assert_eq!(written, 3);
/// assert_eq!(dst, [1, 3, 5]);
/// ```
pub fn partial_sort_copy<T>(src: &[T], dst: &mut [T]) -> usize
where
    T: Ord + Clone,
{
    partial_sort_copy_impl(src, dst, &mut |a, b| a.lt(b))
}

/// Like [`partial_sort_copy`] with a comparator defining the order.
pub fn partial_sort_copy_by<T, F>(src: &[T], dst: &mut [T], mut compare: F) -> usize
where
    T: Clone,
    F: FnMut(&T, &T) -> Ordering,
{
    partial_sort_copy_impl(src, dst, &mut |a, b| compare(a, b) == Ordering::Less)
}

// --- IMPL ---

fn nth_element_impl<T, F>(mut v: &mut [T], mut nth: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(nth <= v.len());
    if nth >= v.len() {
        return;
    }

    // Single-sided quickselect: only the partition containing `nth` is
    // visited again, so the loop carries no stack.
    while v.len() > 3 {
        let pivot_pos = median_of_three(v, is_less);
        let cut = partition(v, pivot_pos, is_less);

        if cut == nth {
            // The pivot was seated exactly at the requested rank.
            return;
        }

        if cut < nth {
            let (_, right) = { v }.split_at_mut(cut + 1);
            v = right;
            nth -= cut + 1;
        } else {
            let (left, _) = { v }.split_at_mut(cut);
            v = left;
        }
    }

    insertion_sort(v, is_less);
}

pub(crate) fn partial_sort_impl<T, F>(v: &mut [T], mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(mid <= v.len());
    if mid == 0 {
        return;
    }

    // Bounded-heap selection: the prefix heap always holds the `mid`
    // smallest elements seen so far, with the largest of them at the root.
    heap::make_heap_impl(&mut v[..mid], is_less);
    for i in mid..v.len() {
        if is_less(&v[i], &v[0]) {
            heap::replace_top(v, mid, i, is_less);
        }
    }

    heap::sort_heap_impl(&mut v[..mid], is_less);
}

fn partial_sort_copy_impl<T, F>(src: &[T], dst: &mut [T], is_less: &mut F) -> usize
where
    T: Clone,
    F: FnMut(&T, &T) -> bool,
{
    let k = src.len().min(dst.len());
    if k == 0 {
        return 0;
    }

    for (d, s) in dst[..k].iter_mut().zip(&src[..k]) {
        d.clone_from(s);
    }

    heap::make_heap_impl(&mut dst[..k], is_less);
    for s in &src[k..] {
        if is_less(s, &dst[0]) {
            heap::replace_top_with(&mut dst[..k], s.clone(), is_less);
        }
    }

    heap::sort_heap_impl(&mut dst[..k], is_less);
    k
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns;

    #[test]
    fn partial_sort_prefix_matches_full_sort() {
        for len in [1, 2, 3, 10, 129, 1000] {
            let input = patterns::random(len);
            let mut expected = input.clone();
            expected.sort_unstable();

            for mid in [0, 1, len / 2, len] {
                let mut v = input.clone();
                partial_sort(&mut v, mid);
                assert_eq!(&v[..mid], &expected[..mid], "len: {len} mid: {mid}");

                // The tail is unspecified but must be the complementary
                // multiset.
                let mut tail: Vec<_> = v[mid..].to_vec();
                tail.sort_unstable();
                assert_eq!(&tail[..], &expected[mid..]);
            }
        }
    }

    #[test]
    fn nth_element_partitions_every_rank() {
        for len in [1, 2, 3, 4, 5, 33, 500] {
            let input = patterns::random_uniform(len, 0..50);
            let mut expected = input.clone();
            expected.sort_unstable();

            for nth in 0..len {
                let mut v = input.clone();
                nth_element(&mut v, nth);

                assert_eq!(v[nth], expected[nth], "len: {len} nth: {nth}");
                assert!(v[..nth].iter().all(|e| *e <= v[nth]));
                assert!(v[nth + 1..].iter().all(|e| *e >= v[nth]));
            }
        }
    }

    #[test]
    fn nth_element_past_the_end_is_a_noop() {
        let mut v = patterns::random(10);
        let orig = v.clone();
        nth_element(&mut v, 10);
        assert_eq!(v, orig);
    }

    #[test]
    fn nth_element_presorted_input() {
        // Pre-sorted runs feed the worst pivots to plain quickselect; the
        // median-of-three choice must keep this linear-ish, and at the very
        // least correct.
        let mut v = patterns::ascending(10_000);
        nth_element(&mut v, 5_000);
        assert_eq!(v[5_000], 5_000);

        let mut v = patterns::descending(10_000);
        nth_element(&mut v, 123);
        assert_eq!(v[123], 123);
    }

    #[test]
    fn partial_sort_copy_dst_shapes() {
        let src = patterns::random(200);
        let mut expected = src.clone();
        expected.sort_unstable();

        // Shorter, equal and longer destinations.
        for dst_len in [0, 1, 3, 200, 300] {
            let mut dst = vec![0; dst_len];
            let written = partial_sort_copy(&src, &mut dst);

            assert_eq!(written, dst_len.min(200));
            assert_eq!(&dst[..written], &expected[..written]);
        }

        // Source untouched by construction (shared borrow), result ordered.
        assert_eq!(src.len(), 200);
    }

    #[test]
    fn partial_sort_copy_by_reverse() {
        let src = patterns::random(50);
        let mut expected = src.clone();
        expected.sort_unstable_by(|a, b| b.cmp(a));

        let mut dst = vec![0; 7];
        let written = partial_sort_copy_by(&src, &mut dst, |a, b| b.cmp(a));

        assert_eq!(written, 7);
        assert_eq!(&dst[..], &expected[..7]);
    }
}
