//! Depth-limited quicksort core: the partition primitive and the
//! introspective recursion scheme built on it.

use crate::pivot::median_of_three;
use crate::SMALL_SORT_THRESHOLD;

/// Partitions `v` around the element at `pivot_pos`.
///
/// Returns `cut` such that `v[..cut]` compares not-greater than the pivot,
/// `v[cut]` is the pivot at its final sorted position, and `v[cut + 1..]`
/// compares not-less than the pivot.
///
/// The pivot element is parked at `v[0]` for the duration of the scan. A
/// disjoint borrow of it stays valid while the remainder of the slice is
/// permuted, which sidesteps the aliasing that a by-value pivot copy would
/// need to paper over.
pub(crate) fn partition<T, F>(v: &mut [T], pivot_pos: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    v.swap(0, pivot_pos);
    let (pivot, rest) = v.split_at_mut(1);
    let pivot = &pivot[0];

    let num_left = hoare_partition(rest, pivot, is_less);

    // Seat the pivot between the two segments.
    v.swap(0, num_left);
    num_left
}

/// Converging two-cursor scan: advance from the left over elements that
/// compare less than the pivot, retreat from the right over elements the
/// pivot compares less than, swap the two stalled elements and continue
/// until the cursors cross. Elements equal to the pivot stall both scans,
/// which spreads duplicate runs over both segments and keeps the cuts
/// balanced on low-cardinality inputs.
///
/// Returns the number of elements assigned to the left segment.
fn hoare_partition<T, F>(v: &mut [T], pivot: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut lo = 0;
    let mut hi = v.len();

    loop {
        while lo < hi && is_less(&v[lo], pivot) {
            lo += 1;
        }
        while lo < hi && is_less(pivot, &v[hi - 1]) {
            hi -= 1;
        }

        // Zero or one unclassified element left; a single straddler compares
        // equal to the pivot and may go to either side.
        if hi - lo <= 1 {
            break;
        }

        v.swap(lo, hi - 1);
        lo += 1;
        hi -= 1;
    }

    lo
}

/// Sorts `v` down to coarse order: after return, no element is farther than
/// `SMALL_SORT_THRESHOLD` from its sorted position. Final ordering is left
/// to the caller's insertion-sort pass.
///
/// `limit` is the number of allowed partition levels before switching to
/// heapsort. If zero, the remaining segment is heapsorted immediately.
pub(crate) fn intro_sort<T, F>(mut v: &mut [T], mut limit: u32, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    while v.len() > SMALL_SORT_THRESHOLD {
        if limit == 0 {
            // Too many bad pivot choices. Heapsort the rest in order to
            // guarantee `O(n * log(n))` worst-case.
            crate::select::partial_sort_impl(v, v.len(), is_less);
            return;
        }
        limit -= 1;

        let pivot_pos = median_of_three(v, is_less);
        let cut = partition(v, pivot_pos, is_less);

        // The pivot already sits at its final position. Recurse into the
        // right segment, once per level; the loop continues on the left one.
        // The recursion chain is bounded by `limit`, so there is no need to
        // pick the shorter side.
        let (left, right) = { v }.split_at_mut(cut);
        intro_sort(&mut right[1..], limit, is_less);
        v = left;
    }
}
