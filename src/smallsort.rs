//! Insertion sorts: the small-range workhorse and the finishing pass that
//! completes the coarsely ordered output of the partition loop.

use core::mem::ManuallyDrop;
use core::ptr;

use crate::{GapGuard, SMALL_SORT_THRESHOLD};

/// Inserts `v[len - 1]` into the sorted prefix `v[..len - 1]` so that all of
/// `v` becomes sorted. Backward linear scan, one move per shifted element.
pub(crate) fn insert_tail<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    debug_assert!(v.len() >= 2);

    let base = v.as_mut_ptr();
    let i = v.len() - 1;

    // SAFETY: We checked that `v.len()` is at least 2, so `i` and `i - 1`
    // are in-bounds. Intermediate state is tracked by `gap`: if `is_less`
    // panics, the guard drops and fills the hole, so `v` still holds every
    // element exactly once.
    unsafe {
        let end = base.add(i);

        // Compare through the slice first; only open the gap when the
        // element actually has to move.
        if !is_less(&*end, &*end.sub(1)) {
            return;
        }

        let mut gap = GapGuard {
            pos: end.sub(1),
            value: ManuallyDrop::new(ptr::read(end)),
        };
        ptr::copy_nonoverlapping(gap.pos, end, 1);

        let mut j = i - 1;
        while j > 0 {
            let prev = base.add(j - 1);
            if !is_less(&*gap.value, &*prev) {
                break;
            }
            ptr::copy_nonoverlapping(prev, gap.pos, 1);
            gap.pos = prev;
            j -= 1;
        }
        // `gap` drops here and seats the value.
    }
}

/// Bounds-aware insertion sort.
///
/// A new minimum is detected with a single comparison against `v[0]` and
/// placed by block-shifting the whole sorted prefix one slot to the right.
/// Everything else takes the backward-scan path, for which the front check
/// doubles as the sentinel that keeps the scan short.
pub(crate) fn insertion_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len < 2 {
        return;
    }

    for i in 1..len {
        if is_less(&v[i], &v[0]) {
            // SAFETY: i >= 1 and in-bounds. No comparison runs while the
            // hole is open, the two copies cannot panic, so no guard is
            // needed.
            unsafe {
                let base = v.as_mut_ptr();
                let value = ManuallyDrop::new(ptr::read(base.add(i)));
                ptr::copy(base, base.add(1), i);
                ptr::copy_nonoverlapping(&*value, base, 1);
            }
        } else {
            insert_tail(&mut v[..=i], is_less);
        }
    }
}

/// Finishing pass of the hybrid sort.
///
/// Precondition: every element of `v` is within [`SMALL_SORT_THRESHOLD`] of
/// its sorted position (the partition loop's postcondition). The first
/// threshold-sized section is insertion sorted with full checks; each tail
/// element is then inserted by a backward scan that the precondition keeps
/// from travelling more than a threshold's worth of slots.
pub(crate) fn final_insertion_sort<T, F>(v: &mut [T], is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();

    if len > SMALL_SORT_THRESHOLD {
        insertion_sort(&mut v[..SMALL_SORT_THRESHOLD], is_less);
        for i in SMALL_SORT_THRESHOLD..len {
            insert_tail(&mut v[..=i], is_less);
        }
    } else {
        insertion_sort(v, is_less);
    }
}
