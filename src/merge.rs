//! Stable adaptive in-place merge and the rotation primitive it rests on.
//!
//! The merge picks its strategy by how much scratch memory it could obtain:
//! a staged linear merge when one run fits the scratch, a buffer-assisted
//! divide-and-conquer when only parts fit, and a pure divide-and-rotate
//! scheme when no scratch is available at all. Allocation failure is a
//! branch, not an error.

use core::cmp::Ordering;
use core::mem;
use core::ptr;

/// Merges the two consecutive sorted runs `v[..mid]` and `v[mid..]` into a
/// single sorted range, preserving the relative order of equal elements:
/// ties from the first run end up before ties from the second. Stability is
/// part of the contract here, unlike the general [`sort`](crate::sort).
///
/// Both runs must already be sorted under the element order; with unsorted
/// input the result is unspecified but remains a permutation.
///
/// A scratch buffer sized to the shorter run is used when it can be
/// allocated. If the allocation fails the merge transparently degrades to a
/// buffer-free divide-and-rotate strategy with the same result and more
/// data movement.
///
/// # Panics
///
/// Panics if `mid > v.len()`.
///
/// # Examples
///
/// ```
/// let mut v = [1, 3, 5, 2, 4, 6];
/// sortcore::inplace_merge(&mut v, 3);
/// assert_eq!(v, [1, 2, 3, 4, 5, 6]);
/// ```
pub fn inplace_merge<T>(v: &mut [T], mid: usize)
where
    T: Ord,
{
    inplace_merge_impl(v, mid, &mut |a, b| a.lt(b));
}

/// Like [`inplace_merge`] with a comparator defining the order.
pub fn inplace_merge_by<T, F>(v: &mut [T], mid: usize, mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    inplace_merge_impl(v, mid, &mut |a, b| compare(a, b) == Ordering::Less);
}

// --- IMPL ---

fn inplace_merge_impl<T, F>(v: &mut [T], mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    assert!(mid <= v.len());

    // Every permutation of zero-sized values is the same slice; the hole
    // guards below also rely on `offset_from`, which is not defined for
    // them.
    if mem::size_of::<T>() == 0 {
        return;
    }

    let len1 = mid;
    let len2 = v.len() - mid;
    if len1 == 0 || len2 == 0 {
        return;
    }

    // Try to obtain scratch space for the smaller run. The Vec's length
    // stays zero the whole time: elements only move through the spare
    // capacity and are always moved back out, so dropping it never drops
    // elements and the memory is released on every path out of here.
    let scratch_len = len1.min(len2);
    let mut scratch: Vec<T> = Vec::new();
    if scratch.try_reserve_exact(scratch_len).is_ok() {
        // SAFETY: the reserve succeeded, so `scratch.as_mut_ptr()` is valid
        // for `scratch_len` writes and cannot alias `v`.
        unsafe {
            merge_adaptive(v, mid, scratch.as_mut_ptr(), scratch_len, is_less);
        }
    } else {
        merge_without_buffer(v, mid, is_less);
    }
}

/// Buffer-assisted merge. When one of the runs fits the scratch it is staged
/// there and merged linearly; otherwise the problem is split at matched cut
/// points and both halves are merged recursively, which bounds scratch usage
/// at `buf_cap` regardless of input size.
///
/// SAFETY: `buf` must be valid for `buf_cap` writes and must not alias `v`.
unsafe fn merge_adaptive<T, F>(
    v: &mut [T],
    mid: usize,
    buf: *mut T,
    buf_cap: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    let len1 = mid;
    let len2 = v.len() - mid;

    // The recursion can produce empty sides.
    if len1 == 0 || len2 == 0 {
        return;
    }

    if len1 <= len2 && len1 <= buf_cap {
        merge_forward(v, mid, buf, is_less);
    } else if len2 <= buf_cap {
        merge_backward(v, mid, buf, is_less);
    } else {
        let (first_cut, second_cut) = split_runs(v, mid, is_less);
        let new_mid = first_cut + (second_cut - mid);

        rotate_adaptive(&mut v[first_cut..second_cut], mid - first_cut, buf, buf_cap);

        merge_adaptive(&mut v[..new_mid], first_cut, buf, buf_cap, is_less);
        merge_adaptive(&mut v[new_mid..], second_cut - new_mid, buf, buf_cap, is_less);
    }
}

/// Buffer-free merge: bisect the longer run, binary-search the matching
/// insertion point in the other, rotate the middle region so the runs
/// interleave correctly at that boundary, and recurse on the two halves.
/// *O*(*n* \* log(*n*)) comparisons, no allocation.
pub(crate) fn merge_without_buffer<T, F>(v: &mut [T], mid: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len1 = mid;
    let len2 = v.len() - mid;

    if len1 == 0 || len2 == 0 {
        return;
    }
    if len1 + len2 == 2 {
        if is_less(&v[1], &v[0]) {
            v.swap(0, 1);
        }
        return;
    }

    let (first_cut, second_cut) = split_runs(v, mid, is_less);
    let new_mid = first_cut + (second_cut - mid);

    rotate(&mut v[first_cut..second_cut], mid - first_cut);

    merge_without_buffer(&mut v[..new_mid], first_cut, is_less);
    merge_without_buffer(&mut v[new_mid..], second_cut - new_mid, is_less);
}

/// Picks matched cut points in the two sorted runs of `v`: the longer run is
/// bisected and the matching position in the other run found by binary
/// search. Equal elements stay with the first run (`upper_bound` on the left
/// run, `lower_bound` on the right one), which preserves merge stability
/// across the split.
///
/// Returns `(first_cut, second_cut)` with `first_cut <= mid <= second_cut`.
fn split_runs<T, F>(v: &[T], mid: usize, is_less: &mut F) -> (usize, usize)
where
    F: FnMut(&T, &T) -> bool,
{
    let len1 = mid;
    let len2 = v.len() - mid;

    if len1 > len2 {
        let first_cut = len1 / 2;
        let second_cut = mid + lower_bound(&v[mid..], &v[first_cut], is_less);
        (first_cut, second_cut)
    } else {
        let second_cut = mid + len2 / 2;
        let first_cut = upper_bound(&v[..mid], &v[second_cut], is_less);
        (first_cut, second_cut)
    }
}

/// Stages the left run in the scratch and merges front to back. Ties take
/// the staged (left-run) element first.
///
/// SAFETY: `buf` must be valid for `mid` writes and must not alias `v`.
unsafe fn merge_forward<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let base = v.as_mut_ptr();

    ptr::copy_nonoverlapping(base, buf, mid);

    // The hole guard owns the staged elements. If a comparison panics, its
    // drop moves the not-yet-merged remainder back into the gap, which at
    // that point is exactly `end - start` slots wide starting at `dest`.
    let mut hole = ForwardMergeHole {
        start: buf,
        end: buf.add(mid),
        dest: base,
    };
    let mut right = base.add(mid);
    let right_end = base.add(len);

    while hole.start < hole.end && right < right_end {
        // `!is_less(right, left)` keeps equal elements of the left run in
        // front.
        let consumed: *const T = if is_less(&*right, &*hole.start) {
            let r = right;
            right = right.add(1);
            r
        } else {
            let l = hole.start;
            hole.start = hole.start.add(1);
            l
        };
        ptr::copy_nonoverlapping(consumed, hole.dest, 1);
        hole.dest = hole.dest.add(1);
    }

    // If the right run ran out first, the guard's drop moving the staged
    // remainder into place is the normal epilogue, not just the panic path.
    // If the staged run ran out, the right remainder already sits in place.
}

/// Stages the right run in the scratch and merges back to front, so the
/// unread tail of the left run is never overwritten. Ties take the staged
/// (right-run) element last.
///
/// SAFETY: `buf` must be valid for `v.len() - mid` writes and must not
/// alias `v`.
unsafe fn merge_backward<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let len2 = len - mid;
    let base = v.as_mut_ptr();

    ptr::copy_nonoverlapping(base.add(mid), buf, len2);

    let mut hole = BackwardMergeHole {
        start: buf,
        end: buf.add(len2),
        out: base.add(len),
    };
    let left_start = base;
    // One past the last unread element of the left run.
    let mut left = base.add(mid);

    while hole.start < hole.end && left > left_start {
        let consumed: *const T = if is_less(&*hole.end.sub(1), &*left.sub(1)) {
            left = left.sub(1);
            left
        } else {
            hole.end = hole.end.sub(1);
            hole.end
        };
        hole.out = hole.out.sub(1);
        ptr::copy_nonoverlapping(consumed, hole.out, 1);
    }

    // A remaining left run is already in place; a remaining staged run is
    // moved to the front by the guard's drop.
}

struct ForwardMergeHole<T> {
    start: *mut T,
    end: *mut T,
    dest: *mut T,
}

impl<T> Drop for ForwardMergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: `[start, end)` holds staged elements whose home slots
        // starting at `dest` are unoccupied.
        unsafe {
            let count = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.dest, count);
        }
    }
}

struct BackwardMergeHole<T> {
    start: *mut T,
    end: *mut T,
    out: *mut T,
}

impl<T> Drop for BackwardMergeHole<T> {
    fn drop(&mut self) {
        // SAFETY: the unoccupied gap is exactly the `end - start` slots
        // directly below `out`.
        unsafe {
            let count = self.end.offset_from(self.start) as usize;
            ptr::copy_nonoverlapping(self.start, self.out.sub(count), count);
        }
    }
}

/// Rotation with scratch assistance: when either block fits the scratch it
/// is staged there and the other block moved over in one go, three bulk
/// copies in total. Falls back to the cycle-following [`rotate`] otherwise.
///
/// SAFETY: `buf` must be valid for `buf_cap` writes and must not alias `v`.
unsafe fn rotate_adaptive<T>(v: &mut [T], mid: usize, buf: *mut T, buf_cap: usize) {
    let len1 = mid;
    let len2 = v.len() - mid;
    let base = v.as_mut_ptr();

    // No comparator runs here, so the transient holes need no guard.
    if len1 > len2 && len2 <= buf_cap {
        ptr::copy_nonoverlapping(base.add(mid), buf, len2);
        ptr::copy(base, base.add(len2), len1);
        ptr::copy_nonoverlapping(buf, base, len2);
    } else if len1 <= buf_cap {
        ptr::copy_nonoverlapping(base, buf, len1);
        ptr::copy(base.add(mid), base, len2);
        ptr::copy_nonoverlapping(buf, base.add(len2), len1);
    } else {
        rotate(v, mid);
    }
}

/// Exchanges `v[..mid]` and `v[mid..]` in place by cycle-following: the
/// permutation decomposes into `gcd(n, mid)` independent cycles, each walked
/// once with a single displaced value. Exactly `n` element moves, *O*(1)
/// extra space, no comparisons.
pub(crate) fn rotate<T>(v: &mut [T], mid: usize) {
    let n = v.len();
    if mid == 0 || mid == n {
        return;
    }

    let cycles = gcd(n, mid);
    let base = v.as_mut_ptr();

    // SAFETY: every index is reduced mod n before use. No user code runs
    // between the initial read and the final write of a cycle, so the
    // transient duplicate of the displaced value is never observable.
    unsafe {
        for start in 0..cycles {
            let displaced = ptr::read(base.add(start));
            let mut hole = start;

            loop {
                let mut next = hole + mid;
                if next >= n {
                    next -= n;
                }
                if next == start {
                    break;
                }
                ptr::copy_nonoverlapping(base.add(next), base.add(hole), 1);
                hole = next;
            }

            ptr::write(base.add(hole), displaced);
        }
    }
}

fn gcd(mut m: usize, mut n: usize) -> usize {
    while n != 0 {
        let t = m % n;
        m = n;
        n = t;
    }
    m
}

/// First position in sorted `v` whose element is not less than `value`.
fn lower_bound<T, F>(v: &[T], value: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = 0;
    let mut len = v.len();

    while len > 0 {
        let half = len / 2;
        let mid = first + half;
        if is_less(&v[mid], value) {
            first = mid + 1;
            len = len - half - 1;
        } else {
            len = half;
        }
    }

    first
}

/// First position in sorted `v` whose element `value` compares less than.
fn upper_bound<T, F>(v: &[T], value: &T, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut first = 0;
    let mut len = v.len();

    while len > 0 {
        let half = len / 2;
        let mid = first + half;
        if is_less(value, &v[mid]) {
            len = half;
        } else {
            first = mid + 1;
            len = len - half - 1;
        }
    }

    first
}
