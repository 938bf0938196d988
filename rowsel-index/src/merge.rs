//! Composition of row indexes.
//!
//! Given a map from rows of A onto rows of B and a map from rows of B onto
//! rows of C, [`merge`] produces the map from rows of A onto rows of C. The
//! result shape is decided per input-shape pair: slices compose into slices,
//! 32-bit gathers stay 32-bit, and every 64-bit result is handed to the
//! compactifier before it escapes.

use crate::buffer::{IndexBuf, IndexWidth};
use crate::index::{Payload, RowIndex};

/// Compose `ab` (A→B, optional) with `bc` (B→C) into A→C.
///
/// With no `ab` the result is a clone of `bc`. The length of the result is
/// always the length of `bc`; a zero-length composition is the empty slice
/// `(start 0, step 1)`.
///
/// Every value of `bc` must be a valid position of `ab`. That is a caller
/// contract, not validated here; a violation panics on the array paths via
/// bounds checking.
pub fn merge(ab: Option<&RowIndex>, bc: &RowIndex) -> RowIndex {
    let n = bc.len;
    if n == 0 {
        return RowIndex::new_slice_unchecked(0, 1, 0, 0, 0);
    }
    let Some(ab) = ab else {
        return bc.clone();
    };
    match &bc.payload {
        Payload::Slice { start, step } => merge_into_slice(ab, *start, *step, n),
        Payload::Arr(buf_bc) => merge_into_array(ab, buf_bc),
    }
}

fn merge_into_slice(ab: &RowIndex, start_bc: i64, step_bc: i64, n: i64) -> RowIndex {
    match &ab.payload {
        Payload::Slice {
            start: start_ab,
            step: step_ab,
        } => {
            // Product of two slices is again a slice.
            let start = start_ab + step_ab * start_bc;
            let step = step_ab * step_bc;
            let end = start + step * (n - 1);
            let (min, max) = if step >= 0 { (start, end) } else { (end, start) };
            RowIndex::new_slice_unchecked(start, step, n, min, max)
        }
        Payload::Arr(buf) if step_bc == 0 => {
            // B->C repeats a single row, so A->C is constant even though
            // A->B is an array.
            let row = match buf.width() {
                IndexWidth::W32 => i64::from(buf.as_i32()[start_bc as usize]),
                IndexWidth::W64 => buf.as_i64()[start_bc as usize],
            };
            RowIndex::new_slice_unchecked(row, 0, n, row, row)
        }
        Payload::Arr(buf) => match buf.width() {
            IndexWidth::W32 => {
                // Every row of A->B fits in 32 bits, so any slice of them
                // does too.
                let (out, min, max) = gather_strided(buf.as_i32(), start_bc, step_bc, n);
                RowIndex::new_arr32(out, i64::from(min), i64::from(max))
            }
            IndexWidth::W64 => {
                let (out, min, max) = gather_strided(buf.as_i64(), start_bc, step_bc, n);
                let mut res = RowIndex::new_arr64(out, min, max);
                res.compactify();
                res
            }
        },
    }
}

fn merge_into_array(ab: &RowIndex, buf_bc: &IndexBuf) -> RowIndex {
    match &ab.payload {
        Payload::Slice { start, step } => {
            let (out, min, max) = match buf_bc.width() {
                IndexWidth::W32 => map_affine(buf_bc.as_i32(), *start, *step),
                IndexWidth::W64 => map_affine(buf_bc.as_i64(), *start, *step),
            };
            let mut res = RowIndex::new_arr64(out, min, max);
            res.compactify();
            res
        }
        Payload::Arr(buf_ab) => match (buf_ab.width(), buf_bc.width()) {
            (IndexWidth::W32, IndexWidth::W32) => {
                let (out, min, max) = gather(buf_ab.as_i32(), buf_bc.as_i32());
                RowIndex::new_arr32(out, i64::from(min), i64::from(max))
            }
            (IndexWidth::W32, IndexWidth::W64) => {
                compactified_arr64(gather_wide(buf_ab.as_i32(), buf_bc.as_i64()))
            }
            (IndexWidth::W64, IndexWidth::W32) => {
                compactified_arr64(gather_wide(buf_ab.as_i64(), buf_bc.as_i32()))
            }
            (IndexWidth::W64, IndexWidth::W64) => {
                compactified_arr64(gather_wide(buf_ab.as_i64(), buf_bc.as_i64()))
            }
        },
    }
}

fn compactified_arr64((out, min, max): (Vec<i64>, i64, i64)) -> RowIndex {
    let mut res = RowIndex::new_arr64(out, min, max);
    res.compactify();
    res
}

/// Gather `src[start + step * i]` for `i` in `0..n`, tracking the range of
/// the gathered values in the same pass. `n` must be positive.
fn gather_strided<T>(src: &[T], start: i64, step: i64, n: i64) -> (Vec<T>, T, T)
where
    T: Copy + Ord,
{
    let first = src[start as usize];
    let (mut min, mut max) = (first, first);
    let mut out = Vec::with_capacity(n as usize);
    for i in 0..n {
        let x = src[(start + step * i) as usize];
        out.push(x);
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }
    (out, min, max)
}

/// Gather `src[p]` for every position `p`, same width in and out, with the
/// range tracked inline. `positions` must be non-empty.
fn gather<T, P>(src: &[T], positions: &[P]) -> (Vec<T>, T, T)
where
    T: Copy + Ord,
    P: Copy + Into<i64>,
{
    let first = src[positions[0].into() as usize];
    let (mut min, mut max) = (first, first);
    let mut out = Vec::with_capacity(positions.len());
    for &p in positions {
        let x = src[p.into() as usize];
        out.push(x);
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }
    (out, min, max)
}

/// Gather into 64-bit output regardless of the source width. `positions`
/// must be non-empty.
fn gather_wide<T, P>(src: &[T], positions: &[P]) -> (Vec<i64>, i64, i64)
where
    T: Copy + Into<i64>,
    P: Copy + Into<i64>,
{
    let first: i64 = src[positions[0].into() as usize].into();
    let (mut min, mut max) = (first, first);
    let mut out = Vec::with_capacity(positions.len());
    for &p in positions {
        let x: i64 = src[p.into() as usize].into();
        out.push(x);
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }
    (out, min, max)
}

/// Map each row `r` of `rows` to `start + step * r`, tracking the range of
/// the produced values in the same pass rather than deriving it from the
/// input range and the step sign. `rows` must be non-empty.
fn map_affine<T>(rows: &[T], start: i64, step: i64) -> (Vec<i64>, i64, i64)
where
    T: Copy + Into<i64>,
{
    let first = start + step * rows[0].into();
    let (mut min, mut max) = (first, first);
    let mut out = Vec::with_capacity(rows.len());
    for &r in rows {
        let x = start + step * r.into();
        out.push(x);
        if x < min {
            min = x;
        }
        if x > max {
            max = x;
        }
    }
    (out, min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RowIndexKind;

    #[test]
    fn test_null_ab_clones_bc() {
        let bc = RowIndex::from_indices32(vec![5, 3, 9]).unwrap();
        let ac = merge(None, &bc);
        assert_eq!(ac.kind(), RowIndexKind::Arr32);
        assert_eq!(ac.indices32().unwrap(), &[5, 3, 9]);
        assert_eq!((ac.min(), ac.max()), (3, 9));
    }

    #[test]
    fn test_zero_length_result_is_empty_slice() {
        let ab = RowIndex::from_indices32(vec![5, 3, 9]).unwrap();
        let bc = RowIndex::from_slice(0, 0, 1).unwrap();
        let ac = merge(Some(&ab), &bc);
        assert_eq!(ac.kind(), RowIndexKind::Slice);
        assert_eq!(ac.len(), 0);
        assert_eq!(ac.slice_parts(), Some((0, 1)));
    }

    #[test]
    fn test_constant_slice_over_array() {
        let ab = RowIndex::from_indices32(vec![40, 50, 60]).unwrap();
        let bc = RowIndex::from_slice(1, 5, 0).unwrap();
        let ac = merge(Some(&ab), &bc);
        assert_eq!(ac.kind(), RowIndexKind::Slice);
        assert_eq!(ac.slice_parts(), Some((50, 0)));
        assert_eq!(ac.len(), 5);
        assert_eq!((ac.min(), ac.max()), (50, 50));
    }
}
