//! Slice-based constructors.

use rowsel_result::{Error, Result};

use crate::index::RowIndex;

/// One `(start, count, step)` triple of [`RowIndex::from_slices`].
///
/// `count` rather than an end point is the primitive: the last row is always
/// `start + step * (count - 1)`, a `step` of 0 repeats the same row `count`
/// times, and positive and negative steps need no special casing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: i64,
    pub count: i64,
    pub step: i64,
}

impl SliceSpec {
    pub fn new(start: i64, count: i64, step: i64) -> Self {
        Self { start, count, step }
    }
}

/// Endpoint of a validated triple: `start + step * (count - 1)`.
///
/// Returns an error when the triple is malformed or the endpoint would be
/// negative or leave the 64-bit range.
fn checked_endpoint(start: i64, count: i64, step: i64) -> Result<i64> {
    if start < 0 || count < 0 {
        return Err(Error::InvalidArgumentError(format!(
            "slice start and count must be non-negative, got start={start} count={count}"
        )));
    }
    if count <= 1 {
        return Ok(start);
    }
    match step.checked_mul(count - 1).and_then(|d| start.checked_add(d)) {
        Some(end) if end >= 0 => Ok(end),
        _ => Err(Error::InvalidArgumentError(format!(
            "slice (start={start}, count={count}, step={step}) leaves the valid row range"
        ))),
    }
}

impl RowIndex {
    /// Build a slice index from a `(start, count, step)` triple.
    ///
    /// Fails when `start` or `count` is negative, or when the endpoint
    /// `start + step * (count - 1)` would be negative or overflow.
    /// `min`/`max` are the two endpoints, oriented by the sign of `step`.
    pub fn from_slice(start: i64, count: i64, step: i64) -> Result<Self> {
        let end = checked_endpoint(start, count, step)?;
        let (min, max) = if count == 0 {
            (0, 0)
        } else if step >= 0 {
            (start, end)
        } else {
            (end, start)
        };
        Ok(Self::new_slice_unchecked(start, step, count, min, max))
    }

    /// Build an array index from a list of slice triples, concatenated in
    /// input order.
    ///
    /// Empty triples are skipped; any other invalid triple fails the whole
    /// constructor. A single pass computes the total length and the global
    /// row range; the result is 32-bit when both fit, otherwise 64-bit.
    pub fn from_slices(specs: &[SliceSpec]) -> Result<Self> {
        let mut total: i64 = 0;
        let mut range: Option<(i64, i64)> = None;
        for spec in specs {
            if spec.count == 0 {
                continue;
            }
            let end = checked_endpoint(spec.start, spec.count, spec.step)?;
            total = total.checked_add(spec.count).ok_or_else(|| {
                Error::InvalidArgumentError("total slice length overflows 64 bits".to_string())
            })?;
            let lo = spec.start.min(end);
            let hi = spec.start.max(end);
            range = Some(match range {
                None => (lo, hi),
                Some((min, max)) => (min.min(lo), max.max(hi)),
            });
        }
        let (min, max) = range.unwrap_or((0, 0));
        debug_assert!(min >= 0 && min <= max);

        if total <= i64::from(i32::MAX) && max <= i64::from(i32::MAX) {
            let mut out: Vec<i32> = Vec::with_capacity(total as usize);
            for spec in specs {
                for k in 0..spec.count {
                    out.push((spec.start + spec.step * k) as i32);
                }
            }
            debug_assert_eq!(out.len() as i64, total);
            Ok(Self::new_arr32(out, min, max))
        } else {
            let mut out: Vec<i64> = Vec::with_capacity(total as usize);
            for spec in specs {
                for k in 0..spec.count {
                    out.push(spec.start + spec.step * k);
                }
            }
            debug_assert_eq!(out.len() as i64, total);
            Ok(Self::new_arr64(out, min, max))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::RowIndexKind;

    #[test]
    fn test_step_zero_repeats_row() {
        let ri = RowIndex::from_slice(7, 4, 0).unwrap();
        assert_eq!(ri.kind(), RowIndexKind::Slice);
        let rows: Vec<i64> = ri.iter().collect();
        assert_eq!(rows, vec![7, 7, 7, 7]);
        assert_eq!((ri.min(), ri.max()), (7, 7));
    }

    #[test]
    fn test_endpoint_overflow_rejected() {
        assert!(RowIndex::from_slice(i64::MAX - 1, 3, 1).is_err());
        assert!(RowIndex::from_slice(10, 3, -6).is_err());
        // count <= 1 never evaluates the endpoint
        assert!(RowIndex::from_slice(i64::MAX - 1, 1, i64::MAX).is_ok());
    }
}
