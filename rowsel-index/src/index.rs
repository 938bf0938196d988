//! The row index value: tri-variant storage plus the shared header fields.

use rowsel_result::{Error, Result};

use crate::buffer::{IndexBuf, IndexWidth};

/// Storage shape of a [`RowIndex`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowIndexKind {
    /// Arithmetic progression `start + step * i`.
    Slice,
    /// Owned array of 32-bit source rows.
    Arr32,
    /// Owned array of 64-bit source rows.
    Arr64,
}

#[derive(Clone, Debug)]
pub(crate) enum Payload {
    Slice { start: i64, step: i64 },
    Arr(IndexBuf),
}

/// A mapping from destination row positions to source row positions.
///
/// Every derived view of a table is a pair (source data, row index); readers
/// walk the index instead of raw row positions. The representation is chosen
/// per instance for footprint: an arithmetic slice when the selection is
/// regular, otherwise a 32- or 64-bit index array.
///
/// `min`/`max` always equal the smallest and largest source row produced;
/// for an empty index both are conventionally 0. Stored rows are never
/// negative. Aside from [`RowIndex::compactify`], which narrows a freshly
/// built 64-bit array, values are immutable once constructed.
#[derive(Clone, Debug)]
pub struct RowIndex {
    pub(crate) len: i64,
    pub(crate) min: i64,
    pub(crate) max: i64,
    pub(crate) payload: Payload,
}

impl RowIndex {
    pub(crate) fn new_slice_unchecked(start: i64, step: i64, len: i64, min: i64, max: i64) -> Self {
        Self {
            len,
            min,
            max,
            payload: Payload::Slice { start, step },
        }
    }

    pub(crate) fn new_arr32(indices: Vec<i32>, min: i64, max: i64) -> Self {
        debug_assert!(indices.len() <= i32::MAX as usize);
        Self {
            len: indices.len() as i64,
            min,
            max,
            payload: Payload::Arr(IndexBuf::from_vec32(indices)),
        }
    }

    pub(crate) fn new_arr64(indices: Vec<i64>, min: i64, max: i64) -> Self {
        Self {
            len: indices.len() as i64,
            min,
            max,
            payload: Payload::Arr(IndexBuf::from_vec64(indices)),
        }
    }

    /// The canonical empty index: a zero-length 32-bit array.
    pub(crate) fn empty_arr32() -> Self {
        Self::new_arr32(Vec::new(), 0, 0)
    }

    /// Build from an owned vector of 32-bit source rows.
    ///
    /// Takes ownership of the vector without copying. One scan computes
    /// `min`/`max`. Fails when the vector holds more than `i32::MAX`
    /// elements. Non-negative values are a caller contract.
    pub fn from_indices32(indices: Vec<i32>) -> Result<Self> {
        if indices.len() > i32::MAX as usize {
            return Err(Error::InvalidArgumentError(format!(
                "32-bit row index cannot hold {} rows",
                indices.len()
            )));
        }
        let (min, max) = scan_min_max(&indices);
        debug_assert!(indices.is_empty() || min >= 0);
        Ok(Self::new_arr32(indices, i64::from(min), i64::from(max)))
    }

    /// Build from an owned vector of 64-bit source rows.
    ///
    /// Takes ownership without copying and stays 64-bit even when every
    /// value would fit in 32 bits: externally supplied buffers keep the
    /// width the caller chose.
    pub fn from_indices64(indices: Vec<i64>) -> Self {
        let (min, max) = scan_min_max(&indices);
        debug_assert!(indices.is_empty() || min >= 0);
        Self::new_arr64(indices, min, max)
    }

    /// Like [`RowIndex::from_indices32`] for a vector already in ascending
    /// order: `min`/`max` are read from the endpoints instead of a scan.
    pub fn from_sorted_indices32(indices: Vec<i32>) -> Result<Self> {
        if indices.len() > i32::MAX as usize {
            return Err(Error::InvalidArgumentError(format!(
                "32-bit row index cannot hold {} rows",
                indices.len()
            )));
        }
        debug_assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        let min = indices.first().copied().unwrap_or(0);
        let max = indices.last().copied().unwrap_or(0);
        debug_assert!(indices.is_empty() || min >= 0);
        Ok(Self::new_arr32(indices, i64::from(min), i64::from(max)))
    }

    /// Like [`RowIndex::from_indices64`] for a vector already in ascending
    /// order.
    pub fn from_sorted_indices64(indices: Vec<i64>) -> Self {
        debug_assert!(indices.windows(2).all(|w| w[0] <= w[1]));
        let min = indices.first().copied().unwrap_or(0);
        let max = indices.last().copied().unwrap_or(0);
        debug_assert!(indices.is_empty() || min >= 0);
        Self::new_arr64(indices, min, max)
    }

    /// Number of destination rows this index produces.
    #[inline]
    pub fn len(&self) -> i64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Smallest source row produced; 0 for an empty index.
    #[inline]
    pub fn min(&self) -> i64 {
        self.min
    }

    /// Largest source row produced; 0 for an empty index.
    #[inline]
    pub fn max(&self) -> i64 {
        self.max
    }

    /// Current storage shape.
    #[inline]
    pub fn kind(&self) -> RowIndexKind {
        match &self.payload {
            Payload::Slice { .. } => RowIndexKind::Slice,
            Payload::Arr(buf) => match buf.width() {
                IndexWidth::W32 => RowIndexKind::Arr32,
                IndexWidth::W64 => RowIndexKind::Arr64,
            },
        }
    }

    /// `(start, step)` of a slice index, if that is the current shape.
    pub fn slice_parts(&self) -> Option<(i64, i64)> {
        match &self.payload {
            Payload::Slice { start, step } => Some((*start, *step)),
            Payload::Arr(_) => None,
        }
    }

    /// The 32-bit payload, if that is the current shape.
    pub fn indices32(&self) -> Option<&[i32]> {
        match &self.payload {
            Payload::Arr(buf) if buf.width() == IndexWidth::W32 => Some(buf.as_i32()),
            _ => None,
        }
    }

    /// The 64-bit payload, if that is the current shape.
    pub fn indices64(&self) -> Option<&[i64]> {
        match &self.payload {
            Payload::Arr(buf) if buf.width() == IndexWidth::W64 => Some(buf.as_i64()),
            _ => None,
        }
    }

    /// Visit every `(i, j)` pair, where `i` is the destination position in
    /// `0..len` and `j` the source row stored there.
    ///
    /// The dispatch on the storage shape happens once, above the loop; the
    /// closure is monomorphised into each of the three tight loop bodies.
    /// Higher-level code should go through this (or [`RowIndex::iter`])
    /// instead of branching on the variant itself.
    #[inline]
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(i64, i64),
    {
        match &self.payload {
            Payload::Slice { start, step } => {
                let (start, step) = (*start, *step);
                for i in 0..self.len {
                    f(i, start + step * i);
                }
            }
            Payload::Arr(buf) => match buf.width() {
                IndexWidth::W32 => {
                    for (i, &j) in buf.as_i32().iter().enumerate() {
                        f(i as i64, i64::from(j));
                    }
                }
                IndexWidth::W64 => {
                    for (i, &j) in buf.as_i64().iter().enumerate() {
                        f(i as i64, j);
                    }
                }
            },
        }
    }

    /// Iterator over the source rows in destination order.
    pub fn iter(&self) -> Iter<'_> {
        let inner = match &self.payload {
            Payload::Slice { start, step } => IterInner::Slice {
                start: *start,
                step: *step,
                pos: 0,
                len: self.len,
            },
            Payload::Arr(buf) => match buf.width() {
                IndexWidth::W32 => IterInner::Arr32(buf.as_i32().iter()),
                IndexWidth::W64 => IterInner::Arr64(buf.as_i64().iter()),
            },
        };
        Iter { inner }
    }

    /// Try to narrow a 64-bit array index to 32 bits in place.
    ///
    /// Succeeds (returns `true`) when the index is an `Arr64` whose `max`
    /// and `len` both fit in `i32`; the payload is rewritten inside its own
    /// allocation and the allocation shrunk to the narrow width. In every
    /// other case the index is left untouched and `false` is returned, so
    /// repeated calls are no-ops.
    pub fn compactify(&mut self) -> bool {
        let fits = self.max <= i64::from(i32::MAX) && self.len <= i64::from(i32::MAX);
        match &mut self.payload {
            Payload::Arr(buf) if buf.width() == IndexWidth::W64 && fits => {
                buf.narrow_in_place();
                true
            }
            _ => false,
        }
    }
}

impl<'a> IntoIterator for &'a RowIndex {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

/// Iterator returned by [`RowIndex::iter`].
pub struct Iter<'a> {
    inner: IterInner<'a>,
}

enum IterInner<'a> {
    Slice {
        start: i64,
        step: i64,
        pos: i64,
        len: i64,
    },
    Arr32(std::slice::Iter<'a, i32>),
    Arr64(std::slice::Iter<'a, i64>),
}

impl Iterator for Iter<'_> {
    type Item = i64;

    #[inline]
    fn next(&mut self) -> Option<i64> {
        match &mut self.inner {
            IterInner::Slice {
                start,
                step,
                pos,
                len,
            } => {
                if *pos == *len {
                    return None;
                }
                let j = *start + *step * *pos;
                *pos += 1;
                Some(j)
            }
            IterInner::Arr32(it) => it.next().map(|&j| i64::from(j)),
            IterInner::Arr64(it) => it.next().copied(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.inner {
            IterInner::Slice { pos, len, .. } => (*len - *pos) as usize,
            IterInner::Arr32(it) => it.len(),
            IterInner::Arr64(it) => it.len(),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

fn scan_min_max<T: Copy + Ord + Default>(values: &[T]) -> (T, T) {
    match values.split_first() {
        None => (T::default(), T::default()),
        Some((&first, rest)) => {
            let mut min = first;
            let mut max = first;
            for &x in rest {
                if x < min {
                    min = x;
                }
                if x > max {
                    max = x;
                }
            }
            (min, max)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_indices32_scans_range() {
        let ri = RowIndex::from_indices32(vec![5, 3, 9, 1]).unwrap();
        assert_eq!(ri.kind(), RowIndexKind::Arr32);
        assert_eq!(ri.len(), 4);
        assert_eq!(ri.min(), 1);
        assert_eq!(ri.max(), 9);
    }

    #[test]
    fn test_from_indices64_keeps_width() {
        let ri = RowIndex::from_indices64(vec![5, 3, 9]);
        assert_eq!(ri.kind(), RowIndexKind::Arr64);
        assert_eq!(ri.min(), 3);
        assert_eq!(ri.max(), 9);
    }

    #[test]
    fn test_empty_array_has_zero_range() {
        let ri = RowIndex::from_indices32(Vec::new()).unwrap();
        assert!(ri.is_empty());
        assert_eq!(ri.min(), 0);
        assert_eq!(ri.max(), 0);
        assert_eq!(ri.iter().count(), 0);
    }

    #[test]
    fn test_compactify_narrows_and_is_idempotent() {
        let mut ri = RowIndex::from_indices64(vec![1, 2, 3]);
        assert!(ri.compactify());
        assert_eq!(ri.kind(), RowIndexKind::Arr32);
        assert_eq!(ri.indices32().unwrap(), &[1, 2, 3]);
        assert!(!ri.compactify());
        assert_eq!(ri.indices32().unwrap(), &[1, 2, 3]);
    }

    #[test]
    fn test_compactify_refuses_wide_values() {
        let big = i64::from(i32::MAX) + 1;
        let mut ri = RowIndex::from_indices64(vec![0, big]);
        assert!(!ri.compactify());
        assert_eq!(ri.kind(), RowIndexKind::Arr64);
        assert_eq!(ri.indices64().unwrap(), &[0, big]);
    }

    #[test]
    fn test_for_each_matches_iter() {
        let ri = RowIndex::from_indices32(vec![4, 0, 2]).unwrap();
        let mut seen = Vec::new();
        ri.for_each(|i, j| seen.push((i, j)));
        assert_eq!(seen, vec![(0, 4), (1, 0), (2, 2)]);
        let collected: Vec<i64> = ri.iter().collect();
        assert_eq!(collected, vec![4, 0, 2]);
    }
}
