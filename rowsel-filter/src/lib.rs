//! Parallel filter-to-index builder.
//!
//! Turns a chunk-wise row predicate into a [`RowIndex`] without giving up
//! the global row order. The row range is split into fixed 65 536-row
//! chunks; worker threads evaluate the filter for whole chunks into private
//! scratch buffers, offsets into the final buffer are claimed in chunk order
//! (the only serialised step), and the copy-back into the claimed, disjoint
//! regions runs in parallel regardless of chunk completion order. The
//! produced index is therefore strictly ascending even though chunks finish
//! out of order.

#![forbid(unsafe_code)]

use rayon::prelude::*;

use rowsel_index::RowIndex;
use rowsel_result::{Error, Result};
use rowsel_threading::with_thread_pool;

/// Rows handed to one filter invocation. Each chunk is the fundamental unit
/// of parallel work.
pub const CHUNK_ROWS: i64 = 65_536;

/// Build a 32-bit row index from a chunk filter.
///
/// `filter` receives a half-open row range `[row0, row1)` and a scratch
/// buffer of `row1 - row0` slots; it must write the selected row numbers
/// into the front of the buffer in ascending order and return how many it
/// wrote. It is assumed infallible for any range it accepts.
///
/// Fails when `nrows` is negative or exceeds `i32::MAX` (use
/// [`from_filter64`] for wider tables).
pub fn from_filter32<F>(filter: F, nrows: i64) -> Result<RowIndex>
where
    F: Fn(i64, i64, &mut [i32]) -> usize + Sync,
{
    if nrows < 0 {
        return Err(Error::InvalidArgumentError(format!(
            "nrows must be non-negative, got {nrows}"
        )));
    }
    if nrows > i64::from(i32::MAX) {
        return Err(Error::InvalidArgumentError(format!(
            "{nrows} rows do not fit a 32-bit row index; use from_filter64"
        )));
    }
    let out = stitch(filter_chunks(&filter, nrows));
    debug_assert!(out.windows(2).all(|w| w[0] < w[1]));
    RowIndex::from_sorted_indices32(out)
}

/// Build a row index from a chunk filter over tables wider than 32 bits.
///
/// Mirrors [`from_filter32`] with 64-bit slots and no row-count cap. The
/// result is compactified, so a wide table whose selected rows all fit in
/// 32 bits still comes back as a 32-bit index.
pub fn from_filter64<F>(filter: F, nrows: i64) -> Result<RowIndex>
where
    F: Fn(i64, i64, &mut [i64]) -> usize + Sync,
{
    if nrows < 0 {
        return Err(Error::InvalidArgumentError(format!(
            "nrows must be non-negative, got {nrows}"
        )));
    }
    let out = stitch(filter_chunks(&filter, nrows));
    debug_assert!(out.windows(2).all(|w| w[0] < w[1]));
    let mut res = RowIndex::from_sorted_indices64(out);
    res.compactify();
    Ok(res)
}

/// Evaluate the filter for every chunk on the shared pool, one private
/// scratch buffer per chunk, preserving chunk order in the returned list.
fn filter_chunks<T, F>(filter: &F, nrows: i64) -> Vec<Vec<T>>
where
    T: Copy + Default + Send,
    F: Fn(i64, i64, &mut [T]) -> usize + Sync,
{
    let num_chunks = ((nrows + CHUNK_ROWS - 1) / CHUNK_ROWS) as usize;
    with_thread_pool(|| {
        (0..num_chunks)
            .into_par_iter()
            .map(|chunk| {
                let row0 = chunk as i64 * CHUNK_ROWS;
                let row1 = (row0 + CHUNK_ROWS).min(nrows);
                let mut scratch = vec![T::default(); (row1 - row0) as usize];
                let kept = filter(row0, row1, &mut scratch);
                debug_assert!(kept <= scratch.len());
                scratch.truncate(kept);
                scratch
            })
            .collect()
    })
}

/// Assemble the per-chunk results into one contiguous buffer.
///
/// The sequential pass below is the ordered-commit step: it walks the chunks
/// in row order and claims each one's region of the output. The copies into
/// those disjoint regions then run concurrently.
fn stitch<T>(chunks: Vec<Vec<T>>) -> Vec<T>
where
    T: Copy + Default + Send + Sync,
{
    let total: usize = chunks.iter().map(Vec::len).sum();
    let mut out = vec![T::default(); total];

    let mut regions: Vec<&mut [T]> = Vec::with_capacity(chunks.len());
    let mut tail = out.as_mut_slice();
    for chunk in &chunks {
        let (head, rest) = tail.split_at_mut(chunk.len());
        regions.push(head);
        tail = rest;
    }

    with_thread_pool(|| {
        regions
            .into_par_iter()
            .zip(chunks.par_iter())
            .for_each(|(dst, src)| dst.copy_from_slice(src))
    });
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowsel_index::RowIndexKind;

    fn keep_multiples_of(m: i64) -> impl Fn(i64, i64, &mut [i32]) -> usize + Sync {
        move |row0, row1, out| {
            let mut kept = 0;
            for r in row0..row1 {
                if r % m == 0 {
                    out[kept] = r as i32;
                    kept += 1;
                }
            }
            kept
        }
    }

    #[test]
    fn test_single_chunk() {
        let ri = from_filter32(keep_multiples_of(3), 10).unwrap();
        assert_eq!(ri.kind(), RowIndexKind::Arr32);
        assert_eq!(ri.indices32().unwrap(), &[0, 3, 6, 9]);
        assert_eq!((ri.min(), ri.max()), (0, 9));
    }

    #[test]
    fn test_zero_rows() {
        let ri = from_filter32(keep_multiples_of(2), 0).unwrap();
        assert!(ri.is_empty());
        assert_eq!(ri.kind(), RowIndexKind::Arr32);
    }

    #[test]
    fn test_negative_nrows_rejected() {
        assert!(from_filter32(keep_multiples_of(2), -1).is_err());
    }

    #[test]
    fn test_nrows_beyond_i32_rejected() {
        assert!(from_filter32(keep_multiples_of(2), i64::from(i32::MAX) + 1).is_err());
    }
}
