use rowsel_filter::{CHUNK_ROWS, from_filter32, from_filter64};
use rowsel_index::RowIndexKind;
use rowsel_test_utils::init_tracing_for_tests;

fn odd_rows32(row0: i64, row1: i64, out: &mut [i32]) -> usize {
    let mut kept = 0;
    for r in row0..row1 {
        if r % 2 == 1 {
            out[kept] = r as i32;
            kept += 1;
        }
    }
    kept
}

#[test]
fn test_odd_rows_across_chunks() {
    init_tracing_for_tests();
    let nrows = 200_000i64;
    let ri = from_filter32(odd_rows32, nrows).unwrap();
    assert_eq!(ri.kind(), RowIndexKind::Arr32);
    assert_eq!(ri.len(), 100_000);
    assert_eq!((ri.min(), ri.max()), (1, 199_999));
    let rows: Vec<i64> = ri.iter().collect();
    assert!(rows.windows(2).all(|w| w[0] < w[1]));
    for (k, &r) in rows.iter().enumerate() {
        assert_eq!(r, 2 * k as i64 + 1);
    }
}

#[test]
fn test_exact_chunk_multiple() {
    // nrows landing exactly on a chunk boundary must not produce a phantom
    // empty chunk.
    let nrows = CHUNK_ROWS * 2;
    let ri = from_filter32(odd_rows32, nrows).unwrap();
    assert_eq!(ri.len(), nrows / 2);
    assert_eq!(ri.max(), nrows - 1);
}

#[test]
fn test_chunk_boundary_neighbors() {
    let keep_all = |row0: i64, row1: i64, out: &mut [i32]| {
        for (slot, r) in out.iter_mut().zip(row0..row1) {
            *slot = r as i32;
        }
        (row1 - row0) as usize
    };
    let nrows = CHUNK_ROWS + 1;
    let ri = from_filter32(keep_all, nrows).unwrap();
    assert_eq!(ri.len(), nrows);
    let rows: Vec<i64> = ri.iter().collect();
    assert_eq!(rows[CHUNK_ROWS as usize - 1], CHUNK_ROWS - 1);
    assert_eq!(rows[CHUNK_ROWS as usize], CHUNK_ROWS);
}

#[test]
fn test_sparse_selection() {
    // One row per chunk, from the middle of each.
    let picker = |row0: i64, row1: i64, out: &mut [i32]| {
        let target = row0 + (row1 - row0) / 2;
        out[0] = target as i32;
        1
    };
    let nrows = CHUNK_ROWS * 5;
    let ri = from_filter32(picker, nrows).unwrap();
    assert_eq!(ri.len(), 5);
    let rows: Vec<i64> = ri.iter().collect();
    assert!(rows.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_nothing_selected() {
    let none = |_row0: i64, _row1: i64, _out: &mut [i32]| 0usize;
    let ri = from_filter32(none, 300_000).unwrap();
    assert!(ri.is_empty());
    assert_eq!(ri.kind(), RowIndexKind::Arr32);
    assert_eq!((ri.min(), ri.max()), (0, 0));
}

#[test]
fn test_filter64_narrow_result_compactifies() {
    let evens = |row0: i64, row1: i64, out: &mut [i64]| {
        let mut kept = 0;
        for r in row0..row1 {
            if r % 2 == 0 {
                out[kept] = r;
                kept += 1;
            }
        }
        kept
    };
    let ri = from_filter64(evens, 100_000).unwrap();
    // Every selected row fits 32 bits, so the wide builder narrows.
    assert_eq!(ri.kind(), RowIndexKind::Arr32);
    assert_eq!(ri.len(), 50_000);
    assert_eq!((ri.min(), ri.max()), (0, 99_998));
}

#[test]
fn test_row_membership_matches_predicate() {
    let nrows = CHUNK_ROWS * 3 + 17;
    let selected = |r: i64| r % 7 == 3;
    let filter = move |row0: i64, row1: i64, out: &mut [i32]| {
        let mut kept = 0;
        for r in row0..row1 {
            if selected(r) {
                out[kept] = r as i32;
                kept += 1;
            }
        }
        kept
    };
    let ri = from_filter32(filter, nrows).unwrap();
    let produced: Vec<i64> = ri.iter().collect();
    let expected: Vec<i64> = (0..nrows).filter(|&r| selected(r)).collect();
    assert_eq!(produced, expected);
}
