//! Rowsel: compact row-selection indexes for columnar tables.
//!
//! This crate is the single entry point for the rowsel toolkit. It re-exports
//! the row-index core and the parallel filter builder from the underlying
//! `rowsel-*` crates so downstream code sees one surface.
//!
//! # The model
//!
//! Every derived column of a columnar table is a pair *(source data, row
//! index)*: the index says which source rows are visible and in what order,
//! and all readers walk the index instead of raw row positions. That one
//! abstraction makes view columns, filters, slicing, reordering, and joins
//! uniform.
//!
//! A [`RowIndex`] picks the cheapest of three storage shapes per instance —
//! an arithmetic slice, a 32-bit array, or a 64-bit array — and freshly
//! built 64-bit arrays are narrowed back to 32 bits in place whenever their
//! values allow ([`RowIndex::compactify`]).
//!
//! # Crate topology
//!
//! - [`rowsel-index`](rowsel_index): the `RowIndex` value, its constructors
//!   (slices, owned index arrays, boolean predicate columns), the iteration
//!   surface, and [`merge`] for composing A→B with B→C into A→C.
//! - [`rowsel-filter`](rowsel_filter): [`from_filter32`]/[`from_filter64`],
//!   which evaluate a chunk predicate across the shared thread pool and
//!   stitch the results in ascending row order.
//! - [`rowsel-threading`](rowsel_threading): the process-wide rayon pool
//!   (`ROWSEL_MAX_THREADS` pins its size).
//! - [`rowsel-result`](rowsel_result): the unified [`Error`]/[`Result`]
//!   pair used across the workspace.

#![forbid(unsafe_code)]

pub use rowsel_filter::{CHUNK_ROWS, from_filter32, from_filter64};
pub use rowsel_index::{Column, Iter, RowIndex, RowIndexKind, SliceSpec, StorageType, merge};
pub use rowsel_result::{Error, Result};
pub use rowsel_threading::{current_thread_count, with_thread_pool};
