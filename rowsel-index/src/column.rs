//! Boolean-column collaborator and the predicate-driven constructors.

use rowsel_result::{Error, Result};

use crate::index::RowIndex;

/// Physical storage tag of a [`Column`] payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageType {
    /// One byte per row; 1 means selected, 0 means not.
    Bool1,
    Int32,
    Int64,
    Float64,
}

/// Minimal column handle: a byte payload plus its storage tag.
///
/// The index constructors only ever read boolean columns and use the tag to
/// reject anything else; the full columnar data model lives outside this
/// crate.
#[derive(Clone, Debug)]
pub struct Column {
    storage_type: StorageType,
    data: Vec<u8>,
}

impl Column {
    pub fn new(storage_type: StorageType, data: Vec<u8>) -> Self {
        Self { storage_type, data }
    }

    /// Convenience constructor for a boolean column, one byte per row.
    pub fn bools(values: Vec<u8>) -> Self {
        Self::new(StorageType::Bool1, values)
    }

    #[inline]
    pub fn storage_type(&self) -> StorageType {
        self.storage_type
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn require_bool(col: &Column) -> Result<&[u8]> {
    if col.storage_type() != StorageType::Bool1 {
        return Err(Error::InvalidArgumentError(format!(
            "row index needs a Bool1 column, got {:?}",
            col.storage_type()
        )));
    }
    Ok(col.data())
}

impl RowIndex {
    /// Build an array index holding the rows where `col` is true.
    ///
    /// Two passes over the first `nrows` bytes: one to count the selected
    /// rows and find the greatest selected position, one to emit positions
    /// `0..=maxrow` where the byte is exactly 1. The result is 32-bit when
    /// both the count and `maxrow` fit, otherwise 64-bit; no selected rows
    /// yield an empty 32-bit index.
    pub fn from_bool_column(col: &Column, nrows: i64) -> Result<Self> {
        let data = require_bool(col)?;
        if nrows < 0 || nrows as u64 > data.len() as u64 {
            return Err(Error::InvalidArgumentError(format!(
                "nrows {nrows} exceeds the column payload of {} bytes",
                data.len()
            )));
        }
        let data = &data[..nrows as usize];

        let mut nout: i64 = 0;
        let mut maxrow: i64 = 0;
        for (i, &b) in data.iter().enumerate() {
            if b == 1 {
                nout += 1;
                maxrow = i as i64;
            }
        }
        if nout == 0 {
            return Ok(Self::empty_arr32());
        }

        let scan = &data[..=maxrow as usize];
        if nout <= i64::from(i32::MAX) && maxrow <= i64::from(i32::MAX) {
            let mut out: Vec<i32> = Vec::with_capacity(nout as usize);
            for (i, &b) in scan.iter().enumerate() {
                if b == 1 {
                    out.push(i as i32);
                }
            }
            let min = i64::from(out[0]);
            Ok(Self::new_arr32(out, min, maxrow))
        } else {
            let mut out: Vec<i64> = Vec::with_capacity(nout as usize);
            for (i, &b) in scan.iter().enumerate() {
                if b == 1 {
                    out.push(i as i64);
                }
            }
            let min = out[0];
            Ok(Self::new_arr64(out, min, maxrow))
        }
    }

    /// Build an array index from a boolean column viewed through `index`.
    ///
    /// This is the view-column complement of [`RowIndex::from_bool_column`]:
    /// a derived boolean column is a pair (source data, row index), so the
    /// predicate bytes are visited at the source rows `j` that `index`
    /// produces, in its order. For every selected row the *iteration
    /// position* `i` is emitted — the result maps into the outer view, not
    /// into the original source.
    pub fn from_bool_column_with_index(col: &Column, index: &RowIndex) -> Result<Self> {
        let data = require_bool(col)?;
        if !index.is_empty() && index.max() as u64 >= data.len() as u64 {
            return Err(Error::InvalidArgumentError(format!(
                "row index reaches row {} but the column payload holds {} bytes",
                index.max(),
                data.len()
            )));
        }

        let mut nout: i64 = 0;
        let mut maxpos: i64 = 0;
        index.for_each(|i, j| {
            if data[j as usize] == 1 {
                nout += 1;
                maxpos = i;
            }
        });
        if nout == 0 {
            return Ok(Self::empty_arr32());
        }

        if nout <= i64::from(i32::MAX) && maxpos <= i64::from(i32::MAX) {
            let mut out: Vec<i32> = Vec::with_capacity(nout as usize);
            index.for_each(|i, j| {
                if data[j as usize] == 1 {
                    out.push(i as i32);
                }
            });
            let min = i64::from(out[0]);
            Ok(Self::new_arr32(out, min, maxpos))
        } else {
            let mut out: Vec<i64> = Vec::with_capacity(nout as usize);
            index.for_each(|i, j| {
                if data[j as usize] == 1 {
                    out.push(i);
                }
            });
            let min = out[0];
            Ok(Self::new_arr64(out, min, maxpos))
        }
    }
}
