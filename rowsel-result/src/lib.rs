//! Error and result definitions for the rowsel crates.
//!
//! Every fallible operation in the workspace returns [`Result<T>`], where the
//! error variant carries enough context to explain what went wrong. A single
//! error enum keeps propagation across crate boundaries a plain `?`.

#![forbid(unsafe_code)]

pub mod error;
pub mod result;

pub use error::Error;
pub use result::Result;
