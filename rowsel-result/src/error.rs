use std::fmt;

use thiserror::Error;

/// Unified error type for all rowsel operations.
///
/// Errors propagate upward through the call stack with the `?` operator.
/// Constructors fail atomically: an `Err` return means no partially built
/// index escaped.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid user input or API parameter.
    ///
    /// Raised for negative lengths or starts, slice endpoints that would be
    /// negative or overflow 64-bit arithmetic, non-boolean predicate columns,
    /// and row counts too large for the requested index width.
    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    /// Internal error indicating a bug or unexpected state.
    ///
    /// This should never occur during normal operation; it reports a violated
    /// invariant rather than bad input.
    #[error("An internal operation failed: {0}")]
    Internal(String),
}

impl Error {
    /// Create an invalid-argument error from any displayable value.
    #[inline]
    pub fn invalid_argument<E: fmt::Display>(err: E) -> Self {
        Error::InvalidArgumentError(err.to_string())
    }
}
