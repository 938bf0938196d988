use crate::Error;

/// Result type alias used throughout the rowsel crates.
pub type Result<T> = std::result::Result<T, Error>;
