//! FE-I4B-specific error types.

use thiserror::Error;

/// Result type for FE-I4B decode operations.
pub type Result<T> = std::result::Result<T, Error>;

/// FE-I4B-specific error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Data record line with missing or non-numeric fields.
    #[error("malformed data record: {0:?}")]
    MalformedRecord(String),

    /// ToT code outside the 4-bit range.
    #[error("ToT code {0} outside the 4-bit range")]
    TotCodeOutOfRange(i64),

    /// Pixel coordinate outside the front-end grid.
    #[error("data record coordinate ({x}, {y}) outside the front-end grid")]
    CoordinateOutOfRange {
        /// Column as transmitted.
        x: i64,
        /// Row as transmitted.
        y: i64,
    },

    /// Readout window size of zero.
    #[error("headers per window must be positive")]
    InvalidWindowSize,

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] fepix_core::Error),
}
