//! Error types for fepix-io.

use thiserror::Error;

/// Result type for fepix-io operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O and collaborator error types.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Calibration file is not valid JSON of the expected schema.
    #[error("calibration file error: {0}")]
    CalibrationFormat(#[from] serde_json::Error),

    /// Core library error.
    #[error("core error: {0}")]
    Core(#[from] fepix_core::Error),

    /// Decode-layer error.
    #[error("decode error: {0}")]
    Fei4(#[from] fepix_fei4::Error),
}
