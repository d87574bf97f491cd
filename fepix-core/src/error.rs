//! Error types for fepix-core.

use thiserror::Error;

/// Result type alias for fepix operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for fepix operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Pixel coordinate outside the calibrated sensor grid.
    #[error("pixel coordinate ({x}, {y}) outside the {cols}x{rows} sensor grid")]
    InvalidCoordinate {
        /// Column of the offending pixel.
        x: u16,
        /// Row of the offending pixel.
        y: u16,
        /// Number of columns the table was built for.
        cols: u16,
        /// Number of rows the table was built for.
        rows: u16,
    },

    /// Calibration plane with the wrong number of entries.
    #[error("calibration plane '{plane}' has {actual} entries, expected {expected}")]
    CalibrationShape {
        /// Plane name (a, b, or c).
        plane: char,
        /// Expected entry count (columns times rows).
        expected: usize,
        /// Entry count actually supplied.
        actual: usize,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}
