//! Calibration-file loading.

use crate::Result;
use fepix_core::CalibrationTable;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// JSON schema of a calibration file: three planes of per-pixel
/// coefficients, each an array of columns holding one coefficient per row.
#[derive(Deserialize)]
struct CalibrationFile {
    a: Vec<Vec<f64>>,
    b: Vec<Vec<f64>>,
    c: Vec<Vec<f64>>,
}

/// Loads a calibration table from a JSON file.
///
/// The file must hold planes `a`, `b`, and `c` of shape
/// [`fepix_core::FE_COLS`] x [`fepix_core::FE_ROWS`]; anything else is a
/// fatal load error, caught before any decoding starts.
///
/// # Errors
/// Returns an error if the file cannot be read, is not valid JSON of this
/// schema, or a plane has the wrong shape.
pub fn load_calibration_json<P: AsRef<Path>>(path: P) -> Result<CalibrationTable> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let planes: CalibrationFile = serde_json::from_reader(reader)?;
    build(planes)
}

/// Builds a calibration table from a JSON string of the same schema.
///
/// # Errors
/// Same failure modes as [`load_calibration_json`], minus file access.
pub fn calibration_from_json(json: &str) -> Result<CalibrationTable> {
    let planes: CalibrationFile = serde_json::from_str(json)?;
    build(planes)
}

fn build(planes: CalibrationFile) -> Result<CalibrationTable> {
    Ok(CalibrationTable::from_planes(
        flatten(planes.a),
        flatten(planes.b),
        flatten(planes.c),
    )?)
}

fn flatten(plane: Vec<Vec<f64>>) -> Vec<f64> {
    plane.into_iter().flatten().collect()
}
