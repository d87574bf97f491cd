//! fepix-io: collaborators around the decode core.
//!
//! This crate hosts the surfaces the core treats as external: reading the
//! front-end's paired-line raw log files, loading the typed calibration
//! grid, and the pipeline drivers that compose segmentation, decoding, and
//! clustering for a whole run.

pub mod calibration;
pub mod error;
pub mod pipeline;
pub mod reader;

pub use calibration::{calibration_from_json, load_calibration_json};
pub use error::{Error, Result};
pub use pipeline::{
    process_window, process_windows_parallel, segment_lines, Pipeline, ProcessedWindow,
    RunStatistics,
};
pub use reader::RawLogReader;
