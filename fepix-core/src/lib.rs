//! fepix-core: Core traits and types for FE-I4B readout processing.
//!
//! This crate provides the foundational abstractions shared by the decode
//! and clustering crates: pixel coordinates and hits, the ToT-to-charge
//! calibration table, and the cluster container with its algorithm trait.

pub mod calibration;
pub mod cluster;
pub mod clustering;
pub mod error;
pub mod hit;

pub use calibration::{CalibrationTable, FE_COLS, FE_ROWS};
pub use cluster::Cluster;
pub use clustering::{ClusteringAlgorithm, ClusteringConfig};
pub use error::{Error, Result};
pub use hit::{Hit, PixelCoord, PixelHit};
