//! fepix-fei4: FE-I4B record parsing, ToT decoding, and event segmentation.
//!
//! This crate turns the front-end's decoded log-line stream into physical
//! hits:
//!
//! 1. [`EventSegmenter`] reconstructs trigger windows by counting data
//!    headers and collects the raw data records of each window.
//! 2. [`TotDecoder`] maps a window's records to calibrated [`fepix_core::PixelHit`]s
//!    under one of the three hardware discriminator configurations,
//!    including the stateful delayed-hit protocol of HitDiscCnfg 0.

pub mod decoder;
pub mod error;
pub mod line;
pub mod record;
pub mod segmenter;

pub use decoder::{DecodedWindow, HitDiscCnfg, TotDecoder};
pub use error::{Error, Result};
pub use line::{classify_line, parse_data_record, LineKind};
pub use record::{cantor_pair, RawRecord, TOT_CODE_NO_HIT, TOT_CODE_SMALL_OR_DELAYED};
pub use segmenter::{
    EventSegmenter, SegmenterCounters, WindowBatch, DEFAULT_HEADERS_PER_WINDOW,
};
