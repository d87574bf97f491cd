//! Event segmentation by readout-header counting.

use crate::line::{classify_line, LineKind};
use crate::record::RawRecord;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default number of data headers per readout window.
pub const DEFAULT_HEADERS_PER_WINDOW: u32 = 16;

/// A batch of raw records for one trigger window.
#[derive(Debug, Clone)]
pub struct WindowBatch {
    /// Records observed in this window, in arrival order.
    pub records: Vec<RawRecord>,
    /// Zero-based index of the trigger this window belongs to.
    pub trigger_index: u64,
}

/// Line-level counters accumulated over one segmentation run.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SegmenterCounters {
    /// Trigger windows flushed.
    pub triggers: u64,
    /// Data records successfully parsed.
    pub data_records: u64,
    /// External trigger words (TD) seen.
    pub trigger_markers: u64,
    /// Channel markers seen.
    pub channel_markers: u64,
    /// Data-record lines dropped as malformed or out of range.
    pub dropped_records: u64,
}

/// Reconstructs trigger windows from a stream of decoded log lines.
///
/// The lvl1 of a record is the number of data headers seen before it within
/// the current window; a full window of headers flushes the accumulated
/// records as one [`WindowBatch`]. Out-of-band trigger and channel markers
/// are treated as desynchronization signals and force the current window to
/// flush rather than waiting for more headers.
#[derive(Debug)]
pub struct EventSegmenter {
    headers_per_window: u32,
    dh_count: u32,
    records: Vec<RawRecord>,
    counters: SegmenterCounters,
}

impl EventSegmenter {
    /// Creates a segmenter flushing after `headers_per_window` data headers.
    ///
    /// # Errors
    /// Returns [`Error::InvalidWindowSize`] if the window size is zero.
    pub fn new(headers_per_window: u32) -> Result<Self> {
        if headers_per_window == 0 {
            return Err(Error::InvalidWindowSize);
        }
        Ok(Self {
            headers_per_window,
            dh_count: 0,
            records: Vec::new(),
            counters: SegmenterCounters::default(),
        })
    }

    /// Feeds one decoded log line; returns a window batch when one closes.
    ///
    /// Malformed data-record lines are dropped and counted; the stream keeps
    /// going.
    pub fn push_line(&mut self, line: &str) -> Option<WindowBatch> {
        match classify_line(line) {
            Ok(LineKind::DataHeader) => self.dh_count += 1,
            Ok(LineKind::DataRecord { x, y, tot1, tot2 }) => {
                self.counters.data_records += 1;
                self.records.push(RawRecord {
                    x,
                    y,
                    tot1,
                    tot2,
                    lvl1: self.dh_count,
                });
            }
            Ok(LineKind::TriggerData) => {
                self.counters.trigger_markers += 1;
                self.force_flush_if_open();
            }
            Ok(LineKind::Channel) => {
                self.counters.channel_markers += 1;
                self.force_flush_if_open();
            }
            Ok(LineKind::Unrecognized) => {}
            Err(_) => self.counters.dropped_records += 1,
        }

        if self.dh_count >= self.headers_per_window {
            self.dh_count = 0;
            let trigger_index = self.counters.triggers;
            self.counters.triggers += 1;
            Some(WindowBatch {
                records: std::mem::take(&mut self.records),
                trigger_index,
            })
        } else {
            None
        }
    }

    // An out-of-band marker mid-window means the stream lost sync; treat
    // the window as already complete instead of waiting for more headers.
    fn force_flush_if_open(&mut self) {
        if self.dh_count != 0 {
            self.dh_count = self.headers_per_window;
        }
    }

    /// Returns the counters accumulated so far.
    #[must_use]
    pub fn counters(&self) -> SegmenterCounters {
        self.counters
    }

    /// Number of records accumulated for the still-open window.
    ///
    /// A trailing partial window is never flushed; this count makes it
    /// observable at end of stream.
    #[must_use]
    pub fn pending_records(&self) -> usize {
        self.records.len()
    }

    /// Number of data headers seen in the still-open window.
    #[must_use]
    pub fn header_count(&self) -> u32 {
        self.dh_count
    }
}
