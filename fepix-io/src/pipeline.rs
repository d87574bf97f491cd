//! Pipeline drivers composing segmentation, decoding, and clustering.

use crate::Result;
use fepix_algorithms::FrontierClustering;
use fepix_core::clustering::{ClusteringAlgorithm, ClusteringConfig};
use fepix_core::{CalibrationTable, Cluster};
use fepix_fei4::{
    EventSegmenter, HitDiscCnfg, SegmenterCounters, TotDecoder, WindowBatch,
};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// One trigger window after decoding and clustering.
#[derive(Debug, Clone)]
pub struct ProcessedWindow {
    /// Zero-based trigger index of the window.
    pub trigger_index: u64,
    /// Clusters found in the window.
    pub clusters: Vec<Cluster>,
    /// Number of decoded hits that entered clustering.
    pub hit_count: usize,
    /// Hit slots rejected as data corruption during decoding.
    pub rejected: usize,
}

/// Run-level statistics handed to the aggregation layer.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Line-level counters from the segmenter.
    pub segmenter: SegmenterCounters,
    /// Total decoded hits across all windows.
    pub hits: u64,
    /// Total clusters across all windows.
    pub clusters: u64,
    /// Total hit slots rejected as data corruption.
    pub rejected: u64,
}

/// Sequential processing pipeline.
///
/// Drives one readout window fully through decode and clustering before the
/// next input line is consumed. The calibration table is fixed for the run.
pub struct Pipeline {
    segmenter: EventSegmenter,
    decoder: TotDecoder,
    clustering_config: ClusteringConfig,
    calibration: CalibrationTable,
    hits: u64,
    clusters: u64,
    rejected: u64,
}

impl Pipeline {
    /// Creates a pipeline for one run.
    ///
    /// # Errors
    /// Fails on a zero window size or an invalid clustering configuration,
    /// before any line is consumed.
    pub fn new(
        cnfg: HitDiscCnfg,
        headers_per_window: u32,
        clustering_config: ClusteringConfig,
        calibration: CalibrationTable,
    ) -> Result<Self> {
        clustering_config.validate()?;
        Ok(Self {
            segmenter: EventSegmenter::new(headers_per_window)?,
            decoder: TotDecoder::new(cnfg),
            clustering_config,
            calibration,
            hits: 0,
            clusters: 0,
            rejected: 0,
        })
    }

    /// Feeds one decoded log line; returns the processed window when one
    /// closes.
    ///
    /// # Errors
    /// Propagates clustering-configuration errors; line-level problems are
    /// counted, not raised.
    pub fn process_line(&mut self, line: &str) -> Result<Option<ProcessedWindow>> {
        let Some(batch) = self.segmenter.push_line(line) else {
            return Ok(None);
        };
        let window = process_window(
            &batch,
            &self.decoder,
            &self.clustering_config,
            &self.calibration,
        )?;
        self.hits += window.hit_count as u64;
        self.clusters += window.clusters.len() as u64;
        self.rejected += window.rejected as u64;
        Ok(Some(window))
    }

    /// Returns the statistics accumulated so far.
    #[must_use]
    pub fn statistics(&self) -> RunStatistics {
        RunStatistics {
            segmenter: self.segmenter.counters(),
            hits: self.hits,
            clusters: self.clusters,
            rejected: self.rejected,
        }
    }

    /// Records accumulated for the still-open trailing window.
    #[must_use]
    pub fn pending_records(&self) -> usize {
        self.segmenter.pending_records()
    }
}

/// Decodes and clusters one segmented window.
///
/// # Errors
/// Fails only on an invalid clustering configuration.
pub fn process_window(
    batch: &WindowBatch,
    decoder: &TotDecoder,
    config: &ClusteringConfig,
    calibration: &CalibrationTable,
) -> Result<ProcessedWindow> {
    let decoded = decoder.decode_window(&batch.records, calibration);
    let clusters = FrontierClustering::new().cluster(&decoded.hits, config)?;
    Ok(ProcessedWindow {
        trigger_index: batch.trigger_index,
        hit_count: decoded.hits.len(),
        rejected: decoded.rejected,
        clusters,
    })
}

/// Segments an entire line stream without decoding.
///
/// For callers that want to fan the windows out afterwards (see
/// [`process_windows_parallel`]).
///
/// # Errors
/// Fails on a zero window size or a read error from the line source.
pub fn segment_lines<I>(
    lines: I,
    headers_per_window: u32,
) -> Result<(Vec<WindowBatch>, SegmenterCounters)>
where
    I: IntoIterator<Item = Result<String>>,
{
    let mut segmenter = EventSegmenter::new(headers_per_window)?;
    let mut windows = Vec::new();
    for line in lines {
        if let Some(batch) = segmenter.push_line(&line?) {
            windows.push(batch);
        }
    }
    Ok((windows, segmenter.counters()))
}

/// Decodes and clusters pre-segmented windows in parallel.
///
/// Windows are independent: the calibration table is shared read-only and
/// the delayed-hit ledger never leaves one decode call, so the per-window
/// results equal the sequential pipeline's.
///
/// # Errors
/// Fails only on an invalid clustering configuration.
pub fn process_windows_parallel(
    windows: &[WindowBatch],
    cnfg: HitDiscCnfg,
    config: &ClusteringConfig,
    calibration: &CalibrationTable,
) -> Result<Vec<ProcessedWindow>> {
    let decoder = TotDecoder::new(cnfg);
    windows
        .par_iter()
        .map(|batch| process_window(batch, &decoder, config, calibration))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fepix_core::Hit;

    fn calibration() -> CalibrationTable {
        CalibrationTable::from_fn(|_| (0.0, 10.0, 0.0))
    }

    fn drive(pipeline: &mut Pipeline, lines: &[&str]) -> Vec<ProcessedWindow> {
        let mut windows = Vec::new();
        for line in lines {
            if let Some(window) = pipeline.process_line(line).unwrap() {
                windows.push(window);
            }
        }
        windows
    }

    #[test]
    fn test_single_window_end_to_end() {
        let mut pipeline = Pipeline::new(
            HitDiscCnfg::Cnfg1,
            2,
            ClusteringConfig::new().with_spatial_threshold(2),
            calibration(),
        )
        .unwrap();

        let windows = drive(
            &mut pipeline,
            &[
                "DH 0 15",
                "DR 10 20 5 15",
                "DR 10 21 6 15",
                "DR 50 200 3 15",
                "DH 0 15",
            ],
        );

        assert_eq!(windows.len(), 1);
        let window = &windows[0];
        assert_eq!(window.trigger_index, 0);
        assert_eq!(window.hit_count, 3);
        assert_eq!(window.clusters.len(), 2);

        let stats = pipeline.statistics();
        assert_eq!(stats.segmenter.triggers, 1);
        assert_eq!(stats.segmenter.data_records, 3);
        assert_eq!(stats.hits, 3);
        assert_eq!(stats.clusters, 2);
    }

    #[test]
    fn test_delayed_hit_across_records_in_window() {
        let mut pipeline = Pipeline::new(
            HitDiscCnfg::Cnfg0,
            2,
            ClusteringConfig::default(),
            calibration(),
        )
        .unwrap();

        let windows = drive(
            &mut pipeline,
            &[
                "DR 3 5 2 14",
                "DH 0 15",
                "DR 3 6 7 15",
                "DH 0 15",
            ],
        );

        assert_eq!(windows.len(), 1);
        let hits: Vec<_> = windows[0].clusters.iter().flat_map(Cluster::iter).collect();
        assert_eq!(hits.len(), 1);
        // The announcement was made before any header, so lvl1 0 wins over
        // the reporting record's lvl1 1.
        assert_eq!(hits[0].lvl1(), 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lines = [
            "DH 0 15",
            "DR 10 20 5 3",
            "DR 30 100 14 15",
            "DH 0 15",
            "DR 11 21 7 15",
            "DH 0 15",
            "DH 0 15",
        ];

        let config = ClusteringConfig::new().with_spatial_threshold(8);
        let calibration = calibration();

        let mut pipeline = Pipeline::new(
            HitDiscCnfg::Cnfg2,
            2,
            config.clone(),
            calibration.clone(),
        )
        .unwrap();
        let mut sequential = Vec::new();
        for line in lines {
            if let Some(window) = pipeline.process_line(line).unwrap() {
                sequential.push(window);
            }
        }

        let (windows, _) =
            segment_lines(lines.iter().map(|l| Ok((*l).to_string())), 2).unwrap();
        let parallel =
            process_windows_parallel(&windows, HitDiscCnfg::Cnfg2, &config, &calibration)
                .unwrap();

        assert_eq!(sequential.len(), parallel.len());
        for (s, p) in sequential.iter().zip(&parallel) {
            assert_eq!(s.trigger_index, p.trigger_index);
            assert_eq!(s.hit_count, p.hit_count);
            assert_eq!(s.clusters.len(), p.clusters.len());
        }
    }

    #[test]
    fn test_statistics_count_rejected_slots() {
        let mut pipeline = Pipeline::new(
            HitDiscCnfg::Cnfg1,
            1,
            ClusteringConfig::default(),
            calibration(),
        )
        .unwrap();

        // Second slot of a top-row record lands outside the grid.
        let windows = drive(&mut pipeline, &["DR 4 336 5 6", "DH 0 15"]);

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].rejected, 1);
        assert_eq!(pipeline.statistics().rejected, 1);
    }
}
