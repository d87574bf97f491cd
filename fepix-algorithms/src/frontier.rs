//! Frontier-expansion connected-component clustering.

use fepix_core::clustering::{ClusteringAlgorithm, ClusteringConfig};
use fepix_core::{Cluster, Hit, Result};

/// Returns true if two hits satisfy the direct spatiotemporal adjacency
/// predicate.
///
/// Symmetric but not transitive; cluster membership is defined by
/// reachability under this predicate, not by the predicate alone.
#[inline]
#[must_use]
pub fn adjacent<H: Hit>(a: &H, b: &H, config: &ClusteringConfig) -> bool {
    if a.coord().distance_squared(&b.coord()) > config.spatial_threshold {
        return false;
    }
    let dlvl1 = u64::from(a.lvl1().abs_diff(b.lvl1()));
    dlvl1 * dlvl1 <= u64::from(config.temporal_threshold)
}

/// Connected-component clustering by breadth-first frontier expansion.
///
/// Seeds a cluster from the first unclustered hit, then repeatedly sweeps
/// the unclustered remainder for hits adjacent to any hit on the frontier,
/// moving matches into the cluster and onto the next frontier until the
/// frontier empties. Bookkeeping is index-based over the hit arena, so
/// nothing is erased mid-scan. O(n^2) per window, which the small
/// per-trigger hit counts keep cheap.
#[derive(Debug, Clone, Default)]
pub struct FrontierClustering;

impl FrontierClustering {
    /// Creates a new frontier-clustering instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl<H: Hit + Clone> ClusteringAlgorithm<H> for FrontierClustering {
    fn cluster(&self, hits: &[H], config: &ClusteringConfig) -> Result<Vec<Cluster<H>>> {
        config.validate()?;

        if hits.is_empty() {
            return Ok(Vec::new());
        }
        if hits.len() == 1 {
            return Ok(vec![Cluster::from_iter([hits[0].clone()])]);
        }

        let n = hits.len();
        let mut clustered = vec![false; n];
        let mut clusters = Vec::new();

        for seed in 0..n {
            if clustered[seed] {
                continue;
            }
            clustered[seed] = true;

            let mut members = vec![seed];
            let mut frontier = vec![seed];

            while !frontier.is_empty() {
                let mut next = Vec::new();
                for candidate in 0..n {
                    if clustered[candidate] {
                        continue;
                    }
                    if frontier
                        .iter()
                        .any(|&f| adjacent(&hits[f], &hits[candidate], config))
                    {
                        clustered[candidate] = true;
                        members.push(candidate);
                        next.push(candidate);
                    }
                }
                frontier = next;
            }

            clusters.push(members.into_iter().map(|i| hits[i].clone()).collect());
        }

        Ok(clusters)
    }

    fn name(&self) -> &'static str {
        "Frontier"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fepix_core::{CalibrationTable, PixelCoord, PixelHit};

    fn hit(table: &CalibrationTable, x: u16, y: u16, lvl1: u32) -> PixelHit {
        PixelHit::new(PixelCoord::new(x, y), 5, lvl1, table).unwrap()
    }

    fn config() -> ClusteringConfig {
        ClusteringConfig::new().with_spatial_threshold(2)
    }

    #[test]
    fn test_single_cluster() {
        let table = CalibrationTable::from_fn(|_| (0.0, 1.0, 0.0));
        let hits = vec![
            hit(&table, 10, 10, 1),
            hit(&table, 10, 11, 1),
            hit(&table, 11, 11, 2),
        ];

        let clusters = FrontierClustering::new().cluster(&hits, &config()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_spatially_separate_clusters() {
        let table = CalibrationTable::from_fn(|_| (0.0, 1.0, 0.0));
        let hits = vec![
            hit(&table, 10, 10, 1),
            hit(&table, 10, 11, 1),
            hit(&table, 50, 200, 1),
            hit(&table, 50, 201, 1),
        ];

        let clusters = FrontierClustering::new().cluster(&hits, &config()).unwrap();
        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].len(), 2);
        assert_eq!(clusters[1].len(), 2);
    }

    #[test]
    fn test_temporally_separate_clusters() {
        let table = CalibrationTable::from_fn(|_| (0.0, 1.0, 0.0));
        let hits = vec![hit(&table, 10, 10, 0), hit(&table, 10, 11, 8)];

        let clusters = FrontierClustering::new().cluster(&hits, &config()).unwrap();
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_connectivity_through_intermediate_hit() {
        let table = CalibrationTable::from_fn(|_| (0.0, 1.0, 0.0));
        // The outer two hits are not directly adjacent (distance 2 in y,
        // squared 4 > 2) but both touch the middle one.
        let hits = vec![
            hit(&table, 10, 10, 1),
            hit(&table, 10, 12, 1),
            hit(&table, 10, 11, 1),
        ];

        let clusters = FrontierClustering::new().cluster(&hits, &config()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_empty_batch() {
        let hits: Vec<PixelHit> = Vec::new();
        let clusters = FrontierClustering::new().cluster(&hits, &config()).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_singleton_batch() {
        let table = CalibrationTable::from_fn(|_| (0.0, 1.0, 0.0));
        let hits = vec![hit(&table, 40, 100, 3)];

        let clusters = FrontierClustering::new().cluster(&hits, &config()).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let table = CalibrationTable::from_fn(|_| (0.0, 1.0, 0.0));
        let hits = vec![hit(&table, 10, 10, 1)];
        let config = ClusteringConfig::new().with_spatial_threshold(0);

        assert!(FrontierClustering::new().cluster(&hits, &config).is_err());
    }
}
