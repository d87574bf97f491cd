//! Clustering configuration and algorithm trait.

use crate::cluster::Cluster;
use crate::hit::Hit;
use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for spatiotemporal clustering.
///
/// Both thresholds are squared distances: two hits are directly adjacent iff
/// `dx^2 + dy^2 <= spatial_threshold` and `dlvl1^2 <= temporal_threshold`.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusteringConfig {
    /// Maximum squared pixel distance for direct adjacency.
    pub spatial_threshold: u32,
    /// Maximum squared lvl1 distance for direct adjacency.
    pub temporal_threshold: u32,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            // Squared distance 8 keeps up-to-(2,2)-diagonal neighbours
            // connected.
            spatial_threshold: 8,
            temporal_threshold: 9, // |dlvl1| <= 3
        }
    }
}

impl ClusteringConfig {
    /// Creates a new clustering configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the squared spatial threshold.
    #[must_use]
    pub fn with_spatial_threshold(mut self, threshold: u32) -> Self {
        self.spatial_threshold = threshold;
        self
    }

    /// Sets the squared temporal threshold.
    #[must_use]
    pub fn with_temporal_threshold(mut self, threshold: u32) -> Self {
        self.temporal_threshold = threshold;
        self
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the spatial threshold is zero.
    pub fn validate(&self) -> Result<()> {
        if self.spatial_threshold == 0 {
            return Err(Error::Config(
                "spatial threshold must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Trait for clustering algorithms.
///
/// Clustering algorithms partition a batch of hits into clusters of
/// spatiotemporally connected hits.
pub trait ClusteringAlgorithm<H: Hit>: Send + Sync {
    /// Clusters the given hits into groups.
    ///
    /// The returned clusters are pairwise disjoint and their union is exactly
    /// the input batch.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid.
    fn cluster(&self, hits: &[H], config: &ClusteringConfig) -> Result<Vec<Cluster<H>>>
    where
        H: Clone;

    /// Returns the name of the algorithm.
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clustering_config_builder() {
        let config = ClusteringConfig::new()
            .with_spatial_threshold(2)
            .with_temporal_threshold(4);

        assert_eq!(config.spatial_threshold, 2);
        assert_eq!(config.temporal_threshold, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_spatial_threshold_rejected() {
        let config = ClusteringConfig::new().with_spatial_threshold(0);
        assert!(config.validate().is_err());
    }
}
