//! fepix-algorithms: Clustering engine for decoded FE-I4B hits.
//!
//! Clusters are the connected components of the undirected graph induced by
//! the spatiotemporal adjacency predicate over one trigger window's hits.
//!
#![warn(missing_docs)]

mod frontier;

pub use frontier::{adjacent, FrontierClustering};

// Re-export core clustering types
pub use fepix_core::clustering::{ClusteringAlgorithm, ClusteringConfig};
