//! Partitioning of pending orders into one group per agent.
//!
//! - [`sector_partition`]: Equal-angle sectors around the warehouse, O(n)
//! - [`balanced_kmeans`]: Size-constrained k-means with k-means++ seeding, O(n·k·log k) per iteration
//! - [`match_clusters`]: Greedy one-to-one assignment of clusters to agents, O(a·k + a log a)

mod balanced;
mod matching;
mod sector;

pub use balanced::{balanced_kmeans, kmeans_plus_plus, BalancedClustering, KMeansParams};
pub use matching::{match_clusters, ClusterMatch};
pub use sector::{sector_of, sector_partition};
