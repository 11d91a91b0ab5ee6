//! Cluster-to-agent matching.
//!
//! Every agent names the centroid nearest to its current position. Those
//! (agent, centroid) preferences are then committed in ascending distance
//! order, each centroid going to the first agent that asks for it. An agent
//! whose preferred centroid is already taken gets nothing this pass, and the
//! cluster nobody claimed waits for the next pass.

use serde::Serialize;

use crate::distance::closest_point;
use crate::models::Point;

/// One committed agent-to-cluster pairing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClusterMatch {
    /// Index into the agent positions.
    pub agent: usize,
    /// Index into the centroids.
    pub cluster: usize,
    /// Distance from the agent's position to the centroid.
    pub distance: f64,
}

/// Matches agents (by current position) to cluster centroids one-to-one.
///
/// The result is ordered by ascending distance; ties keep agent order.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::Point;
/// use warehouse_allocation::clustering::match_clusters;
///
/// let agents = [Point::new(0.0, 0.0), Point::new(10.0, 0.0)];
/// let centroids = [Point::new(9.0, 0.0), Point::new(1.0, 0.0)];
/// let matches = match_clusters(&agents, &centroids);
/// assert_eq!(matches.len(), 2);
/// assert_eq!((matches[0].agent, matches[0].cluster), (0, 1));
/// assert_eq!((matches[1].agent, matches[1].cluster), (1, 0));
/// ```
pub fn match_clusters(positions: &[Point], centroids: &[Point]) -> Vec<ClusterMatch> {
    if centroids.is_empty() {
        return Vec::new();
    }

    let mut preferences: Vec<ClusterMatch> = positions
        .iter()
        .enumerate()
        .filter_map(|(agent, pos)| {
            closest_point(pos, centroids).map(|cluster| ClusterMatch {
                agent,
                cluster,
                distance: pos.distance_to(&centroids[cluster]),
            })
        })
        .collect();
    preferences.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let mut claimed = vec![false; centroids.len()];
    preferences
        .into_iter()
        .filter(|m| !std::mem::replace(&mut claimed[m.cluster], true))
        .collect()
}
