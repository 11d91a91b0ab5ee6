//! Angular sector partition.
//!
//! # Algorithm
//!
//! Computes every order's polar angle around the warehouse and cuts the full
//! circle into `k` equal sectors, one per available agent. Order `i` lands
//! in sector `floor(angle_i / (360 / k))`. Nearby orders share a direction
//! from the depot, so each sector is a cheap geographic seed for one route.
//!
//! # Complexity
//!
//! O(n) where n = number of orders.
//!
//! # Reference
//!
//! Gillett, B.E. & Miller, L.R. (1974). "A Heuristic Algorithm for the
//! Vehicle-Dispatch Problem", *Operations Research* 22(2), 340-349.

use crate::distance::angle_from_origin;
use crate::models::Point;

/// Sector index of an angle (degrees, `[0, 360)`) when the circle is cut
/// into `sectors` equal slices.
///
/// # Panics
///
/// Panics if `sectors` is zero.
pub fn sector_of(angle: f64, sectors: usize) -> usize {
    assert!(sectors > 0, "sector count must be positive");
    let width = 360.0 / sectors as f64;
    ((angle / width).floor() as usize).min(sectors - 1)
}

/// Buckets point indices into `sectors` angular sectors around `origin`.
///
/// Returns exactly `sectors` buckets, bucket `s` holding the indices (in
/// input order) of the points whose angle falls in sector `s`. Returns no
/// buckets when `sectors` is zero.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::Point;
/// use warehouse_allocation::clustering::sector_partition;
///
/// let depot = Point::new(0.0, 0.0);
/// let points = [
///     Point::new(1.0, 1.0),   // 45°
///     Point::new(-1.0, 1.0),  // 135°
///     Point::new(-1.0, -1.0), // 225°
///     Point::new(1.0, -1.0),  // 315°
/// ];
/// let buckets = sector_partition(&points, &depot, 2);
/// assert_eq!(buckets, vec![vec![0, 1], vec![2, 3]]);
/// ```
pub fn sector_partition(points: &[Point], origin: &Point, sectors: usize) -> Vec<Vec<usize>> {
    if sectors == 0 {
        return Vec::new();
    }
    let mut buckets = vec![Vec::new(); sectors];
    for (i, p) in points.iter().enumerate() {
        let s = sector_of(angle_from_origin(p, origin), sectors);
        buckets[s].push(i);
    }
    buckets
}
