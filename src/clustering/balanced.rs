//! Size-balanced k-means clustering.
//!
//! # Algorithm
//!
//! Seeds centroids with k-means++ (unless warm-start centroids are given),
//! then alternates two steps:
//!
//! 1. **Assign**: visit points in index order; each point walks its
//!    centroids nearest-first and joins the first cluster still below
//!    `floor(n/k)` members. The `n mod k` points left over join their
//!    nearest cluster that is still below `floor(n/k) + 1`.
//! 2. **Update**: move each centroid to the mean of its members (an empty
//!    cluster keeps its centroid).
//!
//! Stops when the Frobenius norm of the centroid shift drops below the
//! tolerance, or after the iteration cap. Cluster sizes differ by at most
//! one.
//!
//! # Reference
//!
//! Arthur, D. & Vassilvitskii, S. (2007). "k-means++: The Advantages of
//! Careful Seeding", *SODA '07*, 1027-1035.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::models::Point;

/// Iteration limits for [`balanced_kmeans`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansParams {
    /// Maximum assign/update rounds.
    pub max_iters: usize,
    /// Centroid-shift norm below which the clustering is converged.
    pub tolerance: f64,
}

impl Default for KMeansParams {
    fn default() -> Self {
        Self {
            max_iters: 10,
            tolerance: 1e-4,
        }
    }
}

/// Output of [`balanced_kmeans`].
#[derive(Debug, Clone, PartialEq)]
pub struct BalancedClustering {
    labels: Vec<usize>,
    centroids: Vec<Point>,
    iterations: usize,
}

impl BalancedClustering {
    fn empty() -> Self {
        Self {
            labels: Vec::new(),
            centroids: Vec::new(),
            iterations: 0,
        }
    }

    /// Cluster label of every input point.
    pub fn labels(&self) -> &[usize] {
        &self.labels
    }

    /// Centroid of every cluster (mean of its members).
    pub fn centroids(&self) -> &[Point] {
        &self.centroids
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.centroids.len()
    }

    /// Assign/update rounds performed.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// Indices of the points in `cluster`, ascending.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &l)| l == cluster)
            .map(|(i, _)| i)
            .collect()
    }

    /// Member count of every cluster.
    pub fn sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0; self.centroids.len()];
        for &l in &self.labels {
            sizes[l] += 1;
        }
        sizes
    }
}

/// Picks `k` initial centroids by k-means++ seeding.
///
/// The first centroid is a uniformly random point; each next one is drawn
/// with probability proportional to its squared distance to the nearest
/// centroid chosen so far. When every remaining weight is zero (duplicate
/// points) the draw falls back to uniform.
///
/// Returns an empty vector if `points` is empty or `k` is zero.
pub fn kmeans_plus_plus<R: Rng + ?Sized>(points: &[Point], k: usize, rng: &mut R) -> Vec<Point> {
    if points.is_empty() || k == 0 {
        return Vec::new();
    }
    let n = points.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(points[rng.random_range(0..n)]);

    let mut nearest_sq: Vec<f64> = points
        .iter()
        .map(|p| p.distance_squared_to(&centroids[0]))
        .collect();

    while centroids.len() < k {
        let total: f64 = nearest_sq.iter().sum();
        let pick = if total > 0.0 {
            let target = rng.random::<f64>() * total;
            let mut acc = 0.0;
            let mut chosen = n - 1;
            for (i, &w) in nearest_sq.iter().enumerate() {
                acc += w;
                if w > 0.0 && acc > target {
                    chosen = i;
                    break;
                }
            }
            chosen
        } else {
            rng.random_range(0..n)
        };

        let c = points[pick];
        for (d, p) in nearest_sq.iter_mut().zip(points) {
            *d = d.min(p.distance_squared_to(&c));
        }
        centroids.push(c);
    }
    centroids
}

/// Partitions `points` into `k` clusters of near-equal size.
///
/// `warm_start` supplies initial centroids; it is used only when it holds
/// exactly `k` points, otherwise centroids are seeded with
/// [`kmeans_plus_plus`] from `rng`.
///
/// # Examples
///
/// ```
/// use rand::SeedableRng;
/// use rand::rngs::StdRng;
/// use warehouse_allocation::models::Point;
/// use warehouse_allocation::clustering::{balanced_kmeans, KMeansParams};
///
/// let points = vec![
///     Point::new(0.0, 0.0), Point::new(0.5, 0.0), Point::new(0.0, 0.5),
///     Point::new(10.0, 10.0), Point::new(10.5, 10.0), Point::new(10.0, 10.5),
/// ];
/// let mut rng = StdRng::seed_from_u64(42);
/// let result = balanced_kmeans(&points, 2, None, &KMeansParams::default(), &mut rng);
/// assert_eq!(result.sizes(), vec![3, 3]);
/// assert_eq!(result.labels()[0], result.labels()[1]);
/// assert_ne!(result.labels()[0], result.labels()[3]);
/// ```
pub fn balanced_kmeans<R: Rng + ?Sized>(
    points: &[Point],
    k: usize,
    warm_start: Option<&[Point]>,
    params: &KMeansParams,
    rng: &mut R,
) -> BalancedClustering {
    let n = points.len();
    if n == 0 || k == 0 {
        return BalancedClustering::empty();
    }

    let mut centroids = match warm_start {
        Some(c) if c.len() == k => c.to_vec(),
        _ => kmeans_plus_plus(points, k, rng),
    };
    let base = n / k;

    let mut labels = vec![0; n];
    let mut iterations = 0;
    let rounds = params.max_iters.max(1);

    for _ in 0..rounds {
        iterations += 1;
        labels = assign_balanced(points, &centroids, base);
        let updated = recenter(points, &labels, &centroids);

        let shift: f64 = centroids
            .iter()
            .zip(&updated)
            .map(|(a, b)| a.distance_squared_to(b))
            .sum::<f64>()
            .sqrt();
        centroids = updated;
        if shift < params.tolerance {
            break;
        }
    }

    BalancedClustering {
        labels,
        centroids,
        iterations,
    }
}

/// Capacity-aware assignment step.
fn assign_balanced(points: &[Point], centroids: &[Point], base: usize) -> Vec<usize> {
    let k = centroids.len();
    let mut counts = vec![0usize; k];
    let mut labels: Vec<Option<usize>> = vec![None; points.len()];

    let preferences: Vec<Vec<usize>> = points
        .iter()
        .map(|p| {
            let dists: Vec<f64> = centroids.iter().map(|c| p.distance_squared_to(c)).collect();
            let mut order: Vec<usize> = (0..k).collect();
            order.sort_by(|&a, &b| dists[a].total_cmp(&dists[b]));
            order
        })
        .collect();

    for (i, prefs) in preferences.iter().enumerate() {
        if let Some(&c) = prefs.iter().find(|&&c| counts[c] < base) {
            labels[i] = Some(c);
            counts[c] += 1;
        }
    }

    // Leftovers: at most one extra member per cluster.
    for (i, prefs) in preferences.iter().enumerate() {
        if labels[i].is_some() {
            continue;
        }
        let c = prefs
            .iter()
            .copied()
            .find(|&c| counts[c] <= base)
            .unwrap_or(prefs[0]);
        labels[i] = Some(c);
        counts[c] += 1;
    }

    labels.into_iter().map(|l| l.unwrap_or(0)).collect()
}

/// Mean of each cluster's members; empty clusters keep their centroid.
fn recenter(points: &[Point], labels: &[usize], centroids: &[Point]) -> Vec<Point> {
    let k = centroids.len();
    let mut sums = vec![(0.0, 0.0, 0usize); k];
    for (p, &l) in points.iter().zip(labels) {
        sums[l].0 += p.x;
        sums[l].1 += p.y;
        sums[l].2 += 1;
    }
    sums.iter()
        .zip(centroids)
        .map(|(&(sx, sy, count), &old)| {
            if count == 0 {
                old
            } else {
                Point::new(sx / count as f64, sy / count as f64)
            }
        })
        .collect()
}
