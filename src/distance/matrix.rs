//! Dense distance matrix.

use crate::models::Point;

/// A dense n×n distance matrix stored in row-major order.
///
/// Built from point coordinates, the matrix is symmetric with a zero
/// diagonal.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::Point;
/// use warehouse_allocation::distance::DistanceMatrix;
///
/// let points = vec![
///     Point::new(0.0, 0.0),
///     Point::new(3.0, 4.0),
///     Point::new(6.0, 8.0),
/// ];
/// let dm = DistanceMatrix::from_points(&points);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Computes the pairwise Euclidean distance matrix of `points`.
    ///
    /// Coordinates are differenced directly, so every entry is non-negative
    /// and `d(i, j) == d(j, i)` bit for bit.
    pub fn from_points(points: &[Point]) -> Self {
        let size = points.len();
        let data = points
            .iter()
            .flat_map(|a| points.iter().map(move |b| a.distance_squared_to(b).max(0.0).sqrt()))
            .collect();
        let dm = Self { data, size };
        debug_assert!(dm.is_symmetric(0.0), "pairwise distances must be symmetric");
        dm
    }

    /// Distance between points `from` and `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Number of points covered.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if `d(i, j)` and `d(j, i)` differ by at most `tol`
    /// for every pair.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        (0..self.size).all(|i| {
            ((i + 1)..self.size).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol)
        })
    }

    /// Returns the nearest point to `from` among `candidates`.
    ///
    /// Ties go to the candidate listed first. Returns `None` if `candidates`
    /// is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for &c in candidates {
            let d = self.get(from, c);
            match best {
                Some((_, bd)) if d >= bd => {}
                _ => best = Some((c, d)),
            }
        }
        best.map(|(c, _)| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 4.0),
            Point::new(0.0, 8.0),
        ]
    }

    #[test]
    fn test_from_points() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(1, 2) - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_zero_diagonal_and_symmetric() {
        let dm = DistanceMatrix::from_points(&sample_points());
        for i in 0..dm.size() {
            assert_eq!(dm.get(i, i), 0.0);
        }
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_duplicate_points_are_zero_apart() {
        let p = Point::new(12.345678, 98.7654321);
        let dm = DistanceMatrix::from_points(&[p, p]);
        assert_eq!(dm.get(0, 1), 0.0);
    }

    #[test]
    fn test_empty() {
        let dm = DistanceMatrix::from_points(&[]);
        assert_eq!(dm.size(), 0);
    }

    #[test]
    fn test_nearest_neighbor() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(0, &[2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[]), None);
    }

    #[test]
    fn test_nearest_neighbor_tie_keeps_first() {
        // Points 1 and 2 are both 5.0 from point 0.
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 5.0),
            Point::new(5.0, 0.0),
        ];
        let dm = DistanceMatrix::from_points(&points);
        assert_eq!(dm.nearest_neighbor(0, &[2, 1]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
    }

    #[test]
    fn test_asymmetric_matrix() {
        let dm = DistanceMatrix {
            data: vec![0.0, 10.0, 15.0, 0.0],
            size: 2,
        };
        assert!(!dm.is_symmetric(1e-10));
        assert!(dm.is_symmetric(5.0));
    }
}
