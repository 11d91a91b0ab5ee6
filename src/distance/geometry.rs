//! Nearest-point search and polar angles.

use crate::models::Point;

/// Index of the point in `points` closest to `reference`.
///
/// Ties go to the lowest index. Returns `None` if `points` is empty.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::Point;
/// use warehouse_allocation::distance::closest_point;
///
/// let points = [Point::new(5.0, 0.0), Point::new(1.0, 1.0), Point::new(-1.0, -1.0)];
/// assert_eq!(closest_point(&Point::new(0.0, 0.0), &points), Some(1));
/// ```
pub fn closest_point(reference: &Point, points: &[Point]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = reference.distance_squared_to(p);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Polar angle of `point` around `origin`, in degrees within `[0, 360)`.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::Point;
/// use warehouse_allocation::distance::angle_from_origin;
///
/// let origin = Point::new(0.0, 0.0);
/// assert!((angle_from_origin(&Point::new(0.0, 1.0), &origin) - 90.0).abs() < 1e-10);
/// assert!((angle_from_origin(&Point::new(0.0, -1.0), &origin) - 270.0).abs() < 1e-10);
/// ```
pub fn angle_from_origin(point: &Point, origin: &Point) -> f64 {
    let dy = point.y - origin.y;
    let dx = point.x - origin.x;
    let angle = dy.atan2(dx).to_degrees().rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative angles
    if angle >= 360.0 {
        0.0
    } else {
        angle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closest_point_empty() {
        assert_eq!(closest_point(&Point::new(0.0, 0.0), &[]), None);
    }

    #[test]
    fn test_closest_point_tie_lowest_index() {
        let points = [
            Point::new(2.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(-2.0, 0.0),
        ];
        assert_eq!(closest_point(&Point::new(0.0, 0.0), &points), Some(0));
    }

    #[test]
    fn test_angle_quadrants() {
        let o = Point::new(10.0, 10.0);
        let cases = [
            (Point::new(11.0, 10.0), 0.0),
            (Point::new(11.0, 11.0), 45.0),
            (Point::new(9.0, 10.0), 180.0),
            (Point::new(9.0, 9.0), 225.0),
            (Point::new(11.0, 9.0), 315.0),
        ];
        for (p, expected) in cases {
            assert!((angle_from_origin(&p, &o) - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn test_angle_range() {
        let o = Point::new(0.0, 0.0);
        let tiny_below = Point::new(1.0, -1e-18);
        let a = angle_from_origin(&tiny_below, &o);
        assert!((0.0..360.0).contains(&a));
        // Point on the origin maps to 0.
        assert_eq!(angle_from_origin(&o, &o), 0.0);
    }
}
