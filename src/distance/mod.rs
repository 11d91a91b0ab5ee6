//! Distance matrix and planar geometry helpers.

mod geometry;
mod matrix;

pub use geometry::{angle_from_origin, closest_point};
pub use matrix::DistanceMatrix;
