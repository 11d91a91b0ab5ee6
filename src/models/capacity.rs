//! Per-agent order count and travel distance limits.

use serde::{Deserialize, Serialize};

/// Capacity thresholds shared by every agent of a run.
///
/// Two distance thresholds exist. `screening_distance` decides whether an
/// agent is offered work at the start of a sector or cluster pass, while
/// `max_distance` is the hard cap checked when a leg is actually appended.
/// The screening value is tighter.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::Capacity;
///
/// let cap = Capacity::default();
/// assert_eq!(cap.max_orders, 60);
/// assert!(cap.admits_leg(59, 90.0, 10.0));
/// assert!(!cap.admits_leg(59, 90.0, 10.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capacity {
    /// Maximum number of orders on one route.
    pub max_orders: usize,
    /// Hard cap on cumulative route distance.
    pub max_distance: f64,
    /// Distance an agent must be strictly under to be screened as eligible.
    pub screening_distance: f64,
}

impl Capacity {
    /// Default maximum orders per agent.
    pub const MAX_ORDERS: usize = 60;
    /// Default hard distance cap.
    pub const MAX_DISTANCE: f64 = 100.0;
    /// Default eligibility screening distance.
    pub const SCREENING_DISTANCE: f64 = 95.0;

    /// Returns `true` if an agent with this load passes eligibility screening.
    pub fn screens(&self, order_count: usize, distance: f64) -> bool {
        order_count < self.max_orders && distance < self.screening_distance
    }

    /// Returns `true` if an agent with this load is under both hard caps.
    pub fn has_headroom(&self, order_count: usize, distance: f64) -> bool {
        order_count < self.max_orders && distance < self.max_distance
    }

    /// Returns `true` if appending a leg of length `leg` keeps both caps.
    pub fn admits_leg(&self, order_count: usize, distance: f64, leg: f64) -> bool {
        order_count < self.max_orders && distance + leg <= self.max_distance
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            max_orders: Self::MAX_ORDERS,
            max_distance: Self::MAX_DISTANCE,
            screening_distance: Self::SCREENING_DISTANCE,
        }
    }
}
