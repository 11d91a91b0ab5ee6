//! Allocation run configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clustering::KMeansParams;
use crate::error::AllocationError;
use crate::models::Capacity;

/// Parameters of an allocation run.
///
/// Every field has a default, so a JSON document only needs the fields it
/// overrides.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::allocation::AllocationConfig;
///
/// let cfg = AllocationConfig::from_json(r#"{"seed": 7, "capacity": {"max_orders": 40}}"#).unwrap();
/// assert_eq!(cfg.seed, 7);
/// assert_eq!(cfg.capacity.max_orders, 40);
/// assert_eq!(cfg.capacity.max_distance, 100.0);
/// assert_eq!(cfg.max_passes, 64);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    /// Per-agent limits.
    pub capacity: Capacity,
    /// Balanced k-means iteration limits.
    pub kmeans: KMeansParams,
    /// Base seed; each warehouse run derives its own generator from it.
    pub seed: u64,
    /// Maximum passes per warehouse run.
    pub max_passes: usize,
    /// Optional wall-clock budget per warehouse run, in milliseconds.
    pub deadline_ms: Option<u64>,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            capacity: Capacity::default(),
            kmeans: KMeansParams::default(),
            seed: 42,
            max_passes: 64,
            deadline_ms: None,
        }
    }
}

impl AllocationConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, AllocationError> {
        let cfg: Self = serde_json::from_str(json)
            .map_err(|e| AllocationError::InvalidConfig(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Sets the capacity limits.
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the k-means limits.
    pub fn with_kmeans(mut self, kmeans: KMeansParams) -> Self {
        self.kmeans = kmeans;
        self
    }

    /// Sets the base seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the pass limit.
    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// Sets the wall-clock budget.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline_ms = Some(deadline.as_millis() as u64);
        self
    }

    /// Wall-clock budget, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Checks that the limits describe a usable run.
    pub fn validate(&self) -> Result<(), AllocationError> {
        let cap = &self.capacity;
        if cap.max_orders == 0 {
            return Err(invalid("capacity.max_orders must be positive"));
        }
        if !cap.max_distance.is_finite() || cap.max_distance <= 0.0 {
            return Err(invalid("capacity.max_distance must be positive and finite"));
        }
        if !cap.screening_distance.is_finite()
            || cap.screening_distance <= 0.0
            || cap.screening_distance > cap.max_distance
        {
            return Err(invalid(
                "capacity.screening_distance must be in (0, max_distance]",
            ));
        }
        if !self.kmeans.tolerance.is_finite() || self.kmeans.tolerance < 0.0 {
            return Err(invalid("kmeans.tolerance must be non-negative and finite"));
        }
        if self.kmeans.max_iters == 0 {
            return Err(invalid("kmeans.max_iters must be positive"));
        }
        if self.max_passes == 0 {
            return Err(invalid("max_passes must be positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> AllocationError {
    AllocationError::InvalidConfig(msg.to_string())
}
