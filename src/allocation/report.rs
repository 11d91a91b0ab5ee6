//! Outcome of an allocation run.

use serde::Serialize;

use crate::models::WarehouseId;

/// Strategy used by one pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Angular sectors around the warehouse (first pass).
    Sector,
    /// Balanced k-means clusters matched to agents.
    Cluster,
    /// Cyclic hand-out (fewer orders than agents).
    RoundRobin,
}

/// Why a run stopped. None of these are failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every order of the warehouse is committed.
    NoOrders,
    /// No agent passed eligibility screening.
    NoAgents,
    /// A pass committed nothing.
    Stalled,
    /// The round-robin fallback ran.
    RoundRobinComplete,
    /// The pass limit was reached.
    PassLimit,
    /// The wall-clock budget ran out.
    DeadlineExceeded,
}

/// Figures for one pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PassSummary {
    /// Zero-based pass number.
    pub index: usize,
    /// Strategy used.
    pub phase: Phase,
    /// Pending orders when the pass started.
    pub orders_before: usize,
    /// Agents offered work.
    pub agents: usize,
    /// Orders committed by the pass.
    pub assigned: usize,
    /// Sum of the legs appended by the pass.
    pub distance_added: f64,
}

/// Outcome of allocating one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AllocationReport {
    /// Warehouse allocated.
    pub warehouse: WarehouseId,
    /// Passes run, in order.
    pub passes: Vec<PassSummary>,
    /// Why the run stopped.
    pub termination: Termination,
    /// Orders committed by this run.
    pub assigned: usize,
    /// Orders still pending afterwards.
    pub remaining: usize,
}

impl AllocationReport {
    /// Total distance appended across all passes.
    pub fn distance_added(&self) -> f64 {
        self.passes.iter().map(|p| p.distance_added).sum()
    }

    /// Returns `true` if the run changed nothing.
    pub fn is_noop(&self) -> bool {
        self.assigned == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes() {
        let report = AllocationReport {
            warehouse: WarehouseId(2),
            passes: vec![PassSummary {
                index: 0,
                phase: Phase::Sector,
                orders_before: 5,
                agents: 2,
                assigned: 5,
                distance_added: 12.5,
            }],
            termination: Termination::NoOrders,
            assigned: 5,
            remaining: 0,
        };
        let json = serde_json::to_value(&report).expect("serialize");
        assert_eq!(json["warehouse"], 2);
        assert_eq!(json["termination"], "no_orders");
        assert_eq!(json["passes"][0]["phase"], "sector");
        assert!((report.distance_added() - 12.5).abs() < 1e-10);
        assert!(!report.is_noop());
    }
}
