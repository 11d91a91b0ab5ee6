//! Allocation driver.
//!
//! - [`Allocator`]: Per-warehouse pass loop (sector, cluster, round robin)
//! - [`AllocationConfig`]: Capacity, k-means and run limits
//! - [`AllocationReport`]: Per-pass figures and termination reason

mod config;
mod orchestrator;
mod report;

pub use config::AllocationConfig;
pub use orchestrator::Allocator;
pub use report::{AllocationReport, PassSummary, Phase, Termination};
