//! # warehouse-allocation
//!
//! Assigns pending delivery orders to checked-in agents of each warehouse,
//! extending every agent's route under an order-count and travel-distance
//! cap. Orders are first partitioned into angular sectors around the
//! warehouse, then into balanced k-means clusters on later passes; when
//! orders are scarcer than agents they are handed out round-robin.
//!
//! ## Modules
//!
//! - [`models`]: Domain records (Warehouse, Agent, Order, Capacity)
//! - [`distance`]: Distance matrix and angle helpers
//! - [`clustering`]: Sector partition, balanced k-means, cluster matching
//! - [`constructive`]: Greedy route extension and round-robin hand-out
//! - [`store`]: Storage trait, in-memory store, per-warehouse session
//! - [`allocation`]: Pass loop, configuration and reports
//! - [`error`]: Store and allocation errors

pub mod allocation;
pub mod clustering;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod models;
pub mod store;

pub use allocation::{AllocationConfig, AllocationReport, Allocator, Termination};
pub use error::{AllocationError, StoreError};
