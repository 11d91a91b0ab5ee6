//! Route construction for matched agents.
//!
//! - [`GreedyRouteBuilder`]: Nearest-neighbor extension of one agent's route within a cluster, O(n²)
//! - [`round_robin`]: Cyclic hand-out when orders are fewer than agents, O(n·a)

mod greedy_route;
mod round_robin;

pub use greedy_route::{GreedyRouteBuilder, RouteExtension, RouteStop};
pub use round_robin::{round_robin, RoundRobinOutcome};
