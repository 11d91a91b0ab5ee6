//! Domain model types for warehouse order allocation.
//!
//! Provides the records the allocation engine reads and mutates: warehouses
//! with a fixed depot coordinate, delivery agents carrying an ordered route,
//! and orders that move from pending to committed exactly once. Records refer
//! to each other by id, never by live reference.

mod agent;
mod capacity;
mod order;
mod point;
mod warehouse;

pub use agent::Agent;
pub use capacity::Capacity;
pub use order::{Order, OrderStatus};
pub use point::{AgentId, OrderId, Point, WarehouseId};
pub use warehouse::Warehouse;
