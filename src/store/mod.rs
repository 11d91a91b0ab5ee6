//! Persistence seam between the allocation engine and the durable store.
//!
//! - [`AllocationStore`]: Data-level operations the engine needs
//! - [`MemoryStore`]: Thread-safe in-memory implementation
//! - [`Session`]: Unit of work for one warehouse, holding pending assignments and
//!   working agent copies, flushed by [`Session::commit`]

#[cfg(test)]
mod flaky;
mod memory;
mod session;

#[cfg(test)]
pub(crate) use flaky::FlakyStore;

pub use memory::MemoryStore;
pub use session::{Admission, Session};

use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{Agent, AgentId, Capacity, Order, OrderId, Point, Warehouse, WarehouseId};

/// One order appended to one agent's route, with the leg that reaches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    /// Order being committed.
    pub order: OrderId,
    /// Agent whose route receives the order.
    pub agent: AgentId,
    /// Distance from the agent's previous stop (or the warehouse).
    pub leg: f64,
}

/// Operations the allocation engine performs against persistent storage.
///
/// Listing methods return records in ascending id order. Implementations
/// must apply [`commit`](AllocationStore::commit) atomically: every
/// assignment of the batch, in order, or none of them.
pub trait AllocationStore: Send + Sync {
    /// IDs of every warehouse, ascending.
    fn warehouse_ids(&self) -> Result<Vec<WarehouseId>, StoreError>;

    /// Looks up a warehouse.
    fn warehouse(&self, id: WarehouseId) -> Result<Warehouse, StoreError>;

    /// Every agent bound to the warehouse.
    fn agents(&self, warehouse: WarehouseId) -> Result<Vec<Agent>, StoreError>;

    /// Re-reads a single agent.
    fn agent(&self, id: AgentId) -> Result<Agent, StoreError>;

    /// Orders of the warehouse not yet committed to any route.
    fn undelivered_orders(&self, warehouse: WarehouseId) -> Result<Vec<Order>, StoreError>;

    /// Coordinate of an order.
    fn order_location(&self, id: OrderId) -> Result<Point, StoreError>;

    /// Applies a batch of assignments: marks each order committed to its
    /// agent and appends it to the agent's route.
    fn commit(&self, assignments: &[Assignment]) -> Result<(), StoreError>;

    /// Agents that pass eligibility screening: checked in and strictly
    /// under the order limit and the screening distance.
    fn eligible_agents(
        &self,
        warehouse: WarehouseId,
        capacity: &Capacity,
    ) -> Result<Vec<Agent>, StoreError> {
        Ok(self
            .agents(warehouse)?
            .into_iter()
            .filter(|a| a.is_eligible(capacity))
            .collect())
    }
}
