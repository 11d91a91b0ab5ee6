//! Order record and lifecycle.

use serde::{Deserialize, Serialize};

use super::{AgentId, OrderId, Point, WarehouseId};

/// Lifecycle of an order within one day.
///
/// `Committed` is what the surrounding system calls "delivered": the order
/// has been placed on an agent's route, not physically handed over. The
/// agent is carried inside the variant so a committed order always names
/// its agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrderStatus {
    /// Not yet on any route.
    Pending,
    /// Appended to the route of `agent`. Terminal for the day.
    Committed {
        /// Agent whose route holds the order.
        agent: AgentId,
    },
}

/// A delivery order waiting at a warehouse.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::{Order, OrderId, Point, WarehouseId};
///
/// let order = Order::new(OrderId(9), WarehouseId(1), Point::new(3.0, 4.0));
/// assert!(!order.is_delivered());
/// assert!(order.assigned_agent().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    warehouse: WarehouseId,
    location: Point,
    status: OrderStatus,
}

impl Order {
    /// Creates a pending order.
    pub fn new(id: OrderId, warehouse: WarehouseId, location: Point) -> Self {
        Self {
            id,
            warehouse,
            location,
            status: OrderStatus::Pending,
        }
    }

    /// Order ID.
    pub fn id(&self) -> OrderId {
        self.id
    }

    /// Warehouse the order ships from.
    pub fn warehouse(&self) -> WarehouseId {
        self.warehouse
    }

    /// Delivery coordinate.
    pub fn location(&self) -> Point {
        self.location
    }

    /// Current lifecycle state.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns `true` once the order is committed to a route.
    pub fn is_delivered(&self) -> bool {
        matches!(self.status, OrderStatus::Committed { .. })
    }

    /// Agent the order is committed to, if any.
    pub fn assigned_agent(&self) -> Option<AgentId> {
        match self.status {
            OrderStatus::Pending => None,
            OrderStatus::Committed { agent } => Some(agent),
        }
    }

    pub(crate) fn commit_to(&mut self, agent: AgentId) {
        self.status = OrderStatus::Committed { agent };
    }
}
