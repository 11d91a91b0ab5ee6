//! Delivery agent with its route for the day.

use serde::{Deserialize, Serialize};

use super::{AgentId, Capacity, OrderId, WarehouseId};

/// A delivery agent bound to exactly one warehouse.
///
/// The route is the ordered list of committed orders (insertion order is
/// visiting order). The order count is the route length, and the cumulative
/// distance only grows as legs are appended.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::{Agent, AgentId, WarehouseId};
///
/// let agent = Agent::new(AgentId(1), WarehouseId(1)).with_checked_in(true);
/// assert!(agent.is_checked_in());
/// assert_eq!(agent.order_count(), 0);
/// assert_eq!(agent.distance(), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    id: AgentId,
    warehouse: WarehouseId,
    checked_in: bool,
    route: Vec<OrderId>,
    distance: f64,
}

impl Agent {
    /// Creates a checked-out agent with an empty route.
    pub fn new(id: AgentId, warehouse: WarehouseId) -> Self {
        Self {
            id,
            warehouse,
            checked_in: false,
            route: Vec::new(),
            distance: 0.0,
        }
    }

    /// Sets the checked-in flag.
    pub fn with_checked_in(mut self, checked_in: bool) -> Self {
        self.checked_in = checked_in;
        self
    }

    /// Seeds a route carried over from earlier runs of the day.
    pub fn with_route(mut self, route: Vec<OrderId>, distance: f64) -> Self {
        self.route = route;
        self.distance = distance;
        self
    }

    /// Agent ID.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Warehouse the agent works for.
    pub fn warehouse(&self) -> WarehouseId {
        self.warehouse
    }

    /// Returns `true` if the agent is checked in.
    pub fn is_checked_in(&self) -> bool {
        self.checked_in
    }

    /// Sets the checked-in flag.
    pub fn set_checked_in(&mut self, checked_in: bool) {
        self.checked_in = checked_in;
    }

    /// Ordered route of committed orders.
    pub fn route(&self) -> &[OrderId] {
        &self.route
    }

    /// Number of orders on the route.
    pub fn order_count(&self) -> usize {
        self.route.len()
    }

    /// Cumulative distance, warehouse leg included.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Last stop on the route, if any.
    pub fn last_stop(&self) -> Option<OrderId> {
        self.route.last().copied()
    }

    /// Returns `true` if the agent would be offered work in a sector or
    /// cluster pass.
    pub fn is_eligible(&self, capacity: &Capacity) -> bool {
        self.checked_in && capacity.screens(self.order_count(), self.distance)
    }

    /// Returns `true` if the agent is checked in and under both hard caps.
    pub fn has_headroom(&self, capacity: &Capacity) -> bool {
        self.checked_in && capacity.has_headroom(self.order_count(), self.distance)
    }

    /// Returns `true` if a leg of length `leg` can be appended.
    pub fn admits_leg(&self, capacity: &Capacity, leg: f64) -> bool {
        capacity.admits_leg(self.order_count(), self.distance, leg)
    }

    pub(crate) fn push_leg(&mut self, order: OrderId, leg: f64) {
        self.route.push(order);
        self.distance += leg;
    }
}
