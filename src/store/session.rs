//! Unit of work for one warehouse.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use super::{AllocationStore, Assignment};
use crate::error::StoreError;
use crate::models::{Agent, AgentId, Capacity, OrderId, Point, Warehouse};

/// Result of offering one order to one agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The order is pending on the agent's route.
    Accepted,
    /// The agent already carries the maximum number of orders.
    OrderCap,
    /// The leg would push the agent past the hard distance cap.
    DistanceCap,
}

/// Pending assignments for one warehouse, flushed to the store on commit.
///
/// Agents are re-read from the store every time they are requested, unless
/// this session holds uncommitted legs for them, in which case the working
/// copy (store state plus pending legs) is returned. Nothing reaches the
/// store before [`commit`](Session::commit); a failed commit discards all
/// pending work.
pub struct Session<'s, S: AllocationStore + ?Sized> {
    store: &'s S,
    warehouse: Warehouse,
    capacity: Capacity,
    working: HashMap<AgentId, Agent>,
    locations: HashMap<OrderId, Point>,
    pending: Vec<Assignment>,
    claimed: HashSet<OrderId>,
}

impl<'s, S: AllocationStore + ?Sized> Session<'s, S> {
    /// Opens a session for `warehouse`.
    pub fn new(store: &'s S, warehouse: Warehouse, capacity: Capacity) -> Self {
        Self {
            store,
            warehouse,
            capacity,
            working: HashMap::new(),
            locations: HashMap::new(),
            pending: Vec::new(),
            claimed: HashSet::new(),
        }
    }

    /// Warehouse this session allocates for.
    pub fn warehouse(&self) -> &Warehouse {
        &self.warehouse
    }

    /// Capacity limits enforced on every assignment.
    pub fn capacity(&self) -> &Capacity {
        &self.capacity
    }

    /// Assignments not yet committed.
    pub fn pending(&self) -> &[Assignment] {
        &self.pending
    }

    /// Freshest view of an agent.
    pub fn refresh_agent(&self, id: AgentId) -> Result<Agent, StoreError> {
        match self.working.get(&id) {
            Some(agent) => Ok(agent.clone()),
            None => self.store.agent(id),
        }
    }

    /// Where the agent currently stands: its last stop, or the warehouse if
    /// its route is empty.
    pub fn position_of(&mut self, id: AgentId) -> Result<Point, StoreError> {
        let agent = self.refresh_agent(id)?;
        match agent.last_stop() {
            None => Ok(self.warehouse.location()),
            Some(order) => self.location_of(order),
        }
    }

    fn location_of(&mut self, order: OrderId) -> Result<Point, StoreError> {
        if let Some(&p) = self.locations.get(&order) {
            return Ok(p);
        }
        let p = self.store.order_location(order)?;
        self.locations.insert(order, p);
        Ok(p)
    }

    /// Offers `order` (at `location`, reached by a leg of length `leg`) to
    /// the agent. The assignment is recorded only if both hard caps hold.
    ///
    /// Fails with [`StoreError::OrderAlreadyCommitted`] if the order is
    /// already pending in this session.
    pub fn try_assign(
        &mut self,
        agent: AgentId,
        order: OrderId,
        location: Point,
        leg: f64,
    ) -> Result<Admission, StoreError> {
        if self.claimed.contains(&order) {
            return Err(StoreError::OrderAlreadyCommitted(order));
        }
        let mut working = self.refresh_agent(agent)?;
        if working.order_count() >= self.capacity.max_orders {
            return Ok(Admission::OrderCap);
        }
        if !working.admits_leg(&self.capacity, leg) {
            return Ok(Admission::DistanceCap);
        }

        working.push_leg(order, leg);
        self.working.insert(agent, working);
        self.locations.insert(order, location);
        self.claimed.insert(order);
        self.pending.push(Assignment { order, agent, leg });
        Ok(Admission::Accepted)
    }

    /// Flushes pending assignments to the store, returning how many were
    /// written. On failure the pending work is discarded.
    pub fn commit(&mut self) -> Result<usize, StoreError> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let result = self.store.commit(&self.pending);
        let count = self.pending.len();
        self.discard();
        result?;
        debug!(warehouse = %self.warehouse.id(), count, "committed assignments");
        Ok(count)
    }

    /// Drops pending assignments and working agent copies.
    pub fn discard(&mut self) {
        self.pending.clear();
        self.claimed.clear();
        self.working.clear();
    }
}
