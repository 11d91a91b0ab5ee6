//! Store wrapper whose commits start failing after a set number succeed.

use std::sync::atomic::{AtomicUsize, Ordering};

use super::{AllocationStore, Assignment, MemoryStore};
use crate::error::StoreError;
use crate::models::{Agent, AgentId, Order, OrderId, Point, Warehouse, WarehouseId};

pub(crate) struct FlakyStore {
    inner: MemoryStore,
    commits_left: AtomicUsize,
}

impl FlakyStore {
    /// Lets `commits` commits through, then fails every later one.
    pub(crate) fn new(inner: MemoryStore, commits: usize) -> Self {
        Self {
            inner,
            commits_left: AtomicUsize::new(commits),
        }
    }

    pub(crate) fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// Lets every later commit through.
    pub(crate) fn recover(&self) {
        self.commits_left.store(usize::MAX, Ordering::SeqCst);
    }
}

impl AllocationStore for FlakyStore {
    fn warehouse_ids(&self) -> Result<Vec<WarehouseId>, StoreError> {
        self.inner.warehouse_ids()
    }

    fn warehouse(&self, id: WarehouseId) -> Result<Warehouse, StoreError> {
        self.inner.warehouse(id)
    }

    fn agents(&self, warehouse: WarehouseId) -> Result<Vec<Agent>, StoreError> {
        self.inner.agents(warehouse)
    }

    fn agent(&self, id: AgentId) -> Result<Agent, StoreError> {
        self.inner.agent(id)
    }

    fn undelivered_orders(&self, warehouse: WarehouseId) -> Result<Vec<Order>, StoreError> {
        self.inner.undelivered_orders(warehouse)
    }

    fn order_location(&self, id: OrderId) -> Result<Point, StoreError> {
        self.inner.order_location(id)
    }

    fn commit(&self, assignments: &[Assignment]) -> Result<(), StoreError> {
        let granted = self
            .commits_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        if granted.is_err() {
            return Err(StoreError::Unavailable("connection reset".into()));
        }
        self.inner.commit(assignments)
    }
}
