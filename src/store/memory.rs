//! In-memory store.

use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::{AllocationStore, Assignment};
use crate::error::StoreError;
use crate::models::{Agent, AgentId, Order, OrderId, Point, Warehouse, WarehouseId};

#[derive(Debug, Default)]
struct Tables {
    warehouses: BTreeMap<WarehouseId, Warehouse>,
    agents: BTreeMap<AgentId, Agent>,
    orders: BTreeMap<OrderId, Order>,
}

/// Thread-safe in-memory [`AllocationStore`].
///
/// Each agent is bound to exactly one warehouse; re-inserting an agent under
/// a different warehouse is rejected.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::{Agent, AgentId, Order, OrderId, Point, Warehouse, WarehouseId};
/// use warehouse_allocation::store::{AllocationStore, MemoryStore};
///
/// let store = MemoryStore::new();
/// store.insert_warehouse(Warehouse::new(WarehouseId(1), Point::new(0.0, 0.0)));
/// store.insert_agent(Agent::new(AgentId(1), WarehouseId(1)).with_checked_in(true)).unwrap();
/// store.insert_order(Order::new(OrderId(1), WarehouseId(1), Point::new(3.0, 4.0))).unwrap();
///
/// assert_eq!(store.undelivered_orders(WarehouseId(1)).unwrap().len(), 1);
/// assert_eq!(store.agents(WarehouseId(1)).unwrap().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a warehouse.
    pub fn insert_warehouse(&self, warehouse: Warehouse) {
        self.tables.write().warehouses.insert(warehouse.id(), warehouse);
    }

    /// Inserts or replaces an agent.
    ///
    /// Fails if the warehouse is unknown or the agent already belongs to a
    /// different warehouse.
    pub fn insert_agent(&self, agent: Agent) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        if !tables.warehouses.contains_key(&agent.warehouse()) {
            return Err(StoreError::WarehouseNotFound(agent.warehouse()));
        }
        if let Some(existing) = tables.agents.get(&agent.id()) {
            if existing.warehouse() != agent.warehouse() {
                return Err(StoreError::AgentWarehouseConflict {
                    agent: agent.id(),
                    existing: existing.warehouse(),
                    requested: agent.warehouse(),
                });
            }
        }
        tables.agents.insert(agent.id(), agent);
        Ok(())
    }

    /// Inserts or replaces an order.
    ///
    /// Fails if the warehouse is unknown or the location is NaN or infinite.
    pub fn insert_order(&self, order: Order) -> Result<(), StoreError> {
        if !order.location().is_finite() {
            return Err(StoreError::InvalidLocation(order.id()));
        }
        let mut tables = self.tables.write();
        if !tables.warehouses.contains_key(&order.warehouse()) {
            return Err(StoreError::WarehouseNotFound(order.warehouse()));
        }
        tables.orders.insert(order.id(), order);
        Ok(())
    }

    /// Sets an agent's checked-in flag.
    pub fn set_checked_in(&self, agent: AgentId, checked_in: bool) -> Result<(), StoreError> {
        let mut tables = self.tables.write();
        let a = tables
            .agents
            .get_mut(&agent)
            .ok_or(StoreError::AgentNotFound(agent))?;
        a.set_checked_in(checked_in);
        Ok(())
    }

    /// Looks up an order.
    pub fn order(&self, id: OrderId) -> Result<Order, StoreError> {
        self.tables
            .read()
            .orders
            .get(&id)
            .cloned()
            .ok_or(StoreError::OrderNotFound(id))
    }

    /// Every order of a warehouse, committed or not.
    pub fn orders(&self, warehouse: WarehouseId) -> Vec<Order> {
        self.tables
            .read()
            .orders
            .values()
            .filter(|o| o.warehouse() == warehouse)
            .cloned()
            .collect()
    }
}

impl AllocationStore for MemoryStore {
    fn warehouse_ids(&self) -> Result<Vec<WarehouseId>, StoreError> {
        Ok(self.tables.read().warehouses.keys().copied().collect())
    }

    fn warehouse(&self, id: WarehouseId) -> Result<Warehouse, StoreError> {
        self.tables
            .read()
            .warehouses
            .get(&id)
            .cloned()
            .ok_or(StoreError::WarehouseNotFound(id))
    }

    fn agents(&self, warehouse: WarehouseId) -> Result<Vec<Agent>, StoreError> {
        Ok(self
            .tables
            .read()
            .agents
            .values()
            .filter(|a| a.warehouse() == warehouse)
            .cloned()
            .collect())
    }

    fn agent(&self, id: AgentId) -> Result<Agent, StoreError> {
        self.tables
            .read()
            .agents
            .get(&id)
            .cloned()
            .ok_or(StoreError::AgentNotFound(id))
    }

    fn undelivered_orders(&self, warehouse: WarehouseId) -> Result<Vec<Order>, StoreError> {
        Ok(self
            .tables
            .read()
            .orders
            .values()
            .filter(|o| o.warehouse() == warehouse && !o.is_delivered())
            .cloned()
            .collect())
    }

    fn order_location(&self, id: OrderId) -> Result<Point, StoreError> {
        self.tables
            .read()
            .orders
            .get(&id)
            .map(Order::location)
            .ok_or(StoreError::OrderNotFound(id))
    }

    fn commit(&self, assignments: &[Assignment]) -> Result<(), StoreError> {
        let mut tables = self.tables.write();

        // Validate the whole batch before touching anything.
        let mut seen = std::collections::HashSet::with_capacity(assignments.len());
        for a in assignments {
            let order = tables
                .orders
                .get(&a.order)
                .ok_or(StoreError::OrderNotFound(a.order))?;
            let agent = tables
                .agents
                .get(&a.agent)
                .ok_or(StoreError::AgentNotFound(a.agent))?;
            if order.is_delivered() || !seen.insert(a.order) {
                return Err(StoreError::OrderAlreadyCommitted(a.order));
            }
            if order.warehouse() != agent.warehouse() {
                return Err(StoreError::WarehouseMismatch {
                    order: a.order,
                    agent: a.agent,
                });
            }
        }

        for a in assignments {
            if let Some(order) = tables.orders.get_mut(&a.order) {
                order.commit_to(a.agent);
            }
            if let Some(agent) = tables.agents.get_mut(&a.agent) {
                agent.push_leg(a.order, a.leg);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_warehouse(Warehouse::new(WarehouseId(1), Point::new(0.0, 0.0)));
        store.insert_warehouse(Warehouse::new(WarehouseId(2), Point::new(9.0, 9.0)));
        store
            .insert_agent(Agent::new(AgentId(1), WarehouseId(1)).with_checked_in(true))
            .expect("agent");
        store
            .insert_agent(Agent::new(AgentId(2), WarehouseId(2)).with_checked_in(true))
            .expect("agent");
        for i in 1..=3 {
            store
                .insert_order(Order::new(
                    OrderId(i),
                    WarehouseId(1),
                    Point::new(i as f64, 0.0),
                ))
                .expect("order");
        }
        store
            .insert_order(Order::new(OrderId(9), WarehouseId(2), Point::new(9.0, 10.0)))
            .expect("order");
        store
    }

    #[test]
    fn test_agent_bound_to_one_warehouse() {
        let store = seeded();
        let err = store
            .insert_agent(Agent::new(AgentId(1), WarehouseId(2)))
            .expect_err("conflict");
        assert_eq!(
            err,
            StoreError::AgentWarehouseConflict {
                agent: AgentId(1),
                existing: WarehouseId(1),
                requested: WarehouseId(2),
            }
        );
        // Same warehouse replaces.
        store
            .insert_agent(Agent::new(AgentId(1), WarehouseId(1)))
            .expect("replace");
        assert!(!store.agent(AgentId(1)).expect("agent").is_checked_in());
    }

    #[test]
    fn test_unknown_warehouse() {
        let store = MemoryStore::new();
        assert_eq!(
            store.insert_agent(Agent::new(AgentId(1), WarehouseId(5))),
            Err(StoreError::WarehouseNotFound(WarehouseId(5)))
        );
        assert_eq!(
            store.insert_order(Order::new(OrderId(1), WarehouseId(5), Point::default())),
            Err(StoreError::WarehouseNotFound(WarehouseId(5)))
        );
        assert!(store.warehouse(WarehouseId(5)).is_err());
    }

    #[test]
    fn test_commit_applies_batch() {
        let store = seeded();
        store
            .commit(&[
                Assignment {
                    order: OrderId(1),
                    agent: AgentId(1),
                    leg: 1.0,
                },
                Assignment {
                    order: OrderId(2),
                    agent: AgentId(1),
                    leg: 1.0,
                },
            ])
            .expect("commit");
        let agent = store.agent(AgentId(1)).expect("agent");
        assert_eq!(agent.route(), &[OrderId(1), OrderId(2)]);
        assert!((agent.distance() - 2.0).abs() < 1e-10);
        assert_eq!(
            store.order(OrderId(1)).expect("order").assigned_agent(),
            Some(AgentId(1))
        );
        assert_eq!(
            store.undelivered_orders(WarehouseId(1)).expect("orders").len(),
            1
        );
    }

    #[test]
    fn test_commit_is_all_or_nothing() {
        let store = seeded();
        let err = store
            .commit(&[
                Assignment {
                    order: OrderId(1),
                    agent: AgentId(1),
                    leg: 1.0,
                },
                Assignment {
                    order: OrderId(9),
                    agent: AgentId(1),
                    leg: 1.0,
                },
            ])
            .expect_err("cross-warehouse");
        assert_eq!(
            err,
            StoreError::WarehouseMismatch {
                order: OrderId(9),
                agent: AgentId(1),
            }
        );
        assert!(!store.order(OrderId(1)).expect("order").is_delivered());
        assert!(store.agent(AgentId(1)).expect("agent").route().is_empty());
    }

    #[test]
    fn test_commit_rejects_duplicates() {
        let store = seeded();
        let dup = [
            Assignment {
                order: OrderId(3),
                agent: AgentId(1),
                leg: 3.0,
            },
            Assignment {
                order: OrderId(3),
                agent: AgentId(1),
                leg: 0.0,
            },
        ];
        assert_eq!(
            store.commit(&dup),
            Err(StoreError::OrderAlreadyCommitted(OrderId(3)))
        );

        store.commit(&dup[..1]).expect("first");
        assert_eq!(
            store.commit(&dup[..1]),
            Err(StoreError::OrderAlreadyCommitted(OrderId(3)))
        );
    }

    #[test]
    fn test_listing_is_scoped_and_ordered() {
        let store = seeded();
        assert_eq!(
            store.warehouse_ids().expect("ids"),
            vec![WarehouseId(1), WarehouseId(2)]
        );
        let ids: Vec<OrderId> = store
            .undelivered_orders(WarehouseId(1))
            .expect("orders")
            .iter()
            .map(Order::id)
            .collect();
        assert_eq!(ids, vec![OrderId(1), OrderId(2), OrderId(3)]);
        assert_eq!(store.orders(WarehouseId(2)).len(), 1);
        assert_eq!(
            store.order_location(OrderId(9)).expect("loc"),
            Point::new(9.0, 10.0)
        );
    }

    #[test]
    fn test_check_in_toggle() {
        let store = seeded();
        store.set_checked_in(AgentId(1), false).expect("toggle");
        assert!(store
            .eligible_agents(WarehouseId(1), &crate::models::Capacity::default())
            .expect("agents")
            .is_empty());
        assert!(store.set_checked_in(AgentId(77), true).is_err());
    }

    #[test]
    fn test_rejects_non_finite_location() {
        let store = seeded();
        for p in [Point::new(f64::NAN, 0.0), Point::new(0.0, f64::INFINITY)] {
            assert_eq!(
                store.insert_order(Order::new(OrderId(40), WarehouseId(1), p)),
                Err(StoreError::InvalidLocation(OrderId(40)))
            );
        }
        assert!(store.order(OrderId(40)).is_err());
    }
}
