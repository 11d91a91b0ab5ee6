//! Nearest-neighbor route extension for one agent.
//!
//! Starting from the agent's current position (last stop, or the warehouse
//! for an empty route), repeatedly appends the nearest unvisited order of
//! the cluster until the cluster is exhausted or the next leg would break a
//! hard cap. Orders left over stay pending for a later pass.
//!
//! # Complexity
//!
//! O(n²) where n = number of orders in the cluster.

use tracing::debug;

use crate::distance::{closest_point, DistanceMatrix};
use crate::error::StoreError;
use crate::models::{AgentId, OrderId, Point};
use crate::store::{Admission, AllocationStore, Session};

/// Why route extension stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteStop {
    /// The cluster had no orders.
    Empty,
    /// Every order of the cluster was routed.
    ClusterExhausted,
    /// The agent reached its order limit.
    OrderCap,
    /// The next leg would exceed the distance cap.
    DistanceCap,
}

/// Orders appended to one agent's route by [`GreedyRouteBuilder::build`].
#[derive(Debug, Clone, PartialEq)]
pub struct RouteExtension {
    /// Agent whose route was extended.
    pub agent: AgentId,
    /// Orders appended, in visiting order.
    pub orders: Vec<OrderId>,
    /// Sum of the appended legs.
    pub distance: f64,
    /// Why extension stopped.
    pub stop: RouteStop,
}

/// Greedy route construction over one cluster of orders.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::models::*;
/// use warehouse_allocation::store::{AllocationStore, MemoryStore, Session};
/// use warehouse_allocation::constructive::GreedyRouteBuilder;
///
/// let store = MemoryStore::new();
/// store.insert_warehouse(Warehouse::new(WarehouseId(1), Point::new(0.0, 0.0)));
/// store.insert_agent(Agent::new(AgentId(1), WarehouseId(1)).with_checked_in(true)).unwrap();
///
/// let ids = [OrderId(1), OrderId(2), OrderId(3)];
/// let points = [Point::new(3.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)];
/// for (id, p) in ids.iter().zip(&points) {
///     store.insert_order(Order::new(*id, WarehouseId(1), *p)).unwrap();
/// }
///
/// let wh = store.warehouse(WarehouseId(1)).unwrap();
/// let mut session = Session::new(&store, wh, Capacity::default());
/// let ext = GreedyRouteBuilder::new(&ids, &points).build(&mut session, AgentId(1)).unwrap();
/// assert_eq!(ext.orders, vec![OrderId(2), OrderId(3), OrderId(1)]);
/// assert!((ext.distance - 3.0).abs() < 1e-10);
/// ```
pub struct GreedyRouteBuilder<'a> {
    ids: &'a [OrderId],
    points: &'a [Point],
    distances: DistanceMatrix,
}

impl<'a> GreedyRouteBuilder<'a> {
    /// Prepares a builder for the cluster `ids` located at `points`.
    ///
    /// # Panics
    ///
    /// Panics if `ids` and `points` differ in length.
    pub fn new(ids: &'a [OrderId], points: &'a [Point]) -> Self {
        assert_eq!(ids.len(), points.len(), "one point per order");
        Self {
            ids,
            points,
            distances: DistanceMatrix::from_points(points),
        }
    }

    /// Extends `agent`'s route within the session.
    pub fn build<S: AllocationStore + ?Sized>(
        &self,
        session: &mut Session<'_, S>,
        agent: AgentId,
    ) -> Result<RouteExtension, StoreError> {
        let mut ext = RouteExtension {
            agent,
            orders: Vec::new(),
            distance: 0.0,
            stop: RouteStop::Empty,
        };

        let position = session.position_of(agent)?;
        let Some(start) = closest_point(&position, self.points) else {
            return Ok(ext);
        };
        let first_leg = position.distance_to(&self.points[start]);
        if let Some(stop) = self.offer(session, &mut ext, start, first_leg)? {
            ext.stop = stop;
            debug!(%agent, leg = first_leg, "first stop out of reach");
            return Ok(ext);
        }

        let mut unvisited: Vec<usize> = (0..self.ids.len()).filter(|&i| i != start).collect();
        let mut current = start;
        ext.stop = RouteStop::ClusterExhausted;

        while let Some(next) = self.distances.nearest_neighbor(current, &unvisited) {
            let leg = self.distances.get(current, next);
            if let Some(stop) = self.offer(session, &mut ext, next, leg)? {
                ext.stop = stop;
                break;
            }
            unvisited.retain(|&i| i != next);
            current = next;
        }

        debug!(
            %agent,
            appended = ext.orders.len(),
            distance = ext.distance,
            stop = ?ext.stop,
            "route extended"
        );
        Ok(ext)
    }

    /// Offers cluster point `idx`; returns the stop reason if refused.
    fn offer<S: AllocationStore + ?Sized>(
        &self,
        session: &mut Session<'_, S>,
        ext: &mut RouteExtension,
        idx: usize,
        leg: f64,
    ) -> Result<Option<RouteStop>, StoreError> {
        match session.try_assign(ext.agent, self.ids[idx], self.points[idx], leg)? {
            Admission::Accepted => {
                ext.orders.push(self.ids[idx]);
                ext.distance += leg;
                Ok(None)
            }
            Admission::OrderCap => Ok(Some(RouteStop::OrderCap)),
            Admission::DistanceCap => Ok(Some(RouteStop::DistanceCap)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Agent, Capacity, Order, Warehouse, WarehouseId};
    use crate::store::MemoryStore;

    fn store_with(points: &[Point], agent: Agent) -> (MemoryStore, Vec<OrderId>) {
        let store = MemoryStore::new();
        store.insert_warehouse(Warehouse::new(WarehouseId(1), Point::new(0.0, 0.0)));
        store.insert_agent(agent).expect("agent");
        let ids: Vec<OrderId> = (1..=points.len() as u64).map(OrderId).collect();
        for (id, p) in ids.iter().zip(points) {
            store
                .insert_order(Order::new(*id, WarehouseId(1), *p))
                .expect("order");
        }
        (store, ids)
    }

    fn fresh_agent() -> Agent {
        Agent::new(AgentId(1), WarehouseId(1)).with_checked_in(true)
    }

    fn session(store: &MemoryStore, capacity: Capacity) -> Session<'_, MemoryStore> {
        let wh = store.warehouse(WarehouseId(1)).expect("warehouse");
        Session::new(store, wh, capacity)
    }

    #[test]
    fn test_visits_nearest_first() {
        let points = [
            Point::new(10.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(5.0, 0.0),
        ];
        let (store, ids) = store_with(&points, fresh_agent());
        let mut s = session(&store, Capacity::default());
        let ext = GreedyRouteBuilder::new(&ids, &points)
            .build(&mut s, AgentId(1))
            .expect("build");
        assert_eq!(ext.orders, vec![OrderId(2), OrderId(3), OrderId(1)]);
        assert_eq!(ext.stop, RouteStop::ClusterExhausted);
        assert!((ext.distance - 10.0).abs() < 1e-10);
    }

    #[test]
    fn test_stops_at_distance_cap() {
        let points = [
            Point::new(40.0, 0.0),
            Point::new(80.0, 0.0),
            Point::new(80.0, 30.0),
        ];
        let (store, ids) = store_with(&points, fresh_agent());
        let mut s = session(&store, Capacity::default());
        let ext = GreedyRouteBuilder::new(&ids, &points)
            .build(&mut s, AgentId(1))
            .expect("build");
        // 40 + 40 = 80, next leg 30 would reach 110.
        assert_eq!(ext.orders, vec![OrderId(1), OrderId(2)]);
        assert_eq!(ext.stop, RouteStop::DistanceCap);
        assert_eq!(s.pending().len(), 2);
    }

    #[test]
    fn test_first_leg_out_of_reach() {
        let points = [Point::new(8.0, 0.0)];
        let agent = fresh_agent().with_route(Vec::new(), 93.0);
        let (store, ids) = store_with(&points, agent);
        let mut s = session(&store, Capacity::default());
        let ext = GreedyRouteBuilder::new(&ids, &points)
            .build(&mut s, AgentId(1))
            .expect("build");
        assert!(ext.orders.is_empty());
        assert_eq!(ext.stop, RouteStop::DistanceCap);
        assert!(s.pending().is_empty());
    }

    #[test]
    fn test_stops_at_order_cap() {
        let points: Vec<Point> = (1..=5).map(|i| Point::new(i as f64, 0.0)).collect();
        let (store, ids) = store_with(&points, fresh_agent());
        let capacity = Capacity {
            max_orders: 3,
            ..Capacity::default()
        };
        let mut s = session(&store, capacity);
        let ext = GreedyRouteBuilder::new(&ids, &points)
            .build(&mut s, AgentId(1))
            .expect("build");
        assert_eq!(ext.orders.len(), 3);
        assert_eq!(ext.stop, RouteStop::OrderCap);
    }

    #[test]
    fn test_continues_from_last_stop() {
        let points = [Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
        let (store, ids) = store_with(&points, fresh_agent());
        // Pre-existing stop far to the right, committed order 99 at (25, 0).
        store
            .insert_order(Order::new(OrderId(99), WarehouseId(1), Point::new(25.0, 0.0)))
            .expect("order");
        store
            .commit(&[crate::store::Assignment {
                order: OrderId(99),
                agent: AgentId(1),
                leg: 25.0,
            }])
            .expect("commit");
        let mut s = session(&store, Capacity::default());
        let ext = GreedyRouteBuilder::new(&ids, &points)
            .build(&mut s, AgentId(1))
            .expect("build");
        assert_eq!(ext.orders, vec![OrderId(2), OrderId(1)]);
        assert!((ext.distance - 15.0).abs() < 1e-10);
    }

    #[test]
    fn test_single_order_cluster() {
        let points = [Point::new(3.0, 4.0)];
        let (store, ids) = store_with(&points, fresh_agent());
        let mut s = session(&store, Capacity::default());
        let ext = GreedyRouteBuilder::new(&ids, &points)
            .build(&mut s, AgentId(1))
            .expect("build");
        assert_eq!(ext.orders, vec![OrderId(1)]);
        assert!((ext.distance - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_cluster() {
        let (store, _) = store_with(&[], fresh_agent());
        let mut s = session(&store, Capacity::default());
        let ext = GreedyRouteBuilder::new(&[], &[])
            .build(&mut s, AgentId(1))
            .expect("build");
        assert_eq!(ext.stop, RouteStop::Empty);
    }
}
