//! Per-warehouse allocation loop.
//!
//! # Algorithm
//!
//! Each pass reloads pending orders and eligible agents, then:
//!
//! 1. stops if either set is empty;
//! 2. hands orders out round-robin (and stops) if orders are fewer than
//!    agents;
//! 3. otherwise partitions orders into one group per agent (angular sectors
//!    on the first pass, balanced k-means afterwards), pairs groups with
//!    agents, and extends every paired agent's route greedily;
//! 4. commits, and stops if the pass committed nothing.
//!
//! Committed orders are excluded from later queries, so re-running a
//! warehouse only touches what is still pending.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::{AllocationConfig, AllocationReport, PassSummary, Phase, Termination};
use crate::clustering::{balanced_kmeans, match_clusters, sector_partition};
use crate::constructive::{round_robin, GreedyRouteBuilder};
use crate::error::{AllocationError, StoreError};
use crate::models::{Agent, AgentId, Order, OrderId, Point, Warehouse, WarehouseId};
use crate::store::{AllocationStore, Session};

/// Runs allocation passes against a store.
///
/// Runs for the same warehouse are serialized; different warehouses may be
/// allocated concurrently.
///
/// # Examples
///
/// ```
/// use warehouse_allocation::allocation::{AllocationConfig, Allocator, Termination};
/// use warehouse_allocation::models::*;
/// use warehouse_allocation::store::MemoryStore;
///
/// let store = MemoryStore::new();
/// store.insert_warehouse(Warehouse::new(WarehouseId(1), Point::new(0.0, 0.0)));
/// for a in 1..=2 {
///     store.insert_agent(Agent::new(AgentId(a), WarehouseId(1)).with_checked_in(true)).unwrap();
/// }
/// for (i, (x, y)) in [(1.0, 1.0), (2.0, 1.0), (-1.0, -1.0), (-2.0, -1.0)].iter().enumerate() {
///     store.insert_order(Order::new(OrderId(i as u64), WarehouseId(1), Point::new(*x, *y))).unwrap();
/// }
///
/// let allocator = Allocator::new(store, AllocationConfig::default()).unwrap();
/// let report = allocator.allocate(WarehouseId(1)).unwrap();
/// assert_eq!(report.assigned, 4);
/// assert_eq!(report.termination, Termination::NoOrders);
/// ```
pub struct Allocator<S> {
    store: S,
    config: AllocationConfig,
    locks: Mutex<HashMap<WarehouseId, Arc<Mutex<()>>>>,
}

impl<S: AllocationStore> Allocator<S> {
    /// Creates an allocator; fails if the configuration is invalid.
    pub fn new(store: S, config: AllocationConfig) -> Result<Self, AllocationError> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Active configuration.
    pub fn config(&self) -> &AllocationConfig {
        &self.config
    }

    /// Allocates every warehouse of the store, in parallel.
    ///
    /// Results are ordered by warehouse id. A failing warehouse does not
    /// stop the others.
    pub fn allocate_all(
        &self,
    ) -> Result<Vec<(WarehouseId, Result<AllocationReport, AllocationError>)>, AllocationError>
    {
        let ids = self.store.warehouse_ids()?;
        info!(warehouses = ids.len(), "allocating all warehouses");
        Ok(ids
            .par_iter()
            .map(|&id| (id, self.allocate(id)))
            .collect())
    }

    /// Allocates pending orders of one warehouse until nothing more can be
    /// placed.
    ///
    /// Work committed by earlier passes is kept if a later pass fails.
    pub fn allocate(&self, warehouse: WarehouseId) -> Result<AllocationReport, AllocationError> {
        let warehouse = self.store.warehouse(warehouse)?;
        let lock = Arc::clone(self.locks.lock().entry(warehouse.id()).or_default());
        let _guard = lock.lock();

        let mut run = Run::new(&self.store, &self.config, warehouse);
        let termination = run.execute()?;
        let remaining = self.store.undelivered_orders(run.warehouse_id())?.len();
        let report = run.into_report(termination, remaining);

        info!(
            warehouse = %report.warehouse,
            passes = report.passes.len(),
            assigned = report.assigned,
            remaining = report.remaining,
            termination = ?report.termination,
            "allocation finished"
        );
        Ok(report)
    }
}

/// State of one warehouse run.
struct Run<'a, S: AllocationStore> {
    store: &'a S,
    config: &'a AllocationConfig,
    session: Session<'a, S>,
    rng: StdRng,
    passes: Vec<PassSummary>,
    started: Instant,
}

impl<'a, S: AllocationStore> Run<'a, S> {
    fn new(store: &'a S, config: &'a AllocationConfig, warehouse: Warehouse) -> Self {
        let seed = config.seed ^ warehouse.id().get().wrapping_mul(0x9E37_79B9_7F4A_7C15);
        Self {
            store,
            config,
            session: Session::new(store, warehouse, config.capacity),
            rng: StdRng::seed_from_u64(seed),
            passes: Vec::new(),
            started: Instant::now(),
        }
    }

    fn warehouse_id(&self) -> WarehouseId {
        self.session.warehouse().id()
    }

    fn execute(&mut self) -> Result<Termination, AllocationError> {
        let id = self.warehouse_id();
        loop {
            let orders = self.store.undelivered_orders(id)?;
            if orders.is_empty() {
                return Ok(Termination::NoOrders);
            }
            let agents = self.store.eligible_agents(id, &self.config.capacity)?;
            if agents.is_empty() {
                return Ok(Termination::NoAgents);
            }

            if self.passes.len() >= self.config.max_passes {
                warn!(warehouse = %id, limit = self.config.max_passes, "pass limit reached");
                return Ok(Termination::PassLimit);
            }
            if let Some(deadline) = self.config.deadline() {
                if self.started.elapsed() >= deadline {
                    warn!(warehouse = %id, ?deadline, "deadline exceeded");
                    return Ok(Termination::DeadlineExceeded);
                }
            }

            let index = self.passes.len();
            if orders.len() < agents.len() {
                self.round_robin_pass(index, &orders, agents.len())?;
                return Ok(Termination::RoundRobinComplete);
            }

            let phase = if index == 0 { Phase::Sector } else { Phase::Cluster };
            info!(
                warehouse = %id,
                pass = index,
                ?phase,
                orders = orders.len(),
                agents = agents.len(),
                "starting pass"
            );
            let distance_added = match self.routed_pass(phase, &orders, &agents) {
                Ok(d) => d,
                Err(e) => {
                    self.session.discard();
                    return Err(e.into());
                }
            };
            self.session.commit()?;

            let after = self.store.undelivered_orders(id)?.len();
            let assigned = orders.len() - after;
            self.passes.push(PassSummary {
                index,
                phase,
                orders_before: orders.len(),
                agents: agents.len(),
                assigned,
                distance_added,
            });
            if assigned == 0 {
                info!(warehouse = %id, pass = index, "no progress, stopping");
                return Ok(Termination::Stalled);
            }
        }
    }

    /// Sector or cluster pass; returns the distance appended.
    fn routed_pass(
        &mut self,
        phase: Phase,
        orders: &[Order],
        agents: &[Agent],
    ) -> Result<f64, StoreError> {
        let ids: Vec<OrderId> = orders.iter().map(Order::id).collect();
        let points: Vec<Point> = orders.iter().map(Order::location).collect();

        let groups: Vec<(AgentId, Vec<usize>)> = match phase {
            Phase::Sector => {
                let origin = self.session.warehouse().location();
                agents
                    .iter()
                    .map(Agent::id)
                    .zip(sector_partition(&points, &origin, agents.len()))
                    .collect()
            }
            _ => {
                let clustering = balanced_kmeans(
                    &points,
                    agents.len(),
                    None,
                    &self.config.kmeans,
                    &mut self.rng,
                );
                let mut positions = Vec::with_capacity(agents.len());
                for a in agents {
                    positions.push(self.session.position_of(a.id())?);
                }
                let matches = match_clusters(&positions, clustering.centroids());
                debug!(
                    clusters = clustering.num_clusters(),
                    matched = matches.len(),
                    kmeans_iterations = clustering.iterations(),
                    "clusters matched"
                );
                matches
                    .iter()
                    .map(|m| (agents[m.agent].id(), clustering.members(m.cluster)))
                    .collect()
            }
        };

        let mut distance = 0.0;
        for (agent, members) in groups {
            if members.is_empty() {
                continue;
            }
            let cluster_ids: Vec<OrderId> = members.iter().map(|&i| ids[i]).collect();
            let cluster_points: Vec<Point> = members.iter().map(|&i| points[i]).collect();
            let ext = GreedyRouteBuilder::new(&cluster_ids, &cluster_points)
                .build(&mut self.session, agent)?;
            distance += ext.distance;
        }
        Ok(distance)
    }

    fn round_robin_pass(
        &mut self,
        index: usize,
        orders: &[Order],
        eligible: usize,
    ) -> Result<(), AllocationError> {
        let id = self.warehouse_id();
        let capacity = self.config.capacity;
        let pool: Vec<AgentId> = self
            .store
            .agents(id)?
            .into_iter()
            .filter(|a| a.has_headroom(&capacity))
            .map(|a| a.id())
            .collect();
        info!(
            warehouse = %id,
            pass = index,
            orders = orders.len(),
            eligible,
            pool = pool.len(),
            "fewer orders than agents, switching to round robin"
        );

        let outcome = round_robin(&mut self.session, &pool, orders);
        let outcome = match outcome {
            Ok(o) => o,
            Err(e) => {
                self.session.discard();
                return Err(e.into());
            }
        };
        self.passes.push(PassSummary {
            index,
            phase: Phase::RoundRobin,
            orders_before: orders.len(),
            agents: pool.len(),
            assigned: outcome.assigned.len(),
            distance_added: outcome.distance,
        });
        Ok(())
    }

    fn into_report(self, termination: Termination, remaining: usize) -> AllocationReport {
        let assigned = self.passes.iter().map(|p| p.assigned).sum();
        AllocationReport {
            warehouse: self.session.warehouse().id(),
            passes: self.passes,
            termination,
            assigned,
            remaining,
        }
    }
}
