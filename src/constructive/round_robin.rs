//! Cyclic order hand-out for when orders are scarcer than agents.
//!
//! Orders are taken in input order and offered to agents in a ring, starting
//! just after the agent that received the previous order. An agent that
//! would break a cap on the current order is passed over; an order that no
//! agent in the ring can take stays pending. Agents that reach either hard
//! cap leave the ring. Pending work is committed each time the ring wraps
//! around, and once more at the end.

use tracing::debug;

use crate::error::StoreError;
use crate::models::{AgentId, Order, OrderId};
use crate::store::{Admission, AllocationStore, Session};

/// Result of [`round_robin`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoundRobinOutcome {
    /// `(order, agent)` pairs in hand-out order.
    pub assigned: Vec<(OrderId, AgentId)>,
    /// Orders no agent could take.
    pub skipped: Vec<OrderId>,
    /// Sum of the appended legs.
    pub distance: f64,
    /// Commits issued (one per completed cycle, plus the final one).
    pub commits: usize,
}

/// Hands `orders` out to `agents` cyclically, committing through `session`.
///
/// Agents without headroom under the hard caps are dropped up front.
pub fn round_robin<S: AllocationStore + ?Sized>(
    session: &mut Session<'_, S>,
    agents: &[AgentId],
    orders: &[Order],
) -> Result<RoundRobinOutcome, StoreError> {
    let capacity = *session.capacity();
    let mut ring = Vec::with_capacity(agents.len());
    for &id in agents {
        if session.refresh_agent(id)?.has_headroom(&capacity) {
            ring.push(id);
        }
    }

    let mut outcome = RoundRobinOutcome::default();
    let mut cursor = 0;

    for order in orders {
        if ring.is_empty() {
            outcome.skipped.push(order.id());
            continue;
        }

        let mut placed = false;
        for _ in 0..ring.len() {
            let slot = cursor % ring.len();
            let agent = ring[slot];
            let leg = session.position_of(agent)?.distance_to(&order.location());
            cursor = slot + 1;

            let admission = session.try_assign(agent, order.id(), order.location(), leg)?;
            if admission != Admission::Accepted {
                continue;
            }
            outcome.assigned.push((order.id(), agent));
            outcome.distance += leg;
            placed = true;

            if !session.refresh_agent(agent)?.has_headroom(&capacity) {
                debug!(%agent, "agent exhausted");
                ring.remove(slot);
                cursor = slot;
            }
            break;
        }

        if !placed {
            outcome.skipped.push(order.id());
        }
        if cursor >= ring.len() {
            if session.commit()? > 0 {
                outcome.commits += 1;
            }
            cursor = 0;
        }
    }

    if session.commit()? > 0 {
        outcome.commits += 1;
    }
    Ok(outcome)
}
