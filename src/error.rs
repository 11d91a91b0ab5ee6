//! Error types.
//!
//! Running out of orders, running out of agents and stalling are normal
//! outcomes reported through [`Termination`](crate::allocation::Termination).
//! Only persistence failures and bad configuration surface as errors.

use thiserror::Error;

use crate::models::{AgentId, OrderId, WarehouseId};

/// Failures of the persistence layer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StoreError {
    #[error("warehouse {0} not found")]
    WarehouseNotFound(WarehouseId),

    #[error("agent {0} not found")]
    AgentNotFound(AgentId),

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("agent {agent} already belongs to {existing}, cannot join {requested}")]
    AgentWarehouseConflict {
        agent: AgentId,
        existing: WarehouseId,
        requested: WarehouseId,
    },

    #[error("order {0} has a non-finite location")]
    InvalidLocation(OrderId),

    #[error("order {0} is already committed to a route")]
    OrderAlreadyCommitted(OrderId),

    #[error("assignment of {order} to {agent} crosses warehouses")]
    WarehouseMismatch { order: OrderId, agent: AgentId },

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Returns `true` if re-running the whole allocation may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StoreError::Unavailable(_) | StoreError::OrderAlreadyCommitted(_)
        )
    }
}

/// Failures of an allocation run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AllocationError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl AllocationError {
    /// Returns `true` if the caller may simply re-invoke the run.
    pub fn is_retryable(&self) -> bool {
        match self {
            AllocationError::Store(e) => e.is_retryable(),
            AllocationError::InvalidConfig(_) => false,
        }
    }
}
