//! Graph-subsystem error type.

use thiserror::Error;

use fleet_core::NodeId;

/// Errors produced by `fleet-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("invalid generator input: {0}")]
    InvalidInput(String),

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },
}

pub type GraphResult<T> = Result<T, GraphError>;
