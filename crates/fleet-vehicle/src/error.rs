//! Vehicle-subsystem error type.

use thiserror::Error;

use fleet_core::{EdgeId, NodeId};
use fleet_graph::GraphError;

/// Errors produced by route assignment and the kinematic update.
///
/// `EdgeMissing`/`NodeMissing` during an update mean the graph is
/// structurally inconsistent with the assigned route — the engine treats
/// them as a breakdown of the affected vehicle only.
#[derive(Debug, Error)]
pub enum VehicleError {
    #[error("graph has no nodes")]
    EmptyGraph,

    #[error("no eligible target node")]
    NoEligibleTarget,

    #[error("route has no edges (start equals end)")]
    DegenerateRoute,

    #[error("edge {0} referenced by route is missing from graph")]
    EdgeMissing(EdgeId),

    #[error("node {0} referenced by route is missing from graph")]
    NodeMissing(NodeId),

    #[error("routing failed: {0}")]
    Routing(#[from] GraphError),
}

pub type VehicleResult<T> = Result<T, VehicleError>;
