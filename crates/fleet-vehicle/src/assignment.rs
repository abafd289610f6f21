//! Spawn/target selection strategies and route materialization.
//!
//! Assignment picks a spawn node and a target node according to the
//! configured strategies, asks the router for a path, and installs the
//! result on the vehicle: route bookkeeping reset to the first edge, state
//! positioned at the spawn node, status `Moving` (or `Idle` for an empty
//! route).

use chrono::Utc;
use log::debug;

use fleet_core::{NodeId, Point2D, SimRng};
use fleet_graph::model::Graph;
use fleet_graph::router::{Route, Router};

use crate::vehicle::{AssignedRoute, Vehicle, VehicleStatus};
use crate::{VehicleError, VehicleResult};

/// Candidate pool size for the `Distributed` spawn strategy.
const DISTRIBUTED_POOL: usize = 5;

/// Resample attempts before accepting a spawn/target collision for the
/// random target strategy.
const RESAMPLE_ATTEMPTS: usize = 10;

// ── Strategies ────────────────────────────────────────────────────────────────

/// How the spawn node is chosen.
#[derive(Clone, Debug)]
pub enum SpawnStrategy {
    /// Uniform over all nodes.
    Random,
    /// Sample a small candidate pool, then pick uniformly among it — a
    /// placeholder for coverage-aware selection.
    Distributed,
    /// An explicit node ID.
    Specific(NodeId),
}

/// How the target node is chosen.
#[derive(Clone, Debug)]
pub enum TargetStrategy {
    Random,
    /// The node with maximum Euclidean distance from the spawn; ties broken
    /// by iteration order.
    Farthest,
    Specific(NodeId),
}

/// Assignment configuration.
#[derive(Clone, Debug)]
pub struct SpawnConfig {
    pub spawn: SpawnStrategy,
    pub target: TargetStrategy,
    pub allow_same_node: bool,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            spawn: SpawnStrategy::Random,
            target: TargetStrategy::Random,
            allow_same_node: false,
        }
    }
}

// ── Assignment entry points ───────────────────────────────────────────────────

/// Select spawn and target nodes per `config`, route between them, and
/// install the route on `vehicle`.
///
/// # Errors
///
/// [`VehicleError::EmptyGraph`] for a node-less graph, strategy failures
/// ([`VehicleError::NodeMissing`], [`VehicleError::NoEligibleTarget`]),
/// routing failures, and [`VehicleError::DegenerateRoute`] when the route
/// has no edges while `allow_same_node` is false.
pub fn assign_route(
    vehicle: &mut Vehicle,
    graph: &Graph,
    config: &SpawnConfig,
    router: &dyn Router,
    rng: &mut SimRng,
) -> VehicleResult<()> {
    if graph.is_empty() {
        return Err(VehicleError::EmptyGraph);
    }
    let node_ids = graph.sorted_node_ids();

    let spawn = select_spawn(&node_ids, graph, &config.spawn, rng)?;
    let target = select_target(&node_ids, graph, &spawn, &config.target, config.allow_same_node, rng)?;

    let route = router.route(graph, &spawn, &target)?;
    if route.edges.is_empty() && !config.allow_same_node {
        return Err(VehicleError::DegenerateRoute);
    }

    debug!(
        "vehicle {}: assigned route {} → {} ({} edges, {:.1} units)",
        vehicle.id,
        route.start_node,
        route.end_node,
        route.edges.len(),
        route.total_distance
    );
    materialize(vehicle, graph, route)
}

/// Route between two explicit nodes and install the result on `vehicle`.
pub fn assign_route_between(
    vehicle: &mut Vehicle,
    graph: &Graph,
    start: &NodeId,
    end: &NodeId,
    router: &dyn Router,
) -> VehicleResult<()> {
    if graph.node(start).is_none() {
        return Err(VehicleError::NodeMissing(start.clone()));
    }
    if graph.node(end).is_none() {
        return Err(VehicleError::NodeMissing(end.clone()));
    }

    let route = router.route(graph, start, end)?;
    materialize(vehicle, graph, route)
}

// ── Node selection ────────────────────────────────────────────────────────────

fn select_spawn(
    node_ids: &[NodeId],
    graph: &Graph,
    strategy: &SpawnStrategy,
    rng: &mut SimRng,
) -> VehicleResult<NodeId> {
    match strategy {
        SpawnStrategy::Random => rng.choose(node_ids).cloned().ok_or(VehicleError::EmptyGraph),

        SpawnStrategy::Distributed => {
            let pool_size = DISTRIBUTED_POOL.min(node_ids.len());
            let mut pool = Vec::with_capacity(pool_size);
            for _ in 0..pool_size {
                if let Some(candidate) = rng.choose(node_ids) {
                    pool.push(candidate.clone());
                }
            }
            rng.choose(&pool).cloned().ok_or(VehicleError::EmptyGraph)
        }

        SpawnStrategy::Specific(id) => match graph.node(id) {
            Some(node) => Ok(node.id.clone()),
            None => Err(VehicleError::NodeMissing(id.clone())),
        },
    }
}

fn select_target(
    node_ids: &[NodeId],
    graph: &Graph,
    spawn: &NodeId,
    strategy: &TargetStrategy,
    allow_same_node: bool,
    rng: &mut SimRng,
) -> VehicleResult<NodeId> {
    match strategy {
        TargetStrategy::Random => {
            for _ in 0..RESAMPLE_ATTEMPTS {
                if let Some(candidate) = rng.choose(node_ids) {
                    if allow_same_node || candidate != spawn {
                        return Ok(candidate.clone());
                    }
                }
            }
            // Accept the collision after exhausting the resample budget.
            rng.choose(node_ids).cloned().ok_or(VehicleError::EmptyGraph)
        }

        TargetStrategy::Farthest => {
            let spawn_position = graph
                .node(spawn)
                .map(|n| n.position)
                .ok_or_else(|| VehicleError::NodeMissing(spawn.clone()))?;

            let mut best: Option<(&NodeId, f64)> = None;
            for id in node_ids {
                if !allow_same_node && id == spawn {
                    continue;
                }
                let Some(node) = graph.node(id) else {
                    continue;
                };
                let d = spawn_position.distance(node.position);
                if best.is_none_or(|(_, best_d)| d > best_d) {
                    best = Some((id, d));
                }
            }
            best.map(|(id, _)| id.clone()).ok_or(VehicleError::NoEligibleTarget)
        }

        TargetStrategy::Specific(id) => match graph.node(id) {
            Some(node) => Ok(node.id.clone()),
            None => Err(VehicleError::NodeMissing(id.clone())),
        },
    }
}

// ── Materialization ───────────────────────────────────────────────────────────

/// Install `route` on `vehicle`: progress reset to the first edge, state
/// positioned at the spawn node.
fn materialize(vehicle: &mut Vehicle, graph: &Graph, route: Route) -> VehicleResult<()> {
    let spawn_position = graph
        .node(&route.start_node)
        .map(|n| n.position)
        .ok_or_else(|| VehicleError::NodeMissing(route.start_node.clone()))?;

    let now = Utc::now();
    let target_node = first_target(graph, &route);
    let first_edge = route.edges.first().cloned();

    vehicle.route = Some(AssignedRoute {
        current_edge_index: 0,
        current_node: route.start_node.clone(),
        target_node,
        start_node: route.start_node,
        end_node: route.end_node,
        edges: route.edges,
        started_at: now,
        completed_at: None,
    });

    vehicle.state.current_position = spawn_position;
    vehicle.state.velocity = Point2D::ZERO;
    vehicle.state.progress_on_edge = 0.0;
    vehicle.state.last_update_time = now;
    match first_edge {
        Some(edge_id) => {
            vehicle.state.current_edge = Some(edge_id);
            vehicle.state.status = VehicleStatus::Moving;
        }
        None => {
            vehicle.state.current_edge = None;
            vehicle.state.status = VehicleStatus::Idle;
        }
    }

    Ok(())
}

/// The `to` endpoint of the route's first edge, or the end node for an
/// empty route.
fn first_target(graph: &Graph, route: &Route) -> NodeId {
    match route.edges.first().and_then(|id| graph.edge(id)) {
        Some(edge) => edge.to.clone(),
        None => route.end_node.clone(),
    }
}
