//! Single-tick vehicle advancement along an assigned route.
//!
//! # Model
//!
//! A vehicle travels at the current edge's effective speed limit and its
//! progress on the edge grows by `speed · dt / length` per update.  Crossing
//! the `1 − ε` threshold triggers a waypoint transition onto the next route
//! edge.  Progress is reset to 0 on transition rather than carried over:
//! this caps per-tick advancement at one edge, so worst-case displacement is
//! bounded by the longest edge regardless of scheduling hiccups.  Callers
//! needing sub-tick accuracy use a smaller `dt`.

use chrono::Utc;

use fleet_core::Point2D;
use fleet_graph::model::Graph;

use crate::vehicle::{AssignedRoute, Vehicle, VehicleState, VehicleStatus};
use crate::{VehicleError, VehicleResult};

/// Progress threshold for a waypoint transition; absorbs float accumulation
/// error just short of 1.0.
const WAYPOINT_EPSILON: f64 = 1e-6;

/// Advance `vehicle` by `dt` real seconds along its assigned route.
///
/// No route is a no-op.  A completed route only refreshes the status.
///
/// # Errors
///
/// [`VehicleError::EdgeMissing`] / [`VehicleError::NodeMissing`] when the
/// route references graph elements that do not exist — the graph is
/// structurally inconsistent with the route and the vehicle cannot be
/// advanced.
pub fn update_vehicle(vehicle: &mut Vehicle, graph: &Graph, dt: f64) -> VehicleResult<()> {
    // Split borrow: state and route are updated together below.
    let Vehicle { state, route, .. } = vehicle;
    let Some(route) = route.as_mut() else {
        return Ok(());
    };

    if route.completed_at.is_some() {
        state.status = VehicleStatus::Arrived;
        return Ok(());
    }

    if route.current_edge_index >= route.edges.len() {
        return complete_route(state, route, graph);
    }

    let edge_id = &route.edges[route.current_edge_index];
    let mut edge = graph
        .edge(edge_id)
        .ok_or_else(|| VehicleError::EdgeMissing(edge_id.clone()))?;

    let mut speed = edge.conditions.effective_speed_limit;
    if speed <= 0.0 {
        speed = edge.base_speed_limit;
    }

    if edge.length > 0.0 {
        state.progress_on_edge += (speed * dt) / edge.length;
    } else {
        // Geometrically coincident endpoints: the edge is crossed instantly.
        state.progress_on_edge = 1.0;
    }

    // ── Waypoint transition ───────────────────────────────────────────────
    if state.progress_on_edge >= 1.0 - WAYPOINT_EPSILON {
        route.current_node = route.target_node.clone();
        route.current_edge_index += 1;

        if route.current_edge_index < route.edges.len() {
            state.progress_on_edge = 0.0;

            let next_id = route.edges[route.current_edge_index].clone();
            let next = graph
                .edge(&next_id)
                .ok_or_else(|| VehicleError::EdgeMissing(next_id.clone()))?;
            state.current_edge = Some(next_id);
            route.target_node = next.to.clone();
            edge = next;
        } else {
            return complete_route(state, route, graph);
        }
    }

    // ── Position and velocity on the (possibly new) current edge ──────────
    let from = node_position(graph, &edge.from)?;
    let to = node_position(graph, &edge.to)?;

    let progress = state.progress_on_edge.clamp(0.0, 1.0);
    state.current_position = Point2D::lerp(from, to, progress);
    state.velocity = from.direction_to(to).scale(speed);
    state.last_update_time = Utc::now();
    if state.status != VehicleStatus::Arrived {
        state.status = VehicleStatus::Moving;
    }

    Ok(())
}

/// Mark the route finished: snap to the end node, zero the velocity.
fn complete_route(
    state: &mut VehicleState,
    route: &mut AssignedRoute,
    graph: &Graph,
) -> VehicleResult<()> {
    let end = graph
        .node(&route.end_node)
        .ok_or_else(|| VehicleError::NodeMissing(route.end_node.clone()))?;

    route.completed_at = Some(Utc::now());
    state.status = VehicleStatus::Arrived;
    state.velocity = Point2D::ZERO;
    state.progress_on_edge = 1.0;
    state.current_position = end.position;
    state.last_update_time = Utc::now();
    Ok(())
}

fn node_position(graph: &Graph, id: &fleet_core::NodeId) -> VehicleResult<Point2D> {
    graph
        .node(id)
        .map(|n| n.position)
        .ok_or_else(|| VehicleError::NodeMissing(id.clone()))
}
