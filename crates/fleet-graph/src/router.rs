//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The engine and route assignment call routing via the [`Router`] trait, so
//! applications can swap in custom implementations (A*, contraction
//! hierarchies) without touching the rest of the stack.  [`DijkstraRouter`]
//! is the default and currently the only built-in implementation.
//!
//! # Cost model
//!
//! Edge cost is the physical `length`; lengths are strictly positive, so
//! classical Dijkstra applies.  When several optimal paths exist, which one
//! is returned depends on heap tie-breaking — callers get *one* optimal
//! path, not a particular one.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use ordered_float::OrderedFloat;

use fleet_core::{EdgeId, NodeId};

use crate::model::Graph;
use crate::{GraphError, GraphResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// The result of a routing query: an ordered walk of edge IDs from
/// `start_node` to `end_node`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Route {
    /// Edges to traverse in order.
    pub edges: Vec<EdgeId>,
    pub start_node: NodeId,
    pub end_node: NodeId,
    /// Sum of edge lengths along the walk.
    pub total_distance: f64,
}

impl Route {
    /// `true` if the start and end are the same node (zero-length route).
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable routing engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync`: one router instance is shared by
/// whatever assigns routes while simulation workers hold the graph.
pub trait Router: Send + Sync {
    /// Compute a minimum-length route from `start` to `end`.
    ///
    /// `start == end` yields an empty route rather than an error.
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] for unknown endpoints,
    /// [`GraphError::NoRoute`] when the endpoints lie in different
    /// components.
    fn route(&self, graph: &Graph, start: &NodeId, end: &NodeId) -> GraphResult<Route>;
}

// ── RoutingConfig ─────────────────────────────────────────────────────────────

/// Selectable routing algorithm.  Only Dijkstra is implemented; the enum
/// leaves room for alternatives.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingAlgorithm {
    Dijkstra,
}

/// Routing configuration surfaced to adapters.
#[derive(Copy, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoutingConfig {
    pub algorithm: RoutingAlgorithm,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            algorithm: RoutingAlgorithm::Dijkstra,
        }
    }
}

impl RoutingConfig {
    pub fn make_router(&self) -> Box<dyn Router> {
        match self.algorithm {
            RoutingAlgorithm::Dijkstra => Box::new(DijkstraRouter),
        }
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Standard Dijkstra's algorithm over the undirected road graph.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(&self, graph: &Graph, start: &NodeId, end: &NodeId) -> GraphResult<Route> {
        dijkstra(graph, start, end)
    }
}

fn dijkstra(graph: &Graph, start: &NodeId, end: &NodeId) -> GraphResult<Route> {
    if !graph.nodes.contains_key(start) {
        return Err(GraphError::NodeNotFound(start.clone()));
    }
    if !graph.nodes.contains_key(end) {
        return Err(GraphError::NodeNotFound(end.clone()));
    }
    if start == end {
        return Ok(Route {
            edges: vec![],
            start_node: start.clone(),
            end_node: end.clone(),
            total_distance: 0.0,
        });
    }

    // dist[v] = best known cost to reach v; prev[v] = (predecessor, edge used).
    let mut dist: HashMap<NodeId, f64> = HashMap::new();
    let mut prev: HashMap<NodeId, (NodeId, EdgeId)> = HashMap::new();
    dist.insert(start.clone(), 0.0);

    // Min-heap: Reverse makes BinaryHeap (max) behave as min-heap.
    // Secondary key NodeId gives deterministic tie-breaking.
    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), start.clone())));

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        if &node == end {
            return Ok(reconstruct(&prev, start, end, cost));
        }

        // Skip stale heap entries.
        if dist.get(&node).is_some_and(|&best| cost > best) {
            continue;
        }

        for neighbor in graph.neighbors(&node) {
            let Some(edge) = graph.edge_between(&node, neighbor) else {
                // Adjacency without an edge record would violate the graph
                // invariant; unreachable for generated graphs.
                continue;
            };
            let next_cost = cost + edge.length;
            if next_cost < dist.get(neighbor).copied().unwrap_or(f64::INFINITY) {
                dist.insert(neighbor.clone(), next_cost);
                prev.insert(neighbor.clone(), (node.clone(), edge.id.clone()));
                heap.push(Reverse((OrderedFloat(next_cost), neighbor.clone())));
            }
        }
    }

    Err(GraphError::NoRoute {
        from: start.clone(),
        to: end.clone(),
    })
}

/// Walk `prev` back from the goal and reverse into start→end edge order.
fn reconstruct(
    prev: &HashMap<NodeId, (NodeId, EdgeId)>,
    start: &NodeId,
    end: &NodeId,
    total_distance: f64,
) -> Route {
    let mut edges = Vec::new();
    let mut current = end.clone();
    while &current != start {
        match prev.get(&current) {
            Some((predecessor, edge)) => {
                edges.push(edge.clone());
                current = predecessor.clone();
            }
            // The chain always reaches `start` once the goal was settled.
            None => break,
        }
    }
    edges.reverse();

    Route {
        edges,
        start_node: start.clone(),
        end_node: end.clone(),
        total_distance,
    }
}
