//! Road-network graph data model.
//!
//! # Data layout
//!
//! `Graph` keeps two flat maps: `nodes` keyed by [`NodeId`] and `edges` keyed
//! by the canonical [`EdgeId`] of the endpoint pair.  Adjacency is a sorted
//! set of neighbor IDs on each node, so neighbor iteration is deterministic.
//!
//! # Invariants
//!
//! Maintained by [`Graph::connect`] (the only edge-creating operation):
//!
//! - For every edge `{u, v}`: both endpoints exist, `v ∈ nodes[u].connections`
//!   and `u ∈ nodes[v].connections`.
//! - For every adjacency entry there is exactly one edge with those endpoints.
//! - `length > 0`, `base_speed_limit > 0`, `surface_quality ∈ [0.5, 1.0]`.
//!
//! The maps are `pub` for direct access on hot paths (the kinematic update
//! resolves edges every tick); mutation after generation goes against the
//! engine's read-only sharing contract.

use std::collections::{BTreeSet, HashMap, VecDeque};

use chrono::{DateTime, Utc};

use fleet_core::{EdgeId, NodeId, Point2D};

use crate::{GraphError, GraphResult};

// ── Node ──────────────────────────────────────────────────────────────────────

/// Functional category of a road-network node.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Intersection,
    Waypoint,
    Parking,
    Depot,
}

/// A road-network node: position, category, and adjacency.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: Point2D,
    #[serde(rename = "type")]
    pub kind: NodeType,
    /// Neighbor IDs, symmetric for every undirected edge.
    pub connections: BTreeSet<NodeId>,
}

impl Node {
    /// A node with no connections yet.
    pub fn new(id: NodeId, position: Point2D, kind: NodeType) -> Self {
        Self {
            id,
            position,
            kind,
            connections: BTreeSet::new(),
        }
    }
}

// ── Edge ──────────────────────────────────────────────────────────────────────

/// Mutable per-edge driving conditions.
///
/// The congestion and weather fields are reserved for dynamics layered on
/// top of the core; generation initializes them to the clear-weather values.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RoadConditions {
    /// Congestion level in `[0, 1]`.
    pub congestion: f64,
    /// Weather speed multiplier, `1.0` = clear.
    pub weather_multiplier: f64,
    /// The speed limit vehicles actually drive at (m/s).
    pub effective_speed_limit: f64,
    pub last_updated: DateTime<Utc>,
}

impl RoadConditions {
    /// Clear-weather conditions: no congestion, effective = base.
    pub fn clear(base_speed_limit: f64) -> Self {
        Self {
            congestion: 0.0,
            weather_multiplier: 1.0,
            effective_speed_limit: base_speed_limit,
            last_updated: Utc::now(),
        }
    }
}

/// An undirected road segment between two nodes.
///
/// Stored once under the canonical ID; `from`/`to` record the direction in
/// which the edge was first discovered during generation.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Physical length in map units, positive (after curvature scaling).
    pub length: f64,
    /// Posted speed limit in m/s, positive.
    pub base_speed_limit: f64,
    /// Surface quality in `[0.5, 1.0]`.
    pub surface_quality: f64,
    pub bidirectional: bool,
    pub conditions: RoadConditions,
}

impl Edge {
    /// A bidirectional road edge with clear initial conditions.
    pub fn road(from: NodeId, to: NodeId, length: f64, base_speed_limit: f64, surface_quality: f64) -> Self {
        Self {
            id: EdgeId::canonical(&from, &to),
            from,
            to,
            length,
            base_speed_limit,
            surface_quality,
            bidirectional: true,
            conditions: RoadConditions::clear(base_speed_limit),
        }
    }
}

/// Base speed limit (m/s) by length tier: short urban streets, mid-length
/// arterials, long highway segments.
pub fn tier_speed_limit(length: f64) -> f64 {
    if length < 100.0 {
        13.4
    } else if length < 300.0 {
        22.2
    } else {
        33.3
    }
}

// ── Graph ─────────────────────────────────────────────────────────────────────

/// The road network: nodes plus undirected edges, canonically keyed.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Graph {
    pub nodes: HashMap<NodeId, Node>,
    pub edges: HashMap<EdgeId, Edge>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a node.  Replaces any node with the same ID.
    pub fn add_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    /// The unique edge with endpoints `{a, b}`, if present (either orientation).
    pub fn edge_between(&self, a: &NodeId, b: &NodeId) -> Option<&Edge> {
        self.edges.get(&EdgeId::canonical(a, b))
    }

    /// Neighbor IDs of `id` in sorted order; empty for unknown nodes.
    pub fn neighbors(&self, id: &NodeId) -> impl Iterator<Item = &NodeId> + '_ {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.connections.iter())
    }

    /// Create the undirected edge `{a, b}` unless it already exists.
    ///
    /// Inserts the symmetric adjacency entries and a single canonical edge
    /// record.  Length is the Euclidean distance between the endpoints and
    /// the base speed limit follows [`tier_speed_limit`].  Returns the edge
    /// ID (existing or new).
    ///
    /// # Errors
    ///
    /// [`GraphError::NodeNotFound`] if either endpoint is absent.
    pub fn connect(
        &mut self,
        a: &NodeId,
        b: &NodeId,
        surface_quality: f64,
    ) -> GraphResult<EdgeId> {
        let from_pos = self
            .nodes
            .get(a)
            .ok_or_else(|| GraphError::NodeNotFound(a.clone()))?
            .position;
        let to_pos = self
            .nodes
            .get(b)
            .ok_or_else(|| GraphError::NodeNotFound(b.clone()))?
            .position;

        let id = EdgeId::canonical(a, b);
        if !self.edges.contains_key(&id) {
            let length = from_pos.distance(to_pos);
            let edge = Edge::road(a.clone(), b.clone(), length, tier_speed_limit(length), surface_quality);
            self.edges.insert(id.clone(), edge);
        }

        // Adjacency is a set: re-inserting on the existing-edge path is a no-op.
        if let Some(node) = self.nodes.get_mut(a) {
            node.connections.insert(b.clone());
        }
        if let Some(node) = self.nodes.get_mut(b) {
            node.connections.insert(a.clone());
        }

        Ok(id)
    }

    /// Node IDs in sorted order — the deterministic iteration base for
    /// generation, repair, and spawn selection.
    pub fn sorted_node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.nodes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Connected components via BFS over adjacency, each sorted, the list
    /// ordered by smallest member.
    pub fn components(&self) -> Vec<Vec<NodeId>> {
        let mut visited: BTreeSet<NodeId> = BTreeSet::new();
        let mut components = Vec::new();

        for start in self.sorted_node_ids() {
            if visited.contains(&start) {
                continue;
            }
            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(current) = queue.pop_front() {
                if !visited.insert(current.clone()) {
                    continue;
                }
                if let Some(node) = self.nodes.get(&current) {
                    component.push(current);
                    for neighbor in &node.connections {
                        if !visited.contains(neighbor) {
                            queue.push_back(neighbor.clone());
                        }
                    }
                }
            }
            component.sort();
            components.push(component);
        }

        components
    }

    pub fn component_count(&self) -> usize {
        self.components().len()
    }
}
