//! Procedural road-map generation.
//!
//! # Pipeline
//!
//! 1. Place `node_count` nodes uniformly in `[0, width) × [0, height)`
//!    using the seeded RNG.
//! 2. Build edges with the selected strategy (RGG, KNN, or Delaunay).
//! 3. Repair connectivity (optional, on by default): while the graph has
//!    more than one component, bridge the closest cross-component node pair.
//! 4. Apply weight variation (optional): curvature scaling, speed jitter,
//!    normally distributed surface quality.
//!
//! # Determinism
//!
//! Node IDs are assigned sequentially (`n0`, `n1`, …) and every randomized
//! step iterates nodes and edges in a fixed order, so two runs with the same
//! config produce structurally equal graphs with equal attribute values.

use log::{debug, info};
use rand_distr::{Distribution, Normal};

use fleet_core::{NodeId, Point2D, SimRng};

use crate::model::{Graph, Node, NodeType};
use crate::{GraphError, GraphResult};

/// Surface quality assigned to edges created by the construction strategies.
const DEFAULT_SURFACE_QUALITY: f64 = 0.95;

/// Surface quality assigned to edges added by connectivity repair.
const REPAIR_SURFACE_QUALITY: f64 = 0.90;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Edge-construction strategy.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Random geometric graph: connect all pairs within a radius.
    Rgg,
    /// Connect each node to its K nearest neighbors, symmetrized.
    Knn,
    /// Delaunay triangulation of the point set.
    Delaunay,
}

/// Radius multiplier mode for [`Algorithm::Rgg`].
///
/// `Sparse` (×0.6) usually leaves the graph disconnected and relies on
/// connectivity repair; `Connected` (×1.4) aims for a single component
/// outright.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiusMode {
    Sparse,
    Connected,
}

/// Post-construction variation of edge attributes.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct WeightVariationConfig {
    /// Uniform curvature multiplier range applied to edge lengths.
    pub curvature_min: f64,
    pub curvature_max: f64,
    /// Relative speed jitter: limits scale by `1 + U(−1, 1) · speed_variation`.
    pub speed_variation: f64,
    /// Normal distribution for surface quality, clamped to `[0.5, 1.0]`.
    pub quality_mean: f64,
    pub quality_std_dev: f64,
    /// Grant edges near the map center a small quality bonus.
    pub use_distance_from_center: bool,
}

impl Default for WeightVariationConfig {
    fn default() -> Self {
        Self {
            curvature_min: 1.0,
            curvature_max: 1.3,
            speed_variation: 0.1,
            quality_mean: 0.85,
            quality_std_dev: 0.1,
            use_distance_from_center: false,
        }
    }
}

/// Inputs for one map-generation run.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct MapGeneratorConfig {
    pub width: f64,
    pub height: f64,
    pub seed: u64,
    pub algorithm: Algorithm,
    pub node_count: usize,
    /// Neighbor count for [`Algorithm::Knn`]; ignored otherwise.
    pub k: usize,
    /// Radius mode for [`Algorithm::Rgg`]; ignored otherwise.
    pub radius_mode: RadiusMode,
    pub ensure_connectivity: bool,
    pub weight_variation: Option<WeightVariationConfig>,
}

impl MapGeneratorConfig {
    /// A config with connectivity repair on and no weight variation.
    pub fn new(width: f64, height: f64, seed: u64, algorithm: Algorithm, node_count: usize) -> Self {
        Self {
            width,
            height,
            seed,
            algorithm,
            node_count,
            k: 0,
            radius_mode: RadiusMode::Connected,
            ensure_connectivity: true,
            weight_variation: None,
        }
    }

    // ── Generation ────────────────────────────────────────────────────────

    /// Run the full pipeline and return the generated graph.
    ///
    /// A zero `node_count` yields an empty graph.  Delaunay with fewer than
    /// three nodes yields an empty edge set (repair still runs).
    ///
    /// # Errors
    ///
    /// [`GraphError::InvalidInput`] for non-positive bounds or a malformed
    /// [`WeightVariationConfig`].
    pub fn generate(&self) -> GraphResult<Graph> {
        self.validate()?;

        let mut graph = Graph::new();
        if self.node_count == 0 {
            return Ok(graph);
        }

        let mut rng = SimRng::new(self.seed);
        let ids = self.place_nodes(&mut graph, &mut rng);

        match self.algorithm {
            Algorithm::Rgg => self.build_rgg(&mut graph, &ids)?,
            Algorithm::Knn => self.build_knn(&mut graph, &ids)?,
            Algorithm::Delaunay => self.build_delaunay(&mut graph, &ids)?,
        }

        if self.ensure_connectivity {
            let added = repair_connectivity(&mut graph)?;
            if added > 0 {
                debug!("connectivity repair added {added} bridging edge(s)");
            }
        }

        if let Some(variation) = &self.weight_variation {
            self.apply_weight_variation(&mut graph, variation, &mut rng)?;
        }

        info!(
            "generated {:?} map: {} nodes, {} edges, {} component(s)",
            self.algorithm,
            graph.node_count(),
            graph.edge_count(),
            graph.component_count()
        );
        Ok(graph)
    }

    fn validate(&self) -> GraphResult<()> {
        if !(self.width > 0.0) || !(self.height > 0.0) {
            return Err(GraphError::InvalidInput(format!(
                "map bounds must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if let Some(v) = &self.weight_variation {
            if v.curvature_min > v.curvature_max || v.curvature_min <= 0.0 {
                return Err(GraphError::InvalidInput(format!(
                    "curvature range [{}, {}] is invalid",
                    v.curvature_min, v.curvature_max
                )));
            }
            if v.speed_variation < 0.0 || v.speed_variation >= 1.0 {
                return Err(GraphError::InvalidInput(format!(
                    "speed variation {} outside [0, 1)",
                    v.speed_variation
                )));
            }
            if v.quality_std_dev < 0.0 {
                return Err(GraphError::InvalidInput(format!(
                    "quality std dev {} is negative",
                    v.quality_std_dev
                )));
            }
        }
        Ok(())
    }

    // ── Node placement ────────────────────────────────────────────────────

    /// Uniformly sample node positions; IDs are sequential for reproducibility.
    fn place_nodes(&self, graph: &mut Graph, rng: &mut SimRng) -> Vec<NodeId> {
        (0..self.node_count)
            .map(|i| {
                let id = NodeId::new(format!("n{i}"));
                let position = Point2D::new(
                    rng.gen_range(0.0..self.width),
                    rng.gen_range(0.0..self.height),
                );
                graph.add_node(Node::new(id.clone(), position, NodeType::Intersection));
                id
            })
            .collect()
    }

    // ── Edge construction strategies ──────────────────────────────────────

    fn build_rgg(&self, graph: &mut Graph, ids: &[NodeId]) -> GraphResult<()> {
        let mut radius = optimal_radius(self.node_count, self.width * self.height);
        radius *= match self.radius_mode {
            RadiusMode::Sparse => 0.6,
            RadiusMode::Connected => 1.4,
        };

        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                if node_distance(graph, &ids[i], &ids[j]) <= radius {
                    graph.connect(&ids[i], &ids[j], DEFAULT_SURFACE_QUALITY)?;
                }
            }
        }
        Ok(())
    }

    fn build_knn(&self, graph: &mut Graph, ids: &[NodeId]) -> GraphResult<()> {
        let limit = self.k.min(self.node_count.saturating_sub(1));

        for id in ids {
            let mut by_distance: Vec<(&NodeId, f64)> = ids
                .iter()
                .filter(|other| *other != id)
                .map(|other| (other, node_distance(graph, id, other)))
                .collect();
            by_distance.sort_by(|a, b| a.1.total_cmp(&b.1));

            // Symmetrized: u→v implies v→u via the shared undirected edge.
            for (other, _) in by_distance.into_iter().take(limit) {
                graph.connect(id, other, DEFAULT_SURFACE_QUALITY)?;
            }
        }
        Ok(())
    }

    fn build_delaunay(&self, graph: &mut Graph, ids: &[NodeId]) -> GraphResult<()> {
        // Triangulation needs at least one triangle's worth of points.
        if ids.len() < 3 {
            return Ok(());
        }

        // Point order mirrors `ids` so triangle indices map back to node IDs.
        let mut points = Vec::with_capacity(ids.len());
        for id in ids {
            let node = graph
                .node(id)
                .ok_or_else(|| GraphError::NodeNotFound(id.clone()))?;
            points.push(delaunator::Point {
                x: node.position.x,
                y: node.position.y,
            });
        }

        let triangulation = delaunator::triangulate(&points);

        // Edge set = deduplicated union of all triangle sides; `connect`
        // collapses the duplicates onto the canonical edge key.
        for triangle in triangulation.triangles.chunks_exact(3) {
            let (a, b, c) = (triangle[0], triangle[1], triangle[2]);
            graph.connect(&ids[a], &ids[b], DEFAULT_SURFACE_QUALITY)?;
            graph.connect(&ids[b], &ids[c], DEFAULT_SURFACE_QUALITY)?;
            graph.connect(&ids[c], &ids[a], DEFAULT_SURFACE_QUALITY)?;
        }
        Ok(())
    }

    // ── Weight variation ──────────────────────────────────────────────────

    fn apply_weight_variation(
        &self,
        graph: &mut Graph,
        cfg: &WeightVariationConfig,
        rng: &mut SimRng,
    ) -> GraphResult<()> {
        let center = Point2D::new(self.width / 2.0, self.height / 2.0);
        let max_center_distance = Point2D::ZERO.distance(center);

        let quality_dist = Normal::new(cfg.quality_mean, cfg.quality_std_dev)
            .map_err(|e| GraphError::InvalidInput(format!("quality distribution: {e}")))?;

        let mut edge_ids: Vec<_> = graph.edges.keys().cloned().collect();
        edge_ids.sort();

        // Split borrow: positions are read from `nodes` while `edges` mutates.
        let nodes = &graph.nodes;
        let edges = &mut graph.edges;

        for id in edge_ids {
            let Some(edge) = edges.get_mut(&id) else {
                continue;
            };

            // Curvature: simulated non-straight roads are longer than the
            // endpoint distance.
            edge.length *= rng.gen_range(cfg.curvature_min..=cfg.curvature_max);

            let jitter = 1.0 + rng.gen_range(-1.0..=1.0) * cfg.speed_variation;
            edge.base_speed_limit *= jitter;
            edge.conditions.effective_speed_limit = edge.base_speed_limit;

            let mut quality = quality_dist.sample(rng.inner()).clamp(0.5, 1.0);
            if cfg.use_distance_from_center {
                // Endpoints always resolve for edges created via `connect`.
                if let (Some(from), Some(to)) = (nodes.get(&edge.from), nodes.get(&edge.to)) {
                    let d = from.position.midpoint(to.position).distance(center);
                    quality = (quality + (1.0 - d / max_center_distance) * 0.1).clamp(0.5, 1.0);
                }
            }
            edge.surface_quality = quality;
        }
        Ok(())
    }
}

// ── Connectivity repair ───────────────────────────────────────────────────────

/// Bridge every extra component into the first one via the closest
/// cross-component node pair.  Each added edge reduces the component count
/// by one, so at most `components − 1` edges are added.
///
/// Returns the number of edges added.
pub fn repair_connectivity(graph: &mut Graph) -> GraphResult<usize> {
    let components = graph.components();
    if components.len() <= 1 {
        return Ok(0);
    }

    let mut base = components[0].clone();
    let mut added = 0;
    for component in &components[1..] {
        if let Some((a, b)) = closest_cross_pair(graph, &base, component) {
            graph.connect(&a, &b, REPAIR_SURFACE_QUALITY)?;
            added += 1;
        }
        base.extend_from_slice(component);
    }
    Ok(added)
}

/// The closest `(left, right)` node pair across two disjoint node sets.
fn closest_cross_pair(graph: &Graph, left: &[NodeId], right: &[NodeId]) -> Option<(NodeId, NodeId)> {
    let mut best: Option<(NodeId, NodeId, f64)> = None;
    for a in left {
        for b in right {
            let d = node_distance(graph, a, b);
            if best.as_ref().is_none_or(|(_, _, bd)| d < *bd) {
                best = Some((a.clone(), b.clone(), d));
            }
        }
    }
    best.map(|(a, b, _)| (a, b))
}

// ── Shared helpers ────────────────────────────────────────────────────────────

/// RGG base radius `sqrt(ln(N) · area / (π · N))` — the connectivity
/// threshold radius for uniform random geometric graphs.
fn optimal_radius(node_count: usize, area: f64) -> f64 {
    let n = node_count as f64;
    ((n.ln() * area) / (std::f64::consts::PI * n)).sqrt()
}

/// Euclidean distance between two graph nodes; infinity if either is missing.
fn node_distance(graph: &Graph, a: &NodeId, b: &NodeId) -> f64 {
    match (graph.node(a), graph.node(b)) {
        (Some(na), Some(nb)) => na.position.distance(nb.position),
        _ => f64::INFINITY,
    }
}
