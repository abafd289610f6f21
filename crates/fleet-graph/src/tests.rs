//! Unit tests for fleet-graph.
//!
//! Generator properties are checked across all three construction strategies
//! and several seeds; router laws use hand-crafted fixtures plus an
//! exhaustive-search cross-check on a small generated graph.

#[cfg(test)]
mod helpers {
    use std::collections::BTreeSet;

    use fleet_core::{NodeId, Point2D};

    use crate::model::{Graph, Node, NodeType};
    use crate::router::Route;
    use crate::{Algorithm, MapGeneratorConfig};

    pub fn node(graph: &mut Graph, id: &str, x: f64, y: f64) -> NodeId {
        let id = NodeId::from(id);
        graph.add_node(Node::new(id.clone(), Point2D::new(x, y), NodeType::Intersection));
        id
    }

    /// Right-angle fixture: a(0,0) — b(100,0) — c(100,100), two 100-unit edges.
    pub fn corner_graph() -> (Graph, [NodeId; 3]) {
        let mut g = Graph::new();
        let a = node(&mut g, "a", 0.0, 0.0);
        let b = node(&mut g, "b", 100.0, 0.0);
        let c = node(&mut g, "c", 100.0, 100.0);
        g.connect(&a, &b, 0.95).unwrap();
        g.connect(&b, &c, 0.95).unwrap();
        (g, [a, b, c])
    }

    /// Grid fixture with a short 3-hop path (300) and a long 2-hop detour
    /// (~760) between `n0` and `n4`.
    pub fn grid_graph() -> (Graph, [NodeId; 5]) {
        let mut g = Graph::new();
        let n0 = node(&mut g, "g0", 0.0, 0.0);
        let n1 = node(&mut g, "g1", 100.0, 0.0);
        let n2 = node(&mut g, "g2", 200.0, 0.0);
        let n3 = node(&mut g, "g3", 0.0, 400.0);
        let n4 = node(&mut g, "g4", 200.0, 100.0);
        g.connect(&n0, &n1, 0.95).unwrap(); // 100
        g.connect(&n1, &n2, 0.95).unwrap(); // 100
        g.connect(&n2, &n4, 0.95).unwrap(); // 100
        g.connect(&n0, &n3, 0.95).unwrap(); // 400
        g.connect(&n3, &n4, 0.95).unwrap(); // ~360.6
        (g, [n0, n1, n2, n3, n4])
    }

    pub fn all_algorithms() -> [Algorithm; 3] {
        [Algorithm::Rgg, Algorithm::Knn, Algorithm::Delaunay]
    }

    pub fn config_for(algorithm: Algorithm, seed: u64, node_count: usize) -> MapGeneratorConfig {
        let mut cfg = MapGeneratorConfig::new(1000.0, 1000.0, seed, algorithm, node_count);
        cfg.k = 4;
        cfg
    }

    /// Assert that the route's edges chain `start_node → … → end_node`,
    /// each consecutive pair sharing exactly one endpoint.
    pub fn assert_connected_walk(graph: &Graph, route: &Route) {
        let mut current = route.start_node.clone();
        for edge_id in &route.edges {
            let edge = graph.edge(edge_id).unwrap();
            assert!(
                edge.from == current || edge.to == current,
                "edge {edge_id} does not touch walk position {current}"
            );
            current = if edge.from == current {
                edge.to.clone()
            } else {
                edge.from.clone()
            };
        }
        assert_eq!(current, route.end_node, "walk must terminate at end_node");
    }

    /// Minimum path length between two nodes by exhaustive simple-path search.
    /// Only viable on tiny graphs; used to cross-check Dijkstra.
    pub fn exhaustive_min_distance(graph: &Graph, start: &NodeId, end: &NodeId) -> Option<f64> {
        fn dfs(
            graph: &Graph,
            current: &NodeId,
            end: &NodeId,
            visited: &mut BTreeSet<NodeId>,
            so_far: f64,
            best: &mut Option<f64>,
        ) {
            if current == end {
                if best.is_none() || so_far < best.unwrap() {
                    *best = Some(so_far);
                }
                return;
            }
            let neighbors: Vec<NodeId> = graph.neighbors(current).cloned().collect();
            for next in neighbors {
                if visited.contains(&next) {
                    continue;
                }
                let length = graph.edge_between(current, &next).unwrap().length;
                visited.insert(next.clone());
                dfs(graph, &next, end, visited, so_far + length, best);
                visited.remove(&next);
            }
        }

        let mut best = None;
        let mut visited = BTreeSet::from([start.clone()]);
        dfs(graph, start, end, &mut visited, 0.0, &mut best);
        best
    }
}

// ── Graph model ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod model {
    use fleet_core::EdgeId;

    use super::helpers::{corner_graph, node};
    use crate::model::{tier_speed_limit, Graph};
    use crate::GraphError;

    #[test]
    fn connect_creates_symmetric_adjacency() {
        let (g, [a, b, _]) = corner_graph();
        assert!(g.nodes[&a].connections.contains(&b));
        assert!(g.nodes[&b].connections.contains(&a));
    }

    #[test]
    fn connect_both_orientations_is_one_edge() {
        let mut g = Graph::new();
        let a = node(&mut g, "a", 0.0, 0.0);
        let b = node(&mut g, "b", 50.0, 0.0);
        let id1 = g.connect(&a, &b, 0.95).unwrap();
        let id2 = g.connect(&b, &a, 0.95).unwrap();
        assert_eq!(id1, id2);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(id1, EdgeId::canonical(&a, &b));
    }

    #[test]
    fn edge_between_ignores_orientation() {
        let (g, [a, b, _]) = corner_graph();
        let forward = g.edge_between(&a, &b).unwrap();
        let backward = g.edge_between(&b, &a).unwrap();
        assert_eq!(forward.id, backward.id);
        assert_eq!(forward.length, 100.0);
    }

    #[test]
    fn connect_unknown_node_errors() {
        let mut g = Graph::new();
        let a = node(&mut g, "a", 0.0, 0.0);
        let ghost = fleet_core::NodeId::from("ghost");
        assert!(matches!(
            g.connect(&a, &ghost, 0.95),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn components_of_disconnected_graph() {
        let mut g = Graph::new();
        let a = node(&mut g, "a", 0.0, 0.0);
        let b = node(&mut g, "b", 10.0, 0.0);
        node(&mut g, "c", 500.0, 0.0);
        g.connect(&a, &b, 0.95).unwrap();
        let components = g.components();
        assert_eq!(components.len(), 2);
        assert_eq!(g.component_count(), 2);
    }

    #[test]
    fn speed_limit_tiers() {
        assert_eq!(tier_speed_limit(50.0), 13.4);
        assert_eq!(tier_speed_limit(100.0), 22.2);
        assert_eq!(tier_speed_limit(299.9), 22.2);
        assert_eq!(tier_speed_limit(300.0), 33.3);
    }

    #[test]
    fn new_edge_conditions_mirror_base_speed() {
        let (g, [a, b, _]) = corner_graph();
        let edge = g.edge_between(&a, &b).unwrap();
        assert_eq!(edge.conditions.effective_speed_limit, edge.base_speed_limit);
        assert_eq!(edge.conditions.congestion, 0.0);
        assert_eq!(edge.conditions.weather_multiplier, 1.0);
        assert!(edge.bidirectional);
    }
}

// ── Generator ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod generator {
    use super::helpers::{all_algorithms, config_for};
    use crate::{Algorithm, GraphError, MapGeneratorConfig, WeightVariationConfig};

    #[test]
    fn single_component_for_all_algorithms_and_seeds() {
        for algorithm in all_algorithms() {
            for seed in [1, 42, 999] {
                let graph = config_for(algorithm, seed, 40).generate().unwrap();
                assert_eq!(graph.node_count(), 40);
                assert_eq!(
                    graph.component_count(),
                    1,
                    "{algorithm:?} seed {seed} must be connected"
                );
            }
        }
    }

    #[test]
    fn adjacency_and_edge_set_are_symmetric() {
        for algorithm in all_algorithms() {
            let graph = config_for(algorithm, 7, 30).generate().unwrap();

            // Every edge appears in both endpoints' adjacency.
            for edge in graph.edges.values() {
                assert!(graph.nodes[&edge.from].connections.contains(&edge.to));
                assert!(graph.nodes[&edge.to].connections.contains(&edge.from));
            }

            // Every adjacency pair has exactly one edge; pair count matches.
            let mut adjacency_pairs = 0;
            for node in graph.nodes.values() {
                for neighbor in &node.connections {
                    assert!(
                        graph.edge_between(&node.id, neighbor).is_some(),
                        "adjacency {}-{} has no edge record",
                        node.id,
                        neighbor
                    );
                    adjacency_pairs += 1;
                }
            }
            assert_eq!(adjacency_pairs, graph.edge_count() * 2);
        }
    }

    #[test]
    fn identical_configs_produce_identical_graphs() {
        for algorithm in all_algorithms() {
            let mut cfg = config_for(algorithm, 123, 25);
            cfg.weight_variation = Some(WeightVariationConfig::default());

            let g1 = cfg.generate().unwrap();
            let g2 = cfg.generate().unwrap();

            let mut nodes1: Vec<_> = g1.nodes.values().map(|n| (n.id.clone(), n.position)).collect();
            let mut nodes2: Vec<_> = g2.nodes.values().map(|n| (n.id.clone(), n.position)).collect();
            nodes1.sort_by(|a, b| a.0.cmp(&b.0));
            nodes2.sort_by(|a, b| a.0.cmp(&b.0));
            assert_eq!(nodes1, nodes2);

            let mut edges1: Vec<_> = g1
                .edges
                .values()
                .map(|e| (e.id.clone(), e.length, e.base_speed_limit, e.surface_quality))
                .collect();
            let mut edges2: Vec<_> = g2
                .edges
                .values()
                .map(|e| (e.id.clone(), e.length, e.base_speed_limit, e.surface_quality))
                .collect();
            edges1.sort_by(|a, b| a.0.cmp(&b.0));
            edges2.sort_by(|a, b| a.0.cmp(&b.0));
            assert_eq!(edges1, edges2);
        }
    }

    #[test]
    fn attribute_ranges_hold_with_variation() {
        for algorithm in all_algorithms() {
            for seed in [5, 77] {
                let mut cfg = config_for(algorithm, seed, 35);
                cfg.weight_variation = Some(WeightVariationConfig {
                    curvature_min: 1.1,
                    curvature_max: 1.5,
                    speed_variation: 0.2,
                    quality_mean: 0.8,
                    quality_std_dev: 0.08,
                    use_distance_from_center: true,
                });
                let graph = cfg.generate().unwrap();
                assert!(graph.edge_count() > 0);
                for edge in graph.edges.values() {
                    assert!(edge.length > 0.0);
                    assert!(edge.base_speed_limit > 0.0);
                    assert!((0.5..=1.0).contains(&edge.surface_quality));
                    assert_eq!(edge.conditions.effective_speed_limit, edge.base_speed_limit);
                }
            }
        }
    }

    #[test]
    fn zero_nodes_yields_empty_graph() {
        let graph = config_for(Algorithm::Rgg, 1, 0).generate().unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn delaunay_below_three_nodes_relies_on_repair() {
        let graph = config_for(Algorithm::Delaunay, 3, 2).generate().unwrap();
        // Triangulation yields nothing; the repair pass bridges the two nodes.
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.component_count(), 1);
    }

    #[test]
    fn repair_disabled_leaves_components_apart() {
        // K = 0 produces an edgeless graph: every node its own component.
        let mut cfg = config_for(Algorithm::Knn, 11, 6);
        cfg.k = 0;
        cfg.ensure_connectivity = false;
        let graph = cfg.generate().unwrap();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.component_count(), 6);
    }

    #[test]
    fn repair_adds_exactly_components_minus_one_edges() {
        let mut cfg = config_for(Algorithm::Knn, 11, 6);
        cfg.k = 0;
        let graph = cfg.generate().unwrap();
        // 6 isolated nodes need exactly 5 bridges.
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.component_count(), 1);
    }

    #[test]
    fn repair_edges_use_lower_surface_quality() {
        let mut cfg = config_for(Algorithm::Knn, 11, 6);
        cfg.k = 0;
        let graph = cfg.generate().unwrap();
        for edge in graph.edges.values() {
            assert_eq!(edge.surface_quality, 0.90);
        }
    }

    #[test]
    fn curvature_lengthens_edges_beyond_endpoint_distance() {
        let mut cfg = config_for(Algorithm::Delaunay, 21, 20);
        cfg.weight_variation = Some(WeightVariationConfig {
            curvature_min: 1.1,
            curvature_max: 1.4,
            speed_variation: 0.0,
            quality_mean: 0.85,
            quality_std_dev: 0.05,
            use_distance_from_center: false,
        });
        let graph = cfg.generate().unwrap();
        for edge in graph.edges.values() {
            let straight = graph.nodes[&edge.from]
                .position
                .distance(graph.nodes[&edge.to].position);
            assert!(
                edge.length >= straight * 1.1 - 1e-9,
                "curvature must lengthen edge {}",
                edge.id
            );
        }
    }

    #[test]
    fn center_bonus_raises_quality_with_degenerate_normal() {
        let mut cfg = config_for(Algorithm::Delaunay, 31, 20);
        cfg.weight_variation = Some(WeightVariationConfig {
            curvature_min: 1.0,
            curvature_max: 1.0,
            speed_variation: 0.0,
            quality_mean: 0.7,
            quality_std_dev: 0.0,
            use_distance_from_center: true,
        });
        let graph = cfg.generate().unwrap();
        for edge in graph.edges.values() {
            // Bonus is (1 − d/d_max) · 0.1 ∈ [0, 0.1] on top of the 0.7 mean.
            assert!(edge.surface_quality >= 0.7);
            assert!(edge.surface_quality <= 0.8 + 1e-9);
        }
    }

    #[test]
    fn invalid_bounds_rejected() {
        let cfg = MapGeneratorConfig::new(0.0, 100.0, 1, Algorithm::Rgg, 10);
        assert!(matches!(cfg.generate(), Err(GraphError::InvalidInput(_))));
    }

    #[test]
    fn invalid_curvature_range_rejected() {
        let mut cfg = config_for(Algorithm::Rgg, 1, 10);
        cfg.weight_variation = Some(WeightVariationConfig {
            curvature_min: 1.5,
            curvature_max: 1.1,
            ..WeightVariationConfig::default()
        });
        assert!(matches!(cfg.generate(), Err(GraphError::InvalidInput(_))));
    }

    #[test]
    fn knn_nodes_have_at_least_k_neighbors() {
        let graph = config_for(Algorithm::Knn, 17, 30).generate().unwrap();
        // Each node picked 4 neighbors; symmetrization can only add more.
        for node in graph.nodes.values() {
            assert!(node.connections.len() >= 4, "node {} under-connected", node.id);
        }
    }
}

// ── Router ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod router {
    use super::helpers::{
        assert_connected_walk, config_for, corner_graph, exhaustive_min_distance, grid_graph, node,
    };
    use crate::model::Graph;
    use crate::router::{DijkstraRouter, Router, RoutingConfig};
    use crate::{generator, Algorithm, GraphError};

    #[test]
    fn same_start_and_end_is_zero_length_route() {
        let (g, [a, ..]) = corner_graph();
        let route = DijkstraRouter.route(&g, &a, &a).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.total_distance, 0.0);
        assert_eq!(route.start_node, route.end_node);
    }

    #[test]
    fn shortest_path_takes_short_multi_hop_side() {
        let (g, [n0, _, _, _, n4]) = grid_graph();
        let route = DijkstraRouter.route(&g, &n0, &n4).unwrap();
        assert_eq!(route.edges.len(), 3);
        assert!((route.total_distance - 300.0).abs() < 1e-9);
        assert_connected_walk(&g, &route);
    }

    #[test]
    fn optimal_against_exhaustive_search() {
        let graph = config_for(Algorithm::Knn, 99, 8).generate().unwrap();
        let ids = graph.sorted_node_ids();
        for start in &ids {
            for end in &ids {
                let route = DijkstraRouter.route(&graph, start, end).unwrap();
                let expected = exhaustive_min_distance(&graph, start, end).unwrap();
                assert!(
                    (route.total_distance - expected).abs() < 1e-6,
                    "{start}→{end}: dijkstra {} vs exhaustive {}",
                    route.total_distance,
                    expected
                );
            }
        }
    }

    #[test]
    fn routes_over_generated_maps_are_valid_walks() {
        for algorithm in [Algorithm::Rgg, Algorithm::Delaunay] {
            let graph = config_for(algorithm, 4, 30).generate().unwrap();
            let ids = graph.sorted_node_ids();
            let route = DijkstraRouter.route(&graph, &ids[0], &ids[ids.len() - 1]).unwrap();
            assert_connected_walk(&graph, &route);
            let length_sum: f64 = route
                .edges
                .iter()
                .map(|id| graph.edge(id).unwrap().length)
                .sum();
            assert!((route.total_distance - length_sum).abs() < 1e-9);
        }
    }

    #[test]
    fn disconnected_nodes_have_no_route_until_repaired() {
        let mut g = Graph::new();
        let a = node(&mut g, "a", 0.0, 0.0);
        let b = node(&mut g, "b", 250.0, 0.0);
        assert!(matches!(
            DijkstraRouter.route(&g, &a, &b),
            Err(GraphError::NoRoute { .. })
        ));

        generator::repair_connectivity(&mut g).unwrap();
        let route = DijkstraRouter.route(&g, &a, &b).unwrap();
        assert_eq!(route.edges.len(), 1);
    }

    #[test]
    fn unknown_endpoint_is_reported() {
        let (g, [a, ..]) = corner_graph();
        let ghost = fleet_core::NodeId::from("ghost");
        assert!(matches!(
            DijkstraRouter.route(&g, &a, &ghost),
            Err(GraphError::NodeNotFound(_))
        ));
        assert!(matches!(
            DijkstraRouter.route(&g, &ghost, &a),
            Err(GraphError::NodeNotFound(_))
        ));
    }

    #[test]
    fn routing_config_builds_dijkstra() {
        let (g, [a, _, c]) = corner_graph();
        let router = RoutingConfig::default().make_router();
        let route = router.route(&g, &a, &c).unwrap();
        assert_eq!(route.edges.len(), 2);
    }
}

// ── Serialization contract ────────────────────────────────────────────────────

#[cfg(test)]
mod serialization {
    use super::helpers::corner_graph;
    use crate::{Algorithm, RadiusMode};

    #[test]
    fn node_wire_shape() {
        let (g, [a, ..]) = corner_graph();
        let json = serde_json::to_value(&g.nodes[&a]).unwrap();
        assert_eq!(json["id"], "a");
        assert_eq!(json["position"]["x"], 0.0);
        assert_eq!(json["position"]["y"], 0.0);
        assert_eq!(json["type"], "intersection");
        assert_eq!(json["connections"], serde_json::json!(["b"]));
    }

    #[test]
    fn edge_wire_shape() {
        let (g, [a, b, _]) = corner_graph();
        let edge = g.edge_between(&a, &b).unwrap();
        let json = serde_json::to_value(edge).unwrap();
        assert_eq!(json["id"], "a-b");
        assert_eq!(json["from"], "a");
        assert_eq!(json["to"], "b");
        assert_eq!(json["length"], 100.0);
        assert_eq!(json["base_speed_limit"], 22.2);
        assert_eq!(json["surface_quality"], 0.95);
        assert_eq!(json["bidirectional"], true);
        let conditions = &json["conditions"];
        assert_eq!(conditions["congestion"], 0.0);
        assert_eq!(conditions["weather_multiplier"], 1.0);
        assert_eq!(conditions["effective_speed_limit"], 22.2);
        assert!(conditions["last_updated"].is_string());
    }

    #[test]
    fn config_enums_use_lowercase_names() {
        assert_eq!(serde_json::to_string(&Algorithm::Rgg).unwrap(), "\"rgg\"");
        assert_eq!(serde_json::to_string(&Algorithm::Knn).unwrap(), "\"knn\"");
        assert_eq!(
            serde_json::to_string(&Algorithm::Delaunay).unwrap(),
            "\"delaunay\""
        );
        assert_eq!(
            serde_json::to_string(&RadiusMode::Sparse).unwrap(),
            "\"sparse\""
        );
    }
}
