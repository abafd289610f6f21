//! `fleet-graph` — road-network model, procedural map generation, routing.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`model`]     | `Graph`, `Node`, `Edge`, `RoadConditions`, `NodeType`     |
//! | [`generator`] | `MapGeneratorConfig` — RGG / KNN / Delaunay construction, |
//! |               | connectivity repair, weight variation                     |
//! | [`router`]    | `Router` trait, `Route`, `DijkstraRouter`                 |
//! | [`error`]     | `GraphError`, `GraphResult<T>`                            |
//!
//! # Undirected-edge representation
//!
//! Every road segment is stored exactly once, keyed by the canonical
//! [`EdgeId`](fleet_core::EdgeId) of its endpoint pair; node adjacency sets
//! hold neighbor IDs only.  Both directional views of a segment are derived
//! on lookup, which removes the classic `(u,v)` vs `(v,u)` duplication bug
//! of adjacency lists that carry full edge copies.

pub mod error;
pub mod generator;
pub mod model;
pub mod router;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{GraphError, GraphResult};
pub use generator::{Algorithm, MapGeneratorConfig, RadiusMode, WeightVariationConfig};
pub use model::{Edge, Graph, Node, NodeType, RoadConditions};
pub use router::{DijkstraRouter, Route, Router, RoutingAlgorithm, RoutingConfig};
