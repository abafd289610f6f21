//! `fleet-core` — foundational types for the fleetsim simulation crates.
//!
//! This crate is a dependency of every other `fleet-*` crate.  It
//! intentionally has no `fleet-*` dependencies and minimal external ones
//! (only `rand` and `serde`).
//!
//! # What lives here
//!
//! | Module   | Contents                                       |
//! |----------|------------------------------------------------|
//! | [`ids`]  | `NodeId`, `EdgeId`, `VehicleId`                |
//! | [`geom`] | `Point2D`, Euclidean distance, lerp            |
//! | [`rng`]  | `SimRng` (seeded, reproducible)                |

pub mod geom;
pub mod ids;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use geom::Point2D;
pub use ids::{EdgeId, NodeId, VehicleId};
pub use rng::SimRng;
