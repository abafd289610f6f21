//! `fleet-vehicle` — vehicle state, kinematics, and route assignment.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                |
//! |----------------|---------------------------------------------------------|
//! | [`vehicle`]    | `Vehicle`, `VehicleState`, `AssignedRoute`, enums       |
//! | [`kinematics`] | `update_vehicle` — one time-step of route following     |
//! | [`assignment`] | spawn/target strategies, `assign_route`                 |
//! | [`error`]      | `VehicleError`, `VehicleResult<T>`                      |
//!
//! The types here are plain data: synchronization (per-vehicle mutex, stop
//! signal) belongs to the engine that owns the vehicles, not to the vehicle
//! itself.

pub mod assignment;
pub mod error;
pub mod kinematics;
pub mod vehicle;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use assignment::{assign_route, assign_route_between, SpawnConfig, SpawnStrategy, TargetStrategy};
pub use error::{VehicleError, VehicleResult};
pub use kinematics::update_vehicle;
pub use vehicle::{AssignedRoute, Vehicle, VehicleState, VehicleStatus, VehicleType};
