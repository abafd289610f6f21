//! Vehicle data model.

use chrono::{DateTime, Utc};

use fleet_core::{EdgeId, NodeId, Point2D, VehicleId};

/// Vehicle category.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    Car,
    Truck,
    Drone,
}

/// Operational status of a vehicle.
///
/// `Breakdown` is set by the engine when an update hits a structural
/// inconsistency; `Stopped` is reserved for externally commanded halts.
#[derive(Copy, Clone, PartialEq, Eq, Debug, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleStatus {
    Idle,
    Moving,
    Stopped,
    Arrived,
    Breakdown,
}

/// Instantaneous physical state of a vehicle.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct VehicleState {
    pub current_position: Point2D,
    pub velocity: Point2D,
    /// The edge currently being traversed; `None` until a route with edges
    /// is assigned.
    pub current_edge: Option<EdgeId>,
    /// Fraction of the current edge already covered, in `[0, 1]`.
    pub progress_on_edge: f64,
    pub status: VehicleStatus,
    pub last_update_time: DateTime<Utc>,
}

impl VehicleState {
    /// Parked at `position`, not moving.
    pub fn idle_at(position: Point2D) -> Self {
        Self {
            current_position: position,
            velocity: Point2D::ZERO,
            current_edge: None,
            progress_on_edge: 0.0,
            status: VehicleStatus::Idle,
            last_update_time: Utc::now(),
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::idle_at(Point2D::ZERO)
    }
}

/// A route materialized onto a vehicle, with progress bookkeeping.
///
/// `current_node` is the last node passed; `target_node` is the `to`
/// endpoint of the edge at `current_edge_index`.  After completion
/// (`completed_at` set) `target_node` keeps its last value and callers
/// should consult `end_node` instead.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AssignedRoute {
    pub edges: Vec<EdgeId>,
    pub current_edge_index: usize,
    pub current_node: NodeId,
    pub target_node: NodeId,
    pub start_node: NodeId,
    pub end_node: NodeId,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl AssignedRoute {
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// A simulated vehicle.
///
/// The struct is plain data; the engine wraps it in a per-vehicle mutex and
/// owns its stop signal.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Vehicle {
    pub id: VehicleId,
    #[serde(rename = "type")]
    pub kind: VehicleType,
    #[serde(rename = "assigned_fleet_id", default, skip_serializing_if = "Option::is_none")]
    pub fleet_id: Option<String>,
    pub state: VehicleState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub route: Option<AssignedRoute>,
}

impl Vehicle {
    /// A new idle vehicle with no route.
    pub fn new(id: impl Into<VehicleId>, kind: VehicleType) -> Self {
        Self {
            id: id.into(),
            kind,
            fleet_id: None,
            state: VehicleState::default(),
            route: None,
        }
    }
}
