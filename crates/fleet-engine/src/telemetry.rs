//! Telemetry snapshot type and pluggable sink.
//!
//! The engine hands each worker's periodic snapshot to a [`TelemetrySink`];
//! what happens next (message queue, WebSocket broadcast, a test channel) is
//! the sink's business.  `emit` must be non-blocking: a sink that cannot
//! accept a sample returns [`SinkFull`] and the sample is dropped rather
//! than stalling the simulation loop.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use chrono::{DateTime, Utc};

use fleet_core::{EdgeId, NodeId, VehicleId};
use fleet_vehicle::Vehicle;

use crate::SinkFull;

// ── TelemetrySample ───────────────────────────────────────────────────────────

/// One vehicle-position snapshot.
///
/// The serialized field names are the wire contract for downstream
/// consumers; `timestamp` serializes as RFC 3339 UTC.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TelemetrySample {
    pub vehicle_id: VehicleId,
    pub edge_id: EdgeId,
    pub from_node_id: NodeId,
    /// Progress along `edge_id`, in `[0, 1]`.
    pub progress: f64,
    pub timestamp: DateTime<Utc>,
}

impl TelemetrySample {
    /// Snapshot `vehicle`, or `None` when it has no route with edges (there
    /// is no edge to report progress on).
    ///
    /// When the vehicle is between edges with no current edge set, the last
    /// traversed edge is reported instead.
    pub fn capture(vehicle: &Vehicle) -> Option<TelemetrySample> {
        let route = vehicle.route.as_ref()?;
        if route.edges.is_empty() {
            return None;
        }

        let edge_id = match &vehicle.state.current_edge {
            Some(edge_id) => edge_id.clone(),
            None if route.current_edge_index > 0 => {
                route.edges[route.current_edge_index - 1].clone()
            }
            None => return None,
        };

        Some(TelemetrySample {
            vehicle_id: vehicle.id.clone(),
            edge_id,
            from_node_id: route.current_node.clone(),
            progress: vehicle.state.progress_on_edge,
            timestamp: Utc::now(),
        })
    }
}

// ── TelemetrySink ─────────────────────────────────────────────────────────────

/// Pluggable telemetry destination.
///
/// # Contract
///
/// `emit` must return promptly — workers call it from the simulation loop.
/// Sinks signal backpressure with [`SinkFull`]; retrying is the downstream
/// consumer's concern, never the engine's.
pub trait TelemetrySink: Send + Sync {
    fn emit(&self, sample: &TelemetrySample) -> Result<(), SinkFull>;
}

/// A [`TelemetrySink`] that discards every sample.
pub struct NoopSink;

impl TelemetrySink for NoopSink {
    fn emit(&self, _sample: &TelemetrySample) -> Result<(), SinkFull> {
        Ok(())
    }
}

/// Sink backed by a bounded in-process channel.
///
/// `emit` uses a non-blocking `try_send`; a full buffer yields [`SinkFull`].
/// The receiving half is handed to whatever transports the samples onward.
pub struct ChannelSink {
    sender: SyncSender<TelemetrySample>,
}

impl ChannelSink {
    /// Create a sink with room for `capacity` undelivered samples, plus the
    /// receiver that drains them.
    pub fn bounded(capacity: usize) -> (ChannelSink, Receiver<TelemetrySample>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (ChannelSink { sender }, receiver)
    }
}

impl TelemetrySink for ChannelSink {
    fn emit(&self, sample: &TelemetrySample) -> Result<(), SinkFull> {
        self.sender.try_send(sample.clone()).map_err(|e| match e {
            TrySendError::Full(_) | TrySendError::Disconnected(_) => SinkFull,
        })
    }
}
