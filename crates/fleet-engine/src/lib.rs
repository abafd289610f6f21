//! `fleet-engine` — concurrent vehicle simulation with telemetry emission.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`engine`]    | `SimulationEngine`, `EngineConfig`, per-vehicle workers  |
//! | [`telemetry`] | `TelemetrySample`, `TelemetrySink`, `ChannelSink`        |
//! | [`error`]     | `SinkFull`                                               |
//!
//! # Concurrency model
//!
//! One worker thread per active vehicle, each driven by its own wall-clock
//! ticker.  The graph is shared read-only without synchronization; each
//! vehicle is protected by its own mutex; the registry by a read/write lock.
//! `stop` broadcasts every per-vehicle stop signal and joins all workers —
//! bounded by the update rate because workers never block on external I/O.

pub mod engine;
pub mod error;
pub mod telemetry;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{EngineConfig, SimulationEngine};
pub use error::SinkFull;
pub use telemetry::{ChannelSink, NoopSink, TelemetrySample, TelemetrySink};
