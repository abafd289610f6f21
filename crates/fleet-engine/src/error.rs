//! Engine-subsystem error type.

use thiserror::Error;

/// A telemetry sink refused a sample because its capacity is exceeded.
///
/// Workers never treat this as fatal: the sample is dropped, counted, and
/// the simulation loop continues at full rate.
#[derive(Debug, Error)]
#[error("telemetry sink full")]
pub struct SinkFull;
