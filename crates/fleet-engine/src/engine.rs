//! The simulation engine: vehicle registry, lifecycle, per-vehicle workers.
//!
//! # Locking order
//!
//! Registry lock first, then a vehicle's mutex; never the reverse.  Workers
//! take only their own vehicle's mutex, so registry writers are never stuck
//! behind physics.  `stop` triggers every stop signal before joining, so
//! join time is bounded by one update interval per the slowest worker.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use fleet_core::VehicleId;
use fleet_graph::model::Graph;
use fleet_vehicle::{update_vehicle, Vehicle, VehicleStatus};

use crate::telemetry::{TelemetrySample, TelemetrySink};

// ── Configuration ─────────────────────────────────────────────────────────────

/// Engine timing parameters.
#[derive(Clone, Debug)]
pub struct EngineConfig {
    /// Interval between kinematic updates for each vehicle.
    pub update_rate: Duration,
    /// Interval between telemetry emissions for each vehicle.
    pub telemetry_interval: Duration,
    /// Upper bound on the `dt` integrated in a single tick.  Absorbs
    /// scheduling lag: a paused process resumes without teleporting
    /// vehicles across the map.
    pub max_tick_seconds: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            update_rate: Duration::from_millis(100),
            telemetry_interval: Duration::from_secs(1),
            max_tick_seconds: 0.5,
        }
    }
}

// ── Stop signal ───────────────────────────────────────────────────────────────

/// Broadcast-once cancellation flag with a blocking wait.
///
/// `trigger` is idempotent; `wait_timeout` is the worker's multi-way wait —
/// it returns early when the signal fires and at the tick interval
/// otherwise.
struct StopSignal {
    stopped: Mutex<bool>,
    condvar: Condvar,
}

impl StopSignal {
    fn new() -> Self {
        Self {
            stopped: Mutex::new(false),
            condvar: Condvar::new(),
        }
    }

    fn trigger(&self) {
        let mut stopped = lock_ignore_poison(&self.stopped);
        *stopped = true;
        self.condvar.notify_all();
    }

    /// Re-arm the signal for a fresh worker.  Only called with no worker
    /// attached (after `stop` has joined everything).
    fn reset(&self) {
        *lock_ignore_poison(&self.stopped) = false;
    }

    /// Block for up to `timeout`.  Returns `true` if the stop fired.
    fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = lock_ignore_poison(&self.stopped);
        if *guard {
            return true;
        }
        match self.condvar.wait_timeout(guard, timeout) {
            Ok((guard, _)) => *guard,
            Err(poisoned) => *poisoned.into_inner().0,
        }
    }
}

/// A panicking worker must not wedge every other accessor of the lock.
fn lock_ignore_poison<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ── Vehicle slot ──────────────────────────────────────────────────────────────

/// Registry entry: the vehicle behind its mutex plus its stop signal.
struct VehicleSlot {
    vehicle: Mutex<Vehicle>,
    stop: StopSignal,
}

struct Registry {
    vehicles: HashMap<VehicleId, Arc<VehicleSlot>>,
    running: bool,
}

// ── SimulationEngine ──────────────────────────────────────────────────────────

/// Owns the shared road graph and the vehicle registry; runs one worker per
/// vehicle while started.
///
/// All operations take `&self`; adapters typically hold the engine in an
/// `Arc` and call it from any thread.
pub struct SimulationEngine {
    graph: Arc<Graph>,
    config: EngineConfig,
    sink: Arc<dyn TelemetrySink>,
    registry: RwLock<Registry>,
    workers: Mutex<Vec<JoinHandle<()>>>,
    dropped_samples: Arc<AtomicU64>,
}

impl SimulationEngine {
    pub fn new(graph: Arc<Graph>, config: EngineConfig, sink: Arc<dyn TelemetrySink>) -> Self {
        Self {
            graph,
            config,
            sink,
            registry: RwLock::new(Registry {
                vehicles: HashMap::new(),
                running: false,
            }),
            workers: Mutex::new(Vec::new()),
            dropped_samples: Arc::new(AtomicU64::new(0)),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Mark the engine running and spawn a worker for every registered
    /// vehicle.  Idempotent.
    pub fn start(&self) {
        let mut registry = self.write_registry();
        if registry.running {
            return;
        }
        registry.running = true;
        info!("engine starting with {} vehicle(s)", registry.vehicles.len());

        for (id, slot) in &registry.vehicles {
            slot.stop.reset();
            self.spawn_worker(id.clone(), Arc::clone(slot));
        }
    }

    /// Trigger every vehicle's stop signal and block until all workers have
    /// exited.  Idempotent; never fails.
    pub fn stop(&self) {
        {
            let mut registry = self.write_registry();
            if !registry.running {
                return;
            }
            registry.running = false;
            for slot in registry.vehicles.values() {
                slot.stop.trigger();
            }
        }

        // Join outside the registry lock: workers only need their own
        // vehicle mutex to finish the current tick.
        let handles: Vec<JoinHandle<()>> = lock_ignore_poison(&self.workers).drain(..).collect();
        let count = handles.len();
        for handle in handles {
            if handle.join().is_err() {
                warn!("a vehicle worker panicked before shutdown");
            }
        }
        info!("engine stopped; joined {count} worker(s)");
    }

    pub fn is_running(&self) -> bool {
        self.read_registry().running
    }

    // ── Vehicle registry ──────────────────────────────────────────────────

    /// Register `vehicle`.  A duplicate ID is a no-op.  If the engine is
    /// running, the vehicle's worker starts immediately.
    pub fn add_vehicle(&self, vehicle: Vehicle) {
        let mut registry = self.write_registry();
        if registry.vehicles.contains_key(&vehicle.id) {
            debug!("vehicle {} already registered; ignoring", vehicle.id);
            return;
        }

        let id = vehicle.id.clone();
        let slot = Arc::new(VehicleSlot {
            vehicle: Mutex::new(vehicle),
            stop: StopSignal::new(),
        });
        registry.vehicles.insert(id.clone(), Arc::clone(&slot));

        if registry.running {
            self.spawn_worker(id, slot);
        }
    }

    /// Deregister a vehicle, stopping its worker if one is live.  An
    /// unknown ID is a no-op.
    pub fn remove_vehicle(&self, id: &VehicleId) {
        let mut registry = self.write_registry();
        if let Some(slot) = registry.vehicles.remove(id) {
            slot.stop.trigger();
            debug!("vehicle {id} removed");
        }
    }

    pub fn vehicle_count(&self) -> usize {
        self.read_registry().vehicles.len()
    }

    /// Consistent snapshot of every registered vehicle, sorted by ID.
    ///
    /// Takes the registry read lock and each vehicle's mutex, so every
    /// returned clone is internally consistent even mid-simulation.
    pub fn list_vehicles(&self) -> Vec<Vehicle> {
        let registry = self.read_registry();
        let mut vehicles: Vec<Vehicle> = registry
            .vehicles
            .values()
            .map(|slot| lock_ignore_poison(&slot.vehicle).clone())
            .collect();
        vehicles.sort_by(|a, b| a.id.cmp(&b.id));
        vehicles
    }

    /// Telemetry samples dropped so far because the sink was full.
    pub fn dropped_telemetry(&self) -> u64 {
        self.dropped_samples.load(Ordering::Relaxed)
    }

    pub fn graph(&self) -> &Arc<Graph> {
        &self.graph
    }

    // ── Worker management ─────────────────────────────────────────────────

    fn spawn_worker(&self, id: VehicleId, slot: Arc<VehicleSlot>) {
        let graph = Arc::clone(&self.graph);
        let sink = Arc::clone(&self.sink);
        let dropped = Arc::clone(&self.dropped_samples);
        let config = self.config.clone();

        let handle = thread::spawn(move || worker_loop(id, slot, graph, sink, dropped, config));
        lock_ignore_poison(&self.workers).push(handle);
    }

    fn read_registry(&self) -> std::sync::RwLockReadGuard<'_, Registry> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_registry(&self) -> std::sync::RwLockWriteGuard<'_, Registry> {
        self.registry
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for SimulationEngine {
    fn drop(&mut self) {
        self.stop();
    }
}

// ── Worker loop ───────────────────────────────────────────────────────────────

/// Drive one vehicle until its stop signal fires, its route completes, or
/// an invariant violation marks it broken down.
fn worker_loop(
    id: VehicleId,
    slot: Arc<VehicleSlot>,
    graph: Arc<Graph>,
    sink: Arc<dyn TelemetrySink>,
    dropped: Arc<AtomicU64>,
    config: EngineConfig,
) {
    debug!("worker for vehicle {id} started");
    let mut last_tick = Instant::now();
    let mut last_emit = Instant::now();

    loop {
        // Multi-way wait: the tick interval elapsing vs. the stop signal.
        if slot.stop.wait_timeout(config.update_rate) {
            break;
        }

        let now = Instant::now();
        let dt = now
            .duration_since(last_tick)
            .as_secs_f64()
            .min(config.max_tick_seconds);
        last_tick = now;

        // Take the vehicle mutex only for the update and snapshot; the
        // sink emit happens after release.
        let mut sample = None;
        let mut exit = false;
        {
            let mut vehicle = lock_ignore_poison(&slot.vehicle);

            if let Err(e) = update_vehicle(&mut vehicle, &graph, dt) {
                // Isolated failure: this vehicle breaks down, others are
                // unaffected.
                error!("vehicle {id}: {e}; marking breakdown");
                vehicle.state.status = VehicleStatus::Breakdown;
                exit = true;
            } else {
                if now.duration_since(last_emit) >= config.telemetry_interval {
                    sample = TelemetrySample::capture(&vehicle);
                    last_emit = now;
                }
                if vehicle.route.as_ref().is_some_and(|r| r.completed_at.is_some()) {
                    debug!("vehicle {id} completed its route");
                    exit = true;
                }
            }
        }

        if let Some(sample) = sample {
            if sink.emit(&sample).is_err() {
                dropped.fetch_add(1, Ordering::Relaxed);
                warn!("telemetry sink full; dropped sample for vehicle {id}");
            }
        }

        if exit {
            break;
        }
    }
    debug!("worker for vehicle {id} exited");
}
