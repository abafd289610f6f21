//! fleet-demo — smallest end-to-end run of the fleetsim stack.
//!
//! Generates a procedural road map, assigns random routes to a small fleet,
//! runs the simulation engine for a few wall-clock seconds while printing
//! received telemetry as JSON lines, then stops cleanly and prints a
//! per-vehicle summary.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;

use fleet_core::SimRng;
use fleet_engine::{ChannelSink, EngineConfig, SimulationEngine};
use fleet_graph::{Algorithm, MapGeneratorConfig, RoutingConfig, WeightVariationConfig};
use fleet_vehicle::{assign_route, SpawnConfig, Vehicle, VehicleType};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Generate a road map and simulate a telemetry-emitting fleet")]
struct Args {
    /// Map edge length in map units (the map is square).
    #[arg(long, default_value_t = 2000.0)]
    size: f64,

    /// Node count for the generator.
    #[arg(long, default_value_t = 100)]
    nodes: usize,

    /// Construction strategy: rgg, knn, or delaunay.
    #[arg(long, default_value = "delaunay")]
    algorithm: String,

    /// Neighbor count for the knn strategy.
    #[arg(long, default_value_t = 4)]
    k: usize,

    /// Master RNG seed.
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Fleet size.
    #[arg(long, default_value_t = 10)]
    vehicles: usize,

    /// Kinematic update interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    update_rate_ms: u64,

    /// How long to run before stopping, in seconds.
    #[arg(long, default_value_t = 5)]
    duration_secs: u64,
}

fn parse_algorithm(name: &str) -> Result<Algorithm> {
    match name {
        "rgg" => Ok(Algorithm::Rgg),
        "knn" => Ok(Algorithm::Knn),
        "delaunay" => Ok(Algorithm::Delaunay),
        other => bail!("unknown algorithm {other:?} (expected rgg, knn, or delaunay)"),
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // 1. Generate the road network.
    let mut map_config = MapGeneratorConfig::new(
        args.size,
        args.size,
        args.seed,
        parse_algorithm(&args.algorithm)?,
        args.nodes,
    );
    map_config.k = args.k;
    map_config.weight_variation = Some(WeightVariationConfig {
        use_distance_from_center: true,
        ..WeightVariationConfig::default()
    });
    let graph = map_config.generate().context("map generation failed")?;
    println!(
        "map: {} nodes, {} edges ({} algorithm, seed {})",
        graph.node_count(),
        graph.edge_count(),
        args.algorithm,
        args.seed
    );

    // 2. Build the engine with a bounded channel sink.
    let (sink, telemetry) = ChannelSink::bounded(256);
    let engine_config = EngineConfig {
        update_rate: Duration::from_millis(args.update_rate_ms),
        ..EngineConfig::default()
    };
    let engine = SimulationEngine::new(Arc::new(graph), engine_config, Arc::new(sink));

    // 3. Assign routes and register the fleet.
    let router = RoutingConfig::default().make_router();
    let spawn_config = SpawnConfig::default();
    let mut rng = SimRng::new(args.seed).child(1);

    for i in 0..args.vehicles {
        let mut vehicle = Vehicle::new(format!("vehicle-{i}"), VehicleType::Car);
        match assign_route(&mut vehicle, engine.graph(), &spawn_config, router.as_ref(), &mut rng) {
            Ok(()) => engine.add_vehicle(vehicle),
            Err(e) => warn!("vehicle-{i}: assignment failed ({e}); skipping"),
        }
    }
    println!("fleet: {} vehicle(s) registered", engine.vehicle_count());

    // 4. Run, draining telemetry as it arrives.
    engine.start();
    let deadline = Instant::now() + Duration::from_secs(args.duration_secs);
    let mut received = 0usize;
    while Instant::now() < deadline {
        match telemetry.recv_timeout(Duration::from_millis(200)) {
            Ok(sample) => {
                received += 1;
                println!("{}", serde_json::to_string(&sample)?);
            }
            Err(_) => {} // no sample this interval; keep waiting out the clock
        }
    }
    engine.stop();

    // 5. Summary.
    println!();
    println!("telemetry: {received} sample(s) received, {} dropped", engine.dropped_telemetry());
    println!("{:<14} {:<10} {:>9} {:<8}", "Vehicle", "Status", "Progress", "Edge");
    println!("{}", "-".repeat(46));
    for vehicle in engine.list_vehicles() {
        println!(
            "{:<14} {:<10} {:>8.1}% {:<8}",
            vehicle.id.to_string(),
            format!("{:?}", vehicle.state.status).to_lowercase(),
            vehicle.state.progress_on_edge.clamp(0.0, 1.0) * 100.0,
            vehicle
                .state
                .current_edge
                .map(|e| e.to_string())
                .unwrap_or_else(|| "-".to_string()),
        );
    }

    Ok(())
}
