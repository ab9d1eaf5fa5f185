use std::error::Error;

use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::{MAX_FILL_INCREMENT, TRUCK_ID};
use crate::config::SimulationConfig;
use crate::domain::types::Truck;
use crate::fixtures::data_generator::{demo_bins, demo_network, FillSource, RandomFill};
use crate::reporting::{bin_status_line, queue_lines, write_bin_status_csv};
use crate::routing::graph::RoadNetwork;
use crate::simulation::engine::Simulation;

fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE))
        .try_init();
}

fn load_network(config: &SimulationConfig) -> Result<RoadNetwork, Box<dyn Error>> {
    match &config.network_path {
        Some(path) => {
            info!("Loading road network from {}", path);
            RoadNetwork::load_json(path)
        }
        None => Ok(demo_network()?),
    }
}

fn print_status<F: FillSource>(sim: &Simulation<F>) {
    for bin in sim.bins().snapshots() {
        println!("{}", bin_status_line(&bin));
    }
    for line in queue_lines(&sim.queue().peek_all()) {
        println!("{}", line);
    }
}

/// Run a full simulation with settings taken from the environment.
pub fn run() -> Result<(), Box<dyn Error>> {
    init_tracing();
    let config = SimulationConfig::from_env()?;
    run_with(&config)
}

pub fn run_with(config: &SimulationConfig) -> Result<(), Box<dyn Error>> {
    let network = load_network(config)?;
    let bins = demo_bins(&network)?;
    let truck = Truck::new(TRUCK_ID, config.truck_capacity, config.depot)?;
    let fill = RandomFill::new(config.seed, MAX_FILL_INCREMENT);

    let mut sim = Simulation::new(
        network,
        bins,
        truck,
        config.depot,
        fill,
        config.dispatches_per_step,
    )?;

    info!(
        "Starting waste collection run: {} steps, {} bins",
        config.steps,
        sim.bins().len()
    );

    {
        let loop_span = span!(Level::INFO, "simulation_loop", total_steps = config.steps);
        let _loop_guard = loop_span.enter();

        for step in 1..=config.steps {
            println!("\n--- Step {} ---", step);
            sim.step()?;
            print_status(&sim);
        }
    }

    let log = sim.finish()?;
    log.write_json(&config.route_log_path)?;
    write_bin_status_csv(&sim.bins().snapshots(), &config.bin_status_path)?;

    println!(
        "\nSimulation complete. Total distance: {}",
        sim.truck().total_distance
    );
    println!("Routes exported to '{}'", config.route_log_path);
    Ok(())
}
