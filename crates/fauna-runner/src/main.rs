//! Command-line runner for the Fauna predator-prey simulation.
//!
//! Usage: `fauna-runner [config.json]`

mod telemetry;

use anyhow::{Context, Result};
use fauna_core::{RunnerConfig, Species};
use fauna_world::{Simulator, TextView};
use std::io::Stdout;
use tracing::info;

fn load_config() -> Result<RunnerConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            RunnerConfig::from_path(&path).with_context(|| format!("loading config {}", path))
        }
        None => Ok(RunnerConfig::default()),
    }
}

fn main() -> Result<()> {
    // Load configuration
    let config = load_config()?;

    telemetry::init_telemetry(&config.log_filter)?;

    info!(
        depth = config.simulation.depth,
        width = config.simulation.width,
        seed = ?config.simulation.seed,
        "Starting Fauna simulation"
    );

    let view = TextView::new(std::io::stdout(), config.render_every);
    let mut sim: Simulator<TextView<Stdout>> =
        Simulator::from_config(config.simulation.clone(), view)?;

    let taken = match config.steps {
        Some(steps) => sim.simulate(steps),
        None => sim.run_long_simulation(),
    };

    info!(
        steps = taken,
        rabbits = sim.count(Species::Rabbit),
        foxes = sim.count(Species::Fox),
        "Simulation finished"
    );

    if let Ok(summary) = serde_json::to_string(&sim.observer().stats().latest()) {
        info!(final_counts = %summary, "Final population");
    }

    Ok(())
}
