//! Headless engine for the pet-care simulation.
//!
//! Runs the simulation against the real clocks with a scripted host in
//! place of the player, then saves the pets on the way out.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `petcare-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Build the simulation with logging collaborators
//! 4. Restore saved pets and catch them up on the time away. An
//!    unreadable save is set aside and the run starts with no pets
//! 5. Run frames until interrupted or `max_frames` is reached
//! 6. Save every pet

mod error;
mod host;
mod logging;
mod restore;

use std::path::Path;
use std::time::Duration;

use petcare_core::{
    JsonFilePersistence, SimEvent, Simulation, SimulationConfig, SystemClock, TickSummary,
};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::host::ScriptedHost;

/// Config file looked up in the working directory.
const CONFIG_PATH: &str = "petcare-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if the config cannot be parsed, the save file cannot
/// be read or written, or the shutdown signal cannot be installed. A save
/// file that is readable but not valid JSON is not an error.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config);
    info!(
        frame_interval_ms = config.simulation.frame_interval_ms,
        seed = config.simulation.seed,
        save_path = %config.simulation.save_path,
        max_frames = ?config.simulation.max_frames,
        "petcare-engine starting"
    );

    // 3. Build the simulation.
    let mut sim = Simulation::from_config(
        SystemClock::new(),
        &config,
        logging::logging_collaborators(),
    );

    // 4. Restore saved pets.
    let mut store = JsonFilePersistence::new(&config.simulation.save_path);
    let restored = restore::restore_pets(&mut sim, &mut store)?;
    debug!(restored, "Restore finished");
    ScriptedHost::ensure_pets(&mut sim);

    // 5. Run frames.
    let mut host = ScriptedHost::new(
        config.simulation.seed.wrapping_add(1),
        config.needs.feed_amount,
    );
    let mut pacer = tokio::time::interval(Duration::from_millis(
        config.simulation.frame_interval_ms.max(1),
    ));
    pacer.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    let end_reason = loop {
        tokio::select! {
            signal = &mut shutdown => {
                signal?;
                break "interrupted";
            }
            _ = pacer.tick() => {
                host.act(&mut sim);
                let summary = sim.run_tick();
                log_summary(&summary);
                if config
                    .simulation
                    .max_frames
                    .is_some_and(|max| summary.frame >= max)
                {
                    break "max_frames";
                }
            }
        }
    };

    // 6. Save.
    let saved = sim.save_to(&mut store)?;
    info!(
        end_reason,
        frames = sim.frame(),
        pets_saved = saved,
        "petcare-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `petcare-config.yaml`, or defaults if absent.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new(CONFIG_PATH);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        // Logging is not up yet; env overrides still apply to defaults.
        Ok(SimulationConfig::parse("{}")?)
    }
}

/// `RUST_LOG` wins over the configured level.
fn init_tracing(config: &SimulationConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    if config.logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

fn log_summary(summary: &TickSummary) {
    for event in &summary.events {
        match event {
            SimEvent::ResourcesChanged {
                pet_id,
                energy_delta,
                satiety_delta,
            } => debug!(pet_id = %pet_id, energy_delta, satiety_delta, "Needs changed"),
            SimEvent::PetBored { pet_id, kind } => {
                info!(pet_id = %pet_id, kind = %kind, "Pet got bored");
            }
            SimEvent::BoredomCleared { pet_id } => {
                info!(pet_id = %pet_id, "Pet is ready to play again");
            }
            SimEvent::PetIdled { pet_id, from } => {
                debug!(pet_id = %pet_id, ?from, "Pet sent back to idle");
            }
            SimEvent::ToyEnded(ending) => info!(
                toy_id = %ending.toy_id,
                kind = %ending.kind,
                ended_without_interaction = ending.ended_without_interaction,
                "Toy ended"
            ),
            SimEvent::ToyDestroyed(destroyed) => {
                debug!(toy_id = %destroyed.toy_id, kind = %destroyed.kind, "Toy destroyed");
            }
        }
    }
}
