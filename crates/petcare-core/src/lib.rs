//! Clock, configuration, persistence, and the frame driver for the pet-care
//! simulation.
//!
//! This crate ties the needs model and the toy lifecycle together behind a
//! single [`Simulation`] that a host advances one frame at a time.
//!
//! # Modules
//!
//! - [`clock`] -- [`Clock`] trait with a real and a hand-driven
//!   implementation.
//! - [`collaborators`] -- The bundle of external systems the simulation
//!   calls into.
//! - [`config`] -- Configuration loading from `petcare-config.yaml` into
//!   strongly-typed structs.
//! - [`persistence`] -- [`PersistenceProvider`] trait plus in-memory and
//!   JSON file adapters.
//! - [`simulation`] -- The per-frame driver and gameplay entry points.
//!
//! [`Clock`]: clock::Clock
//! [`PersistenceProvider`]: persistence::PersistenceProvider
//! [`Simulation`]: simulation::Simulation

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod persistence;
pub mod simulation;

// Re-export primary types at crate root for convenience.
pub use clock::{Clock, ManualClock, SystemClock};
pub use collaborators::{AnimationSink, Collaborators, NoAnimation};
pub use config::{ConfigError, SimulationConfig};
pub use persistence::{
    InMemoryPersistence, JsonFilePersistence, PersistenceError, PersistenceProvider, SavedPet,
};
pub use simulation::{SimEvent, Simulation, TickSummary};
