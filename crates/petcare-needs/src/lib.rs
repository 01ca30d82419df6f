//! Pet needs, boredom, and activity for the pet-care simulation.
//!
//! This crate holds everything that operates on a single pet without
//! touching toys or I/O. It sits between `petcare-types` (the data
//! shapes) and `petcare-core` (which drives pets every frame).
//!
//! # Modules
//!
//! - [`activity`] -- The activity transition table
//! - [`boredom`] -- Wall-clock boredom with lazy recovery
//! - [`config`] -- Tunable decay rates ([`NeedsConfig`])
//! - [`error`] -- Error types ([`PetError`])
//! - [`offline`] -- Bulk catch-up over the time the app was closed
//! - [`pet`] -- The [`Pet`] record
//! - [`probability`] -- Injectable randomness for gameplay rolls
//! - [`resource_clock`] -- Per-frame energy and satiety accumulators
//! - [`roster`] -- The set of live pets ([`PetRoster`])

pub mod activity;
pub mod boredom;
pub mod config;
pub mod error;
pub mod offline;
pub mod pet;
pub mod probability;
pub mod resource_clock;
pub mod roster;

// Re-export primary types at crate root for convenience.
pub use config::{NeedsConfig, ResourceRate, STAT_MAX};
pub use error::PetError;
pub use offline::{CatchUpReport, format_timestamp, parse_timestamp};
pub use pet::{Pet, PetRestore};
pub use probability::{FixedProbability, ProbabilityGenerator, RandProbability};
pub use resource_clock::ResourceTick;
pub use roster::PetRoster;
