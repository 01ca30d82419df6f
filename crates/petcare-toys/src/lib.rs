//! Toy lifecycle, interaction arbitration, and teardown.
//!
//! Each toy kind has at most one live instance, tracked by the
//! [`ToyRegistry`]. A toy lets any number of pets be attracted to it but
//! only one pet at a time hold its interaction slot. Once it has been left
//! alone for its minimum lifetime it ends, and the [`FadeOutCoordinator`]
//! tears it down.
//!
//! # Modules
//!
//! - [`arbiter`] -- Pure single-slot claim and release
//! - [`collaborators`] -- Traits for spatial queries, rewards, fades, and pets
//! - [`config`] -- Per-kind tunables ([`ToyConfig`])
//! - [`error`] -- Error types ([`ToyError`])
//! - [`lifecycle`] -- The per-toy state machine ([`ToyLifecycleController`])
//! - [`registry`] -- Singleton-per-kind ownership ([`ToyRegistry`])
//! - [`teardown`] -- Exactly-once teardown ([`FadeOutCoordinator`])

pub mod arbiter;
pub mod collaborators;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod teardown;

// Re-export primary types at crate root for convenience.
pub use arbiter::{ClaimRejected, release, try_claim};
pub use collaborators::{
    BlockingEntity, DestroyedToy, FadeCompletion, Fadeable, NoRewards, OpenFloor, PetNotifier,
    RewardCollaborator, SpatialOccupancyQuery,
};
pub use config::{ToyConfig, ToyConfigs};
pub use error::ToyError;
pub use lifecycle::{ToyEnding, ToyLifecycleController};
pub use registry::ToyRegistry;
pub use teardown::{FadeOutCoordinator, TeardownOutcome};
