//! Shared type definitions for the pet-care simulation.
//!
//! Every crate in the workspace speaks in these types. The status structs
//! flow downstream to `TypeScript` via `ts-rs` for the host UI.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for pets and toys
//! - [`enums`] -- Toy kinds, toy lifecycle phases, pet activity states
//! - [`structs`] -- Positions and read-only status snapshots

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{InteractionState, LifecycleState, ToyKind};
pub use ids::{PetId, ToyId};
pub use structs::{PetStatus, Position, ToyStatusInfo};
