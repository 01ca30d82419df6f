//! Error types for the petcare-needs crate.
//!
//! Operations that can fail return typed errors rather than panicking.
//! The frame driver downgrades most of these to a logged, skipped update.

use petcare_types::{InteractionState, PetId};

/// Errors that can occur during pet state operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PetError {
    /// Pet with the given ID is not in the roster.
    #[error("pet not found: {0}")]
    PetNotFound(PetId),

    /// A pet with this ID is already in the roster.
    #[error("duplicate pet: {0}")]
    DuplicatePet(PetId),

    /// The requested activity change is not in the transition table.
    #[error("pet {pet_id} cannot go from {from:?} to {to:?}")]
    InvalidTransition {
        /// The pet whose state was being changed.
        pet_id: PetId,
        /// The state the pet is in.
        from: InteractionState,
        /// The state that was requested.
        to: InteractionState,
    },
}
