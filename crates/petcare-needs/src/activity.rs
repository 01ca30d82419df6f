//! The pet activity transition table.
//!
//! A pet is in exactly one [`InteractionState`]. Moves between states are
//! checked against a fixed table instead of toggling independent flags:
//!
//! | From                          | Allowed targets                                  |
//! |-------------------------------|--------------------------------------------------|
//! | `Idle`                        | anything                                         |
//! | `Attracted(k)`                | `Idle`, `Interacting(k)`, another `Attracted`, `Eating`, `Sleeping`, `Patting` |
//! | `Interacting(k)`              | `Idle`                                           |
//! | `Eating`, `Sleeping`, `Patting` | `Idle`                                         |
//!
//! Staying in the same state is always allowed and changes nothing. A pet
//! can only start interacting with the toy it was attracted to (or straight
//! from `Idle`). Leaving a toy is the caller's job: the simulation detaches
//! the pet from the toy controller before moving it elsewhere.

use petcare_types::InteractionState;
use tracing::debug;

use crate::error::PetError;
use crate::pet::Pet;

/// Whether the table allows moving from `from` to `to`.
pub fn can_transition(from: InteractionState, to: InteractionState) -> bool {
    use InteractionState::{Attracted, Eating, Idle, Interacting, Patting, Sleeping};

    match (from, to) {
        (Idle, _) | (_, Idle) | (Attracted(_), Attracted(_) | Eating | Sleeping | Patting) => true,
        (Attracted(attracted), Interacting(target)) => attracted == target,
        _ => from == to,
    }
}

/// Move a pet to `to`, returning the state it left.
///
/// # Errors
///
/// Returns [`PetError::InvalidTransition`] when the table forbids the move.
/// The pet is left untouched in that case.
pub fn transition(pet: &mut Pet, to: InteractionState) -> Result<InteractionState, PetError> {
    let from = pet.interaction_state;
    if from == to {
        return Ok(from);
    }
    if !can_transition(from, to) {
        return Err(PetError::InvalidTransition {
            pet_id: pet.id,
            from,
            to,
        });
    }
    pet.interaction_state = to;
    debug!(pet_id = %pet.id, ?from, ?to, "Pet activity changed");
    Ok(from)
}

/// Return a pet to `Idle` unconditionally, returning the state it left.
///
/// Used when a toy is torn down underneath its occupants.
pub fn force_idle(pet: &mut Pet) -> InteractionState {
    let from = pet.interaction_state;
    pet.interaction_state = InteractionState::Idle;
    if !from.is_idle() {
        debug!(pet_id = %pet.id, ?from, "Pet forced idle");
    }
    from
}
