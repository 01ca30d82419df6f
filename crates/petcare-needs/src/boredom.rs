//! Boredom: a timed debuff that keeps a pet away from toys.
//!
//! Boredom is tracked against the wall clock so that it keeps recovering
//! while the app is closed. There is no background timer: the flag is
//! cleared lazily by [`is_bored`] the first time it is read after the
//! recovery window has passed.

use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, warn};

use crate::pet::Pet;
use crate::probability::ProbabilityGenerator;

/// Mark a pet bored as of `now`, restarting any running recovery window.
pub fn set_bored(pet: &mut Pet, now: DateTime<Utc>) {
    pet.is_bored = true;
    pet.boredom_started_at = Some(now);
    debug!(pet_id = %pet.id, at = %now, "Pet became bored");
}

/// Whether the pet is still bored at `now`.
///
/// Clears the flag once `now - boredom_started_at >= recovery`. A bored
/// pet with no recorded start time cannot be evaluated and is treated as
/// recovered. A start time after `now`, e.g. from a save written before
/// the system clock was turned back, is pulled back to `now` so the full
/// window runs from here.
pub fn is_bored(pet: &mut Pet, now: DateTime<Utc>, recovery: TimeDelta) -> bool {
    if !pet.is_bored {
        return false;
    }

    let Some(started) = pet.boredom_started_at else {
        warn!(pet_id = %pet.id, "Bored pet has no boredom start time, clearing");
        clear(pet);
        return false;
    };

    if started > now {
        warn!(
            pet_id = %pet.id,
            started = %started,
            now = %now,
            "Boredom start is in the future, restarting window"
        );
        pet.boredom_started_at = Some(now);
        return true;
    }

    if now.signed_duration_since(started) >= recovery {
        debug!(pet_id = %pet.id, "Pet recovered from boredom");
        clear(pet);
        return false;
    }

    true
}

/// Roll whether a pet gets bored after finishing a play session.
///
/// Returns `true` when the pet became bored.
pub fn roll_boredom(
    pet: &mut Pet,
    now: DateTime<Utc>,
    chance: f64,
    rng: &mut dyn ProbabilityGenerator,
) -> bool {
    if rng.chance(chance) {
        set_bored(pet, now);
        true
    } else {
        false
    }
}

const fn clear(pet: &mut Pet) {
    pet.is_bored = false;
    pet.boredom_started_at = None;
}
