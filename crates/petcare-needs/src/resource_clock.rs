//! Per-frame decay and recovery of pet resources.
//!
//! Each resource owns a fractional accumulator measured in seconds. A frame
//! adds its delta to every accumulator; whenever an accumulator reaches its
//! interval, the resource moves by `step` once per whole interval and the
//! accumulator keeps the remainder. Resetting to zero instead would drift
//! by up to one frame per step.
//!
//! Energy uses the sleeping rate while the pet is
//! [`InteractionState::Sleeping`] and the awake rate otherwise. Satiety has a
//! single rate. Both stats are clamped to `0..=100` after every adjustment.

use petcare_types::InteractionState;

use crate::config::{NeedsConfig, ResourceRate, STAT_MAX};
use crate::pet::Pet;

/// Net change applied to a pet by one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceTick {
    /// Change in energy after clamping.
    pub energy_delta: i64,
    /// Change in satiety after clamping.
    pub satiety_delta: i64,
}

impl ResourceTick {
    /// Whether the frame changed anything visible.
    pub const fn is_noop(&self) -> bool {
        self.energy_delta == 0 && self.satiety_delta == 0
    }
}

/// Advance a pet's resource accumulators by `delta_seconds`.
///
/// Negative and non-finite deltas are ignored.
pub fn tick(pet: &mut Pet, delta_seconds: f64, config: &NeedsConfig) -> ResourceTick {
    if !delta_seconds.is_finite() || delta_seconds <= 0.0 {
        return ResourceTick::default();
    }

    let sleeping = pet.interaction_state == InteractionState::Sleeping;
    let energy_rate = config.energy_rate(sleeping);

    pet.energy_accumulator += delta_seconds;
    let energy_steps = drain_accumulator(&mut pet.energy_accumulator, energy_rate);
    let before_energy = pet.energy;
    pet.energy = apply_steps(pet.energy, energy_steps, energy_rate.step);

    pet.satiety_accumulator += delta_seconds;
    let satiety_steps = drain_accumulator(&mut pet.satiety_accumulator, config.satiety);
    let before_satiety = pet.satiety;
    pet.satiety = apply_steps(pet.satiety, satiety_steps, config.satiety.step);

    ResourceTick {
        energy_delta: i64::from(pet.energy).saturating_sub(i64::from(before_energy)),
        satiety_delta: i64::from(pet.satiety).saturating_sub(i64::from(before_satiety)),
    }
}

/// Raise satiety by `amount`, clamped to the stat range.
pub fn feed(pet: &mut Pet, amount: u32) -> u32 {
    pet.satiety = clamp_stat(i64::from(pet.satiety).saturating_add(i64::from(amount)));
    pet.satiety
}

/// Shift energy by a signed amount, clamped to the stat range.
pub fn apply_energy_delta(pet: &mut Pet, delta: i64) -> u32 {
    pet.energy = clamp_stat(i64::from(pet.energy).saturating_add(delta));
    pet.energy
}

/// Apply `steps * step` to a stat value and clamp the result.
pub(crate) fn apply_steps(value: u32, steps: u64, step: i32) -> u32 {
    let steps = i64::try_from(steps).unwrap_or(i64::MAX);
    let delta = steps.saturating_mul(i64::from(step));
    clamp_stat(i64::from(value).saturating_add(delta))
}

/// Clamp a widened stat back into `0..=100`.
pub(crate) fn clamp_stat(value: i64) -> u32 {
    let clamped = value.clamp(0, i64::from(STAT_MAX));
    u32::try_from(clamped).unwrap_or(0)
}

/// Consume every whole interval from `accumulator`, returning how many.
///
/// A disabled rate clears the accumulator so that re-enabling it later does
/// not release a burst of stored steps.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn drain_accumulator(accumulator: &mut f64, rate: ResourceRate) -> u64 {
    if !rate.is_enabled() {
        *accumulator = 0.0;
        return 0;
    }
    if *accumulator < rate.interval_secs {
        return 0;
    }

    let whole = (*accumulator / rate.interval_secs).floor();
    *accumulator -= whole * rate.interval_secs;
    if *accumulator < 0.0 {
        *accumulator = 0.0;
    }
    // `whole` is finite and non-negative here; `as` saturates above u64::MAX.
    whole as u64
}
