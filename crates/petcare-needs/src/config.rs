//! Tunable rates for pet needs.
//!
//! The [`NeedsConfig`] struct bundles every tunable so that callers (the
//! frame driver, offline catch-up, tests) can override defaults. The core
//! crate builds it from the `needs` section of `petcare-config.yaml`.

use chrono::TimeDelta;

/// Upper bound of the energy and satiety stats.
pub const STAT_MAX: u32 = 100;

/// A periodic change to one resource.
///
/// Every `interval_secs` of accumulated time the resource moves by `step`.
/// A non-positive interval disables the clock for that resource.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResourceRate {
    /// Seconds of accumulated time per application of `step`.
    pub interval_secs: f64,
    /// Signed change applied once per elapsed interval.
    pub step: i32,
}

impl ResourceRate {
    /// Create a rate from its interval and step.
    pub const fn new(interval_secs: f64, step: i32) -> Self {
        Self {
            interval_secs,
            step,
        }
    }

    /// Whether this rate can ever fire.
    pub fn is_enabled(&self) -> bool {
        self.interval_secs.is_finite() && self.interval_secs > 0.0 && self.step != 0
    }
}

/// Configuration for pet needs applied every frame.
#[derive(Debug, Clone, PartialEq)]
pub struct NeedsConfig {
    /// Energy change while awake (default: -1 every 60s).
    pub energy_awake: ResourceRate,

    /// Energy change while sleeping (default: +1 every 60s).
    pub energy_sleeping: ResourceRate,

    /// Satiety change, regardless of activity (default: -1 every 45s).
    pub satiety: ResourceRate,

    /// Seconds a bored pet needs before it will play again (default: 300).
    pub boredom_recovery_secs: u64,

    /// Energy of a newly adopted pet (default: 100).
    pub starting_energy: u32,

    /// Satiety of a newly adopted pet (default: 100).
    pub starting_satiety: u32,
}

impl Default for NeedsConfig {
    fn default() -> Self {
        Self {
            energy_awake: ResourceRate::new(60.0, -1),
            energy_sleeping: ResourceRate::new(60.0, 1),
            satiety: ResourceRate::new(45.0, -1),
            boredom_recovery_secs: 300,
            starting_energy: STAT_MAX,
            starting_satiety: STAT_MAX,
        }
    }
}

impl NeedsConfig {
    /// The boredom recovery window as a [`TimeDelta`].
    ///
    /// Saturates at the largest representable delta.
    pub fn boredom_recovery(&self) -> TimeDelta {
        i64::try_from(self.boredom_recovery_secs)
            .ok()
            .and_then(TimeDelta::try_seconds)
            .unwrap_or(TimeDelta::MAX)
    }

    /// The energy rate that applies for the given sleeping state.
    pub const fn energy_rate(&self, sleeping: bool) -> ResourceRate {
        if sleeping {
            self.energy_sleeping
        } else {
            self.energy_awake
        }
    }
}
