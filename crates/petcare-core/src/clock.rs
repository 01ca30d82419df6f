//! Time sources for the simulation.
//!
//! Two kinds of "now" are needed:
//!
//! - **Monotonic seconds** drive per-frame deltas and toy lifetimes. They
//!   never go backwards and mean nothing across restarts.
//! - **Wall-clock time** drives boredom recovery and offline catch-up,
//!   because it keeps moving while the app is closed.
//!
//! Wall-clock time is authoritative for boredom. Nothing stores a
//! frame-relative boredom timestamp.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{DateTime, TimeDelta, Utc};

/// A source of monotonic and wall-clock time.
pub trait Clock {
    /// Seconds since an arbitrary fixed origin. Never decreases.
    fn monotonic_seconds(&self) -> f64;

    /// The current wall-clock time.
    fn wall_clock_now(&self) -> DateTime<Utc>;
}

/// The real clocks of the host machine.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock whose monotonic origin is now.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn monotonic_seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    fn wall_clock_now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Debug)]
struct ManualState {
    monotonic: Duration,
    wall: DateTime<Utc>,
}

/// A hand-driven clock for tests and scripted runs.
///
/// Clones share the same time, so a test can keep a handle while the
/// simulation owns another.
#[derive(Debug, Clone)]
pub struct ManualClock {
    state: Arc<Mutex<ManualState>>,
}

impl ManualClock {
    /// Start at monotonic zero and the given wall-clock time.
    pub fn new(wall: DateTime<Utc>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ManualState {
                monotonic: Duration::ZERO,
                wall,
            })),
        }
    }

    /// Move both clocks forward by `seconds`. Negative, non-finite, or
    /// out-of-range values are ignored.
    ///
    /// Time is kept in whole nanoseconds, so many small steps add up to
    /// exactly their sum.
    pub fn advance(&self, seconds: f64) {
        let Ok(step) = Duration::try_from_secs_f64(seconds) else {
            return;
        };
        let Ok(wall_step) = TimeDelta::from_std(step) else {
            return;
        };
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.monotonic = state.monotonic.saturating_add(step);
        state.wall = state.wall.checked_add_signed(wall_step).unwrap_or(state.wall);
    }

    /// Move only the wall clock, as if the app had been closed.
    pub fn advance_wall(&self, by: TimeDelta) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.wall = state.wall.checked_add_signed(by).unwrap_or(state.wall);
    }

    /// Jump the wall clock to `now`.
    pub fn set_wall(&self, now: DateTime<Utc>) {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        state.wall = now;
    }
}

impl Clock for ManualClock {
    fn monotonic_seconds(&self) -> f64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .monotonic
            .as_secs_f64()
    }

    fn wall_clock_now(&self) -> DateTime<Utc> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).wall
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances_both_sources() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.advance(2.5);
        assert!((clock.monotonic_seconds() - 2.5).abs() < 1e-9);
        assert_eq!(clock.wall_clock_now().signed_duration_since(start).num_milliseconds(), 2_500);
    }

    #[test]
    fn advance_wall_leaves_monotonic_alone() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        clock.advance_wall(TimeDelta::hours(8));
        assert!(clock.monotonic_seconds().abs() < f64::EPSILON);
        assert_eq!(clock.wall_clock_now().signed_duration_since(start).num_hours(), 8);
    }

    #[test]
    fn clones_share_time() {
        let clock = ManualClock::new(Utc::now());
        let handle = clock.clone();
        handle.advance(1.0);
        assert!((clock.monotonic_seconds() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_advance_is_ignored() {
        let clock = ManualClock::new(Utc::now());
        clock.advance(-4.0);
        clock.advance(f64::INFINITY);
        assert!(clock.monotonic_seconds().abs() < f64::EPSILON);
    }

    #[test]
    fn many_small_steps_add_up_exactly() {
        let start = Utc::now();
        let clock = ManualClock::new(start);
        for _ in 0..100 {
            clock.advance(0.1);
        }
        assert!((clock.monotonic_seconds() - 10.0).abs() < f64::EPSILON);
        assert!(clock.monotonic_seconds() >= 10.0);
        assert_eq!(clock.wall_clock_now().signed_duration_since(start).num_milliseconds(), 10_000);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.monotonic_seconds();
        let b = clock.monotonic_seconds();
        assert!(b >= a);
    }
}
