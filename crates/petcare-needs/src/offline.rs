//! Offline catch-up: one bulk reconciliation at load time.
//!
//! While the app is closed nothing ticks. On load, the wall-clock gap since
//! `last_resource_sync_at` is converted into whole decay steps using the same
//! rates the per-frame clock uses. The pet is always assumed to have been
//! awake for the entire gap, whatever it was doing when the app closed.
//!
//! The caller owns idempotence: after applying a gap it must move
//! `last_resource_sync_at` to `now` (see [`PetRoster::catch_up`]).
//! Nothing here ever fails; an unknown or backwards gap counts as zero.
//!
//! [`PetRoster::catch_up`]: crate::roster::PetRoster::catch_up

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::{debug, warn};

use crate::boredom;
use crate::config::{NeedsConfig, ResourceRate};
use crate::pet::Pet;
use crate::resource_clock;

/// Naive timestamp layouts accepted from older saves, read as UTC.
const LEGACY_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y/%m/%d %H:%M:%S"];

/// What an offline catch-up changed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CatchUpReport {
    /// Offline seconds that were reconciled (0 when unknown or negative).
    pub elapsed_seconds: f64,
    /// Energy change after clamping.
    pub energy_delta: i64,
    /// Satiety change after clamping.
    pub satiety_delta: i64,
    /// Whether boredom wore off during the gap.
    pub boredom_cleared: bool,
}

/// Apply the wall-clock gap between `last_synced_at` and `now` to a pet.
///
/// Does not touch `last_resource_sync_at`.
pub fn apply_elapsed(
    pet: &mut Pet,
    last_synced_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    config: &NeedsConfig,
) -> CatchUpReport {
    let elapsed_seconds = elapsed_seconds(last_synced_at, now);

    let before_energy = pet.energy;
    let before_satiety = pet.satiety;

    // Offline decay always uses the awake rate.
    pet.energy = resource_clock::apply_steps(
        pet.energy,
        whole_intervals(elapsed_seconds, config.energy_awake),
        config.energy_awake.step,
    );
    pet.satiety = resource_clock::apply_steps(
        pet.satiety,
        whole_intervals(elapsed_seconds, config.satiety),
        config.satiety.step,
    );

    let was_bored = pet.is_bored;
    let still_bored = boredom::is_bored(pet, now, config.boredom_recovery());

    let report = CatchUpReport {
        elapsed_seconds,
        energy_delta: i64::from(pet.energy).saturating_sub(i64::from(before_energy)),
        satiety_delta: i64::from(pet.satiety).saturating_sub(i64::from(before_satiety)),
        boredom_cleared: was_bored && !still_bored,
    };
    debug!(
        pet_id = %pet.id,
        elapsed_seconds,
        energy_delta = report.energy_delta,
        satiety_delta = report.satiety_delta,
        boredom_cleared = report.boredom_cleared,
        "Offline catch-up applied"
    );
    report
}

/// Parse a persisted wall-clock string.
///
/// Accepts RFC 3339 and the legacy naive layouts. Returns `None` for
/// anything else so that a bad save never blocks loading.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in LEGACY_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(naive.and_utc());
        }
    }
    warn!(raw = trimmed, "Unparseable persisted timestamp, treating as missing");
    None
}

/// Format a timestamp the way [`parse_timestamp`] reads it back.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

/// Seconds between `since` and `now`, or 0 if unknown or negative.
#[allow(clippy::cast_precision_loss)]
fn elapsed_seconds(since: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    let Some(since) = since else {
        return 0.0;
    };
    let gap = now.signed_duration_since(since);
    // Millisecond precision is plenty for intervals measured in seconds.
    let millis = gap.num_milliseconds();
    if millis <= 0 {
        return 0.0;
    }
    millis as f64 / 1000.0
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_intervals(elapsed_seconds: f64, rate: ResourceRate) -> u64 {
    if !rate.is_enabled() || elapsed_seconds <= 0.0 {
        return 0;
    }
    (elapsed_seconds / rate.interval_secs).floor() as u64
}
