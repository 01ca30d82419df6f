//! The pet record mutated by every needs mechanic.
//!
//! Fields are crate-private: energy and satiety only change through the
//! clamping helpers in [`resource_clock`], and the activity only changes
//! through the transition table in [`activity`]. Outside this crate a
//! [`Pet`] is read through its accessors.
//!
//! [`resource_clock`]: crate::resource_clock
//! [`activity`]: crate::activity

use chrono::{DateTime, Utc};
use petcare_types::{InteractionState, PetId, PetStatus};

use crate::config::{NeedsConfig, STAT_MAX};

/// Values needed to rebuild a pet from a save.
///
/// Out-of-range resources are clamped on restore. Timestamps have already
/// been parsed; `None` means missing or unreadable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetRestore {
    /// The pet's persistent identifier.
    pub id: PetId,
    /// Display name.
    pub name: String,
    /// Saved energy.
    pub energy: u32,
    /// Saved satiety.
    pub satiety: u32,
    /// Whether the pet was bored when saved.
    pub is_bored: bool,
    /// When the saved boredom started.
    pub boredom_started_at: Option<DateTime<Utc>>,
    /// When resources were last reconciled.
    pub last_resource_sync_at: Option<DateTime<Utc>>,
}

/// A single simulated pet.
#[derive(Debug, Clone, PartialEq)]
pub struct Pet {
    pub(crate) id: PetId,
    pub(crate) name: String,
    pub(crate) energy: u32,
    pub(crate) satiety: u32,
    pub(crate) is_bored: bool,
    pub(crate) boredom_started_at: Option<DateTime<Utc>>,
    pub(crate) interaction_state: InteractionState,
    pub(crate) last_resource_sync_at: Option<DateTime<Utc>>,
    /// Seconds accumulated toward the next energy step. Never persisted.
    pub(crate) energy_accumulator: f64,
    /// Seconds accumulated toward the next satiety step. Never persisted.
    pub(crate) satiety_accumulator: f64,
}

impl Pet {
    /// Create a freshly adopted pet with starting needs from `config`.
    pub fn adopt(name: String, config: &NeedsConfig, now: DateTime<Utc>) -> Self {
        Self {
            id: PetId::new(),
            name,
            energy: config.starting_energy.min(STAT_MAX),
            satiety: config.starting_satiety.min(STAT_MAX),
            is_bored: false,
            boredom_started_at: None,
            interaction_state: InteractionState::Idle,
            last_resource_sync_at: Some(now),
            energy_accumulator: 0.0,
            satiety_accumulator: 0.0,
        }
    }

    /// Rebuild a pet from saved values. The pet always wakes up idle.
    pub fn restore(saved: PetRestore) -> Self {
        Self {
            id: saved.id,
            name: saved.name,
            energy: saved.energy.min(STAT_MAX),
            satiety: saved.satiety.min(STAT_MAX),
            is_bored: saved.is_bored,
            boredom_started_at: saved.boredom_started_at,
            interaction_state: InteractionState::Idle,
            last_resource_sync_at: saved.last_resource_sync_at,
            energy_accumulator: 0.0,
            satiety_accumulator: 0.0,
        }
    }

    /// The pet's identifier.
    pub const fn id(&self) -> PetId {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Energy, 0--100.
    pub const fn energy(&self) -> u32 {
        self.energy
    }

    /// Satiety, 0--100.
    pub const fn satiety(&self) -> u32 {
        self.satiety
    }

    /// Raw boredom flag, without lazy expiry.
    ///
    /// Use [`boredom::is_bored`](crate::boredom::is_bored) when the answer
    /// should account for the recovery window.
    pub const fn is_bored_flag(&self) -> bool {
        self.is_bored
    }

    /// When the current boredom started.
    pub const fn boredom_started_at(&self) -> Option<DateTime<Utc>> {
        self.boredom_started_at
    }

    /// Current activity.
    pub const fn interaction_state(&self) -> InteractionState {
        self.interaction_state
    }

    /// When resources were last reconciled against the wall clock.
    pub const fn last_resource_sync_at(&self) -> Option<DateTime<Utc>> {
        self.last_resource_sync_at
    }

    /// Record that resources are reconciled up to `now`.
    pub const fn mark_synced(&mut self, now: DateTime<Utc>) {
        self.last_resource_sync_at = Some(now);
    }

    /// Snapshot for the status panel.
    pub fn status(&self, config: &NeedsConfig) -> PetStatus {
        let bored_until = if self.is_bored {
            self.boredom_started_at
                .and_then(|started| started.checked_add_signed(config.boredom_recovery()))
        } else {
            None
        };
        PetStatus {
            pet_id: self.id,
            name: self.name.clone(),
            energy: self.energy,
            satiety: self.satiety,
            interaction_state: self.interaction_state,
            is_bored: self.is_bored,
            bored_until,
        }
    }
}
