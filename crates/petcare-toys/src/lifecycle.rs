//! The per-toy state machine.
//!
//! A [`ToyLifecycleController`] tracks one placed toy through
//! `Spawned -> Active -> Ending`. `Spawned -> Active` happens inside
//! construction, so callers only ever see `Active` or `Ending`.
//!
//! A toy ends once nobody is attracted, nobody holds the interaction slot,
//! and its minimum lifetime has passed. The condition is checked on every
//! [`tick`](ToyLifecycleController::tick) and also right after a pet lets
//! go, so a toy can end in the same call that frees it. `Ending` is
//! terminal: every later event is ignored.
//!
//! Time is the monotonic clock in seconds, passed in by the caller.

use std::collections::BTreeSet;

use petcare_types::{LifecycleState, PetId, Position, ToyId, ToyKind, ToyStatusInfo};
use tracing::{debug, info};

use crate::arbiter;

/// Emitted exactly once, when a toy moves to `Ending`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToyEnding {
    /// The toy that ended.
    pub toy_id: ToyId,
    /// Its kind.
    pub kind: ToyKind,
    /// True when no pet ever held the interaction slot.
    pub ended_without_interaction: bool,
    /// Pets still attached to the toy when it ended.
    pub occupants: Vec<PetId>,
}

/// State machine for one placed toy.
#[derive(Debug, Clone, PartialEq)]
pub struct ToyLifecycleController {
    id: ToyId,
    kind: ToyKind,
    state: LifecycleState,
    attracted: BTreeSet<PetId>,
    /// Mutated only through [`arbiter::try_claim`] and [`arbiter::release`].
    interacting: Option<PetId>,
    has_had_interaction: bool,
    spawned_at: f64,
    min_lifetime: f64,
}

impl ToyLifecycleController {
    /// Build an active toy. Only the registry constructs toys.
    pub(crate) fn spawn(kind: ToyKind, position: Position, min_lifetime: f64, now: f64) -> Self {
        let mut toy = Self {
            id: ToyId::new(),
            kind,
            state: LifecycleState::Spawned,
            attracted: BTreeSet::new(),
            interacting: None,
            has_had_interaction: false,
            spawned_at: now,
            min_lifetime: if min_lifetime.is_finite() { min_lifetime.max(0.0) } else { 0.0 },
        };
        toy.state = LifecycleState::Active;
        info!(
            toy_id = %toy.id,
            kind = %kind,
            x = position.x,
            y = position.y,
            min_lifetime = toy.min_lifetime,
            "Toy spawned"
        );
        toy
    }

    /// The toy's id.
    pub const fn id(&self) -> ToyId {
        self.id
    }

    /// The toy's kind.
    pub const fn kind(&self) -> ToyKind {
        self.kind
    }

    /// Current lifecycle phase.
    pub const fn state(&self) -> LifecycleState {
        self.state
    }

    /// The pet holding the interaction slot, if any.
    pub const fn holder(&self) -> Option<PetId> {
        self.interacting
    }

    /// Whether any pet has ever held the slot.
    pub const fn has_had_interaction(&self) -> bool {
        self.has_had_interaction
    }

    /// Whether `pet` is attracted but not yet playing.
    pub fn is_attracted(&self, pet: PetId) -> bool {
        self.attracted.contains(&pet)
    }

    /// Whether `pet` is attracted to or playing with this toy.
    pub fn involves(&self, pet: PetId) -> bool {
        self.interacting == Some(pet) || self.attracted.contains(&pet)
    }

    /// Seconds since spawn, never negative.
    pub fn elapsed(&self, now: f64) -> f64 {
        let elapsed = now - self.spawned_at;
        if elapsed.is_finite() { elapsed.max(0.0) } else { 0.0 }
    }

    /// Seconds of minimum lifetime left, never negative.
    pub fn remaining(&self, now: f64) -> f64 {
        (self.min_lifetime - self.elapsed(now)).max(0.0)
    }

    /// A pet noticed the toy.
    ///
    /// Returns `true` when the pet was newly added. Ignored once the toy is
    /// ending or when the pet already holds the slot.
    pub fn on_pet_attracted(&mut self, pet: PetId) -> bool {
        if self.state != LifecycleState::Active || self.interacting == Some(pet) {
            return false;
        }
        let added = self.attracted.insert(pet);
        if added {
            debug!(toy_id = %self.id, pet_id = %pet, "Pet attracted to toy");
        }
        added
    }

    /// A pet tries to take the interaction slot.
    ///
    /// Returns `false`, with nothing changed, when another pet holds the
    /// slot or the toy is ending.
    pub fn on_pet_start_interaction(&mut self, pet: PetId) -> bool {
        if self.state != LifecycleState::Active {
            return false;
        }
        match arbiter::try_claim(self.interacting, pet) {
            Ok(holder) => {
                self.interacting = holder;
                self.attracted.remove(&pet);
                self.has_had_interaction = true;
                debug!(toy_id = %self.id, pet_id = %pet, "Pet started interaction");
                true
            }
            Err(rejected) => {
                debug!(
                    toy_id = %self.id,
                    pet_id = %pet,
                    holder = %rejected.holder,
                    "Interaction claim rejected"
                );
                false
            }
        }
    }

    /// A pet finished playing.
    ///
    /// Frees the slot if the pet held it, drops the pet from the attracted
    /// set, and ends the toy immediately if nothing else keeps it alive.
    pub fn on_pet_end_interaction(&mut self, pet: PetId, now: f64) -> Option<ToyEnding> {
        self.interacting = arbiter::release(self.interacting, pet);
        self.attracted.remove(&pet);
        self.check_ending(now)
    }

    /// An attracted pet wandered off without playing.
    pub fn on_pet_lost_interest(&mut self, pet: PetId, now: f64) -> Option<ToyEnding> {
        if self.attracted.remove(&pet) {
            debug!(toy_id = %self.id, pet_id = %pet, "Pet lost interest in toy");
        }
        self.check_ending(now)
    }

    /// Per-frame update.
    pub fn tick(&mut self, now: f64) -> Option<ToyEnding> {
        self.check_ending(now)
    }

    /// Snapshot for the UI.
    pub fn status(&self, now: f64) -> ToyStatusInfo {
        ToyStatusInfo {
            toy_id: self.id,
            kind: self.kind,
            lifecycle_state: self.state,
            attracted_count: u32::try_from(self.attracted.len()).unwrap_or(u32::MAX),
            interacting_count: u32::from(self.interacting.is_some()),
            remaining_seconds: self.remaining(now),
        }
    }

    fn check_ending(&mut self, now: f64) -> Option<ToyEnding> {
        if self.state != LifecycleState::Active
            || !self.attracted.is_empty()
            || self.interacting.is_some()
            || self.elapsed(now) < self.min_lifetime
        {
            return None;
        }

        self.state = LifecycleState::Ending;
        let ended_without_interaction = !self.has_had_interaction;
        info!(
            toy_id = %self.id,
            kind = %self.kind,
            ended_without_interaction,
            elapsed = self.elapsed(now),
            "Toy ending"
        );

        let occupants = self.interacting.into_iter().chain(self.attracted.iter().copied()).collect();
        Some(ToyEnding {
            toy_id: self.id,
            kind: self.kind,
            ended_without_interaction,
            occupants,
        })
    }
}
