//! The frame-driven simulation.
//!
//! [`Simulation`] owns every pet, every toy, and the collaborators around
//! them. The host calls [`Simulation::run_tick`] once per frame and the
//! gameplay methods in between. Everything is synchronous: calls made in
//! the same frame are resolved in call order.
//!
//! Each frame runs these steps in order:
//!
//! 1. **Clock** -- compute the delta since the previous frame. The first
//!    frame measures from construction.
//! 2. **Destroyed** -- collect toys whose fade-out finished.
//! 3. **Needs** -- advance every pet's energy and satiety accumulators.
//! 4. **Boredom** -- lazily clear boredom that has worn off.
//! 5. **Toys** -- tick every toy and tear down any that ended.
//!
//! Unknown pets and missing toys are not errors here. The call is skipped
//! and logged at `warn`.

use chrono::{DateTime, Utc};
use petcare_needs::{
    CatchUpReport, NeedsConfig, Pet, PetRoster, ProbabilityGenerator, RandProbability, activity,
    boredom, resource_clock,
};
use petcare_toys::{
    DestroyedToy, Fadeable, FadeOutCoordinator, PetNotifier, TeardownOutcome, ToyConfigs,
    ToyEnding, ToyError, ToyRegistry,
};
use petcare_types::{
    InteractionState, LifecycleState, PetId, PetStatus, Position, ToyId, ToyKind, ToyStatusInfo,
};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};

use crate::clock::Clock;
use crate::collaborators::{AnimationSink, Collaborators};
use crate::config::SimulationConfig;
use crate::persistence::{PersistenceError, PersistenceProvider, SavedPet};

/// Something observable that happened during a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum SimEvent {
    /// A pet's energy or satiety moved.
    ResourcesChanged {
        /// The pet.
        pet_id: PetId,
        /// Energy change after clamping.
        energy_delta: i64,
        /// Satiety change after clamping.
        satiety_delta: i64,
    },
    /// A pet got bored after playing.
    PetBored {
        /// The pet.
        pet_id: PetId,
        /// The toy it was playing with.
        kind: ToyKind,
    },
    /// A pet's boredom wore off.
    BoredomCleared {
        /// The pet.
        pet_id: PetId,
    },
    /// A toy teardown sent a pet back to idle.
    PetIdled {
        /// The pet.
        pet_id: PetId,
        /// What it was doing.
        from: InteractionState,
    },
    /// A toy ended.
    ToyEnded(ToyEnding),
    /// A toy is gone for good.
    ToyDestroyed(DestroyedToy),
}

/// Summary of a single frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// The frame number, starting at 1.
    pub frame: u64,
    /// Seconds since the previous frame.
    pub delta_seconds: f64,
    /// Pets alive at the end of the frame.
    pub pets: u32,
    /// Toys registered at the end of the frame.
    pub live_toys: u32,
    /// What happened, in order. Includes events caused by gameplay calls
    /// made since the previous frame.
    pub events: Vec<SimEvent>,
}

/// Returns pets to idle during toy teardown.
struct IdleNotifier<'a> {
    roster: &'a mut PetRoster,
    animation: &'a mut dyn AnimationSink,
    events: &'a mut Vec<SimEvent>,
}

impl PetNotifier for IdleNotifier<'_> {
    fn return_to_idle(&mut self, pet_id: PetId) {
        let Some(pet) = self.roster.get_mut(pet_id) else {
            warn!(pet_id = %pet_id, "Teardown referenced an unknown pet");
            return;
        };
        let from = activity::force_idle(pet);
        if !from.is_idle() {
            mirror(self.animation, pet_id, from, InteractionState::Idle);
            self.events.push(SimEvent::PetIdled { pet_id, from });
        }
    }
}

/// Turn the old state's animator flag off and the new one on.
fn mirror(
    animation: &mut dyn AnimationSink,
    pet_id: PetId,
    from: InteractionState,
    to: InteractionState,
) {
    if from == to {
        return;
    }
    if let Some(flag) = from.animation_flag() {
        animation.set_flag(pet_id, flag, false);
    }
    if let Some(flag) = to.animation_flag() {
        animation.set_flag(pet_id, flag, true);
    }
}

/// The whole pet-care simulation.
pub struct Simulation<C: Clock> {
    clock: C,
    needs: NeedsConfig,
    roster: PetRoster,
    toys: ToyRegistry,
    teardown: FadeOutCoordinator,
    rng: Box<dyn ProbabilityGenerator>,
    collaborators: Collaborators,
    last_frame_at: f64,
    frame: u64,
    pending: Vec<SimEvent>,
}

impl<C: Clock> Simulation<C> {
    /// Create an empty simulation.
    pub fn new(
        clock: C,
        needs: NeedsConfig,
        toy_configs: ToyConfigs,
        rng: Box<dyn ProbabilityGenerator>,
        collaborators: Collaborators,
    ) -> Self {
        let last_frame_at = clock.monotonic_seconds();
        Self {
            clock,
            needs,
            roster: PetRoster::new(),
            toys: ToyRegistry::new(toy_configs),
            teardown: FadeOutCoordinator::new(),
            rng,
            collaborators,
            last_frame_at,
            frame: 0,
            pending: Vec::new(),
        }
    }

    /// Create an empty simulation from loaded configuration, seeding
    /// gameplay rolls from `simulation.seed`.
    pub fn from_config(clock: C, config: &SimulationConfig, collaborators: Collaborators) -> Self {
        let rng = RandProbability::new(SmallRng::seed_from_u64(config.simulation.seed));
        Self::new(
            clock,
            config.needs.to_needs_config(),
            config.toys.to_toy_configs(),
            Box::new(rng),
            collaborators,
        )
    }

    /// The simulation's clock.
    pub const fn clock(&self) -> &C {
        &self.clock
    }

    /// Every live pet.
    pub const fn roster(&self) -> &PetRoster {
        &self.roster
    }

    /// Every live toy.
    pub const fn toys(&self) -> &ToyRegistry {
        &self.toys
    }

    /// Frames run so far.
    pub const fn frame(&self) -> u64 {
        self.frame
    }

    // -----------------------------------------------------------------------
    // Frame
    // -----------------------------------------------------------------------

    /// Run one frame.
    pub fn run_tick(&mut self) -> TickSummary {
        let now = self.clock.monotonic_seconds();
        let wall = self.clock.wall_clock_now();
        let delta_seconds = if now > self.last_frame_at {
            now - self.last_frame_at
        } else {
            0.0
        };
        self.last_frame_at = now;
        self.frame = self.frame.saturating_add(1);

        let mut events = std::mem::take(&mut self.pending);

        events.extend(
            self.teardown
                .drain_destroyed()
                .into_iter()
                .map(SimEvent::ToyDestroyed),
        );

        for (pet_id, change) in self.roster.tick_all(delta_seconds, &self.needs) {
            events.push(SimEvent::ResourcesChanged {
                pet_id,
                energy_delta: change.energy_delta,
                satiety_delta: change.satiety_delta,
            });
        }

        let recovery = self.needs.boredom_recovery();
        for pet_id in self.roster.ids() {
            let Some(pet) = self.roster.get_mut(pet_id) else {
                continue;
            };
            if pet.is_bored_flag() && !boredom::is_bored(pet, wall, recovery) {
                events.push(SimEvent::BoredomCleared { pet_id });
            }
        }

        for ending in self.toys.tick_all(now) {
            self.finish_ending(ending);
        }
        events.append(&mut self.pending);

        let frame = self.frame;
        debug!(frame, delta_seconds, events = events.len(), "Frame complete");

        TickSummary {
            frame,
            delta_seconds,
            pets: u32::try_from(self.roster.len()).unwrap_or(u32::MAX),
            live_toys: u32::try_from(self.toys.iter().count()).unwrap_or(u32::MAX),
            events,
        }
    }

    // -----------------------------------------------------------------------
    // Pets
    // -----------------------------------------------------------------------

    /// Adopt a new pet with starting needs.
    pub fn adopt_pet(&mut self, name: impl Into<String>) -> PetId {
        let now = self.clock.wall_clock_now();
        self.roster.adopt(name.into(), &self.needs, now)
    }

    /// Remove a pet, detaching it from any toy first.
    ///
    /// Returns `false` if the pet was unknown.
    pub fn remove_pet(&mut self, pet_id: PetId) -> bool {
        if !self.roster.contains(pet_id) {
            warn!(pet_id = %pet_id, "remove_pet: unknown pet");
            return false;
        }
        let _ = self.detach_from_toy(pet_id);
        let removed = self.roster.remove(pet_id).is_ok();
        if removed {
            info!(pet_id = %pet_id, "Pet removed");
        }
        removed
    }

    /// Add satiety to a pet. Returns the new satiety.
    pub fn feed(&mut self, pet_id: PetId, amount: u32) -> Option<u32> {
        let Some(pet) = self.roster.get_mut(pet_id) else {
            warn!(pet_id = %pet_id, "feed: unknown pet");
            return None;
        };
        let satiety = resource_clock::feed(pet, amount);
        debug!(pet_id = %pet_id, amount, satiety, "Pet fed");
        Some(satiety)
    }

    /// Switch a pet to a non-toy activity (`Idle`, `Eating`, `Sleeping`,
    /// `Patting`).
    ///
    /// A pet attached to a toy is detached first, which may end that toy.
    /// Chores do not chain: a sleeping pet must go idle before eating.
    /// Returns whether the pet is now in `to`.
    pub fn set_activity(&mut self, pet_id: PetId, to: InteractionState) -> bool {
        if let Some(kind) = to.toy() {
            warn!(pet_id = %pet_id, kind = %kind, "set_activity cannot enter a toy state");
            return false;
        }
        if !self.roster.contains(pet_id) {
            warn!(pet_id = %pet_id, "set_activity: unknown pet");
            return false;
        }
        let _ = self.detach_from_toy(pet_id);
        self.change_state(pet_id, to)
    }

    /// Read-only status for the UI. Clears expired boredom first.
    pub fn pet_status(&mut self, pet_id: PetId) -> Option<PetStatus> {
        let wall = self.clock.wall_clock_now();
        let recovery = self.needs.boredom_recovery();
        let pet = self.roster.get_mut(pet_id)?;
        let _ = boredom::is_bored(pet, wall, recovery);
        Some(pet.status(&self.needs))
    }

    // -----------------------------------------------------------------------
    // Toys
    // -----------------------------------------------------------------------

    /// Whether a toy of `kind` may be placed at `position`.
    pub fn can_place_toy(&self, kind: ToyKind, position: Position) -> bool {
        let radius = self.toys.config(kind).placement_radius;
        self.toys
            .can_place_at(kind, position, radius, self.collaborators.spatial.as_ref())
    }

    /// Place a toy.
    ///
    /// # Errors
    ///
    /// [`ToyError::AlreadyActive`] if one of this kind is live, or
    /// [`ToyError::PlacementBlocked`] if the spot is occupied.
    pub fn place_toy(&mut self, kind: ToyKind, position: Position) -> Result<ToyId, ToyError> {
        let now = self.clock.monotonic_seconds();
        self.toys
            .place(kind, position, now, self.collaborators.spatial.as_ref())
    }

    /// UI status of the live toy of `kind`.
    pub fn toy_status(&self, kind: ToyKind) -> Option<ToyStatusInfo> {
        let now = self.clock.monotonic_seconds();
        self.toys.get(kind).map(|toy| toy.status(now))
    }

    /// A pet noticed the toy of `kind`.
    ///
    /// Bored pets and pets busy with something that cannot be interrupted
    /// are not attracted. A pet attracted to the other toy switches over.
    /// Returns whether the pet is now attracted to this toy.
    pub fn pet_attracted(&mut self, pet_id: PetId, kind: ToyKind) -> bool {
        let Some(current) = self.current_state(pet_id) else {
            warn!(pet_id = %pet_id, "pet_attracted: unknown pet");
            return false;
        };
        if !self.toy_is_active(kind) {
            warn!(pet_id = %pet_id, kind = %kind, "pet_attracted: no active toy");
            return false;
        }
        if self.is_pet_bored(pet_id) {
            debug!(pet_id = %pet_id, kind = %kind, "Bored pet ignores toy");
            return false;
        }

        let target = InteractionState::Attracted(kind);
        if current == target {
            return true;
        }
        if !activity::can_transition(current, target) {
            debug!(pet_id = %pet_id, ?current, kind = %kind, "Pet is busy, not attracted");
            return false;
        }
        if current.toy().is_some() {
            let _ = self.detach_from_toy(pet_id);
        }

        let accepted = self
            .toys
            .get_mut(kind)
            .is_some_and(|toy| toy.on_pet_attracted(pet_id) || toy.is_attracted(pet_id));
        accepted && self.change_state(pet_id, target)
    }

    /// A pet tries to play with the toy of `kind`.
    ///
    /// Returns `false` when another pet holds the slot, the pet is bored or
    /// busy, or there is no such toy. Nothing changes in that case.
    pub fn pet_start_interaction(&mut self, pet_id: PetId, kind: ToyKind) -> bool {
        let Some(current) = self.current_state(pet_id) else {
            warn!(pet_id = %pet_id, "pet_start_interaction: unknown pet");
            return false;
        };
        if !self.toy_is_active(kind) {
            warn!(pet_id = %pet_id, kind = %kind, "pet_start_interaction: no active toy");
            return false;
        }

        let target = InteractionState::Interacting(kind);
        if current == target {
            return self.toys.get(kind).and_then(|toy| toy.holder()) == Some(pet_id);
        }
        if self.is_pet_bored(pet_id) {
            debug!(pet_id = %pet_id, kind = %kind, "Bored pet will not play");
            return false;
        }
        if !activity::can_transition(current, target) {
            debug!(pet_id = %pet_id, ?current, kind = %kind, "Pet is busy, cannot play");
            return false;
        }

        let granted = self
            .toys
            .get_mut(kind)
            .is_some_and(|toy| toy.on_pet_start_interaction(pet_id));
        granted && self.change_state(pet_id, target)
    }

    /// A pet stops playing with the toy of `kind`.
    ///
    /// If the pet held the slot, the play session is settled: energy is
    /// spent and a boredom roll is made. If nothing else keeps the toy
    /// alive it ends and is torn down before this returns.
    pub fn pet_end_interaction(&mut self, pet_id: PetId, kind: ToyKind) -> Option<ToyEnding> {
        let Some(current) = self.roster.get(pet_id).map(Pet::interaction_state) else {
            warn!(pet_id = %pet_id, "pet_end_interaction: unknown pet");
            return None;
        };
        let now = self.clock.monotonic_seconds();
        let Some(toy) = self.toys.get_mut(kind) else {
            warn!(pet_id = %pet_id, kind = %kind, "pet_end_interaction: no active toy");
            return None;
        };

        let was_holder = toy.holder() == Some(pet_id);
        let ending = toy.on_pet_end_interaction(pet_id, now);

        if current.toy() == Some(kind) {
            self.force_pet_idle(pet_id);
        }
        if was_holder {
            self.settle_play_session(pet_id, kind);
        }
        if let Some(ending) = &ending {
            self.finish_ending(ending.clone());
        }
        ending
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    /// Restore saved pets and catch them up on the time the app was closed.
    ///
    /// Saved pets whose id is already present are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the provider cannot be read.
    pub fn load_from(
        &mut self,
        provider: &mut dyn PersistenceProvider,
    ) -> Result<Vec<(PetId, CatchUpReport)>, PersistenceError> {
        let saved = provider.load()?;
        let wall = self.clock.wall_clock_now();

        let mut restored = Vec::with_capacity(saved.len());
        for record in &saved {
            match self.roster.insert(Pet::restore(record.to_restore())) {
                Ok(()) => restored.push(record.id),
                Err(err) => warn!(pet_id = %record.id, %err, "Skipping saved pet"),
            }
        }

        let reports = self.roster.catch_up(&restored, wall, &self.needs);
        info!(pets = restored.len(), "Pets restored");
        Ok(reports)
    }

    /// Save every pet, stamping it as synced now. Returns how many were
    /// saved.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the provider cannot be written.
    pub fn save_to(
        &mut self,
        provider: &mut dyn PersistenceProvider,
    ) -> Result<usize, PersistenceError> {
        let wall = self.clock.wall_clock_now();
        self.roster.mark_all_synced(wall);
        let records: Vec<SavedPet> = self.roster.iter().map(SavedPet::from_pet).collect();
        provider.store(&records)?;
        info!(pets = records.len(), "Pets saved");
        Ok(records.len())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn wall_now(&self) -> DateTime<Utc> {
        self.clock.wall_clock_now()
    }

    fn toy_is_active(&self, kind: ToyKind) -> bool {
        self.toys
            .get(kind)
            .is_some_and(|toy| toy.state() == LifecycleState::Active)
    }

    /// The pet's current state, or `None` if unknown.
    fn current_state(&self, pet_id: PetId) -> Option<InteractionState> {
        self.roster.get(pet_id).map(Pet::interaction_state)
    }

    fn is_pet_bored(&mut self, pet_id: PetId) -> bool {
        let wall = self.wall_now();
        let recovery = self.needs.boredom_recovery();
        self.roster
            .get_mut(pet_id)
            .is_some_and(|pet| boredom::is_bored(pet, wall, recovery))
    }

    /// Apply a checked activity change and mirror it to the animator.
    fn change_state(&mut self, pet_id: PetId, to: InteractionState) -> bool {
        let Some(pet) = self.roster.get_mut(pet_id) else {
            return false;
        };
        match activity::transition(pet, to) {
            Ok(from) => {
                mirror(self.collaborators.animation.as_mut(), pet_id, from, to);
                true
            }
            Err(err) => {
                debug!(%err, "Activity change refused");
                false
            }
        }
    }

    fn force_pet_idle(&mut self, pet_id: PetId) {
        let Some(pet) = self.roster.get_mut(pet_id) else {
            return;
        };
        let from = activity::force_idle(pet);
        mirror(
            self.collaborators.animation.as_mut(),
            pet_id,
            from,
            InteractionState::Idle,
        );
    }

    /// Pull a pet off whatever toy it is attached to and make it idle.
    fn detach_from_toy(&mut self, pet_id: PetId) -> Option<ToyEnding> {
        let kind = self.roster.get(pet_id)?.interaction_state().toy()?;
        let now = self.clock.monotonic_seconds();
        let ending = self.toys.get_mut(kind).and_then(|toy| {
            if toy.holder() == Some(pet_id) {
                toy.on_pet_end_interaction(pet_id, now)
            } else {
                toy.on_pet_lost_interest(pet_id, now)
            }
        });
        self.force_pet_idle(pet_id);
        if let Some(ending) = &ending {
            self.finish_ending(ending.clone());
        }
        ending
    }

    /// Charge energy and roll boredom after a pet finishes playing.
    fn settle_play_session(&mut self, pet_id: PetId, kind: ToyKind) {
        let config = *self.toys.config(kind);
        let wall = self.wall_now();
        let Some(pet) = self.roster.get_mut(pet_id) else {
            return;
        };
        let cost = 0_i64.saturating_sub(i64::from(config.energy_cost));
        let energy = resource_clock::apply_energy_delta(pet, cost);
        let bored = boredom::roll_boredom(pet, wall, config.boredom_chance, self.rng.as_mut());
        info!(pet_id = %pet_id, kind = %kind, energy, bored, "Play session finished");
        if bored {
            self.pending.push(SimEvent::PetBored { pet_id, kind });
        }
    }

    /// Tear down an ended toy and free its kind for placement.
    fn finish_ending(&mut self, ending: ToyEnding) {
        self.pending.push(SimEvent::ToyEnded(ending.clone()));

        let fade: Option<&mut dyn Fadeable> = match self.collaborators.fade.as_mut() {
            Some(fade) => Some(fade.as_mut()),
            None => None,
        };
        let mut notifier = IdleNotifier {
            roster: &mut self.roster,
            animation: self.collaborators.animation.as_mut(),
            events: &mut self.pending,
        };
        let outcome = self.teardown.begin_teardown(
            &ending,
            &mut notifier,
            self.collaborators.rewards.as_mut(),
            fade,
        );

        let _ = self.toys.retire(ending.kind, ending.toy_id);
        if let TeardownOutcome::Destroyed(destroyed) = outcome {
            self.pending.push(SimEvent::ToyDestroyed(destroyed));
        }
    }
}
