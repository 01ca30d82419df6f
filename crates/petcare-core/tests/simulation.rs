//! End-to-end tests for the frame driver.
//!
//! Every test runs against a [`ManualClock`] and a fixed boredom roll, so
//! the outcomes are fully deterministic.

// Integration tests use expect/unwrap extensively for clarity -- panicking
// on failure is the correct behavior in test code.
#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::missing_panics_doc,
    clippy::too_many_lines,
    clippy::indexing_slicing
)]

use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use petcare_core::{
    AnimationSink, Clock, Collaborators, InMemoryPersistence, ManualClock, SavedPet, SimEvent,
    Simulation,
};
use petcare_needs::{FixedProbability, NeedsConfig, ResourceRate};
use petcare_toys::{
    BlockingEntity, FadeCompletion, Fadeable, NoRewards, OpenFloor, RewardCollaborator,
    SpatialOccupancyQuery, ToyConfigs, ToyError,
};
use petcare_types::{InteractionState, LifecycleState, PetId, Position, ToyId, ToyKind};

type FlagLog = Arc<Mutex<Vec<(PetId, &'static str, bool)>>>;

struct RecordingAnimation(FlagLog);

impl AnimationSink for RecordingAnimation {
    fn set_flag(&mut self, pet: PetId, flag: &'static str, value: bool) {
        self.0.lock().unwrap().push((pet, flag, value));
    }
}

struct RecordingRewards(Arc<Mutex<Vec<(ToyKind, bool)>>>);

impl RewardCollaborator for RecordingRewards {
    fn on_toy_ending(&mut self, kind: ToyKind, ended_without_interaction: bool) {
        self.0.lock().unwrap().push((kind, ended_without_interaction));
    }
}

struct PendingFades(Arc<Mutex<Vec<FadeCompletion>>>);

impl Fadeable for PendingFades {
    fn start_fade_out(
        &mut self,
        _toy: ToyId,
        _kind: ToyKind,
        _immediate: bool,
        completion: FadeCompletion,
    ) {
        self.0.lock().unwrap().push(completion);
    }
}

struct Furniture;

impl SpatialOccupancyQuery for Furniture {
    fn overlaps(&self, position: Position, radius: f32) -> Vec<BlockingEntity> {
        let sofa = Position::new(0.0, 0.0);
        if position.distance(sofa) <= radius {
            vec![BlockingEntity {
                label: String::from("sofa"),
                position: sofa,
            }]
        } else {
            Vec::new()
        }
    }
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
}

fn fast_satiety() -> NeedsConfig {
    NeedsConfig {
        satiety: ResourceRate::new(2.0, -1),
        ..NeedsConfig::default()
    }
}

fn sim_with(
    clock: &ManualClock,
    needs: NeedsConfig,
    bored: bool,
    collaborators: Collaborators,
) -> Simulation<ManualClock> {
    let rng = if bored {
        FixedProbability::always()
    } else {
        FixedProbability::never()
    };
    Simulation::new(
        clock.clone(),
        needs,
        ToyConfigs::default(),
        Box::new(rng),
        collaborators,
    )
}

fn headless(clock: &ManualClock, bored: bool) -> Simulation<ManualClock> {
    sim_with(clock, NeedsConfig::default(), bored, Collaborators::headless())
}

fn last_flag(log: &FlagLog, pet: PetId, flag: &str) -> Option<bool> {
    log.lock()
        .unwrap()
        .iter()
        .rev()
        .find(|(p, f, _)| *p == pet && *f == flag)
        .map(|(_, _, value)| *value)
}

fn state(sim: &Simulation<ManualClock>, pet: PetId) -> InteractionState {
    sim.roster().get(pet).unwrap().interaction_state()
}

// ---------------------------------------------------------------------------
// Needs
// ---------------------------------------------------------------------------

#[test]
fn offline_gap_is_caught_up_on_load() {
    let clock = ManualClock::new(start());
    let mut first = sim_with(&clock, fast_satiety(), false, Collaborators::headless());
    let pet = first.adopt_pet("Miso");
    let mut store = InMemoryPersistence::default();
    assert_eq!(first.save_to(&mut store).unwrap(), 1);

    clock.advance_wall(TimeDelta::seconds(10));
    let mut second = sim_with(&clock, fast_satiety(), false, Collaborators::headless());
    let reports = second.load_from(&mut store).unwrap();

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, pet);
    assert_eq!(reports[0].1.satiety_delta, -5);
    let restored = second.roster().get(pet).unwrap();
    assert_eq!(restored.satiety(), 95);
    assert_eq!(restored.energy(), 100);
}

#[test]
fn frames_drain_satiety_and_report_changes() {
    let clock = ManualClock::new(start());
    let mut sim = sim_with(&clock, fast_satiety(), false, Collaborators::headless());
    let pet = sim.adopt_pet("Tofu");

    let first = sim.run_tick();
    assert_eq!(first.frame, 1);
    assert!(first.delta_seconds.abs() < f64::EPSILON);
    assert!(first.events.is_empty());

    clock.advance(1.5);
    assert!(sim.run_tick().events.is_empty());

    clock.advance(1.0);
    let summary = sim.run_tick();
    assert!(summary.events.contains(&SimEvent::ResourcesChanged {
        pet_id: pet,
        energy_delta: 0,
        satiety_delta: -1,
    }));
    assert_eq!(sim.roster().get(pet).unwrap().satiety(), 99);
}

#[test]
fn feeding_is_capped() {
    let clock = ManualClock::new(start());
    let mut sim = sim_with(&clock, fast_satiety(), false, Collaborators::headless());
    let pet = sim.adopt_pet("Kiwi");

    clock.advance(20.0);
    sim.run_tick();
    assert_eq!(sim.roster().get(pet).unwrap().satiety(), 90);
    assert_eq!(sim.feed(pet, 30), Some(100));
    assert_eq!(sim.feed(PetId::new(), 30), None);
}

#[test]
fn saved_records_carry_boredom() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, true);
    let pet = sim.adopt_pet("Pickle");
    sim.place_toy(ToyKind::ToyMouse, Position::new(3.0, 0.0)).unwrap();
    assert!(sim.pet_start_interaction(pet, ToyKind::ToyMouse));
    sim.pet_end_interaction(pet, ToyKind::ToyMouse);

    let mut store = InMemoryPersistence::default();
    sim.save_to(&mut store).unwrap();
    let saved: &SavedPet = &store.pets()[0];
    assert!(saved.is_bored);
    assert!(saved.boredom_started_at.is_some());
    assert_eq!(saved.energy, 95);
}

// ---------------------------------------------------------------------------
// Toys
// ---------------------------------------------------------------------------

#[test]
fn unvisited_toy_ends_without_reward() {
    let clock = ManualClock::new(start());
    let rewards = Arc::new(Mutex::new(Vec::new()));
    let collaborators = Collaborators {
        rewards: Box::new(RecordingRewards(Arc::clone(&rewards))),
        ..Collaborators::headless()
    };
    let mut sim = sim_with(&clock, NeedsConfig::default(), false, collaborators);
    let toy = sim.place_toy(ToyKind::CatTeaser, Position::new(2.0, 2.0)).unwrap();

    clock.advance(19.0);
    let summary = sim.run_tick();
    assert_eq!(summary.live_toys, 1);

    clock.advance(1.0);
    let summary = sim.run_tick();
    let ended = summary
        .events
        .iter()
        .find_map(|event| match event {
            SimEvent::ToyEnded(ending) => Some(ending.clone()),
            _ => None,
        })
        .unwrap();
    assert_eq!(ended.toy_id, toy);
    assert!(ended.ended_without_interaction);
    assert!(summary.events.iter().any(|event| matches!(
        event,
        SimEvent::ToyDestroyed(destroyed) if destroyed.toy_id == toy
    )));
    assert_eq!(summary.live_toys, 0);
    assert_eq!(*rewards.lock().unwrap(), vec![(ToyKind::CatTeaser, true)]);
}

#[test]
fn mouse_ends_on_the_frame_its_lifetime_is_reached() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let toy = sim.place_toy(ToyKind::ToyMouse, Position::new(1.0, 1.0)).unwrap();

    let mut ended_on = None;
    for frame in 1..=120_u32 {
        clock.advance(0.1);
        let summary = sim.run_tick();
        if summary
            .events
            .iter()
            .any(|e| matches!(e, SimEvent::ToyEnded(ending) if ending.toy_id == toy))
        {
            ended_on = Some(frame);
            break;
        }
    }

    // 100 frames of 100 ms is exactly the 10 s minimum lifetime.
    assert_eq!(ended_on, Some(100));
    assert!((clock.monotonic_seconds() - 10.0).abs() < f64::EPSILON);
}

#[test]
fn faded_toy_is_destroyed_on_a_later_frame() {
    let clock = ManualClock::new(start());
    let fades = Arc::new(Mutex::new(Vec::new()));
    let collaborators = Collaborators {
        fade: Some(Box::new(PendingFades(Arc::clone(&fades)))),
        ..Collaborators::headless()
    };
    let mut sim = sim_with(&clock, NeedsConfig::default(), false, collaborators);
    let toy = sim.place_toy(ToyKind::ToyMouse, Position::new(1.0, 1.0)).unwrap();

    clock.advance(10.0);
    let summary = sim.run_tick();
    assert!(summary.events.iter().any(|e| matches!(e, SimEvent::ToyEnded(_))));
    assert!(!summary.events.iter().any(|e| matches!(e, SimEvent::ToyDestroyed(_))));

    // The kind is free again while the old toy is still fading.
    let replacement = sim.place_toy(ToyKind::ToyMouse, Position::new(4.0, 4.0)).unwrap();
    assert_ne!(replacement, toy);

    let pending: Vec<FadeCompletion> = fades.lock().unwrap().drain(..).collect();
    assert_eq!(pending.len(), 1);
    for completion in pending {
        completion.complete();
    }

    clock.advance(0.1);
    let summary = sim.run_tick();
    assert!(summary.events.iter().any(|event| matches!(
        event,
        SimEvent::ToyDestroyed(destroyed) if destroyed.toy_id == toy
    )));
}

#[test]
fn second_toy_of_a_kind_is_rejected() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let first = sim.place_toy(ToyKind::CatTeaser, Position::new(0.0, 0.0)).unwrap();
    let err = sim
        .place_toy(ToyKind::CatTeaser, Position::new(5.0, 5.0))
        .unwrap_err();
    assert!(matches!(err, ToyError::AlreadyActive { existing, .. } if existing == first));
    assert!(sim.place_toy(ToyKind::ToyMouse, Position::new(5.0, 5.0)).is_ok());
}

#[test]
fn blocked_placement_is_refused() {
    let clock = ManualClock::new(start());
    let collaborators = Collaborators {
        spatial: Box::new(Furniture),
        ..Collaborators::headless()
    };
    let mut sim = sim_with(&clock, NeedsConfig::default(), false, collaborators);

    assert!(!sim.can_place_toy(ToyKind::CatTeaser, Position::new(0.5, 0.0)));
    assert!(matches!(
        sim.place_toy(ToyKind::CatTeaser, Position::new(0.5, 0.0)),
        Err(ToyError::PlacementBlocked { blockers: 1, .. })
    ));
    assert!(sim.can_place_toy(ToyKind::CatTeaser, Position::new(3.0, 0.0)));
    assert!(sim.toys().get(ToyKind::CatTeaser).is_none());
}

// ---------------------------------------------------------------------------
// Play
// ---------------------------------------------------------------------------

#[test]
fn play_session_mirrors_animation_flags() {
    let clock = ManualClock::new(start());
    let flags: FlagLog = Arc::new(Mutex::new(Vec::new()));
    let collaborators = Collaborators {
        rewards: Box::new(NoRewards),
        fade: None,
        animation: Box::new(RecordingAnimation(Arc::clone(&flags))),
        spatial: Box::new(OpenFloor),
    };
    let mut sim = sim_with(&clock, NeedsConfig::default(), false, collaborators);
    let pet = sim.adopt_pet("Noodle");
    sim.place_toy(ToyKind::CatTeaser, Position::new(1.0, 0.0)).unwrap();

    assert!(sim.pet_attracted(pet, ToyKind::CatTeaser));
    assert_eq!(last_flag(&flags, pet, "isAttracted"), Some(true));

    assert!(sim.pet_start_interaction(pet, ToyKind::CatTeaser));
    assert_eq!(last_flag(&flags, pet, "isAttracted"), Some(false));
    assert_eq!(last_flag(&flags, pet, "isCatTeasering"), Some(true));

    assert!(sim.set_activity(pet, InteractionState::Sleeping));
    assert_eq!(last_flag(&flags, pet, "isCatTeasering"), Some(false));
    assert_eq!(last_flag(&flags, pet, "isSleeping"), Some(true));
}

#[test]
fn only_one_pet_holds_a_toy() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let first = sim.adopt_pet("Biscuit");
    let second = sim.adopt_pet("Crumpet");
    sim.place_toy(ToyKind::ToyMouse, Position::new(1.0, 1.0)).unwrap();

    assert!(sim.pet_start_interaction(first, ToyKind::ToyMouse));
    assert!(!sim.pet_start_interaction(second, ToyKind::ToyMouse));
    assert_eq!(state(&sim, second), InteractionState::Idle);

    let status = sim.toy_status(ToyKind::ToyMouse).unwrap();
    assert_eq!(status.interacting_count, 1);
    assert_eq!(
        sim.toys().get(ToyKind::ToyMouse).unwrap().holder(),
        Some(first)
    );
}

#[test]
fn finishing_play_costs_energy_and_may_bore() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, true);
    let pet = sim.adopt_pet("Waffle");
    sim.place_toy(ToyKind::ToyMouse, Position::new(1.0, 1.0)).unwrap();

    assert!(sim.pet_start_interaction(pet, ToyKind::ToyMouse));
    assert!(sim.pet_end_interaction(pet, ToyKind::ToyMouse).is_none());

    let status = sim.pet_status(pet).unwrap();
    assert_eq!(status.energy, 95);
    assert!(status.is_bored);
    assert_eq!(status.interaction_state, InteractionState::Idle);

    let summary = sim.run_tick();
    assert!(summary.events.contains(&SimEvent::PetBored {
        pet_id: pet,
        kind: ToyKind::ToyMouse,
    }));

    // Bored pets ignore toys until the recovery window passes.
    assert!(!sim.pet_attracted(pet, ToyKind::ToyMouse));
    assert!(!sim.pet_start_interaction(pet, ToyKind::ToyMouse));

    clock.advance_wall(TimeDelta::seconds(300));
    let summary = sim.run_tick();
    assert!(summary.events.contains(&SimEvent::BoredomCleared { pet_id: pet }));
    assert!(sim.pet_attracted(pet, ToyKind::ToyMouse));
}

#[test]
fn ending_interaction_after_lifetime_ends_the_toy() {
    let clock = ManualClock::new(start());
    let rewards = Arc::new(Mutex::new(Vec::new()));
    let collaborators = Collaborators {
        rewards: Box::new(RecordingRewards(Arc::clone(&rewards))),
        ..Collaborators::headless()
    };
    let mut sim = sim_with(&clock, NeedsConfig::default(), false, collaborators);
    let pet = sim.adopt_pet("Sesame");
    let toy = sim.place_toy(ToyKind::CatTeaser, Position::new(1.0, 1.0)).unwrap();
    assert!(sim.pet_start_interaction(pet, ToyKind::CatTeaser));

    // A held toy outlives its minimum lifetime.
    clock.advance(25.0);
    sim.run_tick();
    assert_eq!(
        sim.toy_status(ToyKind::CatTeaser).unwrap().lifecycle_state,
        LifecycleState::Active
    );

    let ending = sim.pet_end_interaction(pet, ToyKind::CatTeaser).unwrap();
    assert_eq!(ending.toy_id, toy);
    assert!(!ending.ended_without_interaction);
    assert!(sim.toys().get(ToyKind::CatTeaser).is_none());
    assert_eq!(*rewards.lock().unwrap(), vec![(ToyKind::CatTeaser, false)]);

    let summary = sim.run_tick();
    assert!(summary.events.iter().any(|e| matches!(e, SimEvent::ToyEnded(_))));
    assert!(summary.events.iter().any(|e| matches!(e, SimEvent::ToyDestroyed(_))));
}

#[test]
fn last_watcher_leaving_ends_the_toy() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let watcher = sim.adopt_pet("Olive");
    let player = sim.adopt_pet("Pepper");
    sim.place_toy(ToyKind::CatTeaser, Position::new(1.0, 1.0)).unwrap();

    assert!(sim.pet_attracted(watcher, ToyKind::CatTeaser));
    assert!(sim.pet_start_interaction(player, ToyKind::CatTeaser));
    clock.advance(30.0);
    assert!(sim.pet_end_interaction(player, ToyKind::CatTeaser).is_none());

    // The watcher still keeps it alive; losing interest ends it.
    assert!(sim.set_activity(watcher, InteractionState::Patting));
    assert!(sim.toys().get(ToyKind::CatTeaser).is_none());
    assert_eq!(state(&sim, watcher), InteractionState::Patting);
    assert_eq!(state(&sim, player), InteractionState::Idle);
}

#[test]
fn switching_toys_detaches_from_the_first() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let pet = sim.adopt_pet("Clover");
    sim.place_toy(ToyKind::CatTeaser, Position::new(1.0, 1.0)).unwrap();
    sim.place_toy(ToyKind::ToyMouse, Position::new(3.0, 3.0)).unwrap();

    assert!(sim.pet_attracted(pet, ToyKind::CatTeaser));
    assert!(sim.pet_attracted(pet, ToyKind::ToyMouse));
    assert_eq!(state(&sim, pet), InteractionState::Attracted(ToyKind::ToyMouse));
    assert_eq!(
        sim.toy_status(ToyKind::CatTeaser).unwrap().attracted_count,
        0
    );
    assert_eq!(sim.toy_status(ToyKind::ToyMouse).unwrap().attracted_count, 1);
}

#[test]
fn busy_pets_refuse_chores_and_toy_states() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let pet = sim.adopt_pet("Juniper");
    sim.place_toy(ToyKind::ToyMouse, Position::new(1.0, 1.0)).unwrap();

    assert!(!sim.set_activity(pet, InteractionState::Interacting(ToyKind::ToyMouse)));
    assert!(sim.set_activity(pet, InteractionState::Eating));
    assert!(!sim.set_activity(pet, InteractionState::Sleeping));
    assert!(!sim.pet_attracted(pet, ToyKind::ToyMouse));
    assert!(sim.set_activity(pet, InteractionState::Idle));
    assert!(sim.pet_attracted(pet, ToyKind::ToyMouse));
}

#[test]
fn unknown_references_are_ignored() {
    let clock = ManualClock::new(start());
    let mut sim = headless(&clock, false);
    let ghost = PetId::new();
    let pet = sim.adopt_pet("Rye");

    assert!(!sim.pet_attracted(ghost, ToyKind::CatTeaser));
    assert!(!sim.pet_attracted(pet, ToyKind::CatTeaser));
    assert!(sim.pet_end_interaction(pet, ToyKind::CatTeaser).is_none());
    assert!(!sim.set_activity(ghost, InteractionState::Sleeping));
    assert!(sim.pet_status(ghost).is_none());
    assert!(!sim.remove_pet(ghost));
    assert!(sim.remove_pet(pet));
    assert!(sim.roster().is_empty());
}
