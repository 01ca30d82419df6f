//! A scripted stand-in for the player and the pets' AI.
//!
//! Each frame the host rolls a few dice and pokes the simulation the way
//! the game's input and behaviour layers would: placing toys, sending pets
//! to them, and putting pets to bed or in front of a bowl.

use petcare_core::{Clock, Simulation};
use petcare_needs::STAT_MAX;
use petcare_toys::ToyLifecycleController;
use petcare_types::{InteractionState, LifecycleState, PetId, Position, ToyKind};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

/// Names given to pets adopted into an empty save.
const STARTER_PETS: [&str; 2] = ["Mochi", "Taro"];

/// Half-width of the square floor toys are dropped on.
const FLOOR_HALF_WIDTH: f32 = 5.0;

/// Per-frame odds of each scripted action.
const PLACE_CHANCE: f64 = 0.05;
const NOTICE_CHANCE: f64 = 0.2;
const PLAY_CHANCE: f64 = 0.3;
const STOP_PLAY_CHANCE: f64 = 0.1;
const CHORE_CHANCE: f64 = 0.02;
const FINISH_CHORE_CHANCE: f64 = 0.1;

/// Energy below which an idle pet goes to sleep.
const SLEEPY_AT: u32 = 30;

/// Satiety below which an idle pet goes to eat.
const HUNGRY_AT: u32 = 40;

/// Drives a [`Simulation`] with random but plausible gameplay.
#[derive(Debug)]
pub struct ScriptedHost {
    rng: SmallRng,
    feed_amount: u32,
}

impl ScriptedHost {
    /// A host whose choices are reproducible from `seed`.
    pub fn new(seed: u64, feed_amount: u32) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            feed_amount,
        }
    }

    /// Adopt the starter pets if the roster is empty.
    pub fn ensure_pets<C: Clock>(sim: &mut Simulation<C>) {
        if sim.roster().is_empty() {
            for name in STARTER_PETS {
                let _ = sim.adopt_pet(name);
            }
        }
    }

    /// Take this frame's actions.
    pub fn act<C: Clock>(&mut self, sim: &mut Simulation<C>) {
        self.maybe_place_toy(sim);

        let pets: Vec<(PetId, InteractionState, u32, u32)> = sim
            .roster()
            .iter()
            .map(|pet| (pet.id(), pet.interaction_state(), pet.energy(), pet.satiety()))
            .collect();

        for (pet_id, state, energy, satiety) in pets {
            match state {
                InteractionState::Idle => self.idle_pet(sim, pet_id, energy, satiety),
                InteractionState::Attracted(kind) => {
                    if self.rng.random_bool(PLAY_CHANCE) {
                        let _ = sim.pet_start_interaction(pet_id, kind);
                    }
                }
                InteractionState::Interacting(kind) => {
                    if self.rng.random_bool(STOP_PLAY_CHANCE) {
                        let _ = sim.pet_end_interaction(pet_id, kind);
                    }
                }
                InteractionState::Eating => {
                    if self.rng.random_bool(FINISH_CHORE_CHANCE) {
                        let _ = sim.feed(pet_id, self.feed_amount);
                        let _ = sim.set_activity(pet_id, InteractionState::Idle);
                    }
                }
                InteractionState::Sleeping => {
                    if energy >= STAT_MAX {
                        let _ = sim.set_activity(pet_id, InteractionState::Idle);
                    }
                }
                InteractionState::Patting => {
                    if self.rng.random_bool(FINISH_CHORE_CHANCE) {
                        let _ = sim.set_activity(pet_id, InteractionState::Idle);
                    }
                }
            }
        }
    }

    fn idle_pet<C: Clock>(
        &mut self,
        sim: &mut Simulation<C>,
        pet_id: PetId,
        energy: u32,
        satiety: u32,
    ) {
        if energy < SLEEPY_AT {
            let _ = sim.set_activity(pet_id, InteractionState::Sleeping);
            return;
        }
        if satiety < HUNGRY_AT {
            let _ = sim.set_activity(pet_id, InteractionState::Eating);
            return;
        }

        let noticed = sim
            .toys()
            .iter()
            .find(|toy| toy.state() == LifecycleState::Active)
            .map(ToyLifecycleController::kind)
            .filter(|_| self.rng.random_bool(NOTICE_CHANCE));
        if let Some(kind) = noticed {
            let _ = sim.pet_attracted(pet_id, kind);
            return;
        }

        if self.rng.random_bool(CHORE_CHANCE) {
            let _ = sim.set_activity(pet_id, InteractionState::Patting);
        }
    }

    fn maybe_place_toy<C: Clock>(&mut self, sim: &mut Simulation<C>) {
        if !self.rng.random_bool(PLACE_CHANCE) {
            return;
        }
        let kind = if self.rng.random_bool(0.5) {
            ToyKind::CatTeaser
        } else {
            ToyKind::ToyMouse
        };
        let position = Position::new(
            self.rng.random_range(-FLOOR_HALF_WIDTH..FLOOR_HALF_WIDTH),
            self.rng.random_range(-FLOOR_HALF_WIDTH..FLOOR_HALF_WIDTH),
        );
        if !sim.can_place_toy(kind, position) {
            trace!(kind = %kind, x = position.x, y = position.y, "Host skipped placement");
            return;
        }
        match sim.place_toy(kind, position) {
            Ok(toy_id) => debug!(toy_id = %toy_id, kind = %kind, "Host placed toy"),
            Err(err) => debug!(%err, "Host could not place toy"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use chrono::Utc;
    use petcare_core::{Collaborators, ManualClock, SimulationConfig};
    use petcare_toys::{BlockingEntity, SpatialOccupancyQuery};

    use super::*;

    /// A floor covered in boxes that counts how often it is asked.
    struct ClutteredFloor(Rc<Cell<usize>>);

    impl SpatialOccupancyQuery for ClutteredFloor {
        fn overlaps(&self, position: Position, _radius: f32) -> Vec<BlockingEntity> {
            self.0.set(self.0.get().saturating_add(1));
            vec![BlockingEntity {
                label: String::from("box"),
                position,
            }]
        }
    }

    fn sim() -> Simulation<ManualClock> {
        let clock = ManualClock::new(Utc::now());
        Simulation::from_config(clock, &SimulationConfig::default(), Collaborators::headless())
    }

    #[test]
    fn starter_pets_are_adopted_once() {
        let mut sim = sim();
        ScriptedHost::ensure_pets(&mut sim);
        ScriptedHost::ensure_pets(&mut sim);
        assert_eq!(sim.roster().len(), STARTER_PETS.len());
    }

    #[test]
    fn scripted_run_keeps_stats_in_range() {
        let mut sim = sim();
        let mut host = ScriptedHost::new(7, 30);
        ScriptedHost::ensure_pets(&mut sim);
        for _ in 0..2_000 {
            sim.clock().advance(0.5);
            host.act(&mut sim);
            let summary = sim.run_tick();
            assert!(summary.live_toys <= 2);
        }
        for pet in sim.roster().iter() {
            assert!(pet.energy() <= STAT_MAX);
            assert!(pet.satiety() <= STAT_MAX);
        }
    }

    #[test]
    fn blocked_floor_is_checked_before_placing() {
        let queries = Rc::new(Cell::new(0));
        let collaborators = Collaborators {
            spatial: Box::new(ClutteredFloor(Rc::clone(&queries))),
            ..Collaborators::headless()
        };
        let clock = ManualClock::new(Utc::now());
        let mut sim = Simulation::from_config(clock, &SimulationConfig::default(), collaborators);
        let mut host = ScriptedHost::new(3, 30);

        let mut attempts: usize = 0;
        for _ in 0..500 {
            let before = queries.get();
            host.maybe_place_toy(&mut sim);
            let asked = queries.get().saturating_sub(before);
            // One check per attempt; a blocked spot never reaches place_toy.
            assert!(asked <= 1);
            attempts = attempts.saturating_add(asked);
        }
        assert!(attempts > 0);
        assert!(sim.toys().iter().next().is_none());
    }
}
