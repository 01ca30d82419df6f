//! The set of pets currently alive in the simulation.
//!
//! [`PetRoster`] owns every [`Pet`] keyed by [`PetId`]. Iteration order is
//! the id order, which is also adoption order because ids are UUID v7.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use petcare_types::PetId;
use tracing::info;

use crate::config::NeedsConfig;
use crate::error::PetError;
use crate::offline::{self, CatchUpReport};
use crate::pet::Pet;
use crate::resource_clock::{self, ResourceTick};

/// Owns and looks up pets.
#[derive(Debug, Default)]
pub struct PetRoster {
    pets: BTreeMap<PetId, Pet>,
}

impl PetRoster {
    /// Create an empty roster.
    pub const fn new() -> Self {
        Self {
            pets: BTreeMap::new(),
        }
    }

    /// Adopt a new pet with starting needs from `config`.
    pub fn adopt(&mut self, name: String, config: &NeedsConfig, now: DateTime<Utc>) -> PetId {
        let pet = Pet::adopt(name, config, now);
        let id = pet.id();
        info!(pet_id = %id, name = pet.name(), "Pet adopted");
        self.pets.insert(id, pet);
        id
    }

    /// Insert an existing pet, e.g. one restored from a save.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::DuplicatePet`] if a pet with the same id exists.
    pub fn insert(&mut self, pet: Pet) -> Result<(), PetError> {
        let id = pet.id();
        if self.pets.contains_key(&id) {
            return Err(PetError::DuplicatePet(id));
        }
        self.pets.insert(id, pet);
        Ok(())
    }

    /// Remove a pet, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`PetError::PetNotFound`] if the pet is not in the roster.
    pub fn remove(&mut self, id: PetId) -> Result<Pet, PetError> {
        self.pets.remove(&id).ok_or(PetError::PetNotFound(id))
    }

    /// Look up a pet.
    pub fn get(&self, id: PetId) -> Option<&Pet> {
        self.pets.get(&id)
    }

    /// Look up a pet mutably.
    pub fn get_mut(&mut self, id: PetId) -> Option<&mut Pet> {
        self.pets.get_mut(&id)
    }

    /// Whether the roster holds this pet.
    pub fn contains(&self, id: PetId) -> bool {
        self.pets.contains_key(&id)
    }

    /// Every pet, in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Pet> {
        self.pets.values()
    }

    /// Every pet id, in id order.
    pub fn ids(&self) -> Vec<PetId> {
        self.pets.keys().copied().collect()
    }

    /// Number of pets.
    pub fn len(&self) -> usize {
        self.pets.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.pets.is_empty()
    }

    /// Reconcile the given pets against the wall clock and mark them synced.
    ///
    /// Unknown ids are skipped. Calling this twice with the same `now`
    /// changes nothing the second time.
    pub fn catch_up(
        &mut self,
        ids: &[PetId],
        now: DateTime<Utc>,
        config: &NeedsConfig,
    ) -> Vec<(PetId, CatchUpReport)> {
        let mut reports = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(pet) = self.pets.get_mut(id) else {
                continue;
            };
            let last = pet.last_resource_sync_at();
            let report = offline::apply_elapsed(pet, last, now, config);
            pet.mark_synced(now);
            reports.push((*id, report));
        }
        reports
    }

    /// Advance every pet's resources by one frame.
    ///
    /// Only pets whose stats visibly changed are returned.
    pub fn tick_all(&mut self, delta_seconds: f64, config: &NeedsConfig) -> Vec<(PetId, ResourceTick)> {
        self.pets
            .iter_mut()
            .filter_map(|(id, pet)| {
                let result = resource_clock::tick(pet, delta_seconds, config);
                (!result.is_noop()).then_some((*id, result))
            })
            .collect()
    }

    /// Stamp every pet as synced at `now`, e.g. right before saving.
    pub fn mark_all_synced(&mut self, now: DateTime<Utc>) {
        for pet in self.pets.values_mut() {
            pet.mark_synced(now);
        }
    }
}
