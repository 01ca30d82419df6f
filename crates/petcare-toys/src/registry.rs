//! The owner of every live toy.
//!
//! [`ToyRegistry`] holds at most one [`ToyLifecycleController`] per
//! [`ToyKind`]. It is owned by the simulation and passed where needed, so
//! uniqueness is a property of this map rather than of global state.
//!
//! A toy stays registered until it is retired after teardown. A second
//! spawn of a kind that is already registered is refused and logged as an
//! error: it means a caller skipped [`ToyRegistry::can_place_at`].

use std::collections::BTreeMap;

use petcare_types::{PetId, Position, ToyId, ToyKind};
use tracing::{error, info};

use crate::collaborators::SpatialOccupancyQuery;
use crate::config::{ToyConfig, ToyConfigs};
use crate::error::ToyError;
use crate::lifecycle::{ToyEnding, ToyLifecycleController};

/// Singleton-per-kind storage for live toys.
#[derive(Debug, Default)]
pub struct ToyRegistry {
    toys: BTreeMap<ToyKind, ToyLifecycleController>,
    configs: ToyConfigs,
}

impl ToyRegistry {
    /// Create an empty registry.
    pub const fn new(configs: ToyConfigs) -> Self {
        Self {
            toys: BTreeMap::new(),
            configs,
        }
    }

    /// Tunables for `kind`.
    pub const fn config(&self, kind: ToyKind) -> &ToyConfig {
        self.configs.for_kind(kind)
    }

    /// Whether a toy of `kind` is registered.
    pub fn is_live(&self, kind: ToyKind) -> bool {
        self.toys.contains_key(&kind)
    }

    /// Whether a toy of `kind` may be placed at `position`.
    ///
    /// False while one is live, regardless of what is on the floor.
    pub fn can_place_at(
        &self,
        kind: ToyKind,
        position: Position,
        radius: f32,
        spatial: &dyn SpatialOccupancyQuery,
    ) -> bool {
        !self.is_live(kind) && spatial.overlaps(position, radius).is_empty()
    }

    /// Validate placement with the configured radius, then spawn.
    ///
    /// # Errors
    ///
    /// [`ToyError::AlreadyActive`] if a toy of this kind is live, or
    /// [`ToyError::PlacementBlocked`] if something overlaps the spot.
    pub fn place(
        &mut self,
        kind: ToyKind,
        position: Position,
        now: f64,
        spatial: &dyn SpatialOccupancyQuery,
    ) -> Result<ToyId, ToyError> {
        if !self.is_live(kind) {
            let blockers = spatial
                .overlaps(position, self.config(kind).placement_radius)
                .len();
            if blockers > 0 {
                return Err(ToyError::PlacementBlocked { kind, blockers });
            }
        }
        self.spawn(kind, position, now)
    }

    /// Register a new toy without spatial checks.
    ///
    /// # Errors
    ///
    /// Returns [`ToyError::AlreadyActive`] if a toy of this kind is live.
    /// The existing toy is untouched.
    pub fn spawn(&mut self, kind: ToyKind, position: Position, now: f64) -> Result<ToyId, ToyError> {
        if let Some(existing) = self.toys.get(&kind) {
            let existing = existing.id();
            error!(
                kind = %kind,
                existing_toy_id = %existing,
                "Refusing to spawn a second live toy of the same kind"
            );
            return Err(ToyError::AlreadyActive { kind, existing });
        }

        let toy = ToyLifecycleController::spawn(
            kind,
            position,
            self.config(kind).min_lifetime_secs,
            now,
        );
        let id = toy.id();
        self.toys.insert(kind, toy);
        Ok(id)
    }

    /// The live toy of `kind`.
    pub fn get(&self, kind: ToyKind) -> Option<&ToyLifecycleController> {
        self.toys.get(&kind)
    }

    /// The live toy of `kind`, mutably.
    pub fn get_mut(&mut self, kind: ToyKind) -> Option<&mut ToyLifecycleController> {
        self.toys.get_mut(&kind)
    }

    /// Every live toy, in kind order.
    pub fn iter(&self) -> impl Iterator<Item = &ToyLifecycleController> {
        self.toys.values()
    }

    /// The toy `pet` is attracted to or playing with, if any.
    pub fn toy_involving(&self, pet: PetId) -> Option<ToyKind> {
        self.toys
            .values()
            .find(|toy| toy.involves(pet))
            .map(ToyLifecycleController::kind)
    }

    /// Tick every live toy, collecting the ones that started ending.
    pub fn tick_all(&mut self, now: f64) -> Vec<ToyEnding> {
        self.toys.values_mut().filter_map(|toy| toy.tick(now)).collect()
    }

    /// Drop a toy from the registry so its kind can be placed again.
    ///
    /// Only removes the toy if it is still the one registered for `kind`.
    pub fn retire(&mut self, kind: ToyKind, toy_id: ToyId) -> Option<ToyLifecycleController> {
        if self.toys.get(&kind).map(ToyLifecycleController::id) != Some(toy_id) {
            return None;
        }
        let retired = self.toys.remove(&kind);
        if retired.is_some() {
            info!(kind = %kind, toy_id = %toy_id, "Toy retired");
        }
        retired
    }
}
