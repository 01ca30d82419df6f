//! Interfaces to the systems around the toy core.
//!
//! Rendering, physics, and rewards live outside this workspace. The toy
//! core talks to them only through these traits. Each trait has a no-op
//! implementation so a headless host can run without them.

use std::sync::mpsc::Sender;

use petcare_types::{PetId, Position, ToyId, ToyKind};
use tracing::debug;

/// Something that blocks toy placement.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockingEntity {
    /// Human-readable name for logs.
    pub label: String,
    /// Where the entity is.
    pub position: Position,
}

/// Spatial lookups used to validate placement.
pub trait SpatialOccupancyQuery {
    /// Every entity overlapping the circle at `position` with `radius`.
    fn overlaps(&self, position: Position, radius: f32) -> Vec<BlockingEntity>;
}

/// Receives the outcome of every toy ending.
pub trait RewardCollaborator {
    /// Called once per toy as it ends.
    ///
    /// Currency is only granted when `ended_without_interaction` is false.
    fn on_toy_ending(&mut self, kind: ToyKind, ended_without_interaction: bool);
}

/// The visual layer's fade-out capability.
pub trait Fadeable {
    /// Start fading out `toy`. Call [`FadeCompletion::complete`] when done.
    fn start_fade_out(&mut self, toy: ToyId, kind: ToyKind, immediate: bool, completion: FadeCompletion);
}

/// Returns pets to idle when their toy is torn down.
pub trait PetNotifier {
    /// Clear whatever toy activity `pet` had and make it idle.
    fn return_to_idle(&mut self, pet: PetId);
}

/// A toy whose teardown has fully finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DestroyedToy {
    /// The toy that was destroyed.
    pub toy_id: ToyId,
    /// Its kind.
    pub kind: ToyKind,
}

/// One-shot handle the visual layer uses to report a finished fade.
///
/// Completing queues the final destruction; the simulation reports it on
/// its next frame. Dropping the handle without completing leaves the toy
/// visually present but has no effect on simulation state.
#[derive(Debug)]
pub struct FadeCompletion {
    toy: DestroyedToy,
    sender: Sender<DestroyedToy>,
}

impl FadeCompletion {
    pub(crate) const fn new(toy: DestroyedToy, sender: Sender<DestroyedToy>) -> Self {
        Self { toy, sender }
    }

    /// Report that the fade has finished.
    pub fn complete(self) {
        if self.sender.send(self.toy).is_err() {
            debug!(toy_id = %self.toy.toy_id, "Fade completed after coordinator was dropped");
        }
    }
}

/// A floor with nothing on it.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenFloor;

impl SpatialOccupancyQuery for OpenFloor {
    fn overlaps(&self, _position: Position, _radius: f32) -> Vec<BlockingEntity> {
        Vec::new()
    }
}

/// Ignores every toy ending.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRewards;

impl RewardCollaborator for NoRewards {
    fn on_toy_ending(&mut self, _kind: ToyKind, _ended_without_interaction: bool) {}
}
