//! The bundle of external systems a [`Simulation`] talks to.
//!
//! [`Simulation`]: crate::simulation::Simulation

use petcare_toys::{Fadeable, NoRewards, OpenFloor, RewardCollaborator, SpatialOccupancyQuery};
use petcare_types::PetId;

/// Mirrors pet activity into the animation layer.
///
/// Write-only: the simulation never reads flags back.
pub trait AnimationSink {
    /// Set the named animator boolean for `pet`.
    fn set_flag(&mut self, pet: PetId, flag: &'static str, value: bool);
}

/// Animation sink for hosts without an animation layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAnimation;

impl AnimationSink for NoAnimation {
    fn set_flag(&mut self, _pet: PetId, _flag: &'static str, _value: bool) {}
}

/// Every external system the simulation calls into.
pub struct Collaborators {
    /// Told about every toy ending.
    pub rewards: Box<dyn RewardCollaborator>,
    /// Fades ended toys out. `None` destroys them immediately.
    pub fade: Option<Box<dyn Fadeable>>,
    /// Mirrors pet activity changes.
    pub animation: Box<dyn AnimationSink>,
    /// Answers placement queries.
    pub spatial: Box<dyn SpatialOccupancyQuery>,
}

impl Collaborators {
    /// No rewards, no fades, no animation, and an empty floor.
    pub fn headless() -> Self {
        Self {
            rewards: Box::new(NoRewards),
            fade: None,
            animation: Box::new(NoAnimation),
            spatial: Box::new(OpenFloor),
        }
    }
}

impl Default for Collaborators {
    fn default() -> Self {
        Self::headless()
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators")
            .field("has_fade", &self.fade.is_some())
            .finish_non_exhaustive()
    }
}
