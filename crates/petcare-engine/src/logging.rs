//! Collaborators that stand in for the visual and reward layers by
//! logging what they are asked to do.

use petcare_core::{AnimationSink, Collaborators};
use petcare_toys::{FadeCompletion, Fadeable, OpenFloor, RewardCollaborator};
use petcare_types::{PetId, ToyId, ToyKind};
use tracing::{info, trace};

/// Logs animator flag changes at `trace`.
#[derive(Debug, Default)]
pub struct LogAnimation;

impl AnimationSink for LogAnimation {
    fn set_flag(&mut self, pet: PetId, flag: &'static str, value: bool) {
        trace!(pet = %pet.short(), flag, value, "Animator flag");
    }
}

/// Logs toy endings and keeps a running reward total.
#[derive(Debug, Default)]
pub struct LogRewards {
    rewarded: u64,
}

impl RewardCollaborator for LogRewards {
    fn on_toy_ending(&mut self, kind: ToyKind, ended_without_interaction: bool) {
        if ended_without_interaction {
            info!(kind = %kind, "Toy ended untouched, no reward");
        } else {
            self.rewarded = self.rewarded.saturating_add(1);
            info!(kind = %kind, rewarded = self.rewarded, "Toy ended, reward granted");
        }
    }
}

/// Finishes every fade instantly. The toy is reported destroyed on the
/// following frame.
#[derive(Debug, Default)]
pub struct InstantFade;

impl Fadeable for InstantFade {
    fn start_fade_out(&mut self, toy: ToyId, kind: ToyKind, immediate: bool, completion: FadeCompletion) {
        trace!(toy_id = %toy, kind = %kind, immediate, "Fade out");
        completion.complete();
    }
}

/// The collaborator set used by the headless engine.
pub fn logging_collaborators() -> Collaborators {
    Collaborators {
        rewards: Box::new(LogRewards::default()),
        fade: Some(Box::new(InstantFade)),
        animation: Box::new(LogAnimation),
        spatial: Box::new(OpenFloor),
    }
}
