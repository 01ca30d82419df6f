//! Teardown sequencing for toys that have ended.
//!
//! When a toy ends, [`FadeOutCoordinator::begin_teardown`] runs these
//! steps in order:
//!
//! 1. every pet still attached to the toy is returned to idle;
//! 2. the reward collaborator learns whether anyone played with it;
//! 3. the visual layer is asked to fade the toy out.
//!
//! Simulation state is final by step 1. The fade is fire-and-forget: its
//! [`FadeCompletion`] handle queues the final destruction, which the owner
//! collects with [`FadeOutCoordinator::drain_destroyed`]. Without a visual
//! layer the toy is destroyed on the spot.
//!
//! The coordinator only remembers toys that are still fading. Once a toy's
//! destruction has been reported it is forgotten; the registry has retired
//! it by then, so no second ending can arrive for it.

use std::collections::BTreeSet;
use std::sync::mpsc::{self, Receiver, Sender};

use petcare_types::ToyId;
use tracing::{debug, info, warn};

use crate::collaborators::{DestroyedToy, FadeCompletion, Fadeable, PetNotifier, RewardCollaborator};
use crate::lifecycle::ToyEnding;

/// What [`FadeOutCoordinator::begin_teardown`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownOutcome {
    /// A fade was started; destruction follows when it completes.
    FadeStarted,
    /// No visual layer was available, so the toy was destroyed at once.
    Destroyed(DestroyedToy),
    /// This toy is already fading out. Nothing happened.
    AlreadyTornDown,
}

/// Runs each toy's teardown exactly once.
#[derive(Debug)]
pub struct FadeOutCoordinator {
    fading: BTreeSet<ToyId>,
    sender: Sender<DestroyedToy>,
    receiver: Receiver<DestroyedToy>,
}

impl Default for FadeOutCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

impl FadeOutCoordinator {
    /// Create a coordinator with nothing in flight.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self {
            fading: BTreeSet::new(),
            sender,
            receiver,
        }
    }

    /// Tear down an ended toy.
    pub fn begin_teardown(
        &mut self,
        ending: &ToyEnding,
        pets: &mut dyn PetNotifier,
        rewards: &mut dyn RewardCollaborator,
        fade: Option<&mut dyn Fadeable>,
    ) -> TeardownOutcome {
        if self.fading.contains(&ending.toy_id) {
            warn!(toy_id = %ending.toy_id, kind = %ending.kind, "Duplicate teardown ignored");
            return TeardownOutcome::AlreadyTornDown;
        }

        for pet in &ending.occupants {
            pets.return_to_idle(*pet);
        }

        rewards.on_toy_ending(ending.kind, ending.ended_without_interaction);

        let destroyed = DestroyedToy {
            toy_id: ending.toy_id,
            kind: ending.kind,
        };
        match fade {
            Some(fadeable) => {
                debug!(toy_id = %ending.toy_id, "Starting toy fade-out");
                self.fading.insert(ending.toy_id);
                let completion = FadeCompletion::new(destroyed, self.sender.clone());
                fadeable.start_fade_out(ending.toy_id, ending.kind, false, completion);
                TeardownOutcome::FadeStarted
            }
            None => {
                info!(toy_id = %ending.toy_id, kind = %ending.kind, "Toy destroyed without fade");
                TeardownOutcome::Destroyed(destroyed)
            }
        }
    }

    /// Collect every toy whose fade has completed since the last call.
    pub fn drain_destroyed(&mut self) -> Vec<DestroyedToy> {
        let destroyed: Vec<DestroyedToy> = self.receiver.try_iter().collect();
        for toy in &destroyed {
            self.fading.remove(&toy.toy_id);
            info!(toy_id = %toy.toy_id, kind = %toy.kind, "Toy destroyed after fade");
        }
        destroyed
    }
}
