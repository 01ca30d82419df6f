//! Enumeration types for the pet-care simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Toys
// ---------------------------------------------------------------------------

/// The kind of a placeable toy.
///
/// At most one live instance of each kind may exist at a time. Both kinds
/// share the same lifecycle; they differ only in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum ToyKind {
    /// A feather wand that one pet at a time can bat at.
    CatTeaser,
    /// A wind-up mouse that one pet at a time can chase.
    ToyMouse,
}

impl ToyKind {
    /// Short snake-case name, used in config keys and log fields.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CatTeaser => "cat_teaser",
            Self::ToyMouse => "toy_mouse",
        }
    }
}

impl core::fmt::Display for ToyKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle phase of a placed toy.
///
/// `Spawned` is only observable inside construction; a toy is `Active` as
/// soon as the registry hands it out. `Ending` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum LifecycleState {
    /// Just created, not yet accepting pets.
    Spawned,
    /// Accepting attraction and interaction.
    Active,
    /// Torn down or being torn down. Never returns to `Active`.
    Ending,
}

// ---------------------------------------------------------------------------
// Pets
// ---------------------------------------------------------------------------

/// The single high-level activity a pet is engaged in.
///
/// Exactly one variant holds at a time. The toy variants carry the kind of
/// toy involved so that "which toy" never needs a second flag.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum InteractionState {
    /// Not doing anything in particular.
    #[default]
    Idle,
    /// Drawn toward a toy but not yet playing with it.
    Attracted(ToyKind),
    /// Holding the interaction slot of a toy.
    Interacting(ToyKind),
    /// Eating from a bowl.
    Eating,
    /// Asleep. Energy recovers instead of decaying.
    Sleeping,
    /// Being patted by the player.
    Patting,
}

impl InteractionState {
    /// Whether the pet is idle.
    pub const fn is_idle(self) -> bool {
        matches!(self, Self::Idle)
    }

    /// The toy kind this state refers to, if any.
    pub const fn toy(self) -> Option<ToyKind> {
        match self {
            Self::Attracted(kind) | Self::Interacting(kind) => Some(kind),
            Self::Idle | Self::Eating | Self::Sleeping | Self::Patting => None,
        }
    }

    /// Name of the animator boolean that mirrors this state.
    ///
    /// `Idle` has no flag of its own: it is the absence of every other flag.
    pub const fn animation_flag(self) -> Option<&'static str> {
        match self {
            Self::Idle => None,
            Self::Attracted(_) => Some("isAttracted"),
            Self::Interacting(ToyKind::CatTeaser) => Some("isCatTeasering"),
            Self::Interacting(ToyKind::ToyMouse) => Some("isPlayingMouse"),
            Self::Eating => Some("isEating"),
            Self::Sleeping => Some("isSleeping"),
            Self::Patting => Some("isPatting"),
        }
    }
}
