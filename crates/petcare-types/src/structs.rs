//! Plain data structs shared between the simulation and its host.
//!
//! The status structs are read-only snapshots for UI display. They are
//! produced fresh on every request and never fed back into the simulation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{InteractionState, LifecycleState, ToyKind};
use crate::ids::{PetId, ToyId};

/// A point on the play floor, in world units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Position {
    /// Create a position from its coordinates.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another position.
    pub fn distance(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.hypot(dy)
    }
}

/// Read-only view of a pet for the status panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PetStatus {
    /// The pet.
    pub pet_id: PetId,
    /// Display name.
    pub name: String,
    /// Energy, 0--100.
    pub energy: u32,
    /// Satiety, 0--100.
    pub satiety: u32,
    /// Current activity.
    pub interaction_state: InteractionState,
    /// Whether the boredom debuff is active.
    pub is_bored: bool,
    /// Wall-clock time at which boredom wears off, when bored.
    pub bored_until: Option<DateTime<Utc>>,
}

/// Read-only view of a live toy for the toy HUD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ToyStatusInfo {
    /// The toy instance.
    pub toy_id: ToyId,
    /// Which toy this is.
    pub kind: ToyKind,
    /// Lifecycle phase.
    pub lifecycle_state: LifecycleState,
    /// Pets drawn toward the toy but not playing with it.
    pub attracted_count: u32,
    /// Pets playing with the toy (0 or 1).
    pub interacting_count: u32,
    /// Seconds left until the minimum lifetime is reached, never negative.
    pub remaining_seconds: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Position::new(0.0, 0.0);
        let b = Position::new(3.0, 4.0);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn toy_status_serializes() {
        let status = ToyStatusInfo {
            toy_id: ToyId::new(),
            kind: ToyKind::ToyMouse,
            lifecycle_state: LifecycleState::Active,
            attracted_count: 2,
            interacting_count: 1,
            remaining_seconds: 4.5,
        };
        let json = serde_json::to_value(&status).ok();
        assert_eq!(
            json.as_ref().and_then(|v| v.get("attracted_count")).and_then(serde_json::Value::as_u64),
            Some(2)
        );
    }
}
