//! Identifiers for pets and toys.
//!
//! Pets and toys each get their own ID type so that a pet can never be
//! handed to an API expecting a toy. Both wrap a UUID v7, so ids sort by
//! creation time and a save file lists pets in adoption order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[serde(transparent)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(Uuid);

        impl $name {
            /// A fresh, time-ordered identifier.
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wrap an existing UUID, e.g. one read from a save file.
            pub const fn from_uuid(id: Uuid) -> Self {
                Self(id)
            }

            /// The wrapped UUID.
            pub const fn as_uuid(self) -> Uuid {
                self.0
            }

            #[doc = concat!("Short form for logs, e.g. `", $label, ":0190a1b2`.")]
            pub fn short(self) -> String {
                let simple = self.0.simple().to_string();
                format!("{}:{}", $label, simple.get(..8).unwrap_or(&simple))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

define_id! {
    /// Identifies a pet for its whole life, across saves.
    PetId, "pet"
}

define_id! {
    /// Identifies one placed toy. A replacement toy of the same kind gets a
    /// new id.
    ToyId, "toy"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_ids_are_distinct() {
        assert_ne!(PetId::new(), PetId::new());
        assert_ne!(ToyId::new().as_uuid(), Uuid::nil());
    }

    #[test]
    fn serializes_as_a_bare_uuid() {
        let id = PetId::from_uuid(Uuid::nil());
        let json = serde_json::to_string(&id).ok();
        assert_eq!(json.as_deref(), Some("\"00000000-0000-0000-0000-000000000000\""));
        let restored: Option<PetId> = json.and_then(|j| serde_json::from_str(&j).ok());
        assert_eq!(restored, Some(id));
    }

    #[test]
    fn short_form_is_labelled() {
        let id = ToyId::from_uuid(Uuid::nil());
        assert_eq!(id.short(), "toy:00000000");
        assert_eq!(id.to_string(), Uuid::nil().to_string());
    }
}
