//! Error types for the petcare-toys crate.

use petcare_types::{ToyId, ToyKind};

/// Errors that can occur while placing or looking up toys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ToyError {
    /// A live toy of this kind already exists. The existing toy is kept.
    #[error("a {kind} is already active ({existing})")]
    AlreadyActive {
        /// The kind that was requested.
        kind: ToyKind,
        /// The toy that stays authoritative.
        existing: ToyId,
    },

    /// Something is in the way at the requested position.
    #[error("cannot place {kind}: {blockers} blocking entities")]
    PlacementBlocked {
        /// The kind that was requested.
        kind: ToyKind,
        /// How many entities overlapped the placement radius.
        blockers: usize,
    },
}
