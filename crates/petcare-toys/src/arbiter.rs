//! Single-slot arbitration for toy interaction.
//!
//! A toy has one interaction slot. These functions are the only way the
//! slot value changes: they take the current holder and return the next
//! one. There is no state in here, so both toy kinds share the same rules.
//!
//! Same-frame claims are resolved by call order. The first claimant wins
//! and every later claimant is rejected; nobody is ever displaced.

use petcare_types::PetId;

/// A claim lost to the pet already holding the slot.
///
/// This is an expected outcome, not a fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("pet {requester} cannot interact: slot held by {holder}")]
pub struct ClaimRejected {
    /// The pet holding the slot.
    pub holder: PetId,
    /// The pet that asked for it.
    pub requester: PetId,
}

/// Ask for the slot on behalf of `requester`.
///
/// An empty slot goes to the requester. Re-claiming a slot you already
/// hold succeeds without change.
///
/// # Errors
///
/// Returns [`ClaimRejected`] when another pet holds the slot. The slot is
/// unchanged in that case.
pub fn try_claim(current: Option<PetId>, requester: PetId) -> Result<Option<PetId>, ClaimRejected> {
    match current {
        None => Ok(Some(requester)),
        Some(holder) if holder == requester => Ok(Some(holder)),
        Some(holder) => Err(ClaimRejected { holder, requester }),
    }
}

/// Give the slot back on behalf of `holder`.
///
/// Releasing a slot held by someone else, or an empty slot, changes
/// nothing.
pub fn release(current: Option<PetId>, holder: PetId) -> Option<PetId> {
    match current {
        Some(current_holder) if current_holder == holder => None,
        other => other,
    }
}
