//! Bringing saved pets back at startup.

use petcare_core::{Clock, JsonFilePersistence, PersistenceError, Simulation};
use tracing::{info, warn};

/// Restore saved pets and catch them up on the time away. Returns how many
/// came back.
///
/// A save file that no longer parses is set aside and the engine starts
/// with an empty roster rather than refusing to run.
///
/// # Errors
///
/// Returns [`PersistenceError::Io`] if the file cannot be read, or cannot
/// be moved aside after failing to parse.
pub fn restore_pets<C: Clock>(
    sim: &mut Simulation<C>,
    store: &mut JsonFilePersistence,
) -> Result<usize, PersistenceError> {
    let reports = match sim.load_from(store) {
        Ok(reports) => reports,
        Err(err @ PersistenceError::Json { .. }) => {
            warn!(%err, "Save file is unreadable, starting with no pets");
            store.set_aside()?;
            return Ok(0);
        }
        Err(err) => return Err(err),
    };
    for (pet_id, report) in &reports {
        info!(
            pet_id = %pet_id,
            elapsed_seconds = report.elapsed_seconds,
            energy_delta = report.energy_delta,
            satiety_delta = report.satiety_delta,
            boredom_cleared = report.boredom_cleared,
            "Caught up on time away"
        );
    }
    Ok(reports.len())
}
