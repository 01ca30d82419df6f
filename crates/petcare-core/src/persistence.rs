//! Saving and loading pets.
//!
//! The simulation only needs a handful of values per pet to survive a
//! restart: the two resources, the boredom flag, and two wall-clock
//! timestamps. Timestamps travel as strings so that a corrupt or legacy
//! value degrades to "unknown" on load instead of failing the whole save.
//!
//! [`PersistenceProvider`] is the seam to whatever storage the host uses.
//! Two adapters ship here: [`InMemoryPersistence`] for tests and
//! [`JsonFilePersistence`] for the headless engine.

use std::path::{Path, PathBuf};

use petcare_needs::{Pet, PetRestore, format_timestamp, parse_timestamp};
use petcare_types::PetId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Save file layout version written by [`JsonFilePersistence`].
pub const SAVE_VERSION: u32 = 1;

/// Errors that can occur while reading or writing saves.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    /// Failed to read or write the save file.
    #[error("save file I/O failed: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// The save file is not valid JSON for this layout.
    #[error("save file is malformed: {source}")]
    Json {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },
}

/// The persisted form of one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPet {
    /// The pet's identifier.
    pub id: PetId,
    /// Display name.
    pub name: String,
    /// Energy at save time.
    pub energy: u32,
    /// Satiety at save time.
    pub satiety: u32,
    /// Whether the pet was bored.
    #[serde(default)]
    pub is_bored: bool,
    /// When the current boredom started.
    #[serde(default)]
    pub boredom_started_at: Option<String>,
    /// When resources were last reconciled.
    #[serde(default)]
    pub last_resource_sync_at: Option<String>,
}

impl SavedPet {
    /// Capture a pet for saving.
    pub fn from_pet(pet: &Pet) -> Self {
        Self {
            id: pet.id(),
            name: pet.name().to_owned(),
            energy: pet.energy(),
            satiety: pet.satiety(),
            is_bored: pet.is_bored_flag(),
            boredom_started_at: pet.boredom_started_at().map(format_timestamp),
            last_resource_sync_at: pet.last_resource_sync_at().map(format_timestamp),
        }
    }

    /// Parse the saved values into restore parameters.
    ///
    /// Unreadable timestamps become `None`.
    pub fn to_restore(&self) -> PetRestore {
        PetRestore {
            id: self.id,
            name: self.name.clone(),
            energy: self.energy,
            satiety: self.satiety,
            is_bored: self.is_bored,
            boredom_started_at: self.boredom_started_at.as_deref().and_then(parse_timestamp),
            last_resource_sync_at: self
                .last_resource_sync_at
                .as_deref()
                .and_then(parse_timestamp),
        }
    }
}

/// Storage for saved pets.
pub trait PersistenceProvider {
    /// Read every saved pet.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the storage cannot be read.
    fn load(&mut self) -> Result<Vec<SavedPet>, PersistenceError>;

    /// Replace the saved pets.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] if the storage cannot be written.
    fn store(&mut self, pets: &[SavedPet]) -> Result<(), PersistenceError>;
}

/// Keeps saves in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    pets: Vec<SavedPet>,
}

impl InMemoryPersistence {
    /// What is currently stored.
    pub fn pets(&self) -> &[SavedPet] {
        &self.pets
    }
}

impl PersistenceProvider for InMemoryPersistence {
    fn load(&mut self) -> Result<Vec<SavedPet>, PersistenceError> {
        Ok(self.pets.clone())
    }

    fn store(&mut self, pets: &[SavedPet]) -> Result<(), PersistenceError> {
        self.pets = pets.to_vec();
        Ok(())
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SaveFile {
    version: u32,
    pets: Vec<SavedPet>,
}

/// Keeps saves in a pretty-printed JSON file.
///
/// A missing file loads as an empty roster. Writes go to a sibling
/// `.json.tmp` file first and are renamed into place, so an interrupted
/// save leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct JsonFilePersistence {
    path: PathBuf,
}

impl JsonFilePersistence {
    /// Use the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Move an unreadable save file out of the way, to `<name>.corrupt`.
    ///
    /// The next [`load`](PersistenceProvider::load) then starts fresh while
    /// the bad file stays on disk for inspection.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::Io`] if the file cannot be renamed.
    pub fn set_aside(&self) -> Result<PathBuf, PersistenceError> {
        let target = sibling(&self.path, "corrupt");
        std::fs::rename(&self.path, &target)?;
        warn!(
            path = %self.path.display(),
            moved_to = %target.display(),
            "Unreadable save file set aside"
        );
        Ok(target)
    }
}

/// `path` with `suffix` appended to its full file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.file_name().map(std::ffi::OsStr::to_os_string).unwrap_or_default();
    name.push(".");
    name.push(suffix);
    path.with_file_name(name)
}

impl PersistenceProvider for JsonFilePersistence {
    fn load(&mut self) -> Result<Vec<SavedPet>, PersistenceError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No save file, starting fresh");
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };
        let save: SaveFile = serde_json::from_str(&contents)?;
        info!(
            path = %self.path.display(),
            version = save.version,
            pets = save.pets.len(),
            "Save file loaded"
        );
        Ok(save.pets)
    }

    fn store(&mut self, pets: &[SavedPet]) -> Result<(), PersistenceError> {
        let save = SaveFile {
            version: SAVE_VERSION,
            pets: pets.to_vec(),
        };
        let json = serde_json::to_string_pretty(&save)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = sibling(&self.path, "tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;
        info!(path = %self.path.display(), pets = pets.len(), "Save file written");
        Ok(())
    }
}
