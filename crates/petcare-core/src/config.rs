//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `petcare-config.yaml` at the project
//! root. Every section and field is optional; missing values fall back to
//! the defaults below, which match the built-in [`NeedsConfig`] and
//! [`ToyConfigs`] defaults.

use std::path::Path;

use petcare_needs::{NeedsConfig, ResourceRate};
use petcare_toys::{ToyConfig, ToyConfigs};
use petcare_types::ToyKind;
use serde::Deserialize;

/// Environment variable that overrides `simulation.save_path`.
pub const SAVE_PATH_ENV: &str = "PETCARE_SAVE_PATH";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `petcare-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Frame pacing, seeding, and save location.
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Pet needs rates.
    #[serde(default)]
    pub needs: NeedsSection,

    /// Per-kind toy tunables.
    #[serde(default)]
    pub toys: ToysSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `PETCARE_SAVE_PATH` overrides `simulation.save_path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.simulation.apply_env_overrides();
        Ok(config)
    }
}

/// Frame pacing, seeding, and save location.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSection {
    /// Real-time milliseconds between frames.
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,

    /// Seed for gameplay rolls.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Where the headless engine keeps its save file.
    #[serde(default = "default_save_path")]
    pub save_path: String,

    /// Stop after this many frames. Runs until interrupted when absent.
    #[serde(default)]
    pub max_frames: Option<u64>,
}

impl SimulationSection {
    /// Override the save path with `PETCARE_SAVE_PATH` when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var(SAVE_PATH_ENV) {
            self.save_path = val;
        }
    }
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            seed: default_seed(),
            save_path: default_save_path(),
            max_frames: None,
        }
    }
}

/// Pet needs rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NeedsSection {
    /// Seconds per energy step while awake.
    #[serde(default = "default_energy_awake_interval_secs")]
    pub energy_awake_interval_secs: f64,

    /// Energy change per awake step.
    #[serde(default = "default_energy_awake_step")]
    pub energy_awake_step: i32,

    /// Seconds per energy step while sleeping.
    #[serde(default = "default_energy_sleeping_interval_secs")]
    pub energy_sleeping_interval_secs: f64,

    /// Energy change per sleeping step.
    #[serde(default = "default_energy_sleeping_step")]
    pub energy_sleeping_step: i32,

    /// Seconds per satiety step.
    #[serde(default = "default_satiety_interval_secs")]
    pub satiety_interval_secs: f64,

    /// Satiety change per step.
    #[serde(default = "default_satiety_step")]
    pub satiety_step: i32,

    /// Seconds a bored pet needs before it will play again.
    #[serde(default = "default_boredom_recovery_secs")]
    pub boredom_recovery_secs: u64,

    /// Energy of a newly adopted pet.
    #[serde(default = "default_starting_stat")]
    pub starting_energy: u32,

    /// Satiety of a newly adopted pet.
    #[serde(default = "default_starting_stat")]
    pub starting_satiety: u32,

    /// Satiety restored by one meal.
    #[serde(default = "default_feed_amount")]
    pub feed_amount: u32,
}

impl NeedsSection {
    /// Build the runtime needs configuration.
    pub const fn to_needs_config(&self) -> NeedsConfig {
        NeedsConfig {
            energy_awake: ResourceRate::new(self.energy_awake_interval_secs, self.energy_awake_step),
            energy_sleeping: ResourceRate::new(
                self.energy_sleeping_interval_secs,
                self.energy_sleeping_step,
            ),
            satiety: ResourceRate::new(self.satiety_interval_secs, self.satiety_step),
            boredom_recovery_secs: self.boredom_recovery_secs,
            starting_energy: self.starting_energy,
            starting_satiety: self.starting_satiety,
        }
    }
}

impl Default for NeedsSection {
    fn default() -> Self {
        Self {
            energy_awake_interval_secs: default_energy_awake_interval_secs(),
            energy_awake_step: default_energy_awake_step(),
            energy_sleeping_interval_secs: default_energy_sleeping_interval_secs(),
            energy_sleeping_step: default_energy_sleeping_step(),
            satiety_interval_secs: default_satiety_interval_secs(),
            satiety_step: default_satiety_step(),
            boredom_recovery_secs: default_boredom_recovery_secs(),
            starting_energy: default_starting_stat(),
            starting_satiety: default_starting_stat(),
            feed_amount: default_feed_amount(),
        }
    }
}

/// Per-kind toy tunables.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ToysSection {
    /// Cat teaser overrides.
    #[serde(default)]
    pub cat_teaser: ToySection,

    /// Toy mouse overrides.
    #[serde(default)]
    pub toy_mouse: ToySection,
}

impl ToysSection {
    /// Build the runtime toy configuration.
    pub const fn to_toy_configs(&self) -> ToyConfigs {
        ToyConfigs {
            cat_teaser: self.cat_teaser.to_toy_config(ToyKind::CatTeaser),
            toy_mouse: self.toy_mouse.to_toy_config(ToyKind::ToyMouse),
        }
    }
}

/// Overrides for one toy kind. Absent fields keep that kind's defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ToySection {
    /// Seconds a toy stays up before it may end.
    pub min_lifetime_secs: Option<f64>,

    /// Radius checked for blocking entities when placing.
    pub placement_radius: Option<f32>,

    /// Probability that a pet gets bored after a play session.
    pub boredom_chance: Option<f64>,

    /// Energy a pet spends per finished play session.
    pub energy_cost: Option<u32>,
}

impl ToySection {
    /// Apply these overrides on top of the defaults for `kind`.
    pub const fn to_toy_config(&self, kind: ToyKind) -> ToyConfig {
        let base = ToyConfig::default_for(kind);
        ToyConfig {
            min_lifetime_secs: match self.min_lifetime_secs {
                Some(value) => value,
                None => base.min_lifetime_secs,
            },
            placement_radius: match self.placement_radius {
                Some(value) => value,
                None => base.placement_radius,
            },
            boredom_chance: match self.boredom_chance {
                Some(value) => value,
                None => base.boredom_chance,
            },
            energy_cost: match self.energy_cost {
                Some(value) => value,
                None => base.energy_cost,
            },
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_frame_interval_ms() -> u64 {
    100
}

const fn default_seed() -> u64 {
    42
}

fn default_save_path() -> String {
    "petcare-save.json".to_owned()
}

const fn default_energy_awake_interval_secs() -> f64 {
    60.0
}

const fn default_energy_awake_step() -> i32 {
    -1
}

const fn default_energy_sleeping_interval_secs() -> f64 {
    60.0
}

const fn default_energy_sleeping_step() -> i32 {
    1
}

const fn default_satiety_interval_secs() -> f64 {
    45.0
}

const fn default_satiety_step() -> i32 {
    -1
}

const fn default_boredom_recovery_secs() -> u64 {
    300
}

const fn default_starting_stat() -> u32 {
    100
}

const fn default_feed_amount() -> u32 {
    30
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_runtime_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.needs.to_needs_config(), NeedsConfig::default());
        assert_eq!(config.toys.to_toy_configs(), ToyConfigs::default());
        assert_eq!(config.simulation.frame_interval_ms, 100);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  frame_interval_ms: 50
  seed: 7
  save_path: "/tmp/pets.json"
  max_frames: 600

needs:
  energy_awake_interval_secs: 30.0
  energy_awake_step: -2
  energy_sleeping_interval_secs: 20.0
  energy_sleeping_step: 3
  satiety_interval_secs: 2.0
  satiety_step: -1
  boredom_recovery_secs: 120
  starting_energy: 80
  starting_satiety: 90
  feed_amount: 25

toys:
  cat_teaser:
    min_lifetime_secs: 15.0
    placement_radius: 2.0
    boredom_chance: 0.5
    energy_cost: 4
  toy_mouse:
    min_lifetime_secs: 10.0
    placement_radius: 0.5
    boredom_chance: 0.1
    energy_cost: 2

logging:
  level: "debug"
  json: true
"#;
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.max_frames, Some(600));

        let needs = config.needs.to_needs_config();
        assert_eq!(needs.energy_awake.step, -2);
        assert_eq!(needs.energy_sleeping.step, 3);
        assert_eq!(needs.boredom_recovery_secs, 120);
        assert_eq!(config.needs.feed_amount, 25);

        let toys = config.toys.to_toy_configs();
        assert_eq!(toys.for_kind(ToyKind::ToyMouse).energy_cost, 2);
        assert!((toys.for_kind(ToyKind::CatTeaser).boredom_chance - 0.5).abs() < 1e-9);
        assert!(config.logging.json);
    }

    #[test]
    fn partial_yaml_uses_defaults() {
        let yaml = r"
needs:
  satiety_interval_secs: 2.0
toys:
  toy_mouse:
    boredom_chance: 0.9
";
        let config = SimulationConfig::parse(yaml).unwrap();
        assert!((config.needs.satiety_interval_secs - 2.0).abs() < 1e-9);
        assert_eq!(config.needs.energy_awake_step, -1);
        let toys = config.toys.to_toy_configs();
        let mouse = toys.for_kind(ToyKind::ToyMouse);
        assert!((mouse.boredom_chance - 0.9).abs() < 1e-9);
        assert!((mouse.min_lifetime_secs - 10.0).abs() < 1e-9);
        assert_eq!(toys.cat_teaser, ToyConfig::default_for(ToyKind::CatTeaser));
    }

    #[test]
    fn empty_yaml_is_default() {
        let config = SimulationConfig::parse("{}").unwrap();
        assert_eq!(config.needs, NeedsSection::default());
        assert_eq!(config.toys, ToysSection::default());
    }

    #[test]
    fn invalid_yaml_is_error() {
        let result = SimulationConfig::parse("needs: [not, a, map]");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }
}
