//! Per-kind toy tunables.
//!
//! Both toy kinds run the same state machine; only these values differ.

use petcare_types::ToyKind;

/// Tunables for a single toy kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToyConfig {
    /// Seconds a toy stays up before it may end (default: 20 for the cat
    /// teaser, 10 for the toy mouse).
    pub min_lifetime_secs: f64,

    /// Radius checked for blocking entities when placing (default: 1.0).
    pub placement_radius: f32,

    /// Probability that a pet gets bored after a play session (default: 0.3).
    pub boredom_chance: f64,

    /// Energy a pet spends per finished play session (default: 5).
    pub energy_cost: u32,
}

impl ToyConfig {
    /// Default tunables for `kind`.
    pub const fn default_for(kind: ToyKind) -> Self {
        match kind {
            ToyKind::CatTeaser => Self {
                min_lifetime_secs: 20.0,
                placement_radius: 1.0,
                boredom_chance: 0.3,
                energy_cost: 5,
            },
            ToyKind::ToyMouse => Self {
                min_lifetime_secs: 10.0,
                placement_radius: 1.0,
                boredom_chance: 0.3,
                energy_cost: 5,
            },
        }
    }
}

/// Tunables for every toy kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToyConfigs {
    /// Cat teaser tunables.
    pub cat_teaser: ToyConfig,
    /// Toy mouse tunables.
    pub toy_mouse: ToyConfig,
}

impl Default for ToyConfigs {
    fn default() -> Self {
        Self {
            cat_teaser: ToyConfig::default_for(ToyKind::CatTeaser),
            toy_mouse: ToyConfig::default_for(ToyKind::ToyMouse),
        }
    }
}

impl ToyConfigs {
    /// Tunables for `kind`.
    pub const fn for_kind(&self, kind: ToyKind) -> &ToyConfig {
        match kind {
            ToyKind::CatTeaser => &self.cat_teaser,
            ToyKind::ToyMouse => &self.toy_mouse,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_is_shorter_lived_by_default() {
        let cfg = ToyConfigs::default();
        assert!(
            cfg.for_kind(ToyKind::ToyMouse).min_lifetime_secs
                < cfg.for_kind(ToyKind::CatTeaser).min_lifetime_secs
        );
    }
}
