//! Injectable randomness for gameplay rolls.
//!
//! Rolls go through [`ProbabilityGenerator`] instead of calling an RNG
//! inline, so tests can pin outcomes with [`FixedProbability`].

use rand::Rng;

/// A source of yes/no outcomes with a given probability.
pub trait ProbabilityGenerator {
    /// Return `true` with probability `p`. Values outside `0..=1` are clamped.
    fn chance(&mut self, p: f64) -> bool;
}

/// Probability generator backed by any [`rand::Rng`].
#[derive(Debug, Clone)]
pub struct RandProbability<R> {
    rng: R,
}

impl<R: Rng> RandProbability<R> {
    /// Wrap an RNG.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> ProbabilityGenerator for RandProbability<R> {
    fn chance(&mut self, p: f64) -> bool {
        if !p.is_finite() || p <= 0.0 {
            return false;
        }
        if p >= 1.0 {
            return true;
        }
        self.rng.random_bool(p)
    }
}

/// Probability generator that returns a fixed answer regardless of `p`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedProbability(pub bool);

impl FixedProbability {
    /// Every roll succeeds.
    pub const fn always() -> Self {
        Self(true)
    }

    /// Every roll fails.
    pub const fn never() -> Self {
        Self(false)
    }
}

impl ProbabilityGenerator for FixedProbability {
    fn chance(&mut self, _p: f64) -> bool {
        self.0
    }
}
