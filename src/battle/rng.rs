use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// The single source of randomness for a battle.
///
/// Every probabilistic branch in the engine draws through this trait, tagged
/// with a short reason so a scripted source can report which roll ran dry.
pub trait RandomSource {
    /// Uniform draw from `[0, bound)`. A zero bound yields 0 without drawing.
    fn below(&mut self, bound: u32, reason: &str) -> u32;

    /// Uniform draw from `[0, 100)`.
    fn percent(&mut self, reason: &str) -> u32 {
        self.below(100, reason)
    }

    /// `true` with `chance` percent probability. Always consumes one draw.
    fn chance(&mut self, chance: u32, reason: &str) -> bool {
        self.percent(reason) < chance
    }
}

/// Production source backed by a seedable `StdRng`.
#[derive(Debug, Clone)]
pub struct SeededRng {
    inner: StdRng,
}

impl SeededRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRng {
    fn below(&mut self, bound: u32, reason: &str) -> u32 {
        if bound == 0 {
            return 0;
        }
        let outcome = self.inner.random_range(0..bound);
        debug!(reason, bound, outcome, "rng draw");
        outcome
    }
}

/// Replays a fixed list of outcomes, one per draw.
///
/// Outcomes are reduced modulo the requested bound. Running out of outcomes is
/// a test bug, so it panics naming the roll that could not be served.
#[derive(Debug, Clone)]
pub struct ScriptedRng {
    outcomes: Vec<u32>,
    index: usize,
}

impl ScriptedRng {
    pub fn new(outcomes: Vec<u32>) -> Self {
        Self { outcomes, index: 0 }
    }

    /// Number of outcomes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.outcomes.len() - self.index
    }
}

impl RandomSource for ScriptedRng {
    fn below(&mut self, bound: u32, reason: &str) -> u32 {
        if bound == 0 {
            return 0;
        }
        let Some(&outcome) = self.outcomes.get(self.index) else {
            panic!(
                "ScriptedRng exhausted! Tried to get a value for: '{}'. Need more random values.",
                reason
            );
        };

        #[cfg(test)]
        println!("[RNG] Consumed {} for: {}", outcome, reason);

        self.index += 1;
        outcome % bound
    }
}
