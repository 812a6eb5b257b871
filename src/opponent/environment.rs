//! Environment weights: how often each archetype shows up.

use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, ArchetypeMap};
use crate::core::{choose_weighted, shuffle, MoveRng, RunError, RunResult};

/// Relative frequency per archetype. Weights need not sum to 1.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentWeights {
    pub heavy: f32,
    pub balance: f32,
    pub twin_top: f32,
}

impl Default for EnvironmentWeights {
    fn default() -> Self {
        Self::new(0.6, 0.2, 0.2)
    }
}

impl EnvironmentWeights {
    #[must_use]
    pub const fn new(heavy: f32, balance: f32, twin_top: f32) -> Self {
        Self {
            heavy,
            balance,
            twin_top,
        }
    }

    /// Weight for one archetype.
    #[must_use]
    pub fn get(&self, archetype: Archetype) -> f32 {
        self.as_map()[archetype]
    }

    /// Weights in archetype order.
    #[must_use]
    pub fn as_map(&self) -> ArchetypeMap<f32> {
        ArchetypeMap::from_array([self.heavy, self.balance, self.twin_top])
    }

    /// Reject negative, non-finite, or all-zero weights.
    pub fn validate(&self) -> RunResult<()> {
        let weights = self.as_map();
        if weights.as_array().iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(RunError::InvalidConfig(format!(
                "environment weights must be finite and non-negative, got {self:?}"
            )));
        }
        if weights.as_array().iter().sum::<f32>() <= 0.0 {
            return Err(RunError::InvalidConfig(
                "at least one environment weight must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The same weights permuted across archetypes.
    #[must_use]
    pub fn shuffled(&self, rng: &mut impl MoveRng) -> Self {
        let mut values = [self.heavy, self.balance, self.twin_top];
        shuffle(&mut values, rng);
        let [heavy, balance, twin_top] = values;
        Self::new(heavy, balance, twin_top)
    }

    /// Roll an archetype by weight.
    ///
    /// Falls back to [`Archetype::Heavy`] if no weight is positive, which
    /// validated weights rule out.
    pub fn roll(&self, rng: &mut impl MoveRng) -> Archetype {
        choose_weighted(self.as_map().as_array(), rng)
            .map(|i| Archetype::ALL[i])
            .unwrap_or(Archetype::Heavy)
    }
}
