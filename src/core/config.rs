//! Run configuration.
//!
//! Hosts provide a `RunConfig` at run start. Every numeric knob of the
//! round loop and the economy lives here; nothing else in the core
//! hardcodes tuning values.

use serde::{Deserialize, Serialize};

use super::composition::DECK_SIZE;
use super::error::{RunError, RunResult};
use crate::opponent::EnvironmentWeights;

/// Complete tuning for one run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Cards drawn per round (1..=30).
    pub hand_size: u32,

    /// A round fails when losses reach this count (exclusive bound for a clear).
    pub lose_threshold: u32,

    /// Failed rounds allowed before the run ends.
    pub max_miss: u32,

    /// Currency at run start.
    pub initial_currency: u32,

    /// Currency granted per cleared round.
    pub currency_per_clear: u32,

    /// Charge added per purchased unit.
    pub charge_purchase_amount: f32,

    /// Charge needed for one stack.
    pub charge_ceiling: f32,

    /// Give each archetype a distinct banner move.
    pub unique_banners: bool,

    /// Permute environment weights across archetypes at run start.
    pub shuffle_env_weights: bool,

    /// Relative frequency of each opponent archetype.
    pub env_weights: EnvironmentWeights,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            hand_size: 7,
            lose_threshold: 3,
            max_miss: 3,
            initial_currency: 10,
            currency_per_clear: 1,
            charge_purchase_amount: 0.1,
            charge_ceiling: 1.0,
            unique_banners: true,
            shuffle_env_weights: false,
            env_weights: EnvironmentWeights::default(),
        }
    }
}

impl RunConfig {
    /// Set hand size.
    #[must_use]
    pub fn with_hand_size(mut self, hand_size: u32) -> Self {
        self.hand_size = hand_size;
        self
    }

    /// Set the loss threshold.
    #[must_use]
    pub fn with_lose_threshold(mut self, threshold: u32) -> Self {
        self.lose_threshold = threshold;
        self
    }

    /// Set the miss cap.
    #[must_use]
    pub fn with_max_miss(mut self, max_miss: u32) -> Self {
        self.max_miss = max_miss;
        self
    }

    /// Set starting currency and the per-clear reward.
    #[must_use]
    pub fn with_currency(mut self, initial: u32, per_clear: u32) -> Self {
        self.initial_currency = initial;
        self.currency_per_clear = per_clear;
        self
    }

    /// Set charge ceiling and purchase unit.
    #[must_use]
    pub fn with_charge(mut self, ceiling: f32, purchase_amount: f32) -> Self {
        self.charge_ceiling = ceiling;
        self.charge_purchase_amount = purchase_amount;
        self
    }

    /// Set the unique-banner flag.
    #[must_use]
    pub fn with_unique_banners(mut self, unique: bool) -> Self {
        self.unique_banners = unique;
        self
    }

    /// Set environment weights and whether to shuffle them at run start.
    #[must_use]
    pub fn with_env_weights(mut self, weights: EnvironmentWeights, shuffle: bool) -> Self {
        self.env_weights = weights;
        self.shuffle_env_weights = shuffle;
        self
    }

    /// Check every option is usable.
    pub fn validate(&self) -> RunResult<()> {
        if self.hand_size == 0 || self.hand_size > DECK_SIZE {
            return Err(RunError::InvalidConfig(format!(
                "hand_size must be in 1..={DECK_SIZE}, got {}",
                self.hand_size
            )));
        }
        if self.max_miss == 0 {
            return Err(RunError::InvalidConfig("max_miss must be at least 1".into()));
        }
        if !(self.charge_ceiling.is_finite() && self.charge_ceiling > 0.0) {
            return Err(RunError::InvalidConfig(format!(
                "charge_ceiling must be positive, got {}",
                self.charge_ceiling
            )));
        }
        if !(self.charge_purchase_amount.is_finite() && self.charge_purchase_amount >= 0.0) {
            return Err(RunError::InvalidConfig(format!(
                "charge_purchase_amount must be non-negative, got {}",
                self.charge_purchase_amount
            )));
        }
        self.env_weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = RunConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.hand_size, 7);
        assert_eq!(config.lose_threshold, 3);
    }

    #[test]
    fn test_builder() {
        let config = RunConfig::default()
            .with_hand_size(5)
            .with_lose_threshold(2)
            .with_max_miss(4)
            .with_currency(3, 2)
            .with_charge(2.0, 0.5)
            .with_unique_banners(false);

        assert_eq!(config.hand_size, 5);
        assert_eq!(config.lose_threshold, 2);
        assert_eq!(config.max_miss, 4);
        assert_eq!(config.initial_currency, 3);
        assert_eq!(config.currency_per_clear, 2);
        assert_eq!(config.charge_ceiling, 2.0);
        assert_eq!(config.charge_purchase_amount, 0.5);
        assert!(!config.unique_banners);
    }

    #[test]
    fn test_rejects_bad_hand_size() {
        assert!(RunConfig::default().with_hand_size(0).validate().is_err());
        assert!(RunConfig::default().with_hand_size(31).validate().is_err());
        assert!(RunConfig::default().with_hand_size(30).validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_charge() {
        assert!(RunConfig::default().with_charge(0.0, 0.1).validate().is_err());
        assert!(RunConfig::default().with_charge(1.0, -0.1).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_weights() {
        let config = RunConfig::default()
            .with_env_weights(EnvironmentWeights::new(0.0, 0.0, 0.0), false);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RunConfig = serde_json::from_str(r#"{"hand_size": 5}"#).unwrap();
        assert_eq!(config.hand_size, 5);
        assert_eq!(config.max_miss, RunConfig::default().max_miss);
    }
}
