//! Per-move charge: progress toward guaranteed first draws.
//!
//! ## Stacking
//!
//! A move's charge value is not clamped to the ceiling. Every full ceiling
//! banked is one stack, and each stack pays for one pinned draw.
//!
//! ```
//! use rps_build::charge::ChargeResource;
//! use rps_build::core::Move;
//!
//! let mut charge = ChargeResource::new(1.0);
//! charge.add(Move::Rock, 2.5);
//! assert_eq!(charge.charged_stacks(Move::Rock), 2);
//!
//! assert!(charge.consume_one_stack(Move::Rock));
//! assert!((charge.get(Move::Rock) - 1.5).abs() < 1e-6);
//! ```
//!
//! ## Gain formulas
//!
//! How much a skipped move charges after a clear is a tuning knob, so it is
//! a trait ([`GainFormula`]) with a linear default.

use serde::{Deserialize, Serialize};

use crate::core::{Composition, Move, MoveMap, DECK_SIZE};

/// Tolerance used when counting stacks, per unit of ceiling above 1.
pub const CHARGE_EPSILON: f32 = 1e-6;

/// Smallest ceiling accepted by [`ChargeResource::set_ceiling`].
pub const MIN_CEILING: f32 = 1e-4;

/// Per-move accumulating resource with a nominal ceiling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChargeResource {
    values: MoveMap<f32>,
    ceiling: f32,
}

impl ChargeResource {
    /// Create an empty resource with the given ceiling.
    #[must_use]
    pub fn new(ceiling: f32) -> Self {
        let mut charge = Self {
            values: MoveMap::with_value(0.0),
            ceiling: 1.0,
        };
        charge.set_ceiling(ceiling);
        charge
    }

    /// Charge needed for one stack.
    #[must_use]
    pub fn ceiling(&self) -> f32 {
        self.ceiling
    }

    /// Change the ceiling, floored at [`MIN_CEILING`].
    ///
    /// Existing values are kept as they are, even above a lowered ceiling.
    pub fn set_ceiling(&mut self, ceiling: f32) {
        self.ceiling = if ceiling.is_nan() { MIN_CEILING } else { ceiling.max(MIN_CEILING) };
    }

    /// Stored value for a move.
    #[must_use]
    pub fn get(&self, m: Move) -> f32 {
        self.values[m]
    }

    /// All stored values.
    #[must_use]
    pub fn values(&self) -> &MoveMap<f32> {
        &self.values
    }

    /// Add charge. Non-positive amounts are ignored; there is no upper clamp.
    pub fn add(&mut self, m: Move, amount: f32) {
        if amount.is_nan() || amount <= 0.0 {
            return;
        }
        self.values[m] += amount;
    }

    /// Whole stacks banked for a move.
    #[must_use]
    pub fn charged_stacks(&self, m: Move) -> u32 {
        stacks_for(self.values[m], self.ceiling)
    }

    /// Whether at least one stack is available.
    #[must_use]
    pub fn is_charged(&self, m: Move) -> bool {
        self.charged_stacks(m) >= 1
    }

    /// Spend one stack, subtracting exactly one ceiling.
    ///
    /// Returns `false` and leaves the value unchanged when no stack is
    /// available.
    pub fn consume_one_stack(&mut self, m: Move) -> bool {
        if !self.is_charged(m) {
            return false;
        }
        // Floor at zero so epsilon-level dust never goes negative.
        self.values[m] = (self.values[m] - self.ceiling).max(0.0);
        true
    }
}

impl Default for ChargeResource {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Whole stacks in `value` for the given ceiling.
#[must_use]
pub fn stacks_for(value: f32, ceiling: f32) -> u32 {
    if value.is_nan() || value <= 0.0 || ceiling.is_nan() || ceiling <= 0.0 {
        return 0;
    }
    ((value + stack_tolerance(ceiling)) / ceiling).floor() as u32
}

/// Slack under a stack boundary that still counts as reaching it.
///
/// Scales with ceilings above 1 so rounding in `n * ceiling` is absorbed.
#[must_use]
pub fn stack_tolerance(ceiling: f32) -> f32 {
    CHARGE_EPSILON * ceiling.max(1.0)
}

/// Progress into the stack currently being filled, in `[0, ceiling)`.
#[must_use]
pub fn stack_remainder(value: f32, ceiling: f32) -> f32 {
    let full = stacks_for(value, ceiling) as f32 * ceiling;
    (value - full).max(0.0)
}

/// How much charge a skipped move earns after a cleared round.
pub trait GainFormula {
    /// Gain for `missing`, given the player's composition. Must be `>= 0`.
    fn calc_gain(&self, missing: Move, composition: &Composition) -> f32;
}

/// `scale * count / denominator`; moves absent from the composition earn nothing.
///
/// The default (`1 * count / 30`) makes heavily represented moves charge
/// faster when they are skipped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearGain {
    /// Multiplier on the count ratio.
    pub scale: f32,
    /// Divisor for the count.
    pub denominator: f32,
}

impl Default for LinearGain {
    fn default() -> Self {
        Self {
            scale: 1.0,
            denominator: DECK_SIZE as f32,
        }
    }
}

impl GainFormula for LinearGain {
    fn calc_gain(&self, missing: Move, composition: &Composition) -> f32 {
        let count = composition.count(missing);
        if count == 0 || self.denominator.is_nan() || self.denominator <= 0.0 {
            return 0.0;
        }
        (count as f32 / self.denominator * self.scale).max(0.0)
    }
}
