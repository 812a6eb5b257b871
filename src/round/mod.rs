//! Round judge: pairwise dominance and round-level aggregation.
//!
//! A round draws both hands, judges them index by index, counts losses,
//! and records which of the player's moves never showed up.

mod judge;

pub use judge::{judge, simulate, OutcomeOverride, RoundResult};
