//! Post-judgment outcome overrides.
//!
//! A hook sees every judged round before the run does its bookkeeping and
//! may replace individual outcomes through
//! [`RoundResult::apply_override`]. Clear and loss counts are re-derived
//! from whatever the hook leaves behind.

use super::report::OpponentPreview;
use crate::round::RoundResult;

/// Rewrites judged outcomes before they are booked.
pub trait OutcomeHook {
    fn apply(&self, opponent: &OpponentPreview, result: &mut RoundResult);
}

/// Leaves every outcome as judged.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoOverrides;

impl OutcomeHook for NoOverrides {
    fn apply(&self, _opponent: &OpponentPreview, _result: &mut RoundResult) {}
}
