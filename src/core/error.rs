//! Error types for the run core.
//!
//! All fallible operations return [`RunResult`]. Eligibility failures are
//! ordinary results, not fatal: callers are expected to surface them and
//! let the player correct the input.

use thiserror::Error;

use super::moves::Move;

/// Errors produced by run and draft operations.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RunError {
    #[error("composition must total 30 cards, got {total}")]
    InvalidComposition { total: u32 },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("not eligible: {0}")]
    Ineligible(Ineligibility),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The precondition an ineligible request failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Ineligibility {
    #[error("cost {cost} exceeds available {available}")]
    OverBudget { cost: u32, available: u32 },

    #[error("{0} has no charged stack available")]
    NotCharged(Move),

    #[error("{0} is not in the composition")]
    MoveAbsent(Move),

    #[error("{card} has {have} cards, {need} requested")]
    NotEnoughCards { card: Move, have: u32, need: u32 },

    #[error("reservation queue is full")]
    ReservationsFull,

    #[error("nothing pending to withdraw for {0}")]
    NothingToWithdraw(Move),

    #[error("charge for {0} cannot take another purchase")]
    ChargeComplete(Move),
}

impl From<Ineligibility> for RunError {
    fn from(reason: Ineligibility) -> Self {
        RunError::Ineligible(reason)
    }
}

/// Result type for run operations.
pub type RunResult<T> = Result<T, RunError>;
