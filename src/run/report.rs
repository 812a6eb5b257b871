//! What a round hands back to the host.

use serde::{Deserialize, Serialize};

use crate::core::{Composition, Move, MoveMap};
use crate::opponent::{Archetype, Banner};
use crate::round::RoundResult;

/// Maximum draws for the first round before giving up on a clear.
pub const INTRO_MAX_ATTEMPTS: u32 = 30;

/// The opponent the next (or a past) round is played against.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentPreview {
    pub archetype: Archetype,
    pub banner: Banner,
    pub composition: Composition,
}

/// How the first round's draw loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntroOutcome {
    /// The first draw cleared.
    FirstDraw,
    /// A later draw cleared.
    Rerolled,
    /// Every attempt failed; the last draw stands.
    Exhausted,
}

/// Summary of the first round's draw loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntroReport {
    /// Draws made, `1..=INTRO_MAX_ATTEMPTS`.
    pub attempts: u32,
    pub outcome: IntroOutcome,
}

impl IntroReport {
    /// True when the clear needed at least one reroll.
    #[must_use]
    pub fn forced_clear(&self) -> bool {
        self.outcome == IntroOutcome::Rerolled
    }
}

/// One played round and what it changed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    /// Zero-based index of the round that was played.
    pub round_index: u32,
    pub opponent: OpponentPreview,
    /// Move pinned to the player's first draw, if a reservation paid for one.
    pub forced_first: Option<Move>,
    pub result: RoundResult,
    /// Present only for round 0.
    pub intro: Option<IntroReport>,
    /// Charge added per move by this round.
    pub charge_gained: MoveMap<f32>,
    pub currency_gained: u32,
}

impl RoundReport {
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.result.is_clear()
    }
}
