//! Per-archetype statistics of hands the opponent actually drew.

use serde::{Deserialize, Serialize};

use crate::core::{Move, MoveMap};

/// Cumulative draws for one archetype.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchetypeHandStat {
    /// Rounds sampled.
    pub samples: u32,
    /// Cards drawn per move across all samples.
    pub totals: MoveMap<u32>,
}

impl ArchetypeHandStat {
    /// Record one drawn hand.
    pub fn add_hand(&mut self, hand: &[Move]) {
        self.samples += 1;
        for &m in hand {
            self.totals[m] += 1;
        }
    }

    /// Total cards recorded.
    #[must_use]
    pub fn cards_seen(&self) -> u32 {
        self.totals.values().sum()
    }

    /// Share of recorded cards that were `m`, or 0 with no samples.
    #[must_use]
    pub fn frequency(&self, m: Move) -> f32 {
        let seen = self.cards_seen();
        if seen == 0 {
            return 0.0;
        }
        self.totals[m] as f32 / seen as f32
    }
}
