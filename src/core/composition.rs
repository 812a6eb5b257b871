//! The 30-card makeup of a combatant, by count per move.

use serde::{Deserialize, Serialize};

use super::error::{RunError, RunResult};
use super::moves::{Move, MoveMap};

/// Number of cards every composition holds.
pub const DECK_SIZE: u32 = 30;

/// Count per move, always totalling [`DECK_SIZE`].
///
/// The total is checked at construction and on deserialization, so a
/// `Composition` value is valid by type.
///
/// ```
/// use rps_build::core::{Composition, Move};
///
/// let comp = Composition::new(10, 12, 8).unwrap();
/// assert_eq!(comp.count(Move::Scissors), 12);
/// assert!(Composition::new(10, 10, 11).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "MoveMap<u32>", into = "MoveMap<u32>")]
pub struct Composition {
    counts: MoveMap<u32>,
}

impl Composition {
    /// Build from rock, scissors and paper counts.
    pub fn new(rock: u32, scissors: u32, paper: u32) -> RunResult<Self> {
        Self::from_counts(MoveMap::from_array([rock, scissors, paper]))
    }

    /// Build from per-move counts.
    ///
    /// A total that overflows `u32` is reported as `u32::MAX`.
    pub fn from_counts(counts: MoveMap<u32>) -> RunResult<Self> {
        let total = checked_total(&counts).unwrap_or(u32::MAX);
        if total != DECK_SIZE {
            return Err(RunError::InvalidComposition { total });
        }
        Ok(Self { counts })
    }

    /// Ten of each move.
    #[must_use]
    pub fn even() -> Self {
        Self {
            counts: MoveMap::with_value(DECK_SIZE / 3),
        }
    }

    /// Count of a move.
    #[must_use]
    pub fn count(&self, m: Move) -> u32 {
        self.counts[m]
    }

    /// Whether the move has at least one card.
    #[must_use]
    pub fn has(&self, m: Move) -> bool {
        self.count(m) > 0
    }

    /// Sum of all counts; always [`DECK_SIZE`].
    #[must_use]
    pub fn total(&self) -> u32 {
        checked_total(&self.counts).unwrap_or(u32::MAX)
    }

    /// Moves with a non-zero count, in ordinal order.
    pub fn moves_present(&self) -> impl Iterator<Item = Move> + '_ {
        Move::ALL.into_iter().filter(|&m| self.has(m))
    }

    /// Per-move counts.
    #[must_use]
    pub fn counts(&self) -> &MoveMap<u32> {
        &self.counts
    }
}

fn checked_total(counts: &MoveMap<u32>) -> Option<u32> {
    counts.values().try_fold(0u32, |acc, &c| acc.checked_add(c))
}

impl Default for Composition {
    fn default() -> Self {
        Self::even()
    }
}

impl TryFrom<MoveMap<u32>> for Composition {
    type Error = RunError;

    fn try_from(counts: MoveMap<u32>) -> Result<Self, Self::Error> {
        Self::from_counts(counts)
    }
}

impl From<Composition> for MoveMap<u32> {
    fn from(comp: Composition) -> Self {
        comp.counts
    }
}

impl std::fmt::Display for Composition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.count(Move::Rock),
            self.count(Move::Scissors),
            self.count(Move::Paper)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_composition() {
        let comp = Composition::new(30, 0, 0).unwrap();
        assert_eq!(comp.total(), 30);
        assert!(comp.has(Move::Rock));
        assert!(!comp.has(Move::Paper));
        assert_eq!(comp.moves_present().collect::<Vec<_>>(), vec![Move::Rock]);
    }

    #[test]
    fn test_invalid_total() {
        assert_eq!(
            Composition::new(10, 10, 9),
            Err(RunError::InvalidComposition { total: 29 })
        );
        assert_eq!(
            Composition::new(11, 10, 10),
            Err(RunError::InvalidComposition { total: 31 })
        );
    }

    #[test]
    fn test_even_default() {
        let comp = Composition::default();
        for m in Move::ALL {
            assert_eq!(comp.count(m), 10);
        }
        assert_eq!(comp.to_string(), "10/10/10");
    }

    #[test]
    fn test_deserialize_rejects_bad_total() {
        let good: Composition = serde_json::from_str(r#"{"data":[5,10,15]}"#).unwrap();
        assert_eq!(good.count(Move::Paper), 15);

        let bad = serde_json::from_str::<Composition>(r#"{"data":[5,10,14]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_overflowing_counts_rejected() {
        let wrapped = MoveMap::from_array([u32::MAX, 31, 0]);
        assert_eq!(
            Composition::from_counts(wrapped),
            Err(RunError::InvalidComposition { total: u32::MAX })
        );
        assert!(Composition::new(u32::MAX, u32::MAX, 32).is_err());

        let bad = serde_json::from_str::<Composition>(r#"{"data":[4294967295,31,0]}"#);
        assert!(bad.is_err());
    }
}
