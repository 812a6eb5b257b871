//! Opponent composition providers.
//!
//! A provider turns an archetype plus its banner move(s) into a concrete
//! 30-card composition. The run calls it once per archetype at run start
//! and keeps the result for the whole run.

use serde::{Deserialize, Serialize};

use super::archetype::{Archetype, Banner};
use crate::core::{Composition, MoveMap, MoveRng, RunResult, DECK_SIZE};

/// Produces the run-fixed composition for an archetype.
///
/// Implementations must return a composition whose shape follows the
/// banner: the main move leads for Heavy and Balance, main and second lead
/// for TwinTop.
pub trait OpponentProfileProvider {
    fn generate(
        &self,
        archetype: Archetype,
        rng: &mut dyn MoveRng,
        banner: Banner,
    ) -> RunResult<Composition>;
}

/// Inclusive count range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRange {
    pub min: u32,
    pub max: u32,
}

impl CountRange {
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Uniform value in `min..=max` with both ends clamped to
    /// [`DECK_SIZE`] (just `min` if the range is inverted).
    pub fn roll(&self, rng: &mut dyn MoveRng) -> u32 {
        let min = self.min.min(DECK_SIZE);
        let max = self.max.min(DECK_SIZE);
        if max <= min {
            return min;
        }
        rng.range(min as i32, max as i32 + 1) as u32
    }
}

/// Numeric ranges for [`RangeProfileProvider`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRanges {
    /// Heavy: count of the banner move.
    pub heavy_main: CountRange,
    /// Heavy: how far the two minor moves may drift from an even split.
    pub heavy_sub_jitter: u32,
    /// Balance: count of each non-banner move; the banner takes the rest.
    pub balance_other: CountRange,
    /// TwinTop: count of the main banner move.
    pub twin_main: CountRange,
    /// TwinTop: how many fewer cards the second banner has than the main.
    pub twin_delta: CountRange,
}

impl Default for ProfileRanges {
    fn default() -> Self {
        Self {
            heavy_main: CountRange::new(16, 20),
            heavy_sub_jitter: 2,
            balance_other: CountRange::new(8, 10),
            twin_main: CountRange::new(12, 14),
            twin_delta: CountRange::new(0, 2),
        }
    }
}

/// Range-tuned provider for the three built-in archetypes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RangeProfileProvider {
    pub ranges: ProfileRanges,
}

impl RangeProfileProvider {
    #[must_use]
    pub fn new(ranges: ProfileRanges) -> Self {
        Self { ranges }
    }

    fn heavy(&self, rng: &mut dyn MoveRng, banner: Banner) -> RunResult<Composition> {
        let main = self.ranges.heavy_main.roll(rng).min(DECK_SIZE);
        let rest = DECK_SIZE - main;
        let jitter = self.ranges.heavy_sub_jitter.min(rest / 2) as i32;
        let first = (rest / 2) as i32 + rng.range(-jitter, jitter + 1);
        let first = first.clamp(0, rest as i32) as u32;

        let [a, b] = banner.main.others();
        let mut counts = MoveMap::with_value(0u32);
        counts[banner.main] = main;
        counts[a] = first;
        counts[b] = rest - first;
        Composition::from_counts(counts)
    }

    fn balance(&self, rng: &mut dyn MoveRng, banner: Banner) -> RunResult<Composition> {
        let cap = DECK_SIZE / 3;
        let [a, b] = banner.main.others();
        let mut counts = MoveMap::with_value(0u32);
        counts[a] = self.ranges.balance_other.roll(rng).min(cap);
        counts[b] = self.ranges.balance_other.roll(rng).min(cap);
        counts[banner.main] = DECK_SIZE - counts[a] - counts[b];
        Composition::from_counts(counts)
    }

    fn twin_top(&self, rng: &mut dyn MoveRng, banner: Banner) -> RunResult<Composition> {
        let second = banner
            .second
            .filter(|&m| m != banner.main)
            .unwrap_or(banner.main.beats());
        let third = banner
            .main
            .others()
            .into_iter()
            .find(|&m| m != second)
            .unwrap_or(banner.main.beaten_by());

        let main = self.ranges.twin_main.roll(rng).min(DECK_SIZE);
        let delta = self.ranges.twin_delta.roll(rng);
        let second_count = main.saturating_sub(delta).min(DECK_SIZE - main);

        let mut counts = MoveMap::with_value(0u32);
        counts[banner.main] = main;
        counts[second] = second_count;
        counts[third] = DECK_SIZE - main - second_count;
        Composition::from_counts(counts)
    }
}

impl OpponentProfileProvider for RangeProfileProvider {
    fn generate(
        &self,
        archetype: Archetype,
        rng: &mut dyn MoveRng,
        banner: Banner,
    ) -> RunResult<Composition> {
        match archetype {
            Archetype::Heavy => self.heavy(rng, banner),
            Archetype::Balance => self.balance(rng, banner),
            Archetype::TwinTop => self.twin_top(rng, banner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameRng, Move};

    fn leader(comp: &Composition) -> u32 {
        Move::ALL.iter().map(|&m| comp.count(m)).max().unwrap_or(0)
    }

    #[test]
    fn test_heavy_shape() {
        let provider = RangeProfileProvider::default();
        let mut rng = GameRng::new(1);
        for _ in 0..100 {
            let comp = provider
                .generate(Archetype::Heavy, &mut rng, Banner::single(Move::Scissors))
                .unwrap();
            assert_eq!(comp.total(), 30);
            assert!((16..=20).contains(&comp.count(Move::Scissors)));
            assert_eq!(comp.count(Move::Scissors), leader(&comp));
        }
    }

    #[test]
    fn test_balance_shape() {
        let provider = RangeProfileProvider::default();
        let mut rng = GameRng::new(2);
        for _ in 0..100 {
            let comp = provider
                .generate(Archetype::Balance, &mut rng, Banner::single(Move::Paper))
                .unwrap();
            assert!((10..=14).contains(&comp.count(Move::Paper)));
            assert!((8..=10).contains(&comp.count(Move::Rock)));
            assert!((8..=10).contains(&comp.count(Move::Scissors)));
        }
    }

    #[test]
    fn test_twin_top_shape() {
        let provider = RangeProfileProvider::default();
        let mut rng = GameRng::new(3);
        let banner = Banner {
            main: Move::Rock,
            second: Some(Move::Paper),
        };
        for _ in 0..100 {
            let comp = provider.generate(Archetype::TwinTop, &mut rng, banner).unwrap();
            let main = comp.count(Move::Rock);
            let second = comp.count(Move::Paper);
            let minor = comp.count(Move::Scissors);
            assert!((12..=14).contains(&main));
            assert!(main - second <= 2);
            assert!(minor < second);
        }
    }

    #[test]
    fn test_twin_top_without_second_falls_back() {
        let provider = RangeProfileProvider::default();
        let mut rng = GameRng::new(4);
        let comp = provider
            .generate(Archetype::TwinTop, &mut rng, Banner::single(Move::Paper))
            .unwrap();
        assert_eq!(comp.total(), 30);
        assert!(comp.count(Move::Rock) >= comp.count(Move::Scissors));
    }

    #[test]
    fn test_extreme_ranges_stay_valid() {
        let provider = RangeProfileProvider::new(ProfileRanges {
            heavy_main: CountRange::new(40, 50),
            heavy_sub_jitter: 20,
            balance_other: CountRange::new(20, 25),
            twin_main: CountRange::new(29, 35),
            twin_delta: CountRange::new(0, 0),
        });
        let mut rng = GameRng::new(5);
        for archetype in Archetype::ALL {
            let banner = Banner {
                main: Move::Rock,
                second: Some(Move::Scissors),
            };
            let comp = provider.generate(archetype, &mut rng, banner).unwrap();
            assert_eq!(comp.total(), 30);
        }
    }

    #[test]
    fn test_roll_clamps_huge_bounds() {
        let mut rng = GameRng::new(6);
        assert_eq!(CountRange::new(u32::MAX - 1, u32::MAX).roll(&mut rng), 30);
        for _ in 0..50 {
            let v = CountRange::new(25, u32::MAX).roll(&mut rng);
            assert!((25..=30).contains(&v));
        }

        let json = r#"{"heavy_main":{"min":2147483647,"max":4294967295},
            "twin_main":{"min":0,"max":4294967295}}"#;
        let ranges: ProfileRanges = serde_json::from_str(json).unwrap();
        assert_eq!(ranges.balance_other, ProfileRanges::default().balance_other);
        let provider = RangeProfileProvider::new(ranges);
        let banner = Banner {
            main: Move::Paper,
            second: None,
        };
        for archetype in Archetype::ALL {
            let comp = provider.generate(archetype, &mut rng, banner).unwrap();
            assert_eq!(comp.total(), 30);
        }
        let heavy = provider.generate(Archetype::Heavy, &mut rng, banner).unwrap();
        assert_eq!(heavy.count(Move::Paper), 30);
    }
}
