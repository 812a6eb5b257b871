//! Opponent archetypes, per-archetype storage, and banner assignment.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::core::{shuffle, Move, MoveRng};

/// Qualitative opponent composition shape.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    /// One move dominant.
    Heavy,
    /// Three roughly equal moves.
    Balance,
    /// Two dominant moves and one minor.
    TwinTop,
}

impl Archetype {
    /// All archetypes in ordinal order.
    pub const ALL: [Archetype; 3] = [Archetype::Heavy, Archetype::Balance, Archetype::TwinTop];

    /// Ordinal index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Archetype {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Archetype::Heavy => "Heavy",
            Archetype::Balance => "Balance",
            Archetype::TwinTop => "TwinTop",
        };
        f.write_str(name)
    }
}

/// Per-archetype data storage backed by `[T; 3]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArchetypeMap<T> {
    data: [T; 3],
}

impl<T> ArchetypeMap<T> {
    /// Create with values from a factory function.
    pub fn new(factory: impl FnMut(Archetype) -> T) -> Self {
        Self {
            data: Archetype::ALL.map(factory),
        }
    }

    /// Create from explicit values in ordinal order.
    pub const fn from_array(data: [T; 3]) -> Self {
        Self { data }
    }

    /// Iterate over (Archetype, &T) pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Archetype, &T)> {
        Archetype::ALL.into_iter().zip(self.data.iter())
    }

    /// Underlying array in ordinal order.
    #[must_use]
    pub fn as_array(&self) -> &[T; 3] {
        &self.data
    }
}

impl<T> Index<Archetype> for ArchetypeMap<T> {
    type Output = T;

    fn index(&self, a: Archetype) -> &Self::Output {
        &self.data[a.index()]
    }
}

impl<T> IndexMut<Archetype> for ArchetypeMap<T> {
    fn index_mut(&mut self, a: Archetype) -> &mut Self::Output {
        &mut self.data[a.index()]
    }
}

/// Banner move(s) an archetype is built around.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Banner {
    /// Primary move.
    pub main: Move,
    /// Secondary peak, only for [`Archetype::TwinTop`].
    pub second: Option<Move>,
}

impl Banner {
    /// Banner with a single move.
    #[must_use]
    pub const fn single(main: Move) -> Self {
        Self { main, second: None }
    }
}

/// Assign banners for a run.
///
/// With `unique`, the three moves are permuted across Heavy, Balance and
/// TwinTop. Otherwise each archetype draws its move independently. TwinTop
/// then draws its second banner from the two moves other than its main.
pub fn assign_banners(rng: &mut impl MoveRng, unique: bool) -> ArchetypeMap<Banner> {
    let [heavy, balance, twin] = if unique {
        let mut moves = Move::ALL;
        shuffle(&mut moves, rng);
        moves
    } else {
        let mut pick = || Move::ALL[rng.range(0, Move::COUNT as i32) as usize];
        [pick(), pick(), pick()]
    };

    let others = twin.others();
    let twin_second = others[rng.range(0, others.len() as i32) as usize];

    ArchetypeMap::from_array([
        Banner::single(heavy),
        Banner::single(balance),
        Banner {
            main: twin,
            second: Some(twin_second),
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::testing::ScriptedRng;
    use crate::core::GameRng;

    #[test]
    fn test_archetype_map_indexing() {
        let mut map = ArchetypeMap::new(|a| a.index() as u32);
        map[Archetype::TwinTop] += 5;
        assert_eq!(map[Archetype::Heavy], 0);
        assert_eq!(map[Archetype::Balance], 1);
        assert_eq!(map[Archetype::TwinTop], 7);
    }

    #[test]
    fn test_unique_banners_are_a_permutation() {
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let banners = assign_banners(&mut rng, true);
            let mut mains: Vec<Move> = banners.as_array().iter().map(|b| b.main).collect();
            mains.sort();
            assert_eq!(mains, Move::ALL.to_vec());
        }
    }

    #[test]
    fn test_twin_second_differs_from_main() {
        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            for unique in [true, false] {
                let banners = assign_banners(&mut rng, unique);
                let twin = banners[Archetype::TwinTop];
                let second = twin.second.unwrap();
                assert_ne!(second, twin.main);
                assert!(banners[Archetype::Heavy].second.is_none());
                assert!(banners[Archetype::Balance].second.is_none());
            }
        }
    }

    #[test]
    fn test_non_unique_may_collide() {
        // Every independent pick lands on index 0.
        let mut rng = ScriptedRng::lowest();
        let banners = assign_banners(&mut rng, false);
        assert_eq!(banners[Archetype::Heavy].main, Move::Rock);
        assert_eq!(banners[Archetype::Balance].main, Move::Rock);
        assert_eq!(banners[Archetype::TwinTop].main, Move::Rock);
        assert_eq!(banners[Archetype::TwinTop].second, Some(Move::Scissors));
    }
}
