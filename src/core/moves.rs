//! Moves, outcomes, and per-move storage.
//!
//! ## Move
//!
//! The three variants form a dominance cycle:
//! Rock beats Scissors, Scissors beats Paper, Paper beats Rock.
//!
//! ## MoveMap
//!
//! Fixed-size per-move storage backed by `[T; 3]`, indexed by the move's
//! ordinal. There is no missing-key state: every move always has a value.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the three cycle moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    Rock,
    Scissors,
    Paper,
}

impl Move {
    /// All moves in ordinal order.
    pub const ALL: [Move; 3] = [Move::Rock, Move::Scissors, Move::Paper];

    /// Number of distinct moves.
    pub const COUNT: usize = 3;

    /// Ordinal index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Move for an ordinal index, if in range.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Move> {
        match index {
            0 => Some(Move::Rock),
            1 => Some(Move::Scissors),
            2 => Some(Move::Paper),
            _ => None,
        }
    }

    /// The move this one beats.
    #[must_use]
    pub const fn beats(self) -> Move {
        match self {
            Move::Rock => Move::Scissors,
            Move::Scissors => Move::Paper,
            Move::Paper => Move::Rock,
        }
    }

    /// The move that beats this one.
    #[must_use]
    pub const fn beaten_by(self) -> Move {
        match self {
            Move::Rock => Move::Paper,
            Move::Scissors => Move::Rock,
            Move::Paper => Move::Scissors,
        }
    }

    /// The two moves other than `self`, in ordinal order.
    #[must_use]
    pub fn others(self) -> [Move; 2] {
        let mut out = [Move::Rock; 2];
        let mut i = 0;
        for m in Move::ALL {
            if m != self {
                out[i] = m;
                i += 1;
            }
        }
        out
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Move::Rock => "Rock",
            Move::Scissors => "Scissors",
            Move::Paper => "Paper",
        };
        f.write_str(name)
    }
}

/// Result of one pairwise comparison, from the player's side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    Win,
    Lose,
    Tie,
}

impl Outcome {
    /// The same comparison seen from the other side.
    #[must_use]
    pub const fn reversed(self) -> Outcome {
        match self {
            Outcome::Win => Outcome::Lose,
            Outcome::Lose => Outcome::Win,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

/// Per-move data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use rps_build::core::{Move, MoveMap};
///
/// let mut counts: MoveMap<u32> = MoveMap::with_value(10);
/// counts[Move::Paper] += 2;
///
/// assert_eq!(counts[Move::Paper], 12);
/// assert_eq!(counts.values().sum::<u32>(), 32);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveMap<T> {
    data: [T; 3],
}

impl<T> MoveMap<T> {
    /// Create from explicit per-move values, in ordinal order.
    pub const fn from_array(data: [T; 3]) -> Self {
        Self { data }
    }

    /// Create with values from a factory function.
    pub fn new(factory: impl Fn(Move) -> T) -> Self {
        Self {
            data: Move::ALL.map(factory),
        }
    }

    /// Create with every entry set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a move's data.
    #[must_use]
    pub fn get(&self, m: Move) -> &T {
        &self.data[m.index()]
    }

    /// Get a mutable reference to a move's data.
    pub fn get_mut(&mut self, m: Move) -> &mut T {
        &mut self.data[m.index()]
    }

    /// Iterate over (Move, &T) pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (Move, &T)> {
        Move::ALL.into_iter().zip(self.data.iter())
    }

    /// Iterate over values in ordinal order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    /// Apply a function to every entry.
    pub fn map<U>(&self, f: impl Fn(Move, &T) -> U) -> MoveMap<U> {
        MoveMap::new(|m| f(m, self.get(m)))
    }

    /// Underlying array in ordinal order.
    #[must_use]
    pub fn as_array(&self) -> &[T; 3] {
        &self.data
    }
}

impl<T> Index<Move> for MoveMap<T> {
    type Output = T;

    fn index(&self, m: Move) -> &Self::Output {
        self.get(m)
    }
}

impl<T> IndexMut<Move> for MoveMap<T> {
    fn index_mut(&mut self, m: Move) -> &mut Self::Output {
        self.get_mut(m)
    }
}
