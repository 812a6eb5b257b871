//! Batch draw from a composition.
//!
//! The pool is rebuilt from the composition on every call. No "remaining
//! deck" carries across rounds, so composition edits apply immediately.

use smallvec::SmallVec;

use crate::core::{shuffle, Composition, Move, MoveMap, MoveRng, RunError, RunResult, DECK_SIZE};

/// Moves drawn for one round, in hand order.
///
/// Inline capacity covers the usual hand size; larger hands spill to the heap.
pub type Hand = SmallVec<[Move; 8]>;

/// Materialize the 30-entry pool, grouped in move order.
///
/// # Panics
///
/// Panics if the pool does not hold exactly [`DECK_SIZE`] entries, which
/// would mean a `Composition` escaped its total check.
#[must_use]
pub fn build_pool(composition: &Composition) -> Vec<Move> {
    let mut pool = Vec::with_capacity(DECK_SIZE as usize);
    for (m, &count) in composition.counts().iter() {
        pool.extend(std::iter::repeat(m).take(count as usize));
    }
    assert_eq!(pool.len(), DECK_SIZE as usize, "pool must hold exactly {DECK_SIZE} cards");
    pool
}

/// Shuffle a fresh pool and deal `hand_size` cards.
///
/// When `forced_first` names a move the composition holds, its first
/// occurrence in the shuffled pool is swapped into position 0. A pin on an
/// absent move is ignored.
pub fn draw_hand(
    composition: &Composition,
    hand_size: u32,
    rng: &mut impl MoveRng,
    forced_first: Option<Move>,
) -> RunResult<Hand> {
    if hand_size == 0 || hand_size > DECK_SIZE {
        return Err(RunError::InvalidConfig(format!(
            "hand_size must be in 1..={DECK_SIZE}, got {hand_size}"
        )));
    }

    let mut pool = build_pool(composition);
    shuffle(&mut pool, rng);

    if let Some(pinned) = forced_first.filter(|&m| composition.has(m)) {
        if let Some(idx) = pool.iter().position(|&m| m == pinned) {
            pool.swap(0, idx);
        }
    }

    Ok(pool.into_iter().take(hand_size as usize).collect())
}

/// Per-move counts of a hand.
#[must_use]
pub fn histogram(hand: &[Move]) -> MoveMap<u32> {
    let mut counts = MoveMap::with_value(0u32);
    for &m in hand {
        counts[m] += 1;
    }
    counts
}
