//! Pairwise judging and round aggregation.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{Composition, Move, MoveRng, Outcome, RunResult};
use crate::deck::{draw_hand, Hand};

/// Judge one pairing from the player's side.
///
/// ```
/// use rps_build::core::{Move, Outcome};
/// use rps_build::round::judge;
///
/// assert_eq!(judge(Move::Rock, Move::Scissors), Outcome::Win);
/// assert_eq!(judge(Move::Rock, Move::Paper), Outcome::Lose);
/// assert_eq!(judge(Move::Rock, Move::Rock), Outcome::Tie);
/// ```
#[must_use]
pub fn judge(player: Move, opponent: Move) -> Outcome {
    if player == opponent {
        Outcome::Tie
    } else if player.beats() == opponent {
        Outcome::Win
    } else {
        Outcome::Lose
    }
}

/// One outcome replaced after judging.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeOverride {
    /// Hand position that was overridden.
    pub index: usize,
    /// Outcome as judged.
    pub original: Outcome,
    /// Outcome that now stands.
    pub overridden: Outcome,
    /// Label supplied by whoever applied the override.
    pub reason: String,
}

/// Everything that happened in one round.
///
/// Hands and outcomes are parallel sequences of hand-size length.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundResult {
    player_hand: Hand,
    opponent_hand: Hand,
    outcomes: SmallVec<[Outcome; 8]>,
    losses: u32,
    lose_threshold: u32,
    clear: bool,
    missing: SmallVec<[Move; 3]>,
    overrides: Vec<OutcomeOverride>,
}

impl RoundResult {
    /// Judge two drawn hands against each other.
    ///
    /// Hands are compared index by index up to the shorter length. Missing
    /// moves are those present in `player_composition` that never appear in
    /// `player_hand`.
    #[must_use]
    pub fn from_hands(
        player_hand: Hand,
        opponent_hand: Hand,
        player_composition: &Composition,
        lose_threshold: u32,
    ) -> Self {
        let outcomes: SmallVec<[Outcome; 8]> = player_hand
            .iter()
            .zip(opponent_hand.iter())
            .map(|(&p, &o)| judge(p, o))
            .collect();

        let missing = player_composition
            .moves_present()
            .filter(|m| !player_hand.contains(m))
            .collect();

        let mut result = Self {
            player_hand,
            opponent_hand,
            outcomes,
            losses: 0,
            lose_threshold,
            clear: false,
            missing,
            overrides: Vec::new(),
        };
        result.recount();
        result
    }

    fn recount(&mut self) {
        self.losses = self.outcomes.iter().filter(|&&o| o == Outcome::Lose).count() as u32;
        self.clear = self.losses < self.lose_threshold;
    }

    /// Player's drawn moves.
    #[must_use]
    pub fn player_hand(&self) -> &[Move] {
        &self.player_hand
    }

    /// Opponent's drawn moves.
    #[must_use]
    pub fn opponent_hand(&self) -> &[Move] {
        &self.opponent_hand
    }

    /// Per-position outcomes, after any overrides.
    #[must_use]
    pub fn outcomes(&self) -> &[Outcome] {
        &self.outcomes
    }

    /// Number of cards dealt to each side.
    #[must_use]
    pub fn hand_size(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of lost pairings.
    #[must_use]
    pub fn losses(&self) -> u32 {
        self.losses
    }

    /// Number of won pairings.
    #[must_use]
    pub fn wins(&self) -> u32 {
        self.outcomes.iter().filter(|&&o| o == Outcome::Win).count() as u32
    }

    /// Whether the round cleared (`losses < lose_threshold`).
    #[must_use]
    pub fn is_clear(&self) -> bool {
        self.clear
    }

    /// Moves in the player's composition that were never drawn.
    #[must_use]
    pub fn missing(&self) -> &[Move] {
        &self.missing
    }

    /// Overrides applied after judging, in application order.
    #[must_use]
    pub fn overrides(&self) -> &[OutcomeOverride] {
        &self.overrides
    }

    /// Replace the outcome at `index` and re-derive losses and clear.
    ///
    /// Returns `false` (no change) if the index is out of range or the
    /// outcome is already `outcome`.
    pub fn apply_override(&mut self, index: usize, outcome: Outcome, reason: impl Into<String>) -> bool {
        let Some(slot) = self.outcomes.get_mut(index) else {
            return false;
        };
        if *slot == outcome {
            return false;
        }
        self.overrides.push(OutcomeOverride {
            index,
            original: *slot,
            overridden: outcome,
            reason: reason.into(),
        });
        *slot = outcome;
        self.recount();
        true
    }
}

/// Draw both hands and judge them.
///
/// The player hand is drawn first (honoring `forced_first`), then the
/// opponent hand, which is never pinned.
pub fn simulate(
    player: &Composition,
    opponent: &Composition,
    hand_size: u32,
    lose_threshold: u32,
    rng: &mut impl MoveRng,
    forced_first: Option<Move>,
) -> RunResult<RoundResult> {
    let player_hand = draw_hand(player, hand_size, rng, forced_first)?;
    let opponent_hand = draw_hand(opponent, hand_size, rng, None)?;
    Ok(RoundResult::from_hands(player_hand, opponent_hand, player, lose_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;
    use smallvec::smallvec;

    #[test]
    fn test_judge_table() {
        for p in Move::ALL {
            assert_eq!(judge(p, p), Outcome::Tie);
            assert_eq!(judge(p, p.beats()), Outcome::Win);
            assert_eq!(judge(p, p.beaten_by()), Outcome::Lose);
        }
    }

    #[test]
    fn test_judge_antisymmetric() {
        for p in Move::ALL {
            for o in Move::ALL {
                assert_eq!(judge(p, o), judge(o, p).reversed());
            }
        }
    }

    #[test]
    fn test_from_hands_counts_losses() {
        let comp = Composition::even();
        let player: Hand = smallvec![Move::Rock, Move::Rock, Move::Scissors, Move::Paper];
        let opponent: Hand = smallvec![Move::Paper, Move::Scissors, Move::Rock, Move::Paper];
        let result = RoundResult::from_hands(player, opponent, &comp, 2);

        assert_eq!(
            result.outcomes(),
            &[Outcome::Lose, Outcome::Win, Outcome::Lose, Outcome::Tie]
        );
        assert_eq!(result.losses(), 2);
        assert_eq!(result.wins(), 1);
        assert!(!result.is_clear());
        assert!(result.missing().is_empty());
    }

    #[test]
    fn test_missing_moves() {
        let comp = Composition::even();
        let player: Hand = smallvec![Move::Rock, Move::Scissors, Move::Rock];
        let opponent: Hand = smallvec![Move::Rock, Move::Rock, Move::Rock];
        let result = RoundResult::from_hands(player, opponent, &comp, 3);
        assert_eq!(result.missing(), &[Move::Paper]);
        assert!(result.is_clear());
    }

    #[test]
    fn test_absent_moves_never_missing() {
        let comp = Composition::new(15, 15, 0).unwrap();
        let player: Hand = smallvec![Move::Rock, Move::Rock];
        let opponent: Hand = smallvec![Move::Rock, Move::Rock];
        let result = RoundResult::from_hands(player, opponent, &comp, 3);
        assert_eq!(result.missing(), &[Move::Scissors]);
    }

    #[test]
    fn test_override_recomputes_clear() {
        let comp = Composition::even();
        let player: Hand = smallvec![Move::Rock, Move::Rock, Move::Rock];
        let opponent: Hand = smallvec![Move::Paper, Move::Paper, Move::Paper];
        let mut result = RoundResult::from_hands(player, opponent, &comp, 3);
        assert_eq!(result.losses(), 3);
        assert!(!result.is_clear());

        assert!(result.apply_override(1, Outcome::Win, "bonus"));
        assert_eq!(result.losses(), 2);
        assert!(result.is_clear());
        assert_eq!(
            result.overrides(),
            &[OutcomeOverride {
                index: 1,
                original: Outcome::Lose,
                overridden: Outcome::Win,
                reason: "bonus".into(),
            }]
        );

        assert!(!result.apply_override(1, Outcome::Win, "again"));
        assert!(!result.apply_override(9, Outcome::Win, "out of range"));
        assert_eq!(result.overrides().len(), 1);
    }

    #[test]
    fn test_simulate_lengths() {
        let player = Composition::new(10, 10, 10).unwrap();
        let opponent = Composition::new(30, 0, 0).unwrap();
        let mut rng = GameRng::new(5);
        let result = simulate(&player, &opponent, 7, 3, &mut rng, None).unwrap();
        assert_eq!(result.player_hand().len(), 7);
        assert_eq!(result.opponent_hand().len(), 7);
        assert_eq!(result.hand_size(), 7);
        assert!(result.opponent_hand().iter().all(|&m| m == Move::Rock));
        assert_eq!(result.is_clear(), result.losses() < 3);
    }

    #[test]
    fn test_simulate_pins_player_only() {
        let player = Composition::new(29, 0, 1).unwrap();
        let opponent = Composition::new(29, 0, 1).unwrap();
        let mut rng = GameRng::new(11);
        let mut opponent_led_paper = 0;
        for _ in 0..40 {
            let result = simulate(&player, &opponent, 2, 3, &mut rng, Some(Move::Paper)).unwrap();
            assert_eq!(result.player_hand()[0], Move::Paper);
            if result.opponent_hand()[0] == Move::Paper {
                opponent_led_paper += 1;
            }
        }
        assert!(opponent_led_paper < 40);
    }
}
