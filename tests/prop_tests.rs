//! Property-based tests for draw, judge, charge and draft invariants.

use proptest::prelude::*;

use rps_build::charge::{stacks_for, ChargeResource};
use rps_build::core::{Composition, GameRng, Move, MoveMap, Outcome, RunConfig};
use rps_build::deck::{build_pool, draw_hand, histogram};
use rps_build::draft::DraftTransaction;
use rps_build::round::{judge, simulate};
use rps_build::run::RunState;

/// Any valid composition: two cut points in 0..=30.
fn composition() -> impl Strategy<Value = Composition> {
    (0u32..=30, 0u32..=30).prop_map(|(a, b)| {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        Composition::new(lo, hi - lo, 30 - hi).unwrap()
    })
}

fn any_move() -> impl Strategy<Value = Move> {
    (0usize..3).prop_map(|i| Move::ALL[i])
}

/// One draft edit.
#[derive(Clone, Debug)]
enum Edit {
    Add(Move),
    Remove(Move),
    Buy(Move),
    Withdraw(Move),
    Reserve(Move),
}

fn edit() -> impl Strategy<Value = Edit> {
    prop_oneof![
        any_move().prop_map(Edit::Add),
        any_move().prop_map(Edit::Remove),
        any_move().prop_map(Edit::Buy),
        any_move().prop_map(Edit::Withdraw),
        any_move().prop_map(Edit::Reserve),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// The pool is exactly the composition's multiset.
    #[test]
    fn prop_pool_matches_composition(comp in composition()) {
        let pool = build_pool(&comp);
        prop_assert_eq!(pool.len(), 30);
        prop_assert_eq!(histogram(&pool), *comp.counts());
    }

    /// Hands have the configured length and never exceed the composition.
    #[test]
    fn prop_draw_within_composition(
        comp in composition(),
        hand_size in 1u32..=30,
        seed in any::<u64>(),
    ) {
        let mut rng = GameRng::new(seed);
        let hand = draw_hand(&comp, hand_size, &mut rng, None).unwrap();
        prop_assert_eq!(hand.len(), hand_size as usize);
        let drawn = histogram(&hand);
        for m in Move::ALL {
            prop_assert!(drawn[m] <= comp.count(m));
        }
    }

    /// A pinned move that is present always comes first.
    #[test]
    fn prop_pin_lands_first(
        comp in composition(),
        pin in any_move(),
        hand_size in 1u32..=30,
        seed in any::<u64>(),
    ) {
        let mut rng = GameRng::new(seed);
        let hand = draw_hand(&comp, hand_size, &mut rng, Some(pin)).unwrap();
        if comp.has(pin) {
            prop_assert_eq!(hand[0], pin);
        }
        prop_assert_eq!(hand.len(), hand_size as usize);
    }

    /// Swapping sides reverses every outcome.
    #[test]
    fn prop_judge_antisymmetric(p in any_move(), o in any_move()) {
        prop_assert_eq!(judge(p, o), judge(o, p).reversed());
        prop_assert_eq!(judge(p, o) == Outcome::Tie, p == o);
    }

    /// Missing moves are exactly the present moves absent from the hand.
    #[test]
    fn prop_missing_moves(
        player in composition(),
        opponent in composition(),
        seed in any::<u64>(),
    ) {
        let mut rng = GameRng::new(seed);
        let result = simulate(&player, &opponent, 7, 3, &mut rng, None).unwrap();
        for m in Move::ALL {
            let expected = player.has(m) && !result.player_hand().contains(&m);
            prop_assert_eq!(result.missing().contains(&m), expected);
        }
        prop_assert_eq!(result.is_clear(), result.losses() < 3);
    }

    /// Stacks track floor(value / ceiling) and consuming one lowers it by one.
    #[test]
    fn prop_charge_stacking(
        adds in proptest::collection::vec(0.0f32..1.5, 0..20),
        ceiling in 0.25f32..2.0,
    ) {
        let mut charge = ChargeResource::new(ceiling);
        for &a in &adds {
            charge.add(Move::Rock, a);
        }
        let value = charge.get(Move::Rock);
        let stacks = charge.charged_stacks(Move::Rock);
        prop_assert_eq!(stacks, stacks_for(value, ceiling));
        prop_assert!(value >= 0.0);

        if stacks > 0 {
            prop_assert!(charge.consume_one_stack(Move::Rock));
            prop_assert!(charge.charged_stacks(Move::Rock) + 1 >= stacks);
            prop_assert!(charge.get(Move::Rock) >= 0.0);
            prop_assert!((charge.get(Move::Rock) - (value - ceiling).max(0.0)).abs() < 1e-4);
        } else {
            prop_assert!(!charge.consume_one_stack(Move::Rock));
            prop_assert_eq!(charge.get(Move::Rock), value);
        }
    }

    /// No edit sequence pushes a draft over budget or past its caps, and
    /// cancelling leaves the run untouched.
    #[test]
    fn prop_draft_stays_within_bounds(
        comp in composition(),
        currency in 0u32..25,
        seed in any::<u64>(),
        edits in proptest::collection::vec(edit(), 0..60),
    ) {
        let config = RunConfig::default().with_currency(currency, 1);
        let run = RunState::new(config, comp, seed).unwrap();
        let before = (run.currency(), *run.composition(), run.events().len());

        let mut draft = DraftTransaction::open(&run).unwrap();
        for e in edits {
            let _ = match e {
                Edit::Add(m) => draft.add_card(&run, m),
                Edit::Remove(m) => draft.remove_card(&run, m),
                Edit::Buy(m) => draft.buy_charge(&run, m),
                Edit::Withdraw(m) => draft.withdraw_charge(&run, m),
                Edit::Reserve(m) => draft.toggle_reservation(&run, m).map(|_| ()),
            };
            prop_assert!(draft.total_cost() <= draft.budget());
            prop_assert!(draft.reservations().len() <= 7);
            for m in Move::ALL {
                prop_assert!(draft.reserved_count(m) <= draft.reservation_cap(&run, m));
            }
        }

        let shown: MoveMap<u32> = draft.shown_counts(&run);
        prop_assert!(Move::ALL.iter().all(|&m| shown[m] <= 30 + draft.budget()));

        draft.cancel();
        prop_assert_eq!((run.currency(), *run.composition(), run.events().len()), before);
    }

    /// A committed draft spends exactly its cost.
    #[test]
    fn prop_commit_spends_cost(
        seed in any::<u64>(),
        swaps in proptest::collection::vec((any_move(), any_move()), 0..8),
        buys in proptest::collection::vec(any_move(), 0..5),
    ) {
        let mut run = RunState::new(RunConfig::default(), Composition::even(), seed).unwrap();
        let mut draft = DraftTransaction::open(&run).unwrap();
        for (add, sub) in swaps {
            if draft.can_add(add) && draft.can_remove(&run, sub) {
                let _ = draft.add_card(&run, add);
                if draft.remove_card(&run, sub).is_err() {
                    let _ = draft.remove_card(&run, add);
                }
            }
        }
        for m in buys {
            let _ = draft.buy_charge(&run, m);
        }

        let cost = draft.total_cost();
        match draft.commit(&mut run) {
            Ok(receipt) => {
                prop_assert_eq!(receipt.cost, cost);
                prop_assert_eq!(run.currency(), 10 - cost);
            }
            Err(rejected) => {
                prop_assert_eq!(run.currency(), 10);
                prop_assert!(rejected.into_draft().total_cost() <= 10);
            }
        }
    }
}
