//! The run state machine.
//!
//! A [`RunState`] owns everything that persists across rounds: the player's
//! composition, currency, charge, reservation queue, the run-fixed opponent
//! profiles, and the preview of the next opponent. It is `Active` until the
//! miss count reaches `max_miss`, then `GameOver` for good.
//!
//! ## Round flow
//!
//! [`RunState::play_next_round`] plays against the current preview:
//!
//! 1. The front reservation (if any) is taken. It pins the first player
//!    draw only if the move is still in the composition and a charged
//!    stack pays for it.
//! 2. Both hands are drawn and judged; the [`OutcomeHook`] may rewrite
//!    outcomes. Round 0 redraws up to [`INTRO_MAX_ATTEMPTS`] times until
//!    it clears.
//! 3. Bookkeeping: hand statistics, score and currency on a clear, charge
//!    for every missing move, or one more miss.
//! 4. The round index advances and a new preview is rolled.

use std::collections::VecDeque;

use super::events::RunEvent;
use super::hook::{NoOverrides, OutcomeHook};
use super::report::{IntroOutcome, IntroReport, OpponentPreview, RoundReport, INTRO_MAX_ATTEMPTS};
use super::stats::ArchetypeHandStat;
use crate::charge::{stacks_for, ChargeResource, GainFormula, LinearGain};
use crate::core::{
    Composition, GameRng, Ineligibility, Move, MoveMap, MoveRng, RunConfig, RunError, RunResult,
};
use crate::draft::{CommitReceipt, StagedDraft};
use crate::opponent::{
    assign_banners, Archetype, ArchetypeMap, Banner, EnvironmentWeights, OpponentProfileProvider,
    RangeProfileProvider,
};
use crate::round::{simulate, RoundResult};

/// Whether the run still accepts rounds and drafts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    Active,
    GameOver,
}

/// Assembles a [`RunState`] with pluggable collaborators.
///
/// ```
/// use rps_build::core::{Composition, GameRng, RunConfig};
/// use rps_build::run::RunBuilder;
///
/// let run = RunBuilder::new(RunConfig::default())
///     .composition(Composition::new(10, 10, 10).unwrap())
///     .build(GameRng::new(42))
///     .unwrap();
/// assert_eq!(run.round_index(), 0);
/// assert_eq!(run.currency(), 10);
/// ```
pub struct RunBuilder {
    config: RunConfig,
    composition: Composition,
    provider: Box<dyn OpponentProfileProvider>,
    gain_formula: Box<dyn GainFormula>,
    outcome_hook: Box<dyn OutcomeHook>,
}

impl RunBuilder {
    /// Start from a config; the player composition defaults to 10/10/10.
    #[must_use]
    pub fn new(config: RunConfig) -> Self {
        Self {
            config,
            composition: Composition::even(),
            provider: Box::new(RangeProfileProvider::default()),
            gain_formula: Box::new(LinearGain::default()),
            outcome_hook: Box::new(NoOverrides),
        }
    }

    #[must_use]
    pub fn composition(mut self, composition: Composition) -> Self {
        self.composition = composition;
        self
    }

    #[must_use]
    pub fn provider(mut self, provider: impl OpponentProfileProvider + 'static) -> Self {
        self.provider = Box::new(provider);
        self
    }

    #[must_use]
    pub fn gain_formula(mut self, formula: impl GainFormula + 'static) -> Self {
        self.gain_formula = Box::new(formula);
        self
    }

    #[must_use]
    pub fn outcome_hook(mut self, hook: impl OutcomeHook + 'static) -> Self {
        self.outcome_hook = Box::new(hook);
        self
    }

    /// Validate the config and initialize the run.
    ///
    /// RNG draws happen in a fixed order: environment weight shuffle (when
    /// enabled), banners, the Heavy, Balance and TwinTop profiles, then the
    /// first preview.
    pub fn build<R: MoveRng>(self, mut rng: R) -> RunResult<RunState<R>> {
        let RunBuilder {
            config,
            composition,
            provider,
            gain_formula,
            outcome_hook,
        } = self;
        config.validate()?;

        let env_weights = if config.shuffle_env_weights {
            config.env_weights.shuffled(&mut rng)
        } else {
            config.env_weights
        };

        let charge = ChargeResource::new(config.charge_ceiling);
        let currency = config.initial_currency;

        let banners = assign_banners(&mut rng, config.unique_banners);
        let mut profiles = ArchetypeMap::from_array([composition; 3]);
        for archetype in Archetype::ALL {
            profiles[archetype] = provider.generate(archetype, &mut rng, banners[archetype])?;
        }

        let archetype = env_weights.roll(&mut rng);
        let preview = OpponentPreview {
            archetype,
            banner: banners[archetype],
            composition: profiles[archetype],
        };

        let mut events = im::Vector::new();
        events.push_back(RunEvent::RunStarted {
            composition,
            currency,
            banners,
            env_weights,
        });
        events.push_back(RunEvent::PreviewRolled {
            round_index: 0,
            archetype,
        });

        Ok(RunState {
            config,
            rng,
            gain_formula,
            outcome_hook,
            round_index: 0,
            miss_count: 0,
            score: 0,
            currency,
            composition,
            charge,
            reservations: VecDeque::new(),
            env_weights,
            banners,
            profiles,
            preview,
            stats: ArchetypeMap::default(),
            last_round: None,
            events,
        })
    }
}

/// Complete state of one run.
pub struct RunState<R: MoveRng = GameRng> {
    config: RunConfig,
    rng: R,
    gain_formula: Box<dyn GainFormula>,
    outcome_hook: Box<dyn OutcomeHook>,

    round_index: u32,
    miss_count: u32,
    score: u32,
    currency: u32,
    composition: Composition,
    charge: ChargeResource,
    reservations: VecDeque<Move>,

    env_weights: EnvironmentWeights,
    banners: ArchetypeMap<Banner>,
    profiles: ArchetypeMap<Composition>,
    preview: OpponentPreview,

    stats: ArchetypeMap<ArchetypeHandStat>,
    last_round: Option<RoundReport>,
    events: im::Vector<RunEvent>,
}

impl RunState<GameRng> {
    /// Run with default collaborators and a seeded [`GameRng`].
    pub fn new(config: RunConfig, composition: Composition, seed: u64) -> RunResult<Self> {
        RunBuilder::new(config)
            .composition(composition)
            .build(GameRng::new(seed))
    }
}

impl<R: MoveRng> std::fmt::Debug for RunState<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunState")
            .field("round_index", &self.round_index)
            .field("miss_count", &self.miss_count)
            .field("score", &self.score)
            .field("currency", &self.currency)
            .field("composition", &self.composition)
            .field("charge", &self.charge)
            .field("reservations", &self.reservations)
            .field("preview", &self.preview)
            .finish_non_exhaustive()
    }
}

impl<R: MoveRng> RunState<R> {
    // === Accessors ===

    #[must_use]
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Rounds played so far.
    #[must_use]
    pub fn round_index(&self) -> u32 {
        self.round_index
    }

    #[must_use]
    pub fn miss_count(&self) -> u32 {
        self.miss_count
    }

    /// Cleared rounds.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn currency(&self) -> u32 {
        self.currency
    }

    #[must_use]
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    #[must_use]
    pub fn charge(&self) -> &ChargeResource {
        &self.charge
    }

    /// Pending reservations, front first.
    #[must_use]
    pub fn reservations(&self) -> &VecDeque<Move> {
        &self.reservations
    }

    #[must_use]
    pub fn status(&self) -> RunStatus {
        if self.miss_count >= self.config.max_miss {
            RunStatus::GameOver
        } else {
            RunStatus::Active
        }
    }

    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.status() == RunStatus::GameOver
    }

    /// Misses left before the run ends.
    #[must_use]
    pub fn lives_left(&self) -> u32 {
        self.config.max_miss.saturating_sub(self.miss_count)
    }

    /// Opponent of the next round.
    #[must_use]
    pub fn preview(&self) -> &OpponentPreview {
        &self.preview
    }

    /// Environment weights in effect (after the optional start shuffle).
    #[must_use]
    pub fn env_weights(&self) -> &EnvironmentWeights {
        &self.env_weights
    }

    #[must_use]
    pub fn banner(&self, archetype: Archetype) -> Banner {
        self.banners[archetype]
    }

    /// Run-fixed composition of an archetype.
    #[must_use]
    pub fn opponent_composition(&self, archetype: Archetype) -> &Composition {
        &self.profiles[archetype]
    }

    #[must_use]
    pub fn hand_stat(&self, archetype: Archetype) -> &ArchetypeHandStat {
        &self.stats[archetype]
    }

    #[must_use]
    pub fn hand_stats(&self) -> &ArchetypeMap<ArchetypeHandStat> {
        &self.stats
    }

    /// Report of the most recent round.
    #[must_use]
    pub fn last_round(&self) -> Option<&RoundReport> {
        self.last_round.as_ref()
    }

    /// Journal of everything the run has done.
    #[must_use]
    pub fn events(&self) -> &im::Vector<RunEvent> {
        &self.events
    }

    /// Generator driving draws and rolls, at its current position.
    #[must_use]
    pub fn rng(&self) -> &R {
        &self.rng
    }

    /// Charge `m` would hold after buying `units` more.
    #[must_use]
    pub fn projected_charge(&self, m: Move, units: u32) -> f32 {
        self.charge.get(m) + units as f32 * self.config.charge_purchase_amount
    }

    /// Stacks `m` would hold after buying `units` more.
    #[must_use]
    pub fn projected_stacks(&self, m: Move, units: u32) -> u32 {
        stacks_for(self.projected_charge(m, units), self.charge.ceiling())
    }

    /// How many times `m` may appear in the reservation queue when the
    /// composition holds `count` of it and `units` of charge are still to
    /// be bought.
    #[must_use]
    pub fn reservation_cap(&self, m: Move, count: u32, units: u32) -> u32 {
        if count == 0 {
            return 0;
        }
        self.projected_stacks(m, units)
            .min(count)
            .min(self.config.hand_size)
    }

    // === Rounds ===

    /// Play one round against the current preview.
    ///
    /// Fails with `InvalidState` once the run is over.
    pub fn play_next_round(&mut self) -> RunResult<RoundReport> {
        if self.is_game_over() {
            return Err(RunError::InvalidState("run is over"));
        }

        let opponent = self.preview;
        let front = self.reservations.front().copied().map(|card| {
            let payable = self.composition.has(card) && self.charge.is_charged(card);
            (card, payable)
        });
        let forced_first = front.and_then(|(card, payable)| payable.then_some(card));

        let (result, intro) = if self.round_index == 0 {
            let (result, intro) = self.play_intro(&opponent, forced_first)?;
            (result, Some(intro))
        } else {
            (self.simulate_round(&opponent, forced_first)?, None)
        };

        if let Some((card, pinned)) = front {
            self.reservations.pop_front();
            if pinned {
                self.charge.consume_one_stack(card);
            }
            self.events.push_back(RunEvent::ReservationUsed { card, pinned });
        }

        self.stats[opponent.archetype].add_hand(result.opponent_hand());

        let mut charge_gained = MoveMap::with_value(0.0f32);
        let mut currency_gained = 0;
        if result.is_clear() {
            self.score += 1;
            currency_gained = self.config.currency_per_clear;
            self.currency = self.currency.saturating_add(currency_gained);
            for &card in result.missing() {
                if !self.composition.has(card) {
                    continue;
                }
                let gain = self.gain_formula.calc_gain(card, &self.composition);
                if gain.is_nan() || gain <= 0.0 {
                    continue;
                }
                self.charge.add(card, gain);
                charge_gained[card] += gain;
                self.events.push_back(RunEvent::ChargeGained { card, amount: gain });
            }
        } else {
            self.miss_count += 1;
        }

        self.events.push_back(RunEvent::RoundResolved {
            round_index: self.round_index,
            archetype: opponent.archetype,
            losses: result.losses(),
            clear: result.is_clear(),
            attempts: intro.map_or(1, |i| i.attempts),
        });

        let report = RoundReport {
            round_index: self.round_index,
            opponent,
            forced_first,
            result,
            intro,
            charge_gained,
            currency_gained,
        };

        self.round_index += 1;
        self.roll_preview();
        if self.is_game_over() {
            self.events.push_back(RunEvent::GameOver {
                round_index: self.round_index,
                score: self.score,
            });
        }

        self.last_round = Some(report.clone());
        Ok(report)
    }

    /// Redraw the first round until it clears or attempts run out.
    fn play_intro(
        &mut self,
        opponent: &OpponentPreview,
        forced_first: Option<Move>,
    ) -> RunResult<(RoundResult, IntroReport)> {
        let mut attempts = 0;
        loop {
            attempts += 1;
            let result = self.simulate_round(opponent, forced_first)?;
            if result.is_clear() {
                let outcome = if attempts == 1 {
                    IntroOutcome::FirstDraw
                } else {
                    IntroOutcome::Rerolled
                };
                return Ok((result, IntroReport { attempts, outcome }));
            }
            if attempts >= INTRO_MAX_ATTEMPTS {
                let report = IntroReport {
                    attempts,
                    outcome: IntroOutcome::Exhausted,
                };
                return Ok((result, report));
            }
        }
    }

    fn simulate_round(
        &mut self,
        opponent: &OpponentPreview,
        forced_first: Option<Move>,
    ) -> RunResult<RoundResult> {
        let mut result = simulate(
            &self.composition,
            &opponent.composition,
            self.config.hand_size,
            self.config.lose_threshold,
            &mut self.rng,
            forced_first,
        )?;
        self.outcome_hook.apply(opponent, &mut result);
        Ok(result)
    }

    fn roll_preview(&mut self) {
        let archetype = self.env_weights.roll(&mut self.rng);
        self.preview = OpponentPreview {
            archetype,
            banner: self.banners[archetype],
            composition: self.profiles[archetype],
        };
        self.events.push_back(RunEvent::PreviewRolled {
            round_index: self.round_index,
            archetype,
        });
    }

    // === Direct mutations ===

    fn ensure_active(&self) -> RunResult<()> {
        if self.is_game_over() {
            return Err(RunError::InvalidState("run is over"));
        }
        Ok(())
    }

    fn spend(&mut self, amount: u32) -> RunResult<()> {
        if amount > self.currency {
            return Err(Ineligibility::OverBudget {
                cost: amount,
                available: self.currency,
            }
            .into());
        }
        if amount > 0 {
            self.currency -= amount;
            self.events.push_back(RunEvent::CurrencySpent {
                amount,
                remaining: self.currency,
            });
        }
        Ok(())
    }

    /// Replace the player composition outright.
    ///
    /// Reservations for moves the new composition lacks are dropped.
    pub fn set_composition(&mut self, counts: MoveMap<u32>) -> RunResult<()> {
        self.ensure_active()?;
        let composition = Composition::from_counts(counts)?;
        self.install_composition(composition);
        Ok(())
    }

    fn install_composition(&mut self, composition: Composition) {
        if composition == self.composition {
            return;
        }
        let from = self.composition;
        self.composition = composition;
        self.events.push_back(RunEvent::CompositionChanged {
            from,
            to: composition,
        });

        let before = self.reservations.len();
        self.reservations.retain(|&m| composition.has(m));
        if self.reservations.len() != before {
            self.push_reservations_changed();
        }
    }

    fn push_reservations_changed(&mut self) {
        self.events.push_back(RunEvent::ReservationsChanged {
            queue: self.reservations.iter().copied().collect(),
        });
    }

    /// Reserve `m` as the only pending pin.
    ///
    /// Requires a charged stack and `m` in the composition. Any earlier
    /// reservations are replaced.
    pub fn reserve(&mut self, m: Move) -> RunResult<()> {
        self.ensure_active()?;
        if !self.composition.has(m) {
            return Err(Ineligibility::MoveAbsent(m).into());
        }
        if !self.charge.is_charged(m) {
            return Err(Ineligibility::NotCharged(m).into());
        }
        self.reservations.clear();
        self.reservations.push_back(m);
        self.push_reservations_changed();
        Ok(())
    }

    /// Drop every pending reservation. Returns whether any existed.
    pub fn cancel_reservation(&mut self) -> bool {
        if self.reservations.is_empty() {
            return false;
        }
        self.reservations.clear();
        self.push_reservations_changed();
        true
    }

    /// Buy `units` of charge for `m` at one currency each.
    pub fn buy_charge(&mut self, m: Move, units: u32) -> RunResult<()> {
        self.ensure_active()?;
        if units == 0 {
            return Ok(());
        }
        self.spend(units)?;
        let amount = units as f32 * self.config.charge_purchase_amount;
        self.charge.add(m, amount);
        self.events.push_back(RunEvent::ChargePurchased {
            card: m,
            units,
            amount,
        });
        Ok(())
    }

    /// Move `amount` cards from `sub` to `add` at one currency per card.
    pub fn adjust_composition(&mut self, add: Move, sub: Move, amount: u32) -> RunResult<()> {
        self.ensure_active()?;
        if amount == 0 || add == sub {
            return Ok(());
        }
        let have = self.composition.count(sub);
        if have < amount {
            return Err(Ineligibility::NotEnoughCards {
                card: sub,
                have,
                need: amount,
            }
            .into());
        }
        let mut counts = *self.composition.counts();
        counts[sub] -= amount;
        counts[add] += amount;
        let composition = Composition::from_counts(counts)?;

        self.spend(amount)?;
        self.install_composition(composition);
        Ok(())
    }

    /// Apply a staged draft in one step, or change nothing.
    pub(crate) fn apply_draft(&mut self, staged: &StagedDraft) -> RunResult<CommitReceipt> {
        self.ensure_active()?;
        if staged.opened_at_round != self.round_index {
            return Err(RunError::InvalidState("run advanced since the draft was opened"));
        }
        if staged.cost > self.currency {
            return Err(Ineligibility::OverBudget {
                cost: staged.cost,
                available: self.currency,
            }
            .into());
        }
        if staged.reservations.len() > self.config.hand_size as usize {
            return Err(Ineligibility::ReservationsFull.into());
        }
        let mut reserved = MoveMap::with_value(0u32);
        for &m in &staged.reservations {
            reserved[m] += 1;
            let cap = self.reservation_cap(m, staged.composition.count(m), staged.purchases[m]);
            if reserved[m] > cap {
                let reason = if staged.composition.has(m) {
                    Ineligibility::NotCharged(m)
                } else {
                    Ineligibility::MoveAbsent(m)
                };
                return Err(reason.into());
            }
        }

        // Validated; from here on nothing fails.
        self.install_composition(staged.composition);
        self.spend(staged.cost)?;
        for m in Move::ALL {
            let units = staged.purchases[m];
            if units == 0 {
                continue;
            }
            let amount = units as f32 * self.config.charge_purchase_amount;
            self.charge.add(m, amount);
            self.events.push_back(RunEvent::ChargePurchased {
                card: m,
                units,
                amount,
            });
        }
        let queue: VecDeque<Move> = staged.reservations.iter().copied().collect();
        if queue != self.reservations {
            self.reservations = queue;
            self.push_reservations_changed();
        }
        self.events.push_back(RunEvent::DraftCommitted { cost: staged.cost });

        Ok(CommitReceipt {
            cost: staged.cost,
            currency_after: self.currency,
            composition: self.composition,
            reservations: staged.reservations.clone(),
        })
    }
}
