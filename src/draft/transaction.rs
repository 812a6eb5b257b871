//! The draft transaction and its commit.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::charge::{stack_remainder, stack_tolerance};
use crate::core::{Composition, Ineligibility, Move, MoveMap, MoveRng, RunError, RunResult};
use crate::run::RunState;

/// A validated draft, ready for the run to apply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct StagedDraft {
    pub(crate) opened_at_round: u32,
    pub(crate) composition: Composition,
    pub(crate) cost: u32,
    pub(crate) purchases: MoveMap<u32>,
    pub(crate) reservations: Vec<Move>,
}

/// What a successful commit did.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitReceipt {
    /// Currency deducted.
    pub cost: u32,
    pub currency_after: u32,
    pub composition: Composition,
    /// Reservation queue now installed, front first.
    pub reservations: Vec<Move>,
}

/// A commit that changed nothing. The draft comes back for correction.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("draft commit rejected: {error}")]
pub struct CommitRejected {
    error: RunError,
    draft: DraftTransaction,
}

impl CommitRejected {
    #[must_use]
    pub fn error(&self) -> &RunError {
        &self.error
    }

    /// Recover the draft to keep editing it.
    #[must_use]
    pub fn into_draft(self) -> DraftTransaction {
        self.draft
    }

    #[must_use]
    pub fn into_parts(self) -> (RunError, DraftTransaction) {
        (self.error, self.draft)
    }
}

/// Result of [`DraftTransaction::toggle_reservation`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReservationToggle {
    /// One more entry was appended.
    Added,
    /// The move was at its cap; all of its entries were removed.
    Cleared { removed: u32 },
}

/// Pending edits between two rounds.
///
/// The draft never touches the run until [`commit`](Self::commit). Every
/// mutation checks its precondition first and either applies fully or
/// returns `Ineligible` with the draft unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftTransaction {
    budget: u32,
    opened_at_round: u32,
    adds: MoveMap<u32>,
    subs: MoveMap<u32>,
    purchases: MoveMap<u32>,
    reservations: Vec<Move>,
    opened_reservations: Vec<Move>,
}

fn sum(map: &MoveMap<u32>) -> u32 {
    map.values().sum()
}

impl DraftTransaction {
    /// Open a draft against the run's current state.
    ///
    /// The budget is the run's currency now and stays fixed for the
    /// session. The reservation list starts as the run's queue.
    pub fn open<R: MoveRng>(run: &RunState<R>) -> RunResult<Self> {
        if run.is_game_over() {
            return Err(RunError::InvalidState("run is over"));
        }
        let reservations: Vec<Move> = run.reservations().iter().copied().collect();
        Ok(Self {
            budget: run.currency(),
            opened_at_round: run.round_index(),
            adds: MoveMap::with_value(0),
            subs: MoveMap::with_value(0),
            purchases: MoveMap::with_value(0),
            opened_reservations: reservations.clone(),
            reservations,
        })
    }

    // === Costs ===

    #[must_use]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    #[must_use]
    pub fn opened_at_round(&self) -> u32 {
        self.opened_at_round
    }

    /// `max(total adds, total subs)`: one point buys one card swap.
    #[must_use]
    pub fn composition_cost(&self) -> u32 {
        sum(&self.adds).max(sum(&self.subs))
    }

    /// One point per purchased charge unit.
    #[must_use]
    pub fn charge_cost(&self) -> u32 {
        sum(&self.purchases)
    }

    #[must_use]
    pub fn total_cost(&self) -> u32 {
        self.composition_cost() + self.charge_cost()
    }

    #[must_use]
    pub fn points_left(&self) -> u32 {
        self.budget.saturating_sub(self.total_cost())
    }

    fn check_affordable(&self, cost: u32) -> RunResult<()> {
        if cost > self.budget {
            return Err(Ineligibility::OverBudget {
                cost,
                available: self.budget,
            }
            .into());
        }
        Ok(())
    }

    fn cost_with_add(&self) -> u32 {
        (sum(&self.adds) + 1).max(sum(&self.subs)) + self.charge_cost()
    }

    fn cost_with_sub(&self) -> u32 {
        sum(&self.adds).max(sum(&self.subs) + 1) + self.charge_cost()
    }

    // === Shown values ===

    #[must_use]
    pub fn adds(&self) -> &MoveMap<u32> {
        &self.adds
    }

    #[must_use]
    pub fn subs(&self) -> &MoveMap<u32> {
        &self.subs
    }

    #[must_use]
    pub fn purchases(&self) -> &MoveMap<u32> {
        &self.purchases
    }

    /// Drafted reservation list, front first.
    #[must_use]
    pub fn reservations(&self) -> &[Move] {
        &self.reservations
    }

    #[must_use]
    pub fn reserved_count(&self, m: Move) -> u32 {
        self.reservations.iter().filter(|&&r| r == m).count() as u32
    }

    /// Per-move counts with the pending deltas applied. May not total 30.
    #[must_use]
    pub fn shown_counts<R: MoveRng>(&self, run: &RunState<R>) -> MoveMap<u32> {
        let base = run.composition().counts();
        MoveMap::new(|m| (base[m] + self.adds[m]).saturating_sub(self.subs[m]))
    }

    /// The composition a commit would install.
    pub fn shown_composition<R: MoveRng>(&self, run: &RunState<R>) -> RunResult<Composition> {
        Composition::from_counts(self.shown_counts(run))
    }

    /// Charge for `m` once pending purchases land.
    #[must_use]
    pub fn shown_charge<R: MoveRng>(&self, run: &RunState<R>, m: Move) -> f32 {
        run.projected_charge(m, self.purchases[m])
    }

    #[must_use]
    pub fn shown_stacks<R: MoveRng>(&self, run: &RunState<R>, m: Move) -> u32 {
        run.projected_stacks(m, self.purchases[m])
    }

    /// Entries of `m` the reservation list may hold right now.
    #[must_use]
    pub fn reservation_cap<R: MoveRng>(&self, run: &RunState<R>, m: Move) -> u32 {
        run.reservation_cap(m, self.shown_counts(run)[m], self.purchases[m])
    }

    // === Affordances ===

    #[must_use]
    pub fn can_add(&self, m: Move) -> bool {
        self.subs[m] > 0 || self.cost_with_add() <= self.budget
    }

    #[must_use]
    pub fn can_remove<R: MoveRng>(&self, run: &RunState<R>, m: Move) -> bool {
        self.adds[m] > 0 || (self.shown_counts(run)[m] > 0 && self.cost_with_sub() <= self.budget)
    }

    #[must_use]
    pub fn can_buy_charge<R: MoveRng>(&self, run: &RunState<R>, m: Move) -> bool {
        self.charge_offerable(run, m) && self.total_cost() < self.budget
    }

    #[must_use]
    pub fn can_withdraw_charge(&self, m: Move) -> bool {
        self.purchases[m] > 0
    }

    /// Whether [`commit`](Self::commit) would currently succeed.
    #[must_use]
    pub fn can_proceed<R: MoveRng>(&self, run: &RunState<R>) -> bool {
        self.stage(run).is_ok() && self.total_cost() <= run.currency()
    }

    fn charge_offerable<R: MoveRng>(&self, run: &RunState<R>, m: Move) -> bool {
        let ceiling = run.charge().ceiling();
        stack_remainder(self.shown_charge(run, m), ceiling) < ceiling - stack_tolerance(ceiling)
    }

    // === Mutations ===

    /// Draft one more card of `m`, or undo a pending removal of it.
    pub fn add_card<R: MoveRng>(&mut self, run: &RunState<R>, m: Move) -> RunResult<()> {
        if self.subs[m] > 0 {
            self.subs[m] -= 1;
        } else {
            self.check_affordable(self.cost_with_add())?;
            self.adds[m] += 1;
        }
        self.revalidate(run);
        Ok(())
    }

    /// Draft one card of `m` away, or undo a pending addition of it.
    pub fn remove_card<R: MoveRng>(&mut self, run: &RunState<R>, m: Move) -> RunResult<()> {
        if self.adds[m] > 0 {
            self.adds[m] -= 1;
        } else {
            if self.shown_counts(run)[m] == 0 {
                return Err(Ineligibility::MoveAbsent(m).into());
            }
            self.check_affordable(self.cost_with_sub())?;
            self.subs[m] += 1;
        }
        self.revalidate(run);
        Ok(())
    }

    /// Buy one unit of charge for `m`.
    pub fn buy_charge<R: MoveRng>(&mut self, run: &RunState<R>, m: Move) -> RunResult<()> {
        if !self.charge_offerable(run, m) {
            return Err(Ineligibility::ChargeComplete(m).into());
        }
        self.check_affordable(self.total_cost() + 1)?;
        self.purchases[m] += 1;
        self.revalidate(run);
        Ok(())
    }

    /// Take back one pending charge unit for `m`.
    pub fn withdraw_charge<R: MoveRng>(&mut self, run: &RunState<R>, m: Move) -> RunResult<()> {
        if self.purchases[m] == 0 {
            return Err(Ineligibility::NothingToWithdraw(m).into());
        }
        self.purchases[m] -= 1;
        self.revalidate(run);
        Ok(())
    }

    /// Append `m` to the reservation list, or clear it if already at cap.
    pub fn toggle_reservation<R: MoveRng>(
        &mut self,
        run: &RunState<R>,
        m: Move,
    ) -> RunResult<ReservationToggle> {
        let cap = self.reservation_cap(run, m);
        let have = self.reserved_count(m);

        if have > 0 && have >= cap {
            self.reservations.retain(|&r| r != m);
            self.revalidate(run);
            return Ok(ReservationToggle::Cleared { removed: have });
        }
        if cap == 0 {
            let reason = if self.shown_counts(run)[m] == 0 {
                Ineligibility::MoveAbsent(m)
            } else {
                Ineligibility::NotCharged(m)
            };
            return Err(reason.into());
        }
        if self.reservations.len() >= run.config().hand_size as usize {
            return Err(Ineligibility::ReservationsFull.into());
        }
        self.reservations.push(m);
        self.revalidate(run);
        Ok(ReservationToggle::Added)
    }

    /// Bring the draft back in line with the run.
    ///
    /// Removals the base composition can no longer fund are clamped, then
    /// reservations over their per-move cap are trimmed from the tail and
    /// the list is cut to the hand size.
    pub fn revalidate<R: MoveRng>(&mut self, run: &RunState<R>) {
        let base = run.composition().counts();
        for m in Move::ALL {
            let fundable = base[m] + self.adds[m];
            if self.subs[m] > fundable {
                self.subs[m] = fundable;
            }
        }

        let counts = self.shown_counts(run);
        let caps = MoveMap::new(|m| run.reservation_cap(m, counts[m], self.purchases[m]));
        let mut kept = MoveMap::with_value(0u32);
        self.reservations.retain(|&m| {
            if kept[m] < caps[m] {
                kept[m] += 1;
                true
            } else {
                false
            }
        });
        self.reservations.truncate(run.config().hand_size as usize);
    }

    /// Drop every pending delta, keeping the session open.
    pub fn discard(&mut self) {
        self.adds = MoveMap::with_value(0);
        self.subs = MoveMap::with_value(0);
        self.purchases = MoveMap::with_value(0);
        self.reservations = self.opened_reservations.clone();
    }

    /// Close the session without applying anything.
    pub fn cancel(self) {}

    fn stage<R: MoveRng>(&self, run: &RunState<R>) -> RunResult<StagedDraft> {
        if run.is_game_over() {
            return Err(RunError::InvalidState("run is over"));
        }
        if run.round_index() != self.opened_at_round {
            return Err(RunError::InvalidState("run advanced since the draft was opened"));
        }
        let composition = self.shown_composition(run)?;
        let cost = self.total_cost();
        self.check_affordable(cost)?;
        Ok(StagedDraft {
            opened_at_round: self.opened_at_round,
            composition,
            cost,
            purchases: self.purchases,
            reservations: self.reservations.clone(),
        })
    }

    /// Apply every pending edit to the run at once.
    ///
    /// On success the composition is replaced, the total cost is deducted
    /// once, purchases become charge, and the reservation list becomes the
    /// run's queue. On failure the run is unchanged and the draft is
    /// returned inside [`CommitRejected`].
    pub fn commit<R: MoveRng>(
        mut self,
        run: &mut RunState<R>,
    ) -> Result<CommitReceipt, CommitRejected> {
        self.revalidate(run);
        let outcome = self.stage(run).and_then(|staged| run.apply_draft(&staged));
        outcome.map_err(|error| CommitRejected { error, draft: self })
    }
}
