//! Structured run journal.
//!
//! Every state transition of a run appends one [`RunEvent`]. Hosts read the
//! journal for logs, replays, or UI timelines; it is serializable and cheap
//! to clone.

use serde::{Deserialize, Serialize};

use crate::core::{Composition, Move};
use crate::opponent::{Archetype, ArchetypeMap, Banner, EnvironmentWeights};

/// One entry in the run journal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RunEvent {
    RunStarted {
        composition: Composition,
        currency: u32,
        banners: ArchetypeMap<Banner>,
        env_weights: EnvironmentWeights,
    },
    PreviewRolled {
        round_index: u32,
        archetype: Archetype,
    },
    /// Front reservation taken at round start. `pinned` is false when the
    /// move could no longer be paid for or drawn, and nothing was consumed.
    ReservationUsed {
        card: Move,
        pinned: bool,
    },
    RoundResolved {
        round_index: u32,
        archetype: Archetype,
        losses: u32,
        clear: bool,
        attempts: u32,
    },
    ChargeGained {
        card: Move,
        amount: f32,
    },
    ChargePurchased {
        card: Move,
        units: u32,
        amount: f32,
    },
    CompositionChanged {
        from: Composition,
        to: Composition,
    },
    ReservationsChanged {
        queue: Vec<Move>,
    },
    CurrencySpent {
        amount: u32,
        remaining: u32,
    },
    DraftCommitted {
        cost: u32,
    },
    GameOver {
        round_index: u32,
        score: u32,
    },
}

impl RunEvent {
    /// Short name of the event kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            RunEvent::RunStarted { .. } => "run_started",
            RunEvent::PreviewRolled { .. } => "preview_rolled",
            RunEvent::ReservationUsed { .. } => "reservation_used",
            RunEvent::RoundResolved { .. } => "round_resolved",
            RunEvent::ChargeGained { .. } => "charge_gained",
            RunEvent::ChargePurchased { .. } => "charge_purchased",
            RunEvent::CompositionChanged { .. } => "composition_changed",
            RunEvent::ReservationsChanged { .. } => "reservations_changed",
            RunEvent::CurrencySpent { .. } => "currency_spent",
            RunEvent::DraftCommitted { .. } => "draft_committed",
            RunEvent::GameOver { .. } => "game_over",
        }
    }
}
