//! # rps-build
//!
//! Simulation and meta-progression core for a round-based card battler
//! built on the rock/scissors/paper cycle.
//!
//! ## Design Principles
//!
//! 1. **Presentation-Free**: Nothing here renders, animates or waits on
//!    input. Hosts read results and counters and call documented
//!    operations to mutate.
//!
//! 2. **Deterministic**: Every random choice goes through one [`MoveRng`]
//!    in a fixed order. The same seed and the same calls replay the same
//!    run.
//!
//! 3. **All or Nothing**: Every operation checks its preconditions before
//!    touching state. A rejected call changes nothing.
//!
//! ## Modules
//!
//! - `core`: Moves, compositions, RNG, configuration, errors
//! - `deck`: Pool construction and batch draw with optional first-card pin
//! - `round`: Pairwise judging and round aggregation
//! - `charge`: Per-move charge stacks and gain formulas
//! - `opponent`: Archetypes, banners, environment weights, profile providers
//! - `run`: The run state machine and its event journal
//! - `draft`: Atomic between-round edits
//!
//! ## Example
//!
//! ```
//! use rps_build::{Composition, RunConfig, RunState};
//!
//! let mut run = RunState::new(RunConfig::default(), Composition::even(), 7).unwrap();
//! while !run.is_game_over() && run.round_index() < 20 {
//!     let report = run.play_next_round().unwrap();
//!     assert_eq!(report.result.hand_size(), 7);
//! }
//! ```

pub mod core;
pub mod deck;
pub mod round;
pub mod charge;
pub mod opponent;
pub mod run;
pub mod draft;

// Re-export commonly used types
pub use crate::core::{
    Move, MoveMap, Outcome,
    Composition, DECK_SIZE,
    GameRng, GameRngState, MoveRng,
    RunConfig,
    Ineligibility, RunError, RunResult,
};

pub use crate::deck::{draw_hand, Hand};

pub use crate::round::{judge, simulate, OutcomeOverride, RoundResult};

pub use crate::charge::{ChargeResource, GainFormula, LinearGain};

pub use crate::opponent::{
    Archetype, ArchetypeMap, Banner, EnvironmentWeights,
    OpponentProfileProvider, RangeProfileProvider,
};

pub use crate::run::{
    RunBuilder, RunState, RunStatus, RoundReport, RunEvent,
    IntroOutcome, IntroReport, OpponentPreview,
    OutcomeHook, NoOverrides, ArchetypeHandStat,
};

pub use crate::draft::{CommitReceipt, CommitRejected, DraftTransaction, ReservationToggle};
