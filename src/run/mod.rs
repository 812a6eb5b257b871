//! Run lifecycle: round loop, economy, reservations, and the journal.
//!
//! ## Key Types
//!
//! - [`RunState`]: everything that persists across rounds
//! - [`RunBuilder`]: assembles a run with custom providers and hooks
//! - [`RoundReport`]: what one round did
//! - [`RunEvent`]: one journal entry

mod events;
mod hook;
mod report;
mod state;
mod stats;

pub use events::RunEvent;
pub use hook::{NoOverrides, OutcomeHook};
pub use report::{IntroOutcome, IntroReport, OpponentPreview, RoundReport, INTRO_MAX_ATTEMPTS};
pub use state::{RunBuilder, RunState, RunStatus};
pub use stats::ArchetypeHandStat;
