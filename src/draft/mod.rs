//! Between-round drafting.
//!
//! A [`DraftTransaction`] collects composition swaps, charge purchases and
//! reservations against a budget snapshot of the run's currency, then
//! applies them all at once or not at all.
//!
//! ```
//! use rps_build::core::{Composition, Move, RunConfig};
//! use rps_build::draft::DraftTransaction;
//! use rps_build::run::RunState;
//!
//! let mut run = RunState::new(RunConfig::default(), Composition::even(), 1).unwrap();
//! let mut draft = DraftTransaction::open(&run).unwrap();
//! draft.add_card(&run, Move::Rock).unwrap();
//! draft.remove_card(&run, Move::Scissors).unwrap();
//!
//! let receipt = draft.commit(&mut run).unwrap();
//! assert_eq!(receipt.cost, 1);
//! assert_eq!(run.composition().count(Move::Rock), 11);
//! ```

mod transaction;

pub use transaction::{CommitReceipt, CommitRejected, DraftTransaction, ReservationToggle};
pub(crate) use transaction::StagedDraft;
