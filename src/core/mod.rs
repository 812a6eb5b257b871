//! Core types: moves, compositions, RNG, configuration, errors.
//!
//! Everything else in the crate builds on these value types.

pub mod moves;
pub mod composition;
pub mod rng;
pub mod config;
pub mod error;

pub use moves::{Move, MoveMap, Outcome};
pub use composition::{Composition, DECK_SIZE};
pub use rng::{choose_weighted, shuffle, GameRng, GameRngState, MoveRng};
pub use config::RunConfig;
pub use error::{Ineligibility, RunError, RunResult};
