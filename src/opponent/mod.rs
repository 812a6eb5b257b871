//! Opponent side of the run: archetypes, banners, environment weights,
//! and the provider that builds each archetype's composition.
//!
//! ## Lifecycle
//!
//! At run start every archetype gets its banner(s) and one composition,
//! fixed for the run. Before each round the environment weights pick which
//! archetype comes next; that pick is the preview the player sees while
//! drafting.

mod archetype;
mod environment;
mod provider;

pub use archetype::{assign_banners, Archetype, ArchetypeMap, Banner};
pub use environment::EnvironmentWeights;
pub use provider::{CountRange, OpponentProfileProvider, ProfileRanges, RangeProfileProvider};
