//! Pool construction, shuffle, and batch draw.

mod draw;

pub use draw::{build_pool, draw_hand, histogram, Hand};
