//! Utility helpers for tests.
pub mod builders;
pub mod duel;

pub use builders::{roster_with, target_at, PlayerTarget};
pub use duel::Duel;
