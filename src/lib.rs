//! Kart Rating - Elo-derived ratings for multiplayer kart racing
//!
//! This crate keeps one rating per player in a CSV store and updates it after
//! each race from the player's placement and share of the points, with empty
//! seats of the 12-kart field modelled as flat-rated bots.

pub mod config;
pub mod error;
pub mod prompt;
pub mod rating;
pub mod types;
pub mod utils;

// Re-export commonly used types and traits
pub use error::{RatingError, Result};
pub use types::*;

// Re-export key components
pub use rating::{CsvRatingStore, RatingCalculator, RatingStore, RatingTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
