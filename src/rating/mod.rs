//! Kart Elo rating system
//!
//! This module provides the per-match rating calculator and the storage
//! interface it reads current ratings from and writes new ratings to.

pub mod calculator;
pub mod csv_store;
pub mod storage;

// Re-export commonly used types
pub use calculator::RatingCalculator;
pub use csv_store::CsvRatingStore;
pub use storage::{add_players, InMemoryRatingStore, MockRatingStore, RatingStore, RatingTable};
