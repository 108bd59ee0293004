//! Utility functions for the rating tracker

use chrono::{DateTime, Utc};

/// Get the current UTC timestamp
pub fn current_timestamp() -> DateTime<Utc> {
    Utc::now()
}

/// Round a value to the given number of decimal places, half away from zero
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Format a rating the way it is written to the store
pub fn format_rating(value: f64) -> String {
    format!("{}", value)
}
