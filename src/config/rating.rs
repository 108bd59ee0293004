//! Rating system configuration

use crate::error::{RatingError, Result};
use serde::{Deserialize, Serialize};

/// Assumed rating of each bot filling an empty seat
pub const DEFAULT_BOT_ELO: f64 = 2000.0 / 3.0;

/// Karts in a race, humans and bots together
pub const DEFAULT_FIELD_SIZE: u32 = 12;

/// Rating given to newly added players
pub const DEFAULT_INITIAL_RATING: f64 = 1000.0;

/// Tunable constants of the kart Elo formula
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Scales the actual-minus-expected outcome term
    pub k_constant: f64,
    /// Scales the share-of-points term
    pub l_constant: f64,
    pub bot_elo: f64,
    pub field_size: u32,
    pub initial_rating: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            k_constant: 1.0,
            l_constant: 1.0,
            bot_elo: DEFAULT_BOT_ELO,
            field_size: DEFAULT_FIELD_SIZE,
            initial_rating: DEFAULT_INITIAL_RATING,
        }
    }
}

impl RatingConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if !self.k_constant.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "K constant must be a finite number".to_string(),
            }
            .into());
        }

        if !self.l_constant.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "L constant must be a finite number".to_string(),
            }
            .into());
        }

        if !self.bot_elo.is_finite() || self.bot_elo < 0.0 {
            return Err(RatingError::ConfigurationError {
                message: "Bot Elo must be a non-negative number".to_string(),
            }
            .into());
        }

        // Opponent average divides by field_size - 1
        if self.field_size < 2 {
            return Err(RatingError::ConfigurationError {
                message: "Field size must be at least 2".to_string(),
            }
            .into());
        }

        if !self.initial_rating.is_finite() {
            return Err(RatingError::ConfigurationError {
                message: "Initial rating must be a finite number".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
