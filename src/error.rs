//! Error types for the rating tracker
//!
//! Specific failure kinds are modelled by [`RatingError`] and carried through
//! `anyhow` so callers can either bubble them up or downcast and react.

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// Custom error types for specific rating scenarios
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RatingError {
    #[error("Player not found in rating store: {name}")]
    MissingPlayer { name: String },

    #[error("Invalid match input: {reason}")]
    InvalidInput { reason: String },

    #[error("Total match points are zero, cannot distribute points")]
    DivisionByZero,

    #[error("Player already exists in rating store: {name}")]
    DuplicateColumn { name: String },

    #[error("Invalid roster: {reason}")]
    InvalidRoster { reason: String },

    #[error("No match result recorded for player: {name}")]
    MissingMatchResult { name: String },

    #[error("New rating has not been computed for player: {name}")]
    RatingNotComputed { name: String },

    #[error("Stored rating for {name} is not a number: {value:?}")]
    MalformedRating { name: String, value: String },

    #[error("Rating store error: {message}")]
    StoreError { message: String },

    #[error("Configuration error: {message}")]
    ConfigurationError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl RatingError {
    /// Whether the caller can skip the affected player and carry on
    pub fn is_recoverable(&self) -> bool {
        matches!(self, RatingError::InvalidInput { .. })
    }
}
