//! Common types used throughout the rating tracker

use crate::error::RatingError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for players (the column name in the rating store)
pub type PlayerName = String;

/// Placement and points a player scored in one match
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// 1 = first place
    pub rank: u32,
    pub points: f64,
}

impl MatchResult {
    /// Build a result from already-typed values, checking the domain bounds
    pub fn new(rank: u32, points: f64) -> Result<Self, RatingError> {
        if rank == 0 {
            return Err(RatingError::InvalidInput {
                reason: "rank must be 1 or greater".to_string(),
            });
        }
        if !points.is_finite() || points < 0.0 {
            return Err(RatingError::InvalidInput {
                reason: format!("points must be a non-negative number, got {}", points),
            });
        }
        Ok(Self { rank, points })
    }

    /// Parse raw text as typed by a user
    ///
    /// Rank must be a positive whole number and points a non-negative number. Surrounding
    /// whitespace is ignored.
    pub fn parse(rank: &str, points: &str) -> Result<Self, RatingError> {
        let rank = Self::parse_rank(rank)?;
        let points = Self::parse_points(points)?;
        Self::new(rank, points)
    }

    /// Parse a rank on its own, so a bad rank can be rejected before points are asked for
    pub fn parse_rank(rank: &str) -> Result<u32, RatingError> {
        let rank_text = rank.trim();
        let rank: u32 = rank_text.parse().map_err(|_| RatingError::InvalidInput {
            reason: format!("rank {:?} is not a valid integer", rank_text),
        })?;
        if rank == 0 {
            return Err(RatingError::InvalidInput {
                reason: "rank must be 1 or greater".to_string(),
            });
        }
        Ok(rank)
    }

    /// Parse a non-negative points value
    pub fn parse_points(points: &str) -> Result<f64, RatingError> {
        let points_text = points.trim();
        let points: f64 = points_text.parse().map_err(|_| RatingError::InvalidInput {
            reason: format!("points {:?} is not a valid number", points_text),
        })?;
        if !points.is_finite() || points < 0.0 {
            return Err(RatingError::InvalidInput {
                reason: format!("points must be a non-negative number, got {}", points),
            });
        }
        Ok(points)
    }
}

/// A roster entry, filled in over the course of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: PlayerName,
    /// Rating loaded from the store; never changed during a session
    pub rating: f64,
    pub result: Option<MatchResult>,
    /// Every rating computed this session, oldest first
    pub new_ratings: Vec<f64>,
}

impl Player {
    pub fn new(name: impl Into<PlayerName>, rating: f64) -> Self {
        Self {
            name: name.into(),
            rating,
            result: None,
            new_ratings: Vec::new(),
        }
    }

    pub fn rank(&self) -> Option<u32> {
        self.result.map(|r| r.rank)
    }

    pub fn points(&self) -> Option<f64> {
        self.result.map(|r| r.points)
    }

    /// Most recently computed rating, if any
    pub fn new_rating(&self) -> Option<f64> {
        self.new_ratings.last().copied()
    }
}

/// Rating change information for a player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingChange {
    pub name: PlayerName,
    pub old_rating: f64,
    pub new_rating: f64,
    pub rank: u32,
    pub points: f64,
    /// Expected outcome in percent
    pub expected_outcome: f64,
    pub actual_outcome: f64,
    pub points_incorporation: f64,
}

impl RatingChange {
    pub fn rating_delta(&self) -> f64 {
        self.new_rating - self.old_rating
    }
}

/// Everything computed for one match
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub changes: Vec<RatingChange>,
    pub computed_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_input() {
        let result = MatchResult::parse("3", "42.5").unwrap();
        assert_eq!(result.rank, 3);
        assert_eq!(result.points, 42.5);

        let result = MatchResult::parse(" 1\n", " 60 ").unwrap();
        assert_eq!(result.rank, 1);
        assert_eq!(result.points, 60.0);
    }

    #[test]
    fn test_parse_rejects_non_integer_rank() {
        for rank in ["1.5", "first", "", "-2"] {
            let err = MatchResult::parse(rank, "10").unwrap_err();
            assert!(matches!(err, RatingError::InvalidInput { .. }), "{rank}");
        }
    }

    #[test]
    fn test_parse_rejects_bad_points() {
        for points in ["ten", "", "-1", "NaN", "inf"] {
            let err = MatchResult::parse("1", points).unwrap_err();
            assert!(matches!(err, RatingError::InvalidInput { .. }), "{points}");
        }
    }

    #[test]
    fn test_rank_zero_rejected() {
        assert!(MatchResult::new(0, 10.0).is_err());
        assert!(MatchResult::parse_rank("0").is_err());
    }

    #[test]
    fn test_rank_and_points_parse_separately() {
        assert_eq!(MatchResult::parse_rank(" 4\n").unwrap(), 4);
        assert!(MatchResult::parse_rank("4th").is_err());
        assert_eq!(MatchResult::parse_points("12.5\n").unwrap(), 12.5);
        assert!(MatchResult::parse_points("-3").is_err());
    }

    #[test]
    fn test_player_new_rating_is_latest() {
        let mut player = Player::new("peter", 1000.0);
        assert_eq!(player.new_rating(), None);
        assert_eq!(player.rank(), None);

        player.new_ratings.push(1010.0);
        player.new_ratings.push(1020.0);
        assert_eq!(player.new_rating(), Some(1020.0));
        assert_eq!(player.rating, 1000.0);
    }

    #[test]
    fn test_rating_delta() {
        let change = RatingChange {
            name: "rishi".to_string(),
            old_rating: 1500.0,
            new_rating: 1402.18,
            rank: 1,
            points: 60.0,
            expected_outcome: 99.42,
            actual_outcome: 1.0,
            points_incorporation: 0.6,
        };
        assert!((change.rating_delta() + 97.82).abs() < 1e-9);
    }
}
