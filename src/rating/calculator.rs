//! Kart Elo rating calculator
//!
//! Holds the roster for one match and turns recorded placements and points
//! into new ratings. A race always has `field_size` karts; seats not taken by
//! a rostered player are filled by bots assumed to be rated `bot_elo`.

use crate::config::RatingConfig;
use crate::error::{RatingError, Result};
use crate::rating::storage::{RatingStore, RatingTable};
use crate::types::{MatchResult, Player, RatingChange, SessionSummary};
use crate::utils::{current_timestamp, round_to};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// Per-match rating state for a fixed roster
#[derive(Debug, Clone)]
pub struct RatingCalculator {
    roster: Vec<Player>,
    table: RatingTable,
    config: RatingConfig,
}

impl RatingCalculator {
    /// Build a roster from `names`, looking each current rating up in `table`
    pub fn new<S: AsRef<str>>(names: &[S], table: RatingTable, config: RatingConfig) -> Result<Self> {
        config.validate()?;

        if names.is_empty() {
            return Err(RatingError::InvalidRoster {
                reason: "at least one player is required".to_string(),
            }
            .into());
        }

        let mut seen = HashSet::new();
        let mut roster = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(RatingError::InvalidRoster {
                    reason: format!("player {} listed more than once", name),
                }
                .into());
            }
            roster.push(Player::new(name, table.rating(name)?));
        }

        debug!("Built roster of {} players", roster.len());
        Ok(Self {
            roster,
            table,
            config,
        })
    }

    /// Load the table from `store` and build the roster from it
    pub fn from_store<S: AsRef<str>>(
        names: &[S],
        store: &dyn RatingStore,
        config: RatingConfig,
    ) -> Result<Self> {
        let table = store.load()?;
        Self::new(names, table, config)
    }

    pub fn players(&self) -> &[Player] {
        &self.roster
    }

    pub fn number_of_players(&self) -> usize {
        self.roster.len()
    }

    pub fn config(&self) -> &RatingConfig {
        &self.config
    }

    pub fn table(&self) -> &RatingTable {
        &self.table
    }

    /// Roster index of a player
    pub fn position(&self, name: &str) -> Option<usize> {
        self.roster.iter().position(|player| player.name == name)
    }

    fn player(&self, index: usize) -> Result<&Player> {
        self.roster.get(index).ok_or_else(|| {
            RatingError::InvalidRoster {
                reason: format!("no player at roster index {}", index),
            }
            .into()
        })
    }

    fn result_of(player: &Player) -> std::result::Result<MatchResult, RatingError> {
        player.result.ok_or_else(|| RatingError::MissingMatchResult {
            name: player.name.clone(),
        })
    }

    /// Record a validated result for a player, replacing any earlier one
    pub fn record_result(
        &mut self,
        name: &str,
        result: MatchResult,
    ) -> std::result::Result<(), RatingError> {
        let index = self
            .position(name)
            .ok_or_else(|| RatingError::MissingPlayer {
                name: name.to_string(),
            })?;

        debug!(player = name, rank = result.rank, points = result.points, "Recorded result");
        self.roster[index].result = Some(result);
        Ok(())
    }

    /// Parse and record raw user input for a player
    ///
    /// On error nothing is recorded for the player and the rest of the roster
    /// is untouched, so the caller may skip them or ask again.
    pub fn record_input(
        &mut self,
        name: &str,
        rank: &str,
        points: &str,
    ) -> std::result::Result<MatchResult, RatingError> {
        let result = MatchResult::parse(rank, points)?;
        self.record_result(name, result)?;
        Ok(result)
    }

    /// Players that still have no recorded result
    pub fn unrecorded_players(&self) -> Vec<&str> {
        self.roster
            .iter()
            .filter(|player| player.result.is_none())
            .map(|player| player.name.as_str())
            .collect()
    }

    /// Expected win probability of the player at `index`, in percent
    ///
    /// Opponent strength is taken as the mean over the other `field_size - 1`
    /// seats, where rostered opponents contribute their recorded rank rather
    /// than their rating.
    pub fn expected_outcome(&self, index: usize) -> Result<f64> {
        let player = self.player(index)?;

        let field_size = f64::from(self.config.field_size);
        let bot_elo = self.config.bot_elo * (field_size - self.roster.len() as f64);

        let mut other_elo_sum = 0.0;
        for other in self.roster.iter().filter(|other| other.name != player.name) {
            other_elo_sum += f64::from(Self::result_of(other)?.rank);
        }

        let exponent = (((other_elo_sum + bot_elo) / (field_size - 1.0)) - player.rating) / 400.0;
        let expected = 1.0 / (1.0 + 10f64.powf(exponent));

        Ok(round_to(expected * 100.0, 2))
    }

    /// The player's share of all points scored, scaled by `l_constant`
    pub fn points_incorp(&self, index: usize) -> Result<f64> {
        let player = self.player(index)?;
        let player_points = Self::result_of(player)?.points;

        let mut total_points = 0.0;
        for other in &self.roster {
            total_points += Self::result_of(other)?.points;
        }

        if total_points == 0.0 {
            return Err(RatingError::DivisionByZero.into());
        }

        Ok(self.config.l_constant * (player_points / total_points))
    }

    /// The recorded rank, used as-is in place of a win/loss score
    pub fn actual_outcome(&self, index: usize) -> Result<f64> {
        let player = self.player(index)?;
        Ok(f64::from(Self::result_of(player)?.rank))
    }

    /// Compute a new rating for every player, in roster order
    ///
    /// Each value is appended to the player's `new_ratings`; calling this
    /// again appends another round. Nothing is appended if any player fails.
    pub fn new_elo(&mut self) -> Result<SessionSummary> {
        let mut changes = Vec::with_capacity(self.roster.len());

        for (index, player) in self.roster.iter().enumerate() {
            let result = Self::result_of(player)?;
            let expected_outcome = self.expected_outcome(index)?;
            let actual_outcome = self.actual_outcome(index)?;
            let points_incorporation = self.points_incorp(index)?;

            let new_rating = player.rating
                + self.config.k_constant * (actual_outcome - expected_outcome)
                + points_incorporation;

            changes.push(RatingChange {
                name: player.name.clone(),
                old_rating: player.rating,
                new_rating,
                rank: result.rank,
                points: result.points,
                expected_outcome,
                actual_outcome,
                points_incorporation,
            });
        }

        for (player, change) in self.roster.iter_mut().zip(&changes) {
            player.new_ratings.push(change.new_rating);
            info!(
                player = %player.name,
                old_rating = player.rating,
                new_rating = change.new_rating,
                expected = change.expected_outcome,
                "Computed new rating"
            );
        }

        Ok(SessionSummary {
            changes,
            computed_at: current_timestamp(),
        })
    }

    /// Write each player's newest rating, rounded to 2 decimals, and save
    ///
    /// Players without a column in the table are skipped. The in-memory
    /// table only changes once the store accepts the save.
    pub fn update_store(&mut self, store: &dyn RatingStore) -> Result<()> {
        let mut updates = Vec::with_capacity(self.roster.len());
        for player in &self.roster {
            let new_rating = player
                .new_rating()
                .ok_or_else(|| RatingError::RatingNotComputed {
                    name: player.name.clone(),
                })?;
            updates.push((player.name.as_str(), round_to(new_rating, 2)));
        }

        let mut table = self.table.clone();
        for (name, rating) in updates {
            if !table.set_rating(name, rating) {
                warn!(player = name, "Player has no column in rating store, skipping");
            }
        }
        store.save(&table)?;

        self.table = table;
        Ok(())
    }

    /// Add new players to the table at the initial rating and save at once
    pub fn add_players<S: AsRef<str>>(
        &mut self,
        names: &[S],
        store: &dyn RatingStore,
    ) -> Result<()> {
        let mut table = self.table.clone();
        table.add_players(names, self.config.initial_rating)?;
        store.save(&table)?;

        self.table = table;
        info!("Added {} players to rating store", names.len());
        Ok(())
    }
}
