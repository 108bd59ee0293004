//! Rating storage interface and implementations
//!
//! Ratings live in a wide table: one column per player, with row 0 holding
//! each player's current rating. Any further rows are carried along untouched
//! so a save never drops data it did not understand.

use crate::error::{RatingError, Result};
use crate::types::PlayerName;
use crate::utils::format_rating;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::RwLock;
use tracing::debug;

/// In-memory image of the rating store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingTable {
    columns: Vec<PlayerName>,
    rows: Vec<Vec<String>>,
}

impl RatingTable {
    /// Build a table from raw header and row cells
    pub fn from_parts(columns: Vec<PlayerName>, rows: Vec<Vec<String>>) -> Result<Self> {
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(RatingError::StoreError {
                message: format!(
                    "Row {} has {} cells but there are {} players",
                    index,
                    row.len(),
                    columns.len()
                ),
            }
            .into());
        }

        Ok(Self { columns, rows })
    }

    /// Build a single-row table from (name, rating) pairs
    pub fn from_ratings<I, S>(ratings: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<PlayerName>,
    {
        let (columns, row): (Vec<PlayerName>, Vec<String>) = ratings
            .into_iter()
            .map(|(name, rating)| (name.into(), format_rating(rating)))
            .unzip();

        Self {
            columns,
            rows: vec![row],
        }
    }

    pub fn columns(&self) -> &[PlayerName] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Current rating of a player, read from row 0
    pub fn rating(&self, name: &str) -> Result<f64> {
        let index = self
            .column_index(name)
            .ok_or_else(|| RatingError::MissingPlayer {
                name: name.to_string(),
            })?;

        let cell = self
            .rows
            .first()
            .and_then(|row| row.get(index))
            .map(String::as_str)
            .unwrap_or("");

        cell.trim().parse::<f64>().map_err(|_| {
            RatingError::MalformedRating {
                name: name.to_string(),
                value: cell.to_string(),
            }
            .into()
        })
    }

    /// Overwrite a player's current rating; returns false if there is no such cell
    pub fn set_rating(&mut self, name: &str, rating: f64) -> bool {
        let Some(index) = self.column_index(name) else {
            return false;
        };

        if self.rows.is_empty() {
            self.rows.push(vec![String::new(); self.columns.len()]);
        }
        match self.rows[0].get_mut(index) {
            Some(cell) => {
                *cell = format_rating(rating);
                true
            }
            None => false,
        }
    }

    /// Insert a new player column at the front, with `rating` in every row
    pub fn insert_player(&mut self, name: &str, rating: f64) -> Result<()> {
        if self.contains(name) {
            return Err(RatingError::DuplicateColumn {
                name: name.to_string(),
            }
            .into());
        }

        let cell = format_rating(rating);
        self.columns.insert(0, name.to_string());
        if self.rows.is_empty() {
            self.rows.push(vec![cell]);
            // Existing columns had no row 0; keep the table rectangular
            self.rows[0].resize(self.columns.len(), String::new());
        } else {
            for row in &mut self.rows {
                row.insert(0, cell.clone());
            }
        }
        Ok(())
    }

    /// Insert several players, all or nothing
    ///
    /// Each name goes to the front in turn, so the last name ends up first.
    pub fn add_players<S: AsRef<str>>(&mut self, names: &[S], rating: f64) -> Result<()> {
        let mut seen = HashSet::new();
        for name in names {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(RatingError::InvalidInput {
                    reason: "player name cannot be empty".to_string(),
                }
                .into());
            }
            if self.contains(name) || !seen.insert(name) {
                return Err(RatingError::DuplicateColumn {
                    name: name.to_string(),
                }
                .into());
            }
        }

        for name in names {
            self.insert_player(name.as_ref(), rating)?;
        }
        Ok(())
    }

    /// Row-0 rating of every player, in column order
    pub fn ratings(&self) -> Vec<(&str, Result<f64>)> {
        self.columns
            .iter()
            .map(|name| (name.as_str(), self.rating(name)))
            .collect()
    }
}

/// Trait for rating storage operations
pub trait RatingStore: Send + Sync {
    /// Read the whole table
    fn load(&self) -> Result<RatingTable>;

    /// Replace the whole table
    fn save(&self, table: &RatingTable) -> Result<()>;
}

/// Add new players to a store at `initial_rating` and persist immediately
pub fn add_players<S: AsRef<str>>(
    store: &dyn RatingStore,
    names: &[S],
    initial_rating: f64,
) -> Result<RatingTable> {
    let mut table = store.load()?;
    table.add_players(names, initial_rating)?;
    store.save(&table)?;

    debug!("Added {} players to rating store", names.len());
    Ok(table)
}

fn lock_poisoned(kind: &str) -> RatingError {
    RatingError::InternalError {
        message: format!("Failed to acquire rating table {} lock", kind),
    }
}

/// In-memory rating storage implementation
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    table: RwLock<RatingTable>,
}

impl InMemoryRatingStore {
    pub fn new(table: RatingTable) -> Self {
        Self {
            table: RwLock::new(table),
        }
    }
}

impl RatingStore for InMemoryRatingStore {
    fn load(&self) -> Result<RatingTable> {
        let table = self.table.read().map_err(|_| lock_poisoned("read"))?;
        Ok(table.clone())
    }

    fn save(&self, table: &RatingTable) -> Result<()> {
        let mut stored = self.table.write().map_err(|_| lock_poisoned("write"))?;
        *stored = table.clone();
        Ok(())
    }
}

/// Mock rating storage for testing
#[derive(Debug, Default)]
pub struct MockRatingStore {
    table: RwLock<RatingTable>,
    save_calls: RwLock<Vec<RatingTable>>,
    fail_saves: RwLock<bool>,
}

impl MockRatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset the table returned by `load`
    pub fn preset_table(&self, table: RatingTable) -> Result<()> {
        let mut stored = self.table.write().map_err(|_| lock_poisoned("write"))?;
        *stored = table;
        Ok(())
    }

    /// Get every table passed to `save` (for testing)
    pub fn get_save_calls(&self) -> Vec<RatingTable> {
        self.save_calls
            .read()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Make subsequent saves fail
    pub fn set_fail_saves(&self, fail: bool) {
        if let Ok(mut flag) = self.fail_saves.write() {
            *flag = fail;
        }
    }
}

impl RatingStore for MockRatingStore {
    fn load(&self) -> Result<RatingTable> {
        let table = self.table.read().map_err(|_| lock_poisoned("read"))?;
        Ok(table.clone())
    }

    fn save(&self, table: &RatingTable) -> Result<()> {
        if let Ok(mut calls) = self.save_calls.write() {
            calls.push(table.clone());
        }

        if self.fail_saves.read().map(|flag| *flag).unwrap_or(false) {
            return Err(RatingError::StoreError {
                message: "mock save failure".to_string(),
            }
            .into());
        }

        let mut stored = self.table.write().map_err(|_| lock_poisoned("write"))?;
        *stored = table.clone();
        Ok(())
    }
}
