//! CSV file backed rating store
//!
//! The header row names the players and each following row holds one rating
//! per player. Only row 0 is read as the current rating; the whole file is
//! rewritten on every save.

use crate::error::{RatingError, Result};
use crate::rating::storage::{RatingStore, RatingTable};
use csv::{ReaderBuilder, Writer};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

fn store_error(path: &Path, action: &str, err: impl std::fmt::Display) -> RatingError {
    RatingError::StoreError {
        message: format!("Failed to {} {}: {}", action, path.display(), err),
    }
}

/// Rating store kept in a single CSV file
#[derive(Debug, Clone)]
pub struct CsvRatingStore {
    path: PathBuf,
}

impl CsvRatingStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RatingStore for CsvRatingStore {
    fn load(&self) -> Result<RatingTable> {
        if !self.path.exists() {
            debug!(
                "Rating store {} does not exist yet, starting empty",
                self.path.display()
            );
            return Ok(RatingTable::default());
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| store_error(&self.path, "open", e))?;

        let columns: Vec<String> = reader
            .headers()
            .map_err(|e| store_error(&self.path, "read header of", e))?
            .iter()
            .map(|name| name.to_string())
            .collect();

        let rows = reader
            .records()
            .map(|record| {
                record
                    .map(|record| record.iter().map(|cell| cell.to_string()).collect())
                    .map_err(|e| store_error(&self.path, "read", e))
            })
            .collect::<std::result::Result<Vec<Vec<String>>, _>>()?;

        debug!(
            "Loaded {} players and {} rows from {}",
            columns.len(),
            rows.len(),
            self.path.display()
        );
        RatingTable::from_parts(columns, rows)
    }

    fn save(&self, table: &RatingTable) -> Result<()> {
        if table.is_empty() {
            std::fs::write(&self.path, "").map_err(|e| store_error(&self.path, "write", e))?;
            return Ok(());
        }

        let mut writer =
            Writer::from_path(&self.path).map_err(|e| store_error(&self.path, "create", e))?;

        writer
            .write_record(table.columns())
            .map_err(|e| store_error(&self.path, "write", e))?;
        for row in table.rows() {
            writer
                .write_record(row)
                .map_err(|e| store_error(&self.path, "write", e))?;
        }
        writer
            .flush()
            .map_err(|e| store_error(&self.path, "flush", e))?;

        info!(
            "Saved {} player ratings to {}",
            table.len(),
            self.path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "kart-rating-{}-{}.csv",
            label,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let store = CsvRatingStore::new(temp_path("missing"));
        let table = store.load().unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_reads_wide_format() {
        let path = temp_path("wide");
        std::fs::write(&path, "akhil,nav,peter\n1500,1400.5,1000\n1200,1100,900\n").unwrap();

        let store = CsvRatingStore::new(&path);
        let table = store.load().unwrap();

        assert_eq!(table.columns(), &["akhil", "nav", "peter"]);
        assert_eq!(table.rows().len(), 2);
        assert_eq!(table.rating("nav").unwrap(), 1400.5);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_save_rewrites_whole_file() {
        let path = temp_path("rewrite");
        std::fs::write(&path, "akhil,nav\n1500,1400\n1200,1100\n").unwrap();

        let store = CsvRatingStore::new(&path);
        let mut table = store.load().unwrap();
        table.set_rating("akhil", 1402.18);
        store.save(&table).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "akhil,nav\n1402.18,1400\n1200,1100\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_ragged_file_is_store_error() {
        let path = temp_path("ragged");
        std::fs::write(&path, "akhil,nav\n1500\n").unwrap();

        let err = CsvRatingStore::new(&path).load().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<RatingError>(),
            Some(RatingError::StoreError { .. })
        ));

        std::fs::remove_file(&path).unwrap();
    }
}
