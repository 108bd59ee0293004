//! Test fixtures for integration testing

use kart_rating::rating::CsvRatingStore;
use std::path::{Path, PathBuf};

/// A CSV rating store in a unique temp file, removed on drop
pub struct TempCsvStore {
    path: PathBuf,
    pub store: CsvRatingStore,
}

impl TempCsvStore {
    /// Create a store file with the given raw contents
    pub fn with_contents(contents: &str) -> Self {
        let store = Self::empty();
        std::fs::write(&store.path, contents).expect("failed to write fixture store");
        store
    }

    /// A store whose file does not exist yet
    pub fn empty() -> Self {
        let path = std::env::temp_dir().join(format!("kart-rating-{}.csv", uuid::Uuid::new_v4()));
        Self {
            store: CsvRatingStore::new(&path),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contents(&self) -> String {
        std::fs::read_to_string(&self.path).expect("failed to read fixture store")
    }
}

impl Drop for TempCsvStore {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// The four-player league used throughout the tests
pub const LEAGUE_CSV: &str = "akhil,nav,peter,rishi\n1500,1400,1000,1000\n";
