//! Finance records repository
//!
//! Holds one identity's four collections in memory and persists them as a
//! single JSON blob (`{incomes, expenses, reminders, savings}`).

use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::FintrackError;
use crate::models::Collections;

use super::file_io::{read_json, write_json_atomic};

/// Repository for one identity's finance records
pub struct RecordsRepository {
    path: PathBuf,
    data: RwLock<Collections>,
}

impl RecordsRepository {
    /// Create a new, empty repository backed by `path`
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(Collections::default()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the blob from disk, replacing whatever is in memory
    pub fn load(&self) -> Result<(), FintrackError> {
        let file_data: Collections = read_json(&self.path)?;

        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        *data = file_data;
        Ok(())
    }

    /// Save the in-memory collections to disk
    pub fn save(&self) -> Result<(), FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        write_json_atomic(&self.path, &*data)
    }

    /// Clone of the current collections
    pub fn get_all(&self) -> Result<Collections, FintrackError> {
        let data = self
            .data
            .read()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(data.clone())
    }

    /// Mutate the collections and persist the result
    ///
    /// The blob is written only if `f` succeeds, and the in-memory change is
    /// rolled back if the write fails.
    pub fn update<T, F>(&self, f: F) -> Result<T, FintrackError>
    where
        F: FnOnce(&mut Collections) -> Result<T, FintrackError>,
    {
        let mut data = self
            .data
            .write()
            .map_err(|e| FintrackError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        let mut working = data.clone();
        let out = f(&mut working)?;
        write_json_atomic(&self.path, &working)?;
        *data = working;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Income, Saving};
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fintrack-guest.json");

        {
            let repo = RecordsRepository::new(path.clone());
            repo.update(|c| {
                c.incomes.push(Income::new("2024-01-05", "Job", 100.0));
                c.savings.push(Saving::new("Goal", 5.0));
                Ok(())
            })
            .unwrap();
        }

        let repo = RecordsRepository::new(path);
        repo.load().unwrap();
        let all = repo.get_all().unwrap();
        assert_eq!(all.incomes.len(), 1);
        assert_eq!(all.savings[0].name, "Goal");
    }

    #[test]
    fn test_failed_update_changes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("fintrack-guest.json");
        let repo = RecordsRepository::new(path.clone());

        let result: Result<(), _> = repo.update(|c| {
            c.incomes.push(Income::new("2024-01-05", "Job", 1.0));
            Err(FintrackError::Validation("nope".into()))
        });

        assert!(result.is_err());
        assert!(repo.get_all().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("partial.json");
        std::fs::write(
            &path,
            r#"{"incomes":[{"date":"2024-01-01","source":"Gift","amount":20}]}"#,
        )
        .unwrap();

        let repo = RecordsRepository::new(path);
        repo.load().unwrap();
        let all = repo.get_all().unwrap();
        assert_eq!(all.incomes.len(), 1);
        assert!(all.expenses.is_empty());
    }
}
