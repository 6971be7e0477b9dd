//! Saved-pattern library
//!
//! A keyed collection of named patterns persisted as a JSON file. The
//! library is single-writer/single-reader in practice, so there is no
//! locking: mutations go through `&mut self` and each one is written to
//! disk before it returns.

pub mod paths;

use chrono::{DateTime, Utc};
use rf_types::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};
use uuid::Uuid;

/// One saved pattern record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedPattern {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Delimited pattern string (`/body/flags`)
    pub pattern: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update applied to a saved pattern; only supplied fields change
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatternUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub pattern: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// File-backed pattern library
#[derive(Debug)]
pub struct PatternStore {
    patterns: Vec<SavedPattern>,
    path: PathBuf,
}

impl PatternStore {
    /// Open the library at the default location, creating the data
    /// directory if needed. A missing file is an empty library.
    pub fn open() -> AppResult<Self> {
        Self::open_at(paths::patterns_file()?)
    }

    /// Open the library backed by a specific file
    pub fn open_at(path: PathBuf) -> AppResult<Self> {
        if let Some(parent) = path.parent() {
            paths::ensure_dir_exists(parent)?;
        }

        let patterns = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)
                .map_err(|e| AppError::Storage(format!("Corrupt pattern library: {}", e)))?
        } else {
            Vec::new()
        };

        debug!(
            "Opened pattern library at {} ({} patterns)",
            path.display(),
            patterns.len()
        );
        Ok(Self { patterns, path })
    }

    /// Add a new pattern and persist it. Returns the stored record.
    pub fn add(
        &mut self,
        name: impl Into<String>,
        description: impl Into<String>,
        pattern: impl Into<String>,
        tags: Vec<String>,
    ) -> AppResult<SavedPattern> {
        let record = SavedPattern {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            pattern: pattern.into(),
            created_at: Utc::now(),
            tags,
        };

        self.patterns.push(record.clone());
        self.save()?;
        info!("Saved pattern {} ({})", record.name, record.id);
        Ok(record)
    }

    /// Look up a pattern by id
    pub fn get(&self, id: &str) -> Option<&SavedPattern> {
        self.patterns.iter().find(|p| p.id == id)
    }

    /// All patterns, in insertion order
    pub fn list(&self) -> &[SavedPattern] {
        &self.patterns
    }

    /// Patterns whose name, description, or tags contain `query`
    /// (case-insensitive)
    pub fn filter(&self, query: &str) -> Vec<&SavedPattern> {
        let query = query.to_lowercase();
        self.patterns
            .iter()
            .filter(|p| {
                p.name.to_lowercase().contains(&query)
                    || p.description.to_lowercase().contains(&query)
                    || p.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .collect()
    }

    /// Merge `update` into the pattern with `id` and persist.
    pub fn update(&mut self, id: &str, update: PatternUpdate) -> AppResult<SavedPattern> {
        let record = self
            .patterns
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| AppError::Storage(format!("No pattern with id {}", id)))?;

        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(description) = update.description {
            record.description = description;
        }
        if let Some(pattern) = update.pattern {
            record.pattern = pattern;
        }
        if let Some(tags) = update.tags {
            record.tags = tags;
        }

        let updated = record.clone();
        self.save()?;
        Ok(updated)
    }

    /// Delete the pattern with `id` and persist.
    pub fn remove(&mut self, id: &str) -> AppResult<()> {
        let before = self.patterns.len();
        self.patterns.retain(|p| p.id != id);
        if self.patterns.len() == before {
            return Err(AppError::Storage(format!("No pattern with id {}", id)));
        }
        self.save()?;
        info!("Deleted pattern {}", id);
        Ok(())
    }

    fn save(&self) -> AppResult<()> {
        let contents = serde_json::to_string_pretty(&self.patterns)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, PatternStore) {
        let dir = TempDir::new().unwrap();
        let store = PatternStore::open_at(dir.path().join("patterns.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_is_empty_library() {
        let (_dir, store) = temp_store();
        assert!(store.list().is_empty());
    }

    #[test]
    fn add_get_remove_round_trip() {
        let (_dir, mut store) = temp_store();
        let saved = store
            .add("emails", "match email addresses", "/\\w+@\\w+/g", vec![])
            .unwrap();

        assert_eq!(store.get(&saved.id).unwrap().name, "emails");
        store.remove(&saved.id).unwrap();
        assert!(store.get(&saved.id).is_none());
    }

    #[test]
    fn update_merges_only_supplied_fields() {
        let (_dir, mut store) = temp_store();
        let saved = store
            .add("emails", "match email addresses", "/\\w+@\\w+/g", vec![])
            .unwrap();

        let updated = store
            .update(
                &saved.id,
                PatternUpdate {
                    name: Some("work emails".to_string()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.name, "work emails");
        assert_eq!(updated.pattern, "/\\w+@\\w+/g");
        assert_eq!(updated.description, "match email addresses");
    }

    #[test]
    fn update_unknown_id_is_storage_error() {
        let (_dir, mut store) = temp_store();
        let err = store.update("nope", PatternUpdate::default()).unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[test]
    fn remove_unknown_id_is_storage_error() {
        let (_dir, mut store) = temp_store();
        assert!(matches!(
            store.remove("nope").unwrap_err(),
            AppError::Storage(_)
        ));
    }

    #[test]
    fn filter_is_case_insensitive_across_fields() {
        let (_dir, mut store) = temp_store();
        store
            .add(
                "postcodes",
                "Dutch postcodes",
                "/^[0-9]{4}$/g",
                vec!["address".to_string()],
            )
            .unwrap();
        store
            .add("emails", "work addresses", "/\\w+@\\w+/g", vec![])
            .unwrap();

        assert_eq!(store.filter("DUTCH").len(), 1);
        assert_eq!(store.filter("address").len(), 2);
        assert!(store.filter("phone").is_empty());
    }

    #[test]
    fn library_persists_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patterns.json");

        let saved = {
            let mut store = PatternStore::open_at(path.clone()).unwrap();
            store
                .add("emails", "desc", "/\\w+@\\w+/g", vec!["a".to_string()])
                .unwrap()
        };

        let store = PatternStore::open_at(path).unwrap();
        assert_eq!(store.list().len(), 1);
        assert_eq!(store.list()[0], saved);
    }

    #[test]
    fn corrupt_file_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("patterns.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            PatternStore::open_at(path).unwrap_err(),
            AppError::Storage(_)
        ));
    }
}
