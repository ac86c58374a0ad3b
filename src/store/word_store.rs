//! Persisted word collections backing the user stores.
//!
//! Persistence is plain JSON, written atomically: serialize to a temp file
//! in the target directory, then rename over the old file, so a crash
//! mid-write never leaves a truncated store on disk.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Store persistence error.
#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialize(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "store write error: {}", e),
            StoreError::Serialize(s) => write!(f, "store serialize error: {}", s),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

fn write_atomic(path: &Path, json: &str) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(json.as_bytes())?;
    tmp.persist(path).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}

/// A persisted set of normalized-lowercase words (exceptions, buzzwords).
#[derive(Debug, Default)]
pub struct WordStore {
    words: HashSet<String>,
    path: Option<PathBuf>,
}

impl WordStore {
    /// Load from a JSON file (`["word", ...]`). A missing file starts the
    /// store empty; a corrupt file resets it to empty with a warning
    /// rather than failing the caller.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let words = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Vec<String>>(&content) {
                Ok(list) => list.into_iter().map(|w| w.to_lowercase()).collect(),
                Err(e) => {
                    log::warn!("corrupt store {:?}, resetting to empty: {}", path, e);
                    HashSet::new()
                }
            },
            Err(_) => HashSet::new(),
        };
        Self {
            words,
            path: Some(path),
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn add(&mut self, word: &str) -> Result<(), StoreError> {
        if self.words.insert(word.to_lowercase()) {
            self.persist()?;
        }
        Ok(())
    }

    pub fn remove(&mut self, word: &str) -> Result<(), StoreError> {
        if self.words.remove(&word.to_lowercase()) {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(()); // in-memory store
        };
        let mut list: Vec<&String> = self.words.iter().collect();
        list.sort();
        let json =
            serde_json::to_string_pretty(&list).map_err(|e| StoreError::Serialize(e.to_string()))?;
        write_atomic(path, &json)
    }
}

/// A persisted map of normalized word → replacement (forced conversions).
#[derive(Debug, Default)]
pub struct ForcedStore {
    entries: HashMap<String, String>,
    path: Option<PathBuf>,
}

impl ForcedStore {
    /// Load from a JSON file (`{"word": "replacement", ...}`). Same
    /// fail-soft behavior as [`WordStore::load`].
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<HashMap<String, String>>(&content) {
                Ok(map) => map
                    .into_iter()
                    .map(|(k, v)| (k.to_lowercase(), v))
                    .collect(),
                Err(e) => {
                    log::warn!("corrupt store {:?}, resetting to empty: {}", path, e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            entries,
            path: Some(path),
        }
    }

    pub fn lookup(&self, word: &str) -> Option<String> {
        self.entries.get(&word.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn add(&mut self, word: &str, replacement: &str) -> Result<(), StoreError> {
        self.entries
            .insert(word.to_lowercase(), replacement.to_string());
        self.persist()
    }

    pub fn remove(&mut self, word: &str) -> Result<(), StoreError> {
        if self.entries.remove(&word.to_lowercase()).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let ordered: std::collections::BTreeMap<_, _> = self.entries.iter().collect();
        let json = serde_json::to_string_pretty(&ordered)
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        write_atomic(path, &json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_store_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exceptions.json");

        let mut store = WordStore::load(&path);
        assert!(store.is_empty());
        store.add("Ghbdtn").unwrap();
        store.add("vim").unwrap();

        let reloaded = WordStore::load(&path);
        assert_eq!(reloaded.len(), 2);
        assert!(reloaded.contains("ghbdtn")); // stored lowercased
        assert!(reloaded.contains("VIM"));
    }

    #[test]
    fn test_word_store_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.json");

        let mut store = WordStore::load(&path);
        store.add("one").unwrap();
        store.add("two").unwrap();
        store.remove("one").unwrap();

        let reloaded = WordStore::load(&path);
        assert!(!reloaded.contains("one"));
        assert!(reloaded.contains("two"));
    }

    #[test]
    fn test_corrupt_file_resets_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not valid json").unwrap();

        let store = WordStore::load(&path);
        assert!(store.is_empty());

        let forced = ForcedStore::load(&path);
        assert!(forced.is_empty());
    }

    #[test]
    fn test_forced_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("forced.json");

        let mut store = ForcedStore::load(&path);
        store.add("Ntcn", "тест").unwrap();
        assert_eq!(store.lookup("ntcn").as_deref(), Some("тест"));

        let reloaded = ForcedStore::load(&path);
        assert_eq!(reloaded.lookup("NTCN").as_deref(), Some("тест"));
    }

    #[test]
    fn test_in_memory_stores_do_not_touch_disk() {
        let mut store = WordStore::default();
        store.add("word").unwrap();
        assert!(store.contains("word"));
    }
}
