//! User-editable word stores.
//!
//! Three stores feed the cascade: the exception list (never convert), the
//! forced-conversion list (always convert) and the buzzword list (never
//! convert, extends the built-in set). Each is a keyed collection of
//! normalized-lowercase entries, loaded at startup and persisted on every
//! mutation. The engine only reads; mutation entry points belong to the
//! caller's settings layer.

mod word_store;

pub use word_store::{ForcedStore, StoreError, WordStore};

use std::path::Path;

use parking_lot::RwLock;

/// The three stores behind reader-writer locks, shared between the settings
/// thread (writes) and the input-processing thread (reads). A `validate`
/// call never observes a half-written store.
#[derive(Debug, Default)]
pub struct UserStores {
    exceptions: RwLock<WordStore>,
    forced: RwLock<ForcedStore>,
    buzzwords: RwLock<WordStore>,
}

impl UserStores {
    /// Empty in-memory stores (no persistence). Used in tests and by
    /// callers that manage persistence themselves.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load all three stores from `dir`. Missing or corrupt files reset the
    /// corresponding store to empty; loading never fails.
    pub fn load(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            exceptions: RwLock::new(WordStore::load(dir.join("exceptions.json"))),
            forced: RwLock::new(ForcedStore::load(dir.join("forced.json"))),
            buzzwords: RwLock::new(WordStore::load(dir.join("buzzwords.json"))),
        }
    }

    // Read side, used by the engine.

    pub fn is_exception(&self, word: &str) -> bool {
        self.exceptions.read().contains(word)
    }

    pub fn is_buzzword(&self, word: &str) -> bool {
        self.buzzwords.read().contains(word)
    }

    pub fn forced_conversion(&self, word: &str) -> Option<String> {
        self.forced.read().lookup(word)
    }

    // Write side, owned by the settings layer. Each mutation persists.

    pub fn add_exception(&self, word: &str) -> Result<(), StoreError> {
        self.exceptions.write().add(word)
    }

    pub fn remove_exception(&self, word: &str) -> Result<(), StoreError> {
        self.exceptions.write().remove(word)
    }

    pub fn add_buzzword(&self, word: &str) -> Result<(), StoreError> {
        self.buzzwords.write().add(word)
    }

    pub fn remove_buzzword(&self, word: &str) -> Result<(), StoreError> {
        self.buzzwords.write().remove(word)
    }

    pub fn add_forced(&self, word: &str, replacement: &str) -> Result<(), StoreError> {
        self.forced.write().add(word, replacement)
    }

    pub fn remove_forced(&self, word: &str) -> Result<(), StoreError> {
        self.forced.write().remove(word)
    }
}
