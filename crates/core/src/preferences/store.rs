//! Preference store: constraint state plus the persisted liked set.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::item::CanonicalItem;
use crate::metrics;

use super::liked::LikedSet;
use super::storage::{LikedStorage, StorageError};
use super::types::Preferences;

/// Owns the user's preferences and liked set.
///
/// The liked set is loaded once at construction and fully re-serialized to
/// storage after every mutation.
pub struct PreferenceStore {
    preferences: Preferences,
    liked: LikedSet,
    storage: Arc<dyn LikedStorage>,
    liked_key: String,
}

impl PreferenceStore {
    /// Load the liked set from storage. Read failures and corrupt data both
    /// start an empty set.
    pub fn open(storage: Arc<dyn LikedStorage>, liked_key: impl Into<String>) -> Self {
        let liked_key = liked_key.into();
        let liked = match storage.load(&liked_key) {
            Ok(Some(data)) => LikedSet::deserialize(&data),
            Ok(None) => LikedSet::new(),
            Err(e) => {
                warn!(error = %e, key = %liked_key, "Failed to read liked items");
                LikedSet::new()
            }
        };

        info!(count = liked.len(), "Loaded liked items");

        Self {
            preferences: Preferences::default(),
            liked,
            storage,
            liked_key,
        }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    pub fn liked(&self) -> &LikedSet {
        &self.liked
    }

    pub fn is_liked(&self, title: &str) -> bool {
        self.liked.contains(title)
    }

    /// Like an item. The in-memory set keeps the change even when the write
    /// fails; the error is returned for the caller to surface.
    pub fn like(&mut self, item: CanonicalItem) -> Result<bool, StorageError> {
        let title = item.title.clone();
        if !self.liked.insert(item) {
            return Ok(false);
        }
        debug!(title = %title, "Liked item");
        self.persist()?;
        Ok(true)
    }

    pub fn unlike(&mut self, title: &str) -> Result<bool, StorageError> {
        if !self.liked.remove(title) {
            return Ok(false);
        }
        debug!(title = %title, "Unliked item");
        self.persist()?;
        Ok(true)
    }

    /// Like if absent, unlike if present. Returns whether the item is now liked.
    pub fn toggle_like(&mut self, item: CanonicalItem) -> Result<bool, StorageError> {
        if self.liked.contains(&item.title) {
            let title = item.title;
            self.unlike(&title).map(|_| false)
        } else {
            self.like(item).map(|_| true)
        }
    }

    pub fn clear_likes(&mut self) -> Result<(), StorageError> {
        if self.liked.is_empty() {
            return Ok(());
        }
        self.liked.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StorageError> {
        let result = self
            .liked
            .serialize()
            .map_err(StorageError::from)
            .and_then(|data| self.storage.save(&self.liked_key, &data));

        if let Err(ref e) = result {
            metrics::LIKED_PERSIST_FAILURES.inc();
            warn!(error = %e, key = %self.liked_key, "Failed to persist liked items");
        }
        result
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore")
            .field("preferences", &self.preferences)
            .field("liked", &self.liked.len())
            .field("liked_key", &self.liked_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preferences::MemoryLikedStorage;

    const KEY: &str = "likedGames";

    struct FailingStorage;

    impl LikedStorage for FailingStorage {
        fn load(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Backend("disk unavailable".into()))
        }

        fn save(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Backend("disk unavailable".into()))
        }
    }

    #[test]
    fn test_every_mutation_persists() {
        let storage = Arc::new(MemoryLikedStorage::new());
        let mut store = PreferenceStore::open(storage.clone(), KEY);

        assert!(store.like(CanonicalItem::with_title("Outer Wilds")).unwrap());
        let saved = storage.load(KEY).unwrap().unwrap();
        assert!(saved.contains("Outer Wilds"));

        assert!(store.unlike("Outer Wilds").unwrap());
        assert_eq!(storage.load(KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_reopen_restores_likes() {
        let storage = Arc::new(MemoryLikedStorage::new());
        {
            let mut store = PreferenceStore::open(storage.clone(), KEY);
            store.like(CanonicalItem::with_title("Factorio")).unwrap();
            store.like(CanonicalItem::with_title("Rimworld")).unwrap();
        }
        let store = PreferenceStore::open(storage, KEY);
        assert!(store.is_liked("Factorio"));
        assert!(store.is_liked("Rimworld"));
    }

    #[test]
    fn test_corrupt_storage_opens_empty() {
        let storage = Arc::new(MemoryLikedStorage::with_value(KEY, "{{garbage"));
        let store = PreferenceStore::open(storage, KEY);
        assert!(store.liked().is_empty());
    }

    #[test]
    fn test_failing_storage_is_not_fatal() {
        let mut store = PreferenceStore::open(Arc::new(FailingStorage), KEY);
        assert!(store.liked().is_empty());

        let result = store.like(CanonicalItem::with_title("Braid"));
        assert!(result.is_err());
        assert!(store.is_liked("Braid"));
    }

    #[test]
    fn test_toggle_like() {
        let mut store = PreferenceStore::open(Arc::new(MemoryLikedStorage::new()), KEY);
        assert!(store.toggle_like(CanonicalItem::with_title("Inside")).unwrap());
        assert!(!store.toggle_like(CanonicalItem::with_title("Inside")).unwrap());
        assert!(store.liked().is_empty());
    }

    #[test]
    fn test_duplicate_like_does_not_write() {
        let storage = Arc::new(MemoryLikedStorage::new());
        let mut store = PreferenceStore::open(storage.clone(), KEY);
        store.like(CanonicalItem::with_title("Limbo")).unwrap();
        assert!(!store.like(CanonicalItem::with_title("Limbo")).unwrap());
        assert_eq!(store.liked().len(), 1);
    }
}
