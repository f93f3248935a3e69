//! Durable key/value storage for the liked set.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

/// Errors from durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage backend error: {0}")]
    Backend(String),

    #[error("Failed to serialize liked items: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Single-key string storage.
///
/// Writes are synchronous and not retried.
pub trait LikedStorage: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// In-process storage, used for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryLikedStorage {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryLikedStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage pre-seeded with one value.
    pub fn with_value(key: &str, value: &str) -> Self {
        Self {
            values: Mutex::new(HashMap::from([(key.to_string(), value.to_string())])),
        }
    }
}

impl LikedStorage for MemoryLikedStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        Ok(values.get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| StorageError::Backend(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_overwrites() {
        let storage = MemoryLikedStorage::new();
        assert_eq!(storage.load("likedGames").unwrap(), None);
        storage.save("likedGames", "[]").unwrap();
        storage.save("likedGames", "[{}]").unwrap();
        assert_eq!(storage.load("likedGames").unwrap().as_deref(), Some("[{}]"));
    }
}
