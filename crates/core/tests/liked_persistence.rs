//! Liked-set persistence integration tests.

use std::sync::Arc;

use tempfile::TempDir;

use gamefinder_core::{
    controller::{ControllerConfig, ModeController, NoticeKind},
    testing::{fixtures, MockRecommendationService},
    LikedStorage, PreferenceStore, SqliteLikedStorage,
};

const KEY: &str = "likedGames";

fn open_store(dir: &TempDir) -> PreferenceStore {
    let storage =
        SqliteLikedStorage::new(&dir.path().join("likes.db")).expect("Failed to open storage");
    PreferenceStore::open(Arc::new(storage), KEY)
}

#[test]
fn test_likes_survive_reopen() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    {
        let mut store = open_store(&temp_dir);
        assert!(store.like(fixtures::item("Outer Wilds")).unwrap());
        assert!(store.like(fixtures::item("Hollow Knight")).unwrap());
        assert!(!store.like(fixtures::item("Outer Wilds")).unwrap());
    }

    let store = open_store(&temp_dir);
    assert_eq!(
        store.liked().titles(),
        vec!["Outer Wilds".to_string(), "Hollow Knight".to_string()]
    );
    assert_eq!(store.liked().items()[0].developer, "Mock Studio");
}

#[test]
fn test_unlike_is_persisted() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    {
        let mut store = open_store(&temp_dir);
        store.like(fixtures::item("Inside")).unwrap();
        store.like(fixtures::item("Limbo")).unwrap();
        assert!(store.unlike("Inside").unwrap());
    }

    let store = open_store(&temp_dir);
    assert!(!store.is_liked("Inside"));
    assert!(store.is_liked("Limbo"));
}

#[test]
fn test_corrupt_data_loads_empty() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let path = temp_dir.path().join("likes.db");

    SqliteLikedStorage::new(&path)
        .unwrap()
        .save(KEY, "{not json")
        .unwrap();

    let store = open_store(&temp_dir);
    assert!(store.liked().is_empty());
}

#[tokio::test]
async fn test_controller_likes_reach_storage() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let controller = ModeController::new(
        ControllerConfig::default(),
        Arc::new(MockRecommendationService::new()),
        open_store(&temp_dir),
    );

    assert!(controller.like(fixtures::item("Tunic")).await);
    assert!(controller.preferences().await.is_liked("Tunic"));
    drop(controller);

    let store = open_store(&temp_dir);
    assert!(store.is_liked("Tunic"));
}

/// Storage that rejects every write.
struct ReadOnlyStorage;

impl LikedStorage for ReadOnlyStorage {
    fn load(&self, _key: &str) -> Result<Option<String>, gamefinder_core::StorageError> {
        Ok(None)
    }

    fn save(&self, _key: &str, _value: &str) -> Result<(), gamefinder_core::StorageError> {
        Err(gamefinder_core::StorageError::Backend("read-only".to_string()))
    }
}

#[tokio::test]
async fn test_failed_write_keeps_like_and_warns() {
    let controller = ModeController::new(
        ControllerConfig::default(),
        Arc::new(MockRecommendationService::new()),
        PreferenceStore::open(Arc::new(ReadOnlyStorage), KEY),
    );

    assert!(controller.like(fixtures::item("Tunic")).await);
    assert!(controller.preferences().await.is_liked("Tunic"));

    let notice = controller.notice().await.expect("expected a notice");
    assert_eq!(notice.kind, NoticeKind::Warning);
    assert!(notice.message.contains("read-only"));
}
