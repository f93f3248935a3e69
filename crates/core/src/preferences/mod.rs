//! User preferences and the persisted liked set.

mod liked;
mod sqlite;
mod storage;
mod store;
mod types;

pub use liked::LikedSet;
pub use sqlite::SqliteLikedStorage;
pub use storage::{LikedStorage, MemoryLikedStorage, StorageError};
pub use store::PreferenceStore;
pub use types::{
    PriceBound, Preferences, SpecPreferences, StringSet, SystemSpecSetting, DEFAULT_MAX_PRICE,
};
