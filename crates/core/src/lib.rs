pub mod assets;
pub mod config;
pub mod controller;
pub mod item;
pub mod metrics;
pub mod paging;
pub mod preferences;
pub mod remote;
pub mod testing;

pub use assets::{extract_external_id, AssetConfig, AssetResolver, AssetUrls, PlaceholderVisual};
pub use config::{
    load_config, load_config_from_str, load_config_or_default, validate_config, Config,
    ConfigError, StorageConfig,
};
pub use controller::{
    ControllerConfig, ControllerSnapshot, FetchOutcome, Lookups, Mode, ModeController, Notice,
    NoticeKind, RecommendationResult,
};
pub use item::{normalize, CanonicalItem, ItemType, SentimentCategory};
pub use paging::{PageWindow, PaginationState, SortCriterion, TypeFilter};
pub use preferences::{
    LikedSet, LikedStorage, MemoryLikedStorage, PreferenceStore, Preferences,
    SqliteLikedStorage, StorageError,
};
pub use remote::{
    HttpRecommendationClient, LookupKind, RecommendationService, ServiceConfig, ServiceError,
    SimilarityMethod,
};
