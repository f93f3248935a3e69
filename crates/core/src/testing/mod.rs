//! Testing utilities and a mock recommendation service.
//!
//! # Example
//!
//! ```rust,ignore
//! use gamefinder_core::testing::{fixtures, MockRecommendationService};
//!
//! let service = MockRecommendationService::with_games(fixtures::catalog(45));
//! service.push_delay(Duration::from_millis(50)).await;
//!
//! let controller = ModeController::new(
//!     ControllerConfig::default(),
//!     Arc::new(service),
//!     fixtures::memory_store(&["Portal"]),
//! );
//! ```

mod mock_service;

pub use mock_service::{MockRecommendationService, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    use std::sync::Arc;

    use serde_json::{json, Value};

    use crate::item::{normalize, CanonicalItem};
    use crate::preferences::{MemoryLikedStorage, PreferenceStore};

    /// Key used by [`memory_store`].
    pub const LIKED_KEY: &str = "likedGames";

    /// A raw game record as the service sends it.
    pub fn game(title: &str, price: f64, discount_percent: u8) -> Value {
        let original = if discount_percent > 0 && discount_percent < 100 {
            (price / (1.0 - f64::from(discount_percent) / 100.0) * 100.0).round() / 100.0
        } else {
            price
        };
        json!({
            "title": title,
            "developer": "Mock Studio",
            "publisher": "Mock Publishing",
            "discounted_price": price,
            "original_price": original,
            "discount_percentage": discount_percent,
            "overall_sentiment_score": 0.8,
            "all_reviews_count": 1200,
            "popularity_score": 0.5,
            "tags": ["Indie", "Puzzle"],
            "languages": ["English"],
            "link": "https://store.steampowered.com/app/400/Portal/",
            "release_year": 2007,
        })
    }

    /// `count` paid games titled "Game 001", "Game 002", ...
    pub fn catalog(count: usize) -> Vec<Value> {
        (1..=count)
            .map(|i| game(&format!("Game {:03}", i), 4.99 + i as f64, 0))
            .collect()
    }

    /// A ranked record as returned by the recommendation endpoints.
    pub fn scored_game(title: &str, score: f64) -> Value {
        let mut value = game(title, 9.99, 0);
        value["similarity"] = json!(score);
        value
    }

    /// A normalized item.
    pub fn item(title: &str) -> CanonicalItem {
        normalize(&game(title, 9.99, 0))
    }

    /// A preference store over in-memory storage with `liked` already liked.
    pub fn memory_store(liked: &[&str]) -> PreferenceStore {
        let mut store = PreferenceStore::open(Arc::new(MemoryLikedStorage::new()), LIKED_KEY);
        for title in liked {
            let _ = store.like(item(title));
        }
        store
    }
}
