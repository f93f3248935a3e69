//! Canonical item model and response normalization.

mod normalize;
mod types;

pub use normalize::{aliases, normalize, normalize_all, ALIAS_TABLE_VERSION};
pub use types::{CanonicalItem, ItemType, SentimentCategory, SystemSpecs, NEUTRAL_SENTIMENT};
