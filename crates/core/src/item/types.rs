//! Canonical item schema shared by every retrieval mode.

use serde::{Deserialize, Serialize};

/// Neutral sentiment used when a payload carries no sentiment field.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

/// Hardware requirements attached to a catalog item.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSpecs {
    /// Required memory in GB.
    pub memory_gb: Option<f64>,
    /// Required disk space in GB.
    pub storage_gb: Option<f64>,
    /// Operating system family (e.g. "windows").
    pub os_type: Option<String>,
    /// Whether an SSD is required.
    pub ssd_required: bool,
}

/// A catalog entry, independent of which endpoint produced it.
///
/// Every field has a default so a snapshot with missing keys still decodes.
/// `title` is the identity key within a result set and for likes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanonicalItem {
    pub title: String,
    pub developer: String,
    pub publisher: String,
    /// Price the item sells for right now.
    pub current_price: f64,
    /// List price; never below `current_price`.
    pub original_price: f64,
    /// Discount in whole percent, 0-100.
    pub discount_percent: u8,
    /// Review sentiment in [0, 1].
    pub sentiment_score: f64,
    pub review_count: u64,
    /// Popularity in [0, 1] as computed by the service.
    pub popularity: f64,
    pub tags: Vec<String>,
    pub categories: Vec<String>,
    pub features: Vec<String>,
    pub languages: Vec<String>,
    /// Store page link, `None` when the payload had no usable link.
    pub external_link: Option<String>,
    pub release_year: Option<i32>,
    pub system_specs: SystemSpecs,
    /// Ranking score; only meaningful inside recommendation results.
    pub match_score: f64,
    /// Human-readable reasons attached by the ranking endpoints.
    pub explanations: Vec<String>,
}

impl Default for CanonicalItem {
    fn default() -> Self {
        Self {
            title: String::new(),
            developer: String::new(),
            publisher: String::new(),
            current_price: 0.0,
            original_price: 0.0,
            discount_percent: 0,
            sentiment_score: NEUTRAL_SENTIMENT,
            review_count: 0,
            popularity: 0.0,
            tags: Vec::new(),
            categories: Vec::new(),
            features: Vec::new(),
            languages: Vec::new(),
            external_link: None,
            release_year: None,
            system_specs: SystemSpecs::default(),
            match_score: 0.0,
            explanations: Vec::new(),
        }
    }
}

impl CanonicalItem {
    /// Create an item with only a title set.
    pub fn with_title(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Pricing classification, always derived from price and discount.
    pub fn item_type(&self) -> ItemType {
        ItemType::classify(self.current_price, self.discount_percent)
    }

    pub fn sentiment_category(&self) -> SentimentCategory {
        SentimentCategory::from_score(self.sentiment_score)
    }

    /// Tags with duplicates removed (case-insensitive), first spelling kept.
    pub fn distinct_tags(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.tags
            .iter()
            .filter(|t| seen.insert(t.to_lowercase()))
            .map(String::as_str)
            .collect()
    }
}

/// Pricing classification of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Free,
    Discounted,
    Paid,
}

impl ItemType {
    /// Free iff the current price is zero, discounted iff a discount applies,
    /// paid otherwise.
    pub fn classify(current_price: f64, discount_percent: u8) -> Self {
        if current_price <= 0.0 {
            ItemType::Free
        } else if discount_percent > 0 {
            ItemType::Discounted
        } else {
            ItemType::Paid
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Free => "free",
            ItemType::Discounted => "discounted",
            ItemType::Paid => "paid",
        }
    }
}

/// Review sentiment bands used by the catalog service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentimentCategory {
    OverwhelminglyPositive,
    VeryPositive,
    MostlyPositive,
    Positive,
    Mixed,
    MostlyNegative,
    Negative,
    OverwhelminglyNegative,
}

impl SentimentCategory {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 0.95 => SentimentCategory::OverwhelminglyPositive,
            s if s >= 0.80 => SentimentCategory::VeryPositive,
            s if s >= 0.70 => SentimentCategory::MostlyPositive,
            s if s >= 0.60 => SentimentCategory::Positive,
            s if s >= 0.40 => SentimentCategory::Mixed,
            s if s >= 0.30 => SentimentCategory::MostlyNegative,
            s if s >= 0.20 => SentimentCategory::Negative,
            _ => SentimentCategory::OverwhelminglyNegative,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SentimentCategory::OverwhelminglyPositive => "Overwhelmingly Positive",
            SentimentCategory::VeryPositive => "Very Positive",
            SentimentCategory::MostlyPositive => "Mostly Positive",
            SentimentCategory::Positive => "Positive",
            SentimentCategory::Mixed => "Mixed",
            SentimentCategory::MostlyNegative => "Mostly Negative",
            SentimentCategory::Negative => "Negative",
            SentimentCategory::OverwhelminglyNegative => "Overwhelmingly Negative",
        }
    }
}
