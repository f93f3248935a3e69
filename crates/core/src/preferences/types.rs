//! Constraint preferences that drive constraint and hybrid recommendations.

use serde::{Deserialize, Deserializer, Serialize};

/// Default upper price bound.
pub const DEFAULT_MAX_PRICE: f64 = 100.0;

/// Ordered set of trimmed, non-blank strings.
///
/// Membership is case-insensitive under full Unicode lowercasing; the first
/// spelling inserted is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StringSet(Vec<String>);

impl StringSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a value. Returns false for blank input or an existing member.
    pub fn insert(&mut self, value: &str) -> bool {
        let value = value.trim();
        if value.is_empty() || self.contains(value) {
            return false;
        }
        self.0.push(value.to_string());
        true
    }

    /// Remove a value. Returns false when it was not a member.
    pub fn remove(&mut self, value: &str) -> bool {
        let key = value.trim().to_lowercase();
        let before = self.0.len();
        self.0.retain(|v| v.to_lowercase() != key);
        self.0.len() != before
    }

    pub fn contains(&self, value: &str) -> bool {
        let key = value.trim().to_lowercase();
        self.0.iter().any(|v| v.to_lowercase() == key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }
}

impl<'a> FromIterator<&'a str> for StringSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = StringSet::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Deserialized through [`StringSet::insert`], so blanks and duplicates are
/// dropped.
impl<'de> Deserialize<'de> for StringSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let values = Vec::<String>::deserialize(deserializer)?;
        Ok(values.iter().map(String::as_str).collect())
    }
}

/// Hardware constraints; `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpecPreferences {
    pub memory_gb: Option<f64>,
    pub storage_gb: Option<f64>,
    pub os_type: Option<String>,
    pub ssd_required: Option<bool>,
}

/// Which end of the price range to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceBound {
    Min,
    Max,
}

/// A single hardware constraint update.
#[derive(Debug, Clone, PartialEq)]
pub enum SystemSpecSetting {
    MemoryGb(Option<f64>),
    StorageGb(Option<f64>),
    OsType(Option<String>),
    SsdRequired(Option<bool>),
}

/// Mutable constraint state.
///
/// Setters validate and normalize their input; invalid input is ignored.
/// Invariants: `0 <= min_price <= max_price`, sentiment and popularity in
/// [0, 1], set-valued fields free of blanks and duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawPreferences")]
pub struct Preferences {
    min_price: f64,
    max_price: f64,
    preferred_tags: StringSet,
    preferred_categories: StringSet,
    languages: StringSet,
    developers: StringSet,
    publishers: StringSet,
    system_specs: SpecPreferences,
    min_sentiment: f64,
    min_reviews: u64,
    min_popularity: f64,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: DEFAULT_MAX_PRICE,
            preferred_tags: StringSet::new(),
            preferred_categories: StringSet::new(),
            languages: StringSet::new(),
            developers: StringSet::new(),
            publishers: StringSet::new(),
            system_specs: SpecPreferences::default(),
            min_sentiment: 0.0,
            min_reviews: 0,
            min_popularity: 0.0,
        }
    }
}

/// Unvalidated wire form; converted through the setters.
#[derive(Deserialize)]
#[serde(default)]
struct RawPreferences {
    min_price: f64,
    max_price: f64,
    preferred_tags: StringSet,
    preferred_categories: StringSet,
    languages: StringSet,
    developers: StringSet,
    publishers: StringSet,
    system_specs: SpecPreferences,
    min_sentiment: f64,
    min_reviews: u64,
    min_popularity: f64,
}

impl Default for RawPreferences {
    fn default() -> Self {
        Self {
            min_price: 0.0,
            max_price: DEFAULT_MAX_PRICE,
            preferred_tags: StringSet::new(),
            preferred_categories: StringSet::new(),
            languages: StringSet::new(),
            developers: StringSet::new(),
            publishers: StringSet::new(),
            system_specs: SpecPreferences::default(),
            min_sentiment: 0.0,
            min_reviews: 0,
            min_popularity: 0.0,
        }
    }
}

impl From<RawPreferences> for Preferences {
    fn from(raw: RawPreferences) -> Self {
        let mut prefs = Preferences::default();
        prefs.set_price_bound(PriceBound::Max, raw.max_price);
        prefs.set_price_bound(PriceBound::Min, raw.min_price);
        prefs.preferred_tags = raw.preferred_tags;
        prefs.preferred_categories = raw.preferred_categories;
        prefs.languages = raw.languages;
        prefs.developers = raw.developers;
        prefs.publishers = raw.publishers;

        let specs = raw.system_specs;
        prefs.set_system_spec(SystemSpecSetting::MemoryGb(specs.memory_gb));
        prefs.set_system_spec(SystemSpecSetting::StorageGb(specs.storage_gb));
        prefs.set_system_spec(SystemSpecSetting::OsType(specs.os_type));
        prefs.set_system_spec(SystemSpecSetting::SsdRequired(specs.ssd_required));

        prefs.set_min_sentiment(raw.min_sentiment);
        prefs.set_min_reviews(raw.min_reviews);
        prefs.set_min_popularity(raw.min_popularity);
        prefs
    }
}

impl Preferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn min_price(&self) -> f64 {
        self.min_price
    }

    pub fn max_price(&self) -> f64 {
        self.max_price
    }

    pub fn preferred_tags(&self) -> &StringSet {
        &self.preferred_tags
    }

    pub fn preferred_categories(&self) -> &StringSet {
        &self.preferred_categories
    }

    pub fn languages(&self) -> &StringSet {
        &self.languages
    }

    pub fn developers(&self) -> &StringSet {
        &self.developers
    }

    pub fn publishers(&self) -> &StringSet {
        &self.publishers
    }

    pub fn system_specs(&self) -> &SpecPreferences {
        &self.system_specs
    }

    pub fn min_sentiment(&self) -> f64 {
        self.min_sentiment
    }

    pub fn min_reviews(&self) -> u64 {
        self.min_reviews
    }

    pub fn min_popularity(&self) -> f64 {
        self.min_popularity
    }

    /// Set one price bound. Negative or non-finite values are ignored; the
    /// opposite bound moves along when the range would invert.
    pub fn set_price_bound(&mut self, bound: PriceBound, value: f64) {
        if !value.is_finite() || value < 0.0 {
            return;
        }
        match bound {
            PriceBound::Min => {
                self.min_price = value;
                if self.max_price < value {
                    self.max_price = value;
                }
            }
            PriceBound::Max => {
                self.max_price = value;
                if self.min_price > value {
                    self.min_price = value;
                }
            }
        }
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        self.preferred_tags.insert(tag)
    }

    pub fn remove_tag(&mut self, tag: &str) -> bool {
        self.preferred_tags.remove(tag)
    }

    pub fn add_category(&mut self, category: &str) -> bool {
        self.preferred_categories.insert(category)
    }

    pub fn remove_category(&mut self, category: &str) -> bool {
        self.preferred_categories.remove(category)
    }

    pub fn add_language(&mut self, language: &str) -> bool {
        self.languages.insert(language)
    }

    pub fn remove_language(&mut self, language: &str) -> bool {
        self.languages.remove(language)
    }

    pub fn add_developer(&mut self, developer: &str) -> bool {
        self.developers.insert(developer)
    }

    pub fn remove_developer(&mut self, developer: &str) -> bool {
        self.developers.remove(developer)
    }

    pub fn add_publisher(&mut self, publisher: &str) -> bool {
        self.publishers.insert(publisher)
    }

    pub fn remove_publisher(&mut self, publisher: &str) -> bool {
        self.publishers.remove(publisher)
    }

    /// Update one hardware constraint. Non-positive sizes and blank OS names
    /// reset the constraint to "any".
    pub fn set_system_spec(&mut self, setting: SystemSpecSetting) {
        let positive = |v: Option<f64>| v.filter(|v| v.is_finite() && *v > 0.0);
        match setting {
            SystemSpecSetting::MemoryGb(v) => self.system_specs.memory_gb = positive(v),
            SystemSpecSetting::StorageGb(v) => self.system_specs.storage_gb = positive(v),
            SystemSpecSetting::OsType(v) => {
                self.system_specs.os_type = v
                    .map(|s| s.trim().to_lowercase())
                    .filter(|s| !s.is_empty());
            }
            SystemSpecSetting::SsdRequired(v) => self.system_specs.ssd_required = v,
        }
    }

    /// Clamped to [0, 1]; NaN is ignored.
    pub fn set_min_sentiment(&mut self, value: f64) {
        if !value.is_nan() {
            self.min_sentiment = value.clamp(0.0, 1.0);
        }
    }

    pub fn set_min_reviews(&mut self, value: u64) {
        self.min_reviews = value;
    }

    /// Clamped to [0, 1]; NaN is ignored.
    pub fn set_min_popularity(&mut self, value: f64) {
        if !value.is_nan() {
            self.min_popularity = value.clamp(0.0, 1.0);
        }
    }
}
