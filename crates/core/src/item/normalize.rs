//! Conversion of heterogeneous service payloads into [`CanonicalItem`].
//!
//! Each endpoint of the recommendation service names the same attribute
//! differently (`discounted_price` vs `price`, `score` vs `similarity` vs
//! `hybrid_score`, ...). Every canonical field has a fixed priority list of
//! upstream keys in [`aliases`]; the first key that is present with a usable
//! value wins. Values are never merged across keys.
//!
//! Normalization is total: any JSON value produces an item.

use serde_json::{Map, Value};

use super::types::{CanonicalItem, SystemSpecs, NEUTRAL_SENTIMENT};

/// Version of the alias table. Bump when adding or reordering keys.
pub const ALIAS_TABLE_VERSION: u32 = 2;

/// Upstream key priority lists, highest priority first.
pub mod aliases {
    pub const TITLE: &[&str] = &["title", "name"];
    pub const DEVELOPER: &[&str] = &["developer", "developers"];
    pub const PUBLISHER: &[&str] = &["publisher", "publishers"];
    pub const CURRENT_PRICE: &[&str] = &["discounted_price", "price", "current_price", "original_price"];
    pub const ORIGINAL_PRICE: &[&str] = &["original_price", "price", "current_price"];
    pub const DISCOUNT: &[&str] = &["discount_percentage", "discount_percent", "discount"];
    pub const SENTIMENT: &[&str] = &[
        "overall_sentiment_score",
        "sentiment",
        "all_sentiment_score",
        "sentiment_score",
    ];
    pub const REVIEW_COUNT: &[&str] = &["all_reviews_count", "review_count", "reviews_count", "reviews"];
    pub const POPULARITY: &[&str] = &["popularity_score", "popularity"];
    pub const MATCH_SCORE: &[&str] = &[
        "score",
        "similarity",
        "similarity_score",
        "hybrid_score",
        "match_score",
    ];
    pub const TAGS: &[&str] = &["tags"];
    pub const CATEGORIES: &[&str] = &["categories", "genres"];
    pub const FEATURES: &[&str] = &["features"];
    pub const LANGUAGES: &[&str] = &["languages", "supported_languages"];
    pub const LINK: &[&str] = &["link", "url", "external_link", "store_url"];
    pub const RELEASE_YEAR: &[&str] = &["release_year", "year"];
    pub const EXPLANATIONS: &[&str] = &["explanations", "reasons"];

    /// Nested object that may hold the hardware requirement keys.
    pub const SPECS_OBJECT: &[&str] = &["system_specs", "system_requirements"];
    pub const MEMORY_GB: &[&str] = &["memory_gb", "ram_gb"];
    pub const STORAGE_GB: &[&str] = &["storage_gb", "disk_gb"];
    pub const OS_TYPE: &[&str] = &["os_type", "os"];
    pub const SSD_REQUIRED: &[&str] = &["ssd_required", "ssd"];
}

/// Normalize one raw payload record.
pub fn normalize(raw: &Value) -> CanonicalItem {
    let Some(obj) = raw.as_object() else {
        return CanonicalItem::default();
    };

    let current_price = first(obj, aliases::CURRENT_PRICE, as_f64)
        .map(non_negative)
        .unwrap_or(0.0);
    let original_price = first(obj, aliases::ORIGINAL_PRICE, as_f64)
        .map(non_negative)
        .unwrap_or(0.0)
        .max(current_price);

    CanonicalItem {
        title: first(obj, aliases::TITLE, as_string).unwrap_or_default(),
        developer: first(obj, aliases::DEVELOPER, as_joined_string).unwrap_or_default(),
        publisher: first(obj, aliases::PUBLISHER, as_joined_string).unwrap_or_default(),
        current_price,
        original_price,
        discount_percent: first(obj, aliases::DISCOUNT, as_f64)
            .map(|d| d.round().clamp(0.0, 100.0) as u8)
            .unwrap_or(0),
        sentiment_score: first(obj, aliases::SENTIMENT, as_f64)
            .map(unit_interval)
            .unwrap_or(NEUTRAL_SENTIMENT),
        review_count: first(obj, aliases::REVIEW_COUNT, as_u64).unwrap_or(0),
        popularity: first(obj, aliases::POPULARITY, as_f64)
            .map(unit_interval)
            .unwrap_or(0.0),
        tags: first(obj, aliases::TAGS, as_string_list).unwrap_or_default(),
        categories: first(obj, aliases::CATEGORIES, as_string_list).unwrap_or_default(),
        features: first(obj, aliases::FEATURES, as_string_list).unwrap_or_default(),
        languages: first(obj, aliases::LANGUAGES, as_string_list).unwrap_or_default(),
        external_link: first(obj, aliases::LINK, as_string),
        release_year: first(obj, aliases::RELEASE_YEAR, as_f64)
            .filter(|y| (1.0..=9999.0).contains(y))
            .map(|y| y as i32),
        system_specs: system_specs(obj),
        match_score: first(obj, aliases::MATCH_SCORE, as_f64)
            .map(non_negative)
            .unwrap_or(0.0),
        explanations: first(obj, aliases::EXPLANATIONS, as_string_list).unwrap_or_default(),
    }
}

/// Normalize every record of a bucket, preserving order.
pub fn normalize_all(raw: &[Value]) -> Vec<CanonicalItem> {
    raw.iter().map(normalize).collect()
}

/// Hardware keys are read from the top level first, then from a nested
/// requirements object.
fn system_specs(obj: &Map<String, Value>) -> SystemSpecs {
    let nested = first(obj, aliases::SPECS_OBJECT, |v| v.as_object());

    SystemSpecs {
        memory_gb: spec_value(obj, nested, aliases::MEMORY_GB)
            .and_then(as_f64)
            .filter(|v| *v > 0.0),
        storage_gb: spec_value(obj, nested, aliases::STORAGE_GB)
            .and_then(as_f64)
            .filter(|v| *v > 0.0),
        os_type: spec_value(obj, nested, aliases::OS_TYPE).and_then(as_string),
        ssd_required: spec_value(obj, nested, aliases::SSD_REQUIRED)
            .and_then(as_bool)
            .unwrap_or(false),
    }
}

fn spec_value<'a>(
    obj: &'a Map<String, Value>,
    nested: Option<&'a Map<String, Value>>,
    keys: &[&str],
) -> Option<&'a Value> {
    let present = |map: &'a Map<String, Value>| {
        keys.iter()
            .find_map(|k| map.get(*k).filter(|v| !v.is_null()))
    };
    present(obj).or_else(|| nested.and_then(present))
}

/// First key whose value converts successfully.
fn first<'a, T>(
    obj: &'a Map<String, Value>,
    keys: &[&str],
    convert: impl Fn(&'a Value) -> Option<T>,
) -> Option<T> {
    keys.iter().filter_map(|k| obj.get(*k)).find_map(convert)
}

fn non_negative(v: f64) -> f64 {
    v.max(0.0)
}

fn unit_interval(v: f64) -> f64 {
    v.clamp(0.0, 1.0)
}

fn as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s.trim().trim_start_matches('$').replace(',', "");
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) if n.is_u64() => n.as_u64(),
        other => as_f64(other).map(|f| f.max(0.0).round() as u64),
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Some(true),
            "false" | "no" | "0" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// A string, or the first non-blank entry joined from a list of strings.
fn as_joined_string(value: &Value) -> Option<String> {
    match value {
        Value::Array(_) => as_string_list(value)
            .map(|list| list.join(", "))
            .filter(|s| !s.is_empty()),
        other => as_string(other),
    }
}

/// Arrays keep their string entries in order; a plain string is split on commas.
fn as_string_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(as_string).collect()),
        Value::String(s) => Some(
            s.split(',')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect(),
        ),
        _ => None,
    }
}
