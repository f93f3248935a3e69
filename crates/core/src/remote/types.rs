//! Request and response shapes of the recommendation service.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::paging::{SortField, SortOrder, TypeFilter};
use crate::preferences::Preferences;

// ============================================================================
// Requests
// ============================================================================

/// Paginated listing parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub page: u32,
    pub limit: u32,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub type_filter: TypeFilter,
}

/// Free-text search parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub query: String,
    pub limit: u32,
    pub type_filter: TypeFilter,
}

/// Similarity measure used by content and hybrid recommendations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityMethod {
    #[default]
    Cosine,
    Pearson,
    Euclidean,
    Jaccard,
}

impl SimilarityMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimilarityMethod::Cosine => "cosine",
            SimilarityMethod::Pearson => "pearson",
            SimilarityMethod::Euclidean => "euclidean",
            SimilarityMethod::Jaccard => "jaccard",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRequest {
    pub liked_games: Vec<String>,
    pub method: SimilarityMethod,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintRequest {
    pub preferences: Preferences,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridRequest {
    pub preferences: Preferences,
    pub liked_games: Vec<String>,
    pub method: SimilarityMethod,
    pub limit: u32,
}

/// Distinct-value lookups used to populate selection lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Tags,
    Languages,
    Developers,
    Publishers,
    Categories,
}

impl LookupKind {
    /// Endpoint path segment, also the key of the list in the response.
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Tags => "tags",
            LookupKind::Languages => "languages",
            LookupKind::Developers => "developers",
            LookupKind::Publishers => "publishers",
            LookupKind::Categories => "categories",
        }
    }
}

// ============================================================================
// Responses
// ============================================================================
//
// Item records stay as raw JSON here; the controller normalizes them.

/// One page of the catalog listing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GamePage {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    #[serde(alias = "items")]
    pub games: Vec<Value>,
}

/// Search results: a single bounded page and a count.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SearchResults {
    pub query: String,
    pub count: u64,
    #[serde(alias = "items")]
    pub games: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ContentBuckets {
    #[serde(alias = "highlySimilar")]
    pub highly_similar: Vec<Value>,
    #[serde(alias = "moderatelySimilar")]
    pub moderately_similar: Vec<Value>,
    #[serde(alias = "somewhatSimilar")]
    pub somewhat_similar: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConstraintBuckets {
    #[serde(alias = "perfectMatches")]
    pub perfect_matches: Vec<Value>,
    #[serde(alias = "goodMatches")]
    pub good_matches: Vec<Value>,
    #[serde(alias = "partialMatches")]
    pub partial_matches: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HybridResults {
    #[serde(alias = "games")]
    pub recommendations: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: Option<String>,
    pub games_loaded: u64,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy") || self.status.eq_ignore_ascii_case("ok")
    }
}

/// Catalog-wide metrics shown in stats mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogStats {
    pub total_games: u64,
    pub price_statistics: PriceStatistics,
    pub top_tags: Vec<TagCount>,
    pub sentiment_distribution: Vec<SentimentBucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceStatistics {
    pub avg_price: f64,
    pub max_price: f64,
    pub min_price: f64,
    pub free_games: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagCount {
    #[serde(alias = "_id")]
    pub tag: String,
    pub count: u64,
}

/// Histogram bucket; `lower_bound` is the bucket's lower sentiment edge, or
/// the service's catch-all label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SentimentBucket {
    #[serde(alias = "_id")]
    pub lower_bound: Value,
    pub count: u64,
}

/// Decode a JSON body into an envelope. A shape mismatch yields the empty
/// envelope instead of an error.
pub fn decode_lenient<T>(endpoint: &str, body: Value) -> T
where
    T: DeserializeOwned + Default,
{
    serde_json::from_value(body).unwrap_or_else(|e| {
        warn!(endpoint = %endpoint, error = %e, "Malformed response, using empty result");
        T::default()
    })
}

/// Extract a lookup list: `{"<kind>": [...]}`, or a bare array.
pub fn decode_lookup(kind: LookupKind, body: &Value) -> Vec<String> {
    let list = match body {
        Value::Array(items) => Some(items),
        Value::Object(obj) => obj.get(kind.as_str()).and_then(Value::as_array),
        _ => None,
    };
    list.map(|items| {
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_game_page_decodes() {
        let page: GamePage = decode_lenient(
            "games",
            json!({"page": 2, "limit": 20, "total": 45, "total_pages": 3, "games": [{"title": "A"}]}),
        );
        assert_eq!(page.page, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.games.len(), 1);
    }

    #[test]
    fn test_missing_buckets_default_to_empty() {
        let buckets: ContentBuckets =
            decode_lenient("content", json!({"highly_similar": [{"title": "A"}]}));
        assert_eq!(buckets.highly_similar.len(), 1);
        assert!(buckets.moderately_similar.is_empty());
        assert!(buckets.somewhat_similar.is_empty());
    }

    #[test]
    fn test_wrong_shape_yields_empty_envelope() {
        let buckets: ConstraintBuckets =
            decode_lenient("constraint", json!({"perfect_matches": "oops"}));
        assert_eq!(buckets, ConstraintBuckets::default());

        let page: GamePage = decode_lenient("games", json!([1, 2, 3]));
        assert_eq!(page, GamePage::default());
    }

    #[test]
    fn test_camel_case_bucket_aliases() {
        let buckets: ConstraintBuckets =
            decode_lenient("constraint", json!({"perfectMatches": [{}], "goodMatches": [{}, {}]}));
        assert_eq!(buckets.perfect_matches.len(), 1);
        assert_eq!(buckets.good_matches.len(), 2);
    }

    #[test]
    fn test_stats_decodes_service_shape() {
        let stats: CatalogStats = decode_lenient(
            "stats",
            json!({
                "total_games": 1200,
                "price_statistics": {"avg_price": 12.5, "max_price": 69.99, "min_price": 0, "free_games": 80},
                "top_tags": [{"_id": "Indie", "count": 400}],
                "sentiment_distribution": [{"_id": 0.7, "count": 300}, {"_id": "other", "count": 2}]
            }),
        );
        assert_eq!(stats.total_games, 1200);
        assert_eq!(stats.price_statistics.free_games, 80);
        assert_eq!(stats.top_tags[0].tag, "Indie");
        assert_eq!(stats.sentiment_distribution.len(), 2);
    }

    #[test]
    fn test_decode_lookup() {
        assert_eq!(
            decode_lookup(LookupKind::Tags, &json!({"tags": ["Indie", " ", 3, "RPG"], "count": 4})),
            vec!["Indie", "RPG"]
        );
        assert_eq!(
            decode_lookup(LookupKind::Languages, &json!(["English"])),
            vec!["English"]
        );
        assert!(decode_lookup(LookupKind::Developers, &json!({"tags": ["x"]})).is_empty());
    }

    #[test]
    fn test_content_request_body() {
        let body = serde_json::to_value(ContentRequest {
            liked_games: vec!["Portal".into()],
            method: SimilarityMethod::Jaccard,
            limit: 10,
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"liked_games": ["Portal"], "method": "jaccard", "limit": 10})
        );
    }
}
