//! HTTP client for the recommendation service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::types::{
    decode_lenient, decode_lookup, CatalogStats, ConstraintBuckets, ConstraintRequest,
    ContentBuckets, ContentRequest, GamePage, HealthStatus, HybridRequest, HybridResults,
    ListQuery, LookupKind, SearchQuery, SearchResults,
};
use super::{RecommendationService, ServiceError};

/// Connection settings for the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// reqwest-backed [`RecommendationService`].
pub struct HttpRecommendationClient {
    client: Client,
    base_url: String,
}

impl HttpRecommendationClient {
    pub fn new(config: &ServiceConfig) -> Result<Self, ServiceError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ServiceError::NotConfigured(
                "service base URL is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json(&self, path: &str, query: &[(&str, String)]) -> Result<Value, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        let response = self.client.get(&url).query(query).send().await?;
        Self::read_json(response).await
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Value, ServiceError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let response = self.client.post(&url).json(body).send().await?;
        Self::read_json(response).await
    }

    async fn read_json(response: Response) -> Result<Value, ServiceError> {
        let status = response.status();
        if status == 429 {
            return Err(ServiceError::RateLimitExceeded);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ServiceError::ParseError(format!("response is not JSON: {}", e)))
    }
}

#[async_trait]
impl RecommendationService for HttpRecommendationClient {
    async fn health(&self) -> Result<HealthStatus, ServiceError> {
        let body = self.get_json("/health", &[]).await?;
        Ok(decode_lenient("health", body))
    }

    async fn list_games(&self, query: &ListQuery) -> Result<GamePage, ServiceError> {
        let body = self
            .get_json("/games", &list_params(query))
            .await?;
        Ok(decode_lenient("games", body))
    }

    async fn search_games(&self, query: &SearchQuery) -> Result<SearchResults, ServiceError> {
        let body = self
            .get_json("/games/search", &search_params(query))
            .await?;
        Ok(decode_lenient("games/search", body))
    }

    async fn recommend_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentBuckets, ServiceError> {
        let body = self.post_json("/recommend/content", request).await?;
        Ok(decode_lenient("recommend/content", body))
    }

    async fn recommend_constraint(
        &self,
        request: &ConstraintRequest,
    ) -> Result<ConstraintBuckets, ServiceError> {
        let body = self.post_json("/recommend/constraint", request).await?;
        Ok(decode_lenient("recommend/constraint", body))
    }

    async fn recommend_hybrid(
        &self,
        request: &HybridRequest,
    ) -> Result<HybridResults, ServiceError> {
        let body = self.post_json("/recommend/hybrid", request).await?;
        Ok(decode_lenient("recommend/hybrid", body))
    }

    async fn stats(&self) -> Result<CatalogStats, ServiceError> {
        let body = self.get_json("/stats", &[]).await?;
        Ok(decode_lenient("stats", body))
    }

    async fn lookup(&self, kind: LookupKind) -> Result<Vec<String>, ServiceError> {
        let body = self.get_json(&format!("/{}", kind.as_str()), &[]).await?;
        Ok(decode_lookup(kind, &body))
    }
}

fn list_params(query: &ListQuery) -> Vec<(&'static str, String)> {
    vec![
        ("page", query.page.to_string()),
        ("limit", query.limit.to_string()),
        ("sort_by", query.sort_field.as_str().to_string()),
        ("sort_order", query.sort_order.as_str().to_string()),
        ("type", query.type_filter.as_str().to_string()),
    ]
}

fn search_params(query: &SearchQuery) -> Vec<(&'static str, String)> {
    vec![
        ("q", query.query.clone()),
        ("limit", query.limit.to_string()),
        ("type", query.type_filter.as_str().to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paging::{SortField, SortOrder, TypeFilter};

    #[test]
    fn test_new_requires_base_url() {
        let config = ServiceConfig {
            base_url: "  ".to_string(),
            timeout_secs: 5,
        };
        assert!(matches!(
            HttpRecommendationClient::new(&config),
            Err(ServiceError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let config = ServiceConfig {
            base_url: "http://localhost:8000/".to_string(),
            timeout_secs: 5,
        };
        let client = HttpRecommendationClient::new(&config).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_list_params() {
        let params = list_params(&ListQuery {
            page: 3,
            limit: 20,
            sort_field: SortField::Price,
            sort_order: SortOrder::Ascending,
            type_filter: TypeFilter::Free,
        });
        assert_eq!(
            params,
            vec![
                ("page", "3".to_string()),
                ("limit", "20".to_string()),
                ("sort_by", "price".to_string()),
                ("sort_order", "asc".to_string()),
                ("type", "free".to_string()),
            ]
        );
    }

    #[test]
    fn test_search_params() {
        let params = search_params(&SearchQuery {
            query: "stardew".to_string(),
            limit: 10,
            type_filter: TypeFilter::All,
        });
        assert_eq!(params[0], ("q", "stardew".to_string()));
        assert_eq!(params[2], ("type", "all".to_string()));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_http_error() {
        let client = HttpRecommendationClient::new(&ServiceConfig {
            base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
        })
        .unwrap();
        let result = client.health().await;
        assert!(matches!(result, Err(ServiceError::HttpError(_))));
    }
}
