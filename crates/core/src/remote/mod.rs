//! Client side of the remote recommendation service.
//!
//! The service exposes paginated listing, search, three recommendation
//! strategies (content, constraint, hybrid), catalog stats and distinct-value
//! lookups. This module only transports requests and decodes envelopes; item
//! normalization happens in the controller.

mod http;
mod types;

pub use http::{HttpRecommendationClient, ServiceConfig};
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures talking to the service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded, please wait before retrying")]
    RateLimitExceeded,

    /// Service returned a non-success status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Response body was not JSON.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured.
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Operations offered by the recommendation service.
#[async_trait]
pub trait RecommendationService: Send + Sync {
    async fn health(&self) -> Result<HealthStatus, ServiceError>;

    /// One page of the catalog.
    async fn list_games(&self, query: &ListQuery) -> Result<GamePage, ServiceError>;

    /// Title search; ignores pagination beyond a bounded page.
    async fn search_games(&self, query: &SearchQuery) -> Result<SearchResults, ServiceError>;

    /// Items similar to the liked titles.
    async fn recommend_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentBuckets, ServiceError>;

    /// Items matching the preference constraints.
    async fn recommend_constraint(
        &self,
        request: &ConstraintRequest,
    ) -> Result<ConstraintBuckets, ServiceError>;

    /// Blend of content similarity and constraint matching.
    async fn recommend_hybrid(&self, request: &HybridRequest)
        -> Result<HybridResults, ServiceError>;

    async fn stats(&self) -> Result<CatalogStats, ServiceError>;

    /// Distinct values of one attribute across the catalog.
    async fn lookup(&self, kind: LookupKind) -> Result<Vec<String>, ServiceError>;
}
