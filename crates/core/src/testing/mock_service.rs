//! Mock recommendation service for testing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::item::normalize;
use crate::remote::{
    CatalogStats, ConstraintBuckets, ConstraintRequest, ContentBuckets, ContentRequest,
    GamePage, HealthStatus, HybridRequest, HybridResults, ListQuery, LookupKind,
    RecommendationService, SearchQuery, SearchResults, ServiceError,
};

/// A call made against the mock, for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Health,
    ListGames(ListQuery),
    SearchGames(SearchQuery),
    Content(ContentRequest),
    Constraint(ConstraintRequest),
    Hybrid(HybridRequest),
    Stats,
    Lookup(LookupKind),
}

/// Mock implementation of the RecommendationService trait.
///
/// Provides controllable behavior for testing:
/// - Paginates a configurable catalog; the listing keeps catalog order and
///   only applies the type filter
/// - Returns configurable recommendation buckets, stats and lookups
/// - Records every call
/// - Simulates failures and per-call delays
pub struct MockRecommendationService {
    games: Arc<RwLock<Vec<serde_json::Value>>>,
    content: Arc<RwLock<ContentBuckets>>,
    constraint: Arc<RwLock<ConstraintBuckets>>,
    hybrid: Arc<RwLock<HybridResults>>,
    stats: Arc<RwLock<CatalogStats>>,
    lookups: Arc<RwLock<HashMap<LookupKind, Vec<String>>>>,
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// If set, the next call fails with this error.
    next_error: Arc<RwLock<Option<ServiceError>>>,
    /// Delays consumed one per call, in call order.
    delays: Arc<RwLock<VecDeque<Duration>>>,
}

impl std::fmt::Debug for MockRecommendationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRecommendationService")
            .field("games", &"<games>")
            .field("calls", &"<calls>")
            .finish()
    }
}

impl Default for MockRecommendationService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecommendationService {
    /// Create a mock with an empty catalog.
    pub fn new() -> Self {
        Self {
            games: Arc::new(RwLock::new(Vec::new())),
            content: Arc::new(RwLock::new(ContentBuckets::default())),
            constraint: Arc::new(RwLock::new(ConstraintBuckets::default())),
            hybrid: Arc::new(RwLock::new(HybridResults::default())),
            stats: Arc::new(RwLock::new(CatalogStats::default())),
            lookups: Arc::new(RwLock::new(HashMap::new())),
            calls: Arc::new(RwLock::new(Vec::new())),
            next_error: Arc::new(RwLock::new(None)),
            delays: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    /// Create a mock serving `games` as its catalog.
    pub fn with_games(games: Vec<serde_json::Value>) -> Self {
        Self {
            games: Arc::new(RwLock::new(games)),
            ..Self::new()
        }
    }

    pub async fn set_games(&self, games: Vec<serde_json::Value>) {
        *self.games.write().await = games;
    }

    pub async fn set_content(&self, buckets: ContentBuckets) {
        *self.content.write().await = buckets;
    }

    pub async fn set_constraint(&self, buckets: ConstraintBuckets) {
        *self.constraint.write().await = buckets;
    }

    pub async fn set_hybrid(&self, results: HybridResults) {
        *self.hybrid.write().await = results;
    }

    pub async fn set_stats(&self, stats: CatalogStats) {
        *self.stats.write().await = stats;
    }

    pub async fn set_lookup(&self, kind: LookupKind, values: Vec<String>) {
        self.lookups.write().await.insert(kind, values);
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: ServiceError) {
        *self.next_error.write().await = Some(error);
    }

    /// Delay the next call without a delay by `delay`.
    pub async fn push_delay(&self, delay: Duration) {
        self.delays.write().await.push_back(delay);
    }

    /// Get recorded calls.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// Get the number of calls performed.
    pub async fn call_count(&self) -> usize {
        self.calls.read().await.len()
    }

    pub async fn clear_recorded(&self) {
        self.calls.write().await.clear();
    }

    /// Record the call, then fail or sleep as configured.
    async fn enter(&self, call: RecordedCall) -> Result<(), ServiceError> {
        self.calls.write().await.push(call);
        let error = self.next_error.write().await.take();
        let delay = self.delays.write().await.pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RecommendationService for MockRecommendationService {
    async fn health(&self) -> Result<HealthStatus, ServiceError> {
        self.enter(RecordedCall::Health).await?;
        Ok(HealthStatus {
            status: "healthy".to_string(),
            timestamp: None,
            games_loaded: self.games.read().await.len() as u64,
        })
    }

    async fn list_games(&self, query: &ListQuery) -> Result<GamePage, ServiceError> {
        self.enter(RecordedCall::ListGames(query.clone())).await?;

        let games = self.games.read().await;
        let matching: Vec<_> = games
            .iter()
            .filter(|g| query.type_filter.matches(normalize(g).item_type()))
            .cloned()
            .collect();

        let limit = query.limit.max(1) as usize;
        let total = matching.len();
        let total_pages = total.div_ceil(limit).max(1);
        let start = (query.page.max(1) as usize - 1) * limit;

        Ok(GamePage {
            page: query.page,
            limit: query.limit,
            total: total as u64,
            total_pages: total_pages as u32,
            games: matching.into_iter().skip(start).take(limit).collect(),
        })
    }

    async fn search_games(&self, query: &SearchQuery) -> Result<SearchResults, ServiceError> {
        self.enter(RecordedCall::SearchGames(query.clone())).await?;

        let needle = query.query.to_lowercase();
        let games = self.games.read().await;
        let found: Vec<_> = games
            .iter()
            .filter(|g| {
                let item = normalize(g);
                item.title.to_lowercase().contains(&needle)
                    && query.type_filter.matches(item.item_type())
            })
            .take(query.limit as usize)
            .cloned()
            .collect();

        Ok(SearchResults {
            query: query.query.clone(),
            count: found.len() as u64,
            games: found,
        })
    }

    async fn recommend_content(
        &self,
        request: &ContentRequest,
    ) -> Result<ContentBuckets, ServiceError> {
        self.enter(RecordedCall::Content(request.clone())).await?;
        Ok(self.content.read().await.clone())
    }

    async fn recommend_constraint(
        &self,
        request: &ConstraintRequest,
    ) -> Result<ConstraintBuckets, ServiceError> {
        self.enter(RecordedCall::Constraint(request.clone())).await?;
        Ok(self.constraint.read().await.clone())
    }

    async fn recommend_hybrid(
        &self,
        request: &HybridRequest,
    ) -> Result<HybridResults, ServiceError> {
        self.enter(RecordedCall::Hybrid(request.clone())).await?;
        Ok(self.hybrid.read().await.clone())
    }

    async fn stats(&self) -> Result<CatalogStats, ServiceError> {
        self.enter(RecordedCall::Stats).await?;
        Ok(self.stats.read().await.clone())
    }

    async fn lookup(&self, kind: LookupKind) -> Result<Vec<String>, ServiceError> {
        self.enter(RecordedCall::Lookup(kind)).await?;
        Ok(self
            .lookups
            .read()
            .await
            .get(&kind)
            .cloned()
            .unwrap_or_default())
    }
}
