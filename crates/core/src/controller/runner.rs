//! Mode controller implementation.
//!
//! Every user action runs the same fetch cycle:
//! - issue a sequence number for the target mode and mark it in flight
//! - call the service with no lock held
//! - settle the sequence number; apply only if it is still the latest for
//!   its mode and the mode is still selected
//!
//! The published mode moves together with the result and pagination. A
//! selected mode only becomes the published one when its fetch is applied.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

use crate::item::{normalize_all, CanonicalItem};
use crate::metrics;
use crate::paging::{BrowseRequest, BrowseState, PaginationState, SortCriterion, TypeFilter};
use crate::preferences::{PreferenceStore, Preferences, StorageError};
use crate::remote::{
    CatalogStats, ConstraintBuckets, ConstraintRequest, ContentBuckets, ContentRequest,
    GamePage, HealthStatus, HybridRequest, HybridResults, LookupKind, RecommendationService,
    SearchResults, ServiceError, SimilarityMethod,
};

use super::config::ControllerConfig;
use super::sequence::RequestTracker;
use super::types::{
    ConstraintMatches, ControllerSnapshot, FetchOutcome, Lookups, Mode, Notice,
    RecommendationResult, SimilarityBuckets,
};

/// Request captured under the state lock before the remote call.
enum PlannedFetch {
    Browse(BrowseRequest),
    Content(ContentRequest),
    Constraint(ConstraintRequest),
    Hybrid(HybridRequest),
    Stats,
}

/// Mutable controller state. Single writer: the controller itself.
struct ControllerState {
    /// Mode of the published result.
    mode: Mode,
    /// Most recently requested mode; responses for any other mode are stale.
    selected: Mode,
    browse: BrowseState,
    similarity: SimilarityMethod,
    result: RecommendationResult,
    pagination: PaginationState,
    notice: Option<Notice>,
    requests: RequestTracker,
}

/// Owns the current mode and the published result set.
pub struct ModeController {
    config: ControllerConfig,
    service: Arc<dyn RecommendationService>,
    store: RwLock<PreferenceStore>,
    state: RwLock<ControllerState>,
}

impl ModeController {
    /// Create a controller in browse mode with an empty result set.
    /// Nothing is fetched until the first action.
    pub fn new(
        config: ControllerConfig,
        service: Arc<dyn RecommendationService>,
        store: PreferenceStore,
    ) -> Self {
        let pagination = PaginationState::single(0, config.page_size);
        Self {
            config,
            service,
            store: RwLock::new(store),
            state: RwLock::new(ControllerState {
                mode: Mode::Browse,
                selected: Mode::Browse,
                browse: BrowseState::default(),
                similarity: SimilarityMethod::default(),
                result: RecommendationResult::default(),
                pagination,
                notice: None,
                requests: RequestTracker::new(),
            }),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Mode of the published result.
    pub async fn mode(&self) -> Mode {
        self.state.read().await.mode
    }

    /// Most recently requested mode. Differs from [`Self::mode`] while a
    /// switch is in flight.
    pub async fn selected_mode(&self) -> Mode {
        self.state.read().await.selected
    }

    pub async fn result(&self) -> RecommendationResult {
        self.state.read().await.result.clone()
    }

    pub async fn pagination(&self) -> PaginationState {
        self.state.read().await.pagination
    }

    pub async fn browse_state(&self) -> BrowseState {
        self.state.read().await.browse.clone()
    }

    pub async fn similarity_method(&self) -> SimilarityMethod {
        self.state.read().await.similarity
    }

    pub async fn notice(&self) -> Option<Notice> {
        self.state.read().await.notice.clone()
    }

    /// Return and clear the current notice (dismissal).
    pub async fn take_notice(&self) -> Option<Notice> {
        self.state.write().await.notice.take()
    }

    /// Whether a request for `mode` is outstanding.
    pub async fn is_loading(&self, mode: Mode) -> bool {
        self.state.read().await.requests.is_in_flight(mode)
    }

    pub async fn snapshot(&self) -> ControllerSnapshot {
        let st = self.state.read().await;
        ControllerSnapshot {
            mode: st.mode,
            selected: st.selected,
            result: st.result.clone(),
            pagination: st.pagination,
            page_window: st.pagination.window(),
            browse: st.browse.clone(),
            similarity_method: st.similarity,
            notice: st.notice.clone(),
            loading: st.requests.in_flight_modes(),
        }
    }

    /// Read access to preferences and the liked set.
    pub async fn preferences(&self) -> RwLockReadGuard<'_, PreferenceStore> {
        self.store.read().await
    }

    /// Mutate preferences. Takes effect on the next constraint or hybrid fetch.
    pub async fn update_preferences<R>(&self, f: impl FnOnce(&mut Preferences) -> R) -> R {
        let mut store = self.store.write().await;
        f(store.preferences_mut())
    }

    pub async fn set_similarity_method(&self, method: SimilarityMethod) {
        self.state.write().await.similarity = method;
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Switch to `mode` and load its results.
    pub async fn select_mode(&self, mode: Mode) -> FetchOutcome {
        match mode {
            Mode::Liked => self.show_liked().await,
            Mode::Browse => self.fetch_browse().await,
            Mode::Stats => self.run(Mode::Stats, |_| PlannedFetch::Stats).await,
            Mode::Content | Mode::Constraint | Mode::Hybrid => self.recommend(mode).await,
        }
    }

    /// Reload the current mode.
    pub async fn refresh(&self) -> FetchOutcome {
        let mode = self.mode().await;
        self.select_mode(mode).await
    }

    /// Set the browse query and load from page 1. A blank query returns to
    /// the paginated listing.
    pub async fn set_query(&self, query: &str) -> FetchOutcome {
        {
            let mut st = self.state.write().await;
            st.browse.set_query(query);
            st.browse.page = 1;
        }
        self.fetch_browse().await
    }

    pub async fn set_type_filter(&self, filter: TypeFilter) -> FetchOutcome {
        {
            let mut st = self.state.write().await;
            st.browse.type_filter = filter;
            st.browse.page = 1;
        }
        self.fetch_browse().await
    }

    /// Change the browse sort. The visible browse items are re-sorted
    /// immediately; the refetch of the current page then replaces them with
    /// the service's ordering.
    pub async fn set_sort(&self, sort: SortCriterion) -> FetchOutcome {
        {
            let mut st = self.state.write().await;
            st.browse.sort = sort;
            let resorted = match &st.result {
                RecommendationResult::Browse { items } => Some(sort.sorted(items)),
                _ => None,
            };
            if let Some(items) = resorted {
                st.result = RecommendationResult::Browse { items };
            }
        }
        self.fetch_browse().await
    }

    /// Load browse page `page`. Out-of-range pages and pages outside browse
    /// mode are ignored.
    pub async fn goto_page(&self, page: u32) -> FetchOutcome {
        {
            let mut st = self.state.write().await;
            if st.mode != Mode::Browse || !st.pagination.can_goto(page) {
                debug!(page, total = st.pagination.total_pages, "Ignoring page request");
                return FetchOutcome::Ignored;
            }
            st.browse.page = page;
        }
        self.fetch_browse().await
    }

    pub async fn next_page(&self) -> FetchOutcome {
        let current = self.pagination().await.current_page;
        self.goto_page(current.saturating_add(1)).await
    }

    pub async fn previous_page(&self) -> FetchOutcome {
        let current = self.pagination().await.current_page;
        self.goto_page(current.saturating_sub(1)).await
    }

    // ========================================================================
    // Likes
    // ========================================================================

    /// Like an item. Returns whether the liked set changed.
    pub async fn like(&self, item: CanonicalItem) -> bool {
        let result = self.store.write().await.like(item);
        self.after_like_change(result).await
    }

    /// Unlike by title. Returns whether the liked set changed.
    pub async fn unlike(&self, title: &str) -> bool {
        let result = self.store.write().await.unlike(title);
        self.after_like_change(result).await
    }

    /// Returns whether the item is liked afterwards.
    pub async fn toggle_like(&self, item: CanonicalItem) -> bool {
        let title = item.title.clone();
        let result = self.store.write().await.toggle_like(item);
        self.after_like_change(result.map(|_| true)).await;
        self.store.read().await.is_liked(&title)
    }

    /// A storage failure leaves the in-memory change in place and raises a
    /// warning. The liked view is rebuilt when it is showing.
    async fn after_like_change(&self, result: Result<bool, StorageError>) -> bool {
        let changed = match result {
            Ok(changed) => changed,
            Err(e) => {
                let mut st = self.state.write().await;
                let mode = st.mode;
                st.notice = Some(Notice::warning(
                    mode,
                    format!("Liked games could not be saved: {}", e),
                ));
                true
            }
        };

        if changed && self.selected_mode().await == Mode::Liked {
            self.show_liked().await;
        }
        changed
    }

    // ========================================================================
    // Reference data
    // ========================================================================

    pub async fn health(&self) -> Result<HealthStatus, ServiceError> {
        self.service.health().await
    }

    /// One lookup list; failures yield an empty list.
    pub async fn lookup(&self, kind: LookupKind) -> Vec<String> {
        match self.service.lookup(kind).await {
            Ok(values) => values,
            Err(e) => {
                warn!(kind = kind.as_str(), error = %e, "Lookup failed");
                Vec::new()
            }
        }
    }

    /// All lookup lists, fetched concurrently.
    pub async fn lookups(&self) -> Lookups {
        let (tags, languages, developers, publishers, categories) = futures::join!(
            self.lookup(LookupKind::Tags),
            self.lookup(LookupKind::Languages),
            self.lookup(LookupKind::Developers),
            self.lookup(LookupKind::Publishers),
            self.lookup(LookupKind::Categories),
        );
        Lookups {
            tags,
            languages,
            developers,
            publishers,
            categories,
        }
    }

    // ========================================================================
    // Fetch cycle
    // ========================================================================

    async fn show_liked(&self) -> FetchOutcome {
        let items = self.store.read().await.liked().items().to_vec();
        let mut st = self.state.write().await;
        st.mode = Mode::Liked;
        st.selected = Mode::Liked;
        st.pagination = PaginationState::single(items.len() as u64, self.config.page_size);
        st.result = RecommendationResult::Liked { items };
        st.notice = None;
        metrics::FETCHES_TOTAL
            .with_label_values(&[Mode::Liked.as_str(), "applied"])
            .inc();
        FetchOutcome::Applied
    }

    async fn fetch_browse(&self) -> FetchOutcome {
        let (page_size, search_limit) = (self.config.page_size, self.config.search_limit);
        self.run(Mode::Browse, |st| {
            PlannedFetch::Browse(st.browse.request(page_size, search_limit))
        })
        .await
    }

    /// Content, constraint or hybrid. Content and hybrid are refused with an
    /// empty liked set, without touching the current mode.
    async fn recommend(&self, mode: Mode) -> FetchOutcome {
        let (liked_games, preferences) = {
            let store = self.store.read().await;
            (store.liked().titles(), store.preferences().clone())
        };

        if mode.requires_likes() && liked_games.is_empty() {
            let notice = Notice::precondition(
                mode,
                format!(
                    "Like at least one game to get {} recommendations",
                    mode.as_str()
                ),
            );
            info!(mode = %mode, "Refusing recommendation fetch with no liked items");
            metrics::FETCHES_TOTAL
                .with_label_values(&[mode.as_str(), "refused"])
                .inc();
            self.state.write().await.notice = Some(notice.clone());
            return FetchOutcome::Refused(notice);
        }

        let limit = self.config.recommendation_limit;
        self.run(mode, move |st| match mode {
            Mode::Content => PlannedFetch::Content(ContentRequest {
                liked_games,
                method: st.similarity,
                limit,
            }),
            Mode::Constraint => PlannedFetch::Constraint(ConstraintRequest { preferences, limit }),
            _ => PlannedFetch::Hybrid(HybridRequest {
                preferences,
                liked_games,
                method: st.similarity,
                limit,
            }),
        })
        .await
    }

    /// Select `mode`, issue a sequence number, call the service and apply.
    /// The published mode changes only when the response is applied.
    async fn run<F>(&self, mode: Mode, plan: F) -> FetchOutcome
    where
        F: FnOnce(&ControllerState) -> PlannedFetch,
    {
        let (seq, planned) = {
            let mut st = self.state.write().await;
            st.selected = mode;
            let planned = plan(&*st);
            (st.requests.issue(mode), planned)
        };

        debug!(mode = %mode, seq, "Fetching");
        let started = Instant::now();
        let response = self.call(planned).await;
        metrics::FETCH_DURATION
            .with_label_values(&[mode.as_str()])
            .observe(started.elapsed().as_secs_f64());

        self.complete(mode, seq, response).await
    }

    /// The remote call plus normalization. No lock is held here.
    async fn call(
        &self,
        planned: PlannedFetch,
    ) -> Result<(RecommendationResult, PaginationState), ServiceError> {
        let page_size = self.config.page_size;
        let limit = self.config.recommendation_limit;
        match planned {
            PlannedFetch::Browse(BrowseRequest::List(query)) => {
                let page = self.service.list_games(&query).await?;
                Ok(browse_page(page, query.page, page_size))
            }
            PlannedFetch::Browse(BrowseRequest::Search(query)) => {
                let results = self.service.search_games(&query).await?;
                Ok(search_results(results, query.limit))
            }
            PlannedFetch::Content(request) => {
                let buckets = self.service.recommend_content(&request).await?;
                Ok(content_result(buckets, limit))
            }
            PlannedFetch::Constraint(request) => {
                let buckets = self.service.recommend_constraint(&request).await?;
                Ok(constraint_result(buckets, limit))
            }
            PlannedFetch::Hybrid(request) => {
                let results = self.service.recommend_hybrid(&request).await?;
                Ok(hybrid_result(results, limit))
            }
            PlannedFetch::Stats => {
                let stats = self.service.stats().await?;
                Ok(stats_result(stats, page_size))
            }
        }
    }

    async fn complete(
        &self,
        mode: Mode,
        seq: u64,
        response: Result<(RecommendationResult, PaginationState), ServiceError>,
    ) -> FetchOutcome {
        let mut st = self.state.write().await;
        let latest = st.requests.settle(mode, seq);

        if !latest || st.selected != mode {
            debug!(
                mode = %mode,
                seq,
                latest = st.requests.latest(mode),
                selected = %st.selected,
                "Discarding superseded response"
            );
            metrics::STALE_RESPONSES
                .with_label_values(&[mode.as_str()])
                .inc();
            metrics::FETCHES_TOTAL
                .with_label_values(&[mode.as_str(), "discarded"])
                .inc();
            return FetchOutcome::Discarded;
        }

        match response {
            Ok((result, pagination)) => {
                info!(
                    mode = %mode,
                    items = result.len(),
                    page = pagination.current_page,
                    total_pages = pagination.total_pages,
                    "Applied results"
                );
                if mode == Mode::Browse {
                    st.browse.page = pagination.current_page;
                }
                st.mode = mode;
                st.result = result;
                st.pagination = pagination;
                st.notice = None;
                metrics::FETCHES_TOTAL
                    .with_label_values(&[mode.as_str(), "applied"])
                    .inc();
                FetchOutcome::Applied
            }
            Err(e) => {
                warn!(mode = %mode, error = %e, "Fetch failed, keeping previous results");
                st.selected = st.mode;
                if st.mode == Mode::Browse {
                    st.browse.page = st.pagination.current_page;
                }
                let notice = Notice::error(
                    mode,
                    format!("Could not load {} results: {}", mode.as_str(), e),
                );
                st.notice = Some(notice.clone());
                metrics::FETCHES_TOTAL
                    .with_label_values(&[mode.as_str(), "failed"])
                    .inc();
                FetchOutcome::Failed(notice)
            }
        }
    }
}

impl std::fmt::Debug for ModeController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeController")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Response mapping
// ============================================================================

/// Normalize and drop repeated titles; the first occurrence wins.
fn normalize_unique(raw: &[serde_json::Value]) -> Vec<CanonicalItem> {
    let mut seen = HashSet::new();
    normalize_all(raw)
        .into_iter()
        .filter(|item| seen.insert(item.title.clone()))
        .collect()
}

fn browse_page(
    page: GamePage,
    requested: u32,
    page_size: u32,
) -> (RecommendationResult, PaginationState) {
    let items = normalize_unique(&page.games);
    let size = if page.limit > 0 { page.limit } else { page_size };
    let total_pages = if page.total_pages > 0 {
        page.total_pages
    } else {
        u32::try_from(page.total.div_ceil(u64::from(size.max(1)))).unwrap_or(u32::MAX)
    };
    let current = if page.page > 0 { page.page } else { requested };
    (
        RecommendationResult::Browse { items },
        PaginationState::paged(current, total_pages, page.total, size),
    )
}

fn search_results(results: SearchResults, limit: u32) -> (RecommendationResult, PaginationState) {
    let items = normalize_unique(&results.games);
    let total = results.count.max(items.len() as u64);
    (
        RecommendationResult::Browse { items },
        PaginationState::single(total, limit),
    )
}

fn content_result(
    buckets: ContentBuckets,
    limit: u32,
) -> (RecommendationResult, PaginationState) {
    let result = RecommendationResult::Content(SimilarityBuckets {
        highly_similar: normalize_all(&buckets.highly_similar),
        moderately_similar: normalize_all(&buckets.moderately_similar),
        somewhat_similar: normalize_all(&buckets.somewhat_similar),
    });
    let total = result.len() as u64;
    (result, PaginationState::single(total, limit))
}

fn constraint_result(
    buckets: ConstraintBuckets,
    limit: u32,
) -> (RecommendationResult, PaginationState) {
    let result = RecommendationResult::Constraint(ConstraintMatches {
        perfect_matches: normalize_all(&buckets.perfect_matches),
        good_matches: normalize_all(&buckets.good_matches),
        partial_matches: normalize_all(&buckets.partial_matches),
    });
    let total = result.len() as u64;
    (result, PaginationState::single(total, limit))
}

fn hybrid_result(results: HybridResults, limit: u32) -> (RecommendationResult, PaginationState) {
    let items = normalize_unique(&results.recommendations);
    let total = items.len() as u64;
    (
        RecommendationResult::Hybrid { items },
        PaginationState::single(total, limit),
    )
}

fn stats_result(stats: CatalogStats, page_size: u32) -> (RecommendationResult, PaginationState) {
    (
        RecommendationResult::Stats(stats),
        PaginationState::single(0, page_size),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_browse_page_uses_service_pagination() {
        let page = GamePage {
            page: 3,
            limit: 20,
            total: 95,
            total_pages: 5,
            games: vec![json!({"title": "A"}), json!({"title": "B"})],
        };
        let (result, pagination) = browse_page(page, 3, 20);
        assert_eq!(result.len(), 2);
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.total_pages, 5);
        assert_eq!(pagination.total_items, 95);
    }

    #[test]
    fn test_browse_page_derives_missing_totals() {
        let page = GamePage {
            total: 41,
            games: vec![json!({"title": "A"})],
            ..Default::default()
        };
        let (_, pagination) = browse_page(page, 2, 20);
        assert_eq!(pagination.total_pages, 3);
        assert_eq!(pagination.current_page, 2);
    }

    #[test]
    fn test_browse_page_saturates_huge_totals() {
        let page = GamePage {
            page: u32::MAX,
            total: u64::MAX,
            ..Default::default()
        };
        let (_, pagination) = browse_page(page, 1, 1);
        assert_eq!(pagination.total_pages, u32::MAX);
        assert_eq!(pagination.current_page, u32::MAX);
        assert_eq!(pagination.window().pages.len(), 5);
    }

    #[test]
    fn test_duplicate_titles_collapse() {
        let items = normalize_unique(&[
            json!({"title": "Portal", "price": 9.99}),
            json!({"title": "Portal", "price": 1.0}),
            json!({"title": "Braid"}),
        ]);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].current_price, 9.99);
    }

    #[test]
    fn test_content_buckets_normalized() {
        let buckets = ContentBuckets {
            highly_similar: vec![json!({"title": "A", "similarity": 0.9})],
            moderately_similar: vec![],
            somewhat_similar: vec![json!({"name": "B", "score": 0.4})],
        };
        let (result, pagination) = content_result(buckets, 10);
        match result {
            RecommendationResult::Content(b) => {
                assert_eq!(b.highly_similar[0].match_score, 0.9);
                assert_eq!(b.somewhat_similar[0].match_score, 0.4);
            }
            other => panic!("unexpected result {:?}", other.mode()),
        }
        assert!(!pagination.has_navigation());
        assert_eq!(pagination.total_items, 2);
    }
}
