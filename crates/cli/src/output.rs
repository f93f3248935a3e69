//! JSON views printed by the CLI.

use serde::Serialize;

use gamefinder_core::paging::{PageWindow, PaginationState};
use gamefinder_core::preferences::LikedSet;
use gamefinder_core::remote::CatalogStats;
use gamefinder_core::{
    AssetResolver, AssetUrls, CanonicalItem, FetchOutcome, Mode, Notice, PlaceholderVisual,
    RecommendationResult,
};

pub fn outcome_label(outcome: &FetchOutcome) -> &'static str {
    match outcome {
        FetchOutcome::Applied => "applied",
        FetchOutcome::Ignored => "ignored",
        FetchOutcome::Discarded => "discarded",
        FetchOutcome::Refused(_) => "refused",
        FetchOutcome::Failed(_) => "failed",
    }
}

/// One item as displayed.
#[derive(Debug, Serialize)]
pub struct ItemView {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<&'static str>,
    pub item_type: &'static str,
    pub price: f64,
    pub original_price: f64,
    pub discount_percent: u8,
    pub sentiment: &'static str,
    pub review_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explanations: Vec<String>,
    pub liked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<AssetUrls>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<PlaceholderVisual>,
}

impl ItemView {
    pub fn new(
        item: &CanonicalItem,
        bucket: Option<&'static str>,
        ranked: bool,
        resolver: &AssetResolver,
        liked: &LikedSet,
    ) -> Self {
        let assets = resolver.resolve_item(item);
        let placeholder = assets.is_none().then(|| resolver.placeholder(&item.title));
        Self {
            title: item.title.clone(),
            bucket,
            item_type: item.item_type().as_str(),
            price: item.current_price,
            original_price: item.original_price,
            discount_percent: item.discount_percent,
            sentiment: item.sentiment_category().label(),
            review_count: item.review_count,
            match_score: ranked.then_some(item.match_score),
            tags: item.distinct_tags().into_iter().map(str::to_string).collect(),
            explanations: item.explanations.clone(),
            liked: liked.contains(&item.title),
            assets,
            placeholder,
        }
    }
}

/// Views for every item of a result, bucket names attached.
pub fn item_views(
    result: &RecommendationResult,
    resolver: &AssetResolver,
    liked: &LikedSet,
) -> Vec<ItemView> {
    let view = |items: &[CanonicalItem], bucket: Option<&'static str>, ranked: bool| {
        items
            .iter()
            .map(|item| ItemView::new(item, bucket, ranked, resolver, liked))
            .collect::<Vec<_>>()
    };

    match result {
        RecommendationResult::Browse { items } | RecommendationResult::Liked { items } => {
            view(items, None, false)
        }
        RecommendationResult::Hybrid { items } => view(items, None, true),
        RecommendationResult::Content(b) => {
            let mut views = view(&b.highly_similar, Some("highly_similar"), true);
            views.extend(view(&b.moderately_similar, Some("moderately_similar"), true));
            views.extend(view(&b.somewhat_similar, Some("somewhat_similar"), true));
            views
        }
        RecommendationResult::Constraint(m) => {
            let mut views = view(&m.perfect_matches, Some("perfect_matches"), true);
            views.extend(view(&m.good_matches, Some("good_matches"), true));
            views.extend(view(&m.partial_matches, Some("partial_matches"), true));
            views
        }
        RecommendationResult::Stats(_) => Vec::new(),
    }
}

/// Everything printed after a mode action.
#[derive(Debug, Serialize)]
pub struct ResultReport {
    pub mode: Mode,
    pub outcome: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
    pub pagination: PaginationState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_window: Option<PageWindow>,
    pub items: Vec<ItemView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<CatalogStats>,
}

impl ResultReport {
    pub fn new(
        mode: Mode,
        outcome: &FetchOutcome,
        notice: Option<Notice>,
        result: &RecommendationResult,
        pagination: PaginationState,
        resolver: &AssetResolver,
        liked: &LikedSet,
    ) -> Self {
        let stats = match result {
            RecommendationResult::Stats(stats) => Some(stats.clone()),
            _ => None,
        };
        Self {
            mode,
            outcome: outcome_label(outcome),
            notice,
            pagination,
            page_window: pagination.has_navigation().then(|| pagination.window()),
            items: item_views(result, resolver, liked),
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamefinder_core::controller::SimilarityBuckets;
    use gamefinder_core::AssetConfig;

    fn resolver() -> AssetResolver {
        AssetResolver::new(AssetConfig::default())
    }

    #[test]
    fn test_views_carry_bucket_names() {
        let mut ranked = CanonicalItem::with_title("Portal 2");
        ranked.match_score = 0.9;
        let result = RecommendationResult::Content(SimilarityBuckets {
            highly_similar: vec![ranked],
            moderately_similar: vec![],
            somewhat_similar: vec![CanonicalItem::with_title("Braid")],
        });

        let views = item_views(&result, &resolver(), &LikedSet::new());
        assert_eq!(views.len(), 2);
        assert_eq!(views[0].bucket, Some("highly_similar"));
        assert_eq!(views[0].match_score, Some(0.9));
        assert_eq!(views[1].bucket, Some("somewhat_similar"));
    }

    #[test]
    fn test_placeholder_without_link() {
        let result = RecommendationResult::Browse {
            items: vec![CanonicalItem::with_title("No Link")],
        };
        let views = item_views(&result, &resolver(), &LikedSet::new());
        assert!(views[0].assets.is_none());
        assert!(views[0].placeholder.is_some());
        assert!(views[0].match_score.is_none());
    }

    #[test]
    fn test_liked_flag() {
        let mut liked = LikedSet::new();
        liked.insert(CanonicalItem::with_title("Hades"));
        let result = RecommendationResult::Browse {
            items: vec![
                CanonicalItem::with_title("Hades"),
                CanonicalItem::with_title("Celeste"),
            ],
        };
        let views = item_views(&result, &resolver(), &liked);
        assert!(views[0].liked);
        assert!(!views[1].liked);
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(outcome_label(&FetchOutcome::Applied), "applied");
        assert_eq!(outcome_label(&FetchOutcome::Ignored), "ignored");
    }
}
