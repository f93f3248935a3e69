//! Controller state types.

use std::fmt;

use serde::Serialize;

use crate::item::CanonicalItem;
use crate::paging::{BrowseState, PageWindow, PaginationState};
use crate::remote::{CatalogStats, SimilarityMethod};

/// Retrieval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Browse,
    Liked,
    Content,
    Constraint,
    Hybrid,
    Stats,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::Browse,
        Mode::Liked,
        Mode::Content,
        Mode::Constraint,
        Mode::Hybrid,
        Mode::Stats,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Browse => "browse",
            Mode::Liked => "liked",
            Mode::Content => "content",
            Mode::Constraint => "constraint",
            Mode::Hybrid => "hybrid",
            Mode::Stats => "stats",
        }
    }

    /// Modes that cannot be entered with an empty liked set.
    pub fn requires_likes(&self) -> bool {
        matches!(self, Mode::Content | Mode::Hybrid)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-based recommendation buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimilarityBuckets {
    pub highly_similar: Vec<CanonicalItem>,
    pub moderately_similar: Vec<CanonicalItem>,
    pub somewhat_similar: Vec<CanonicalItem>,
}

/// Constraint-based recommendation buckets.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstraintMatches {
    pub perfect_matches: Vec<CanonicalItem>,
    pub good_matches: Vec<CanonicalItem>,
    pub partial_matches: Vec<CanonicalItem>,
}

/// The published result set, tagged by the mode that produced it.
///
/// Replaced wholesale on every applied fetch.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecommendationResult {
    Browse { items: Vec<CanonicalItem> },
    Liked { items: Vec<CanonicalItem> },
    Content(SimilarityBuckets),
    Constraint(ConstraintMatches),
    Hybrid { items: Vec<CanonicalItem> },
    Stats(CatalogStats),
}

impl Default for RecommendationResult {
    fn default() -> Self {
        RecommendationResult::Browse { items: Vec::new() }
    }
}

impl RecommendationResult {
    pub fn mode(&self) -> Mode {
        match self {
            RecommendationResult::Browse { .. } => Mode::Browse,
            RecommendationResult::Liked { .. } => Mode::Liked,
            RecommendationResult::Content(_) => Mode::Content,
            RecommendationResult::Constraint(_) => Mode::Constraint,
            RecommendationResult::Hybrid { .. } => Mode::Hybrid,
            RecommendationResult::Stats(_) => Mode::Stats,
        }
    }

    /// All items in display order, buckets concatenated.
    pub fn items(&self) -> Vec<&CanonicalItem> {
        match self {
            RecommendationResult::Browse { items }
            | RecommendationResult::Liked { items }
            | RecommendationResult::Hybrid { items } => items.iter().collect(),
            RecommendationResult::Content(b) => b
                .highly_similar
                .iter()
                .chain(&b.moderately_similar)
                .chain(&b.somewhat_similar)
                .collect(),
            RecommendationResult::Constraint(m) => m
                .perfect_matches
                .iter()
                .chain(&m.good_matches)
                .chain(&m.partial_matches)
                .collect(),
            RecommendationResult::Stats(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// Remote call failed; previous results kept.
    Error,
    /// Action refused locally before any remote call.
    Precondition,
    /// Something degraded but the action went through.
    Warning,
}

/// User-facing message raised by the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub mode: Mode,
    pub message: String,
}

impl Notice {
    pub fn error(mode: Mode, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            mode,
            message: message.into(),
        }
    }

    pub fn precondition(mode: Mode, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Precondition,
            mode,
            message: message.into(),
        }
    }

    pub fn warning(mode: Mode, message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            mode,
            message: message.into(),
        }
    }
}

/// What happened to one user action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// New results published.
    Applied,
    /// Nothing to do (e.g. page out of range).
    Ignored,
    /// Response arrived after a newer request and was dropped.
    Discarded,
    /// Refused before any remote call.
    Refused(Notice),
    /// Remote call failed; previous results kept.
    Failed(Notice),
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            FetchOutcome::Refused(n) | FetchOutcome::Failed(n) => Some(n),
            _ => None,
        }
    }
}

/// Distinct attribute values for selection lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Lookups {
    pub tags: Vec<String>,
    pub languages: Vec<String>,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub categories: Vec<String>,
}

/// Read-only view of everything the presentation layer renders.
#[derive(Debug, Clone, Serialize)]
pub struct ControllerSnapshot {
    /// Mode of `result`.
    pub mode: Mode,
    /// Most recently requested mode.
    pub selected: Mode,
    pub result: RecommendationResult,
    pub pagination: PaginationState,
    pub page_window: PageWindow,
    pub browse: BrowseState,
    pub similarity_method: SimilarityMethod,
    pub notice: Option<Notice>,
    /// Modes with a request in flight.
    pub loading: Vec<Mode>,
}
