//! Mode controller: the retrieval state machine.
//!
//! Modes are browse, liked, content, constraint, hybrid and stats. Any mode
//! can be selected from any other, except that content and hybrid are
//! refused while the liked set is empty. Each mode keeps its own request
//! sequence so a slow, superseded response never overwrites a newer one.

mod config;
mod runner;
mod sequence;
mod types;

pub use config::{
    ControllerConfig, MAX_PAGE_SIZE, MAX_RECOMMENDATION_LIMIT, MAX_SEARCH_LIMIT,
};
pub use runner::ModeController;
pub use sequence::RequestTracker;
pub use types::{
    ConstraintMatches, ControllerSnapshot, FetchOutcome, Lookups, Mode, Notice, NoticeKind,
    RecommendationResult, SimilarityBuckets,
};
