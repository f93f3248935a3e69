//! Command-line arguments.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use gamefinder_core::paging::{SortCriterion, TypeFilter};
use gamefinder_core::{LookupKind, Mode, SimilarityMethod};

/// Game discovery client for the recommendation service.
#[derive(Debug, Parser)]
#[command(name = "gamefinder", version, about)]
pub struct Cli {
    /// Configuration file; defaults are used when it does not exist.
    #[arg(long, short, env = "GAMEFINDER_CONFIG", default_value = "gamefinder.toml")]
    pub config: PathBuf,

    /// Override `service.base_url`.
    #[arg(long)]
    pub service_url: Option<String>,

    /// Log as JSON lines.
    #[arg(long)]
    pub json_logs: bool,

    /// Print metrics in Prometheus text format after the command.
    #[arg(long)]
    pub metrics: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that the service is up.
    Health,

    /// Browse or search the catalog.
    Browse {
        #[arg(long, default_value_t = 1)]
        page: u32,

        #[arg(long, value_enum, default_value_t = SortArg::Popularity)]
        sort: SortArg,

        #[arg(long = "type", value_enum, default_value_t = TypeArg::All)]
        type_filter: TypeArg,

        /// Free-text title search; disables pagination.
        #[arg(long, short)]
        query: Option<String>,
    },

    /// Show liked games.
    Liked,

    /// Like a game by title.
    Like { title: String },

    /// Remove a game from the liked set.
    Unlike { title: String },

    /// Get recommendations.
    Recommend {
        #[arg(value_enum)]
        strategy: StrategyArg,

        #[arg(long, value_enum, default_value_t = MethodArg::Cosine)]
        method: MethodArg,

        #[command(flatten)]
        constraints: ConstraintArgs,
    },

    /// Catalog statistics.
    Stats,

    /// Distinct attribute values.
    Lookup {
        #[arg(value_enum)]
        kind: LookupArg,
    },
}

/// Preference constraints for constraint and hybrid recommendations.
#[derive(Debug, Default, clap::Args)]
pub struct ConstraintArgs {
    #[arg(long = "tag")]
    pub tags: Vec<String>,

    #[arg(long = "category")]
    pub categories: Vec<String>,

    #[arg(long = "language")]
    pub languages: Vec<String>,

    #[arg(long = "developer")]
    pub developers: Vec<String>,

    #[arg(long = "publisher")]
    pub publishers: Vec<String>,

    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum sentiment in [0, 1].
    #[arg(long)]
    pub min_sentiment: Option<f64>,

    #[arg(long)]
    pub min_reviews: Option<u64>,

    /// Minimum popularity in [0, 1].
    #[arg(long)]
    pub min_popularity: Option<f64>,

    #[arg(long)]
    pub memory_gb: Option<f64>,

    #[arg(long)]
    pub storage_gb: Option<f64>,

    #[arg(long)]
    pub os: Option<String>,

    #[arg(long)]
    pub ssd: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Alphabetical,
    PriceLow,
    PriceHigh,
    Rating,
    Popularity,
}

impl From<SortArg> for SortCriterion {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Alphabetical => SortCriterion::Alphabetical,
            SortArg::PriceLow => SortCriterion::PriceLow,
            SortArg::PriceHigh => SortCriterion::PriceHigh,
            SortArg::Rating => SortCriterion::Rating,
            SortArg::Popularity => SortCriterion::Popularity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TypeArg {
    All,
    Free,
    Discount,
    Paid,
}

impl From<TypeArg> for TypeFilter {
    fn from(arg: TypeArg) -> Self {
        match arg {
            TypeArg::All => TypeFilter::All,
            TypeArg::Free => TypeFilter::Free,
            TypeArg::Discount => TypeFilter::Discount,
            TypeArg::Paid => TypeFilter::Paid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    Content,
    Constraint,
    Hybrid,
}

impl From<StrategyArg> for Mode {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Content => Mode::Content,
            StrategyArg::Constraint => Mode::Constraint,
            StrategyArg::Hybrid => Mode::Hybrid,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MethodArg {
    Cosine,
    Pearson,
    Euclidean,
    Jaccard,
}

impl From<MethodArg> for SimilarityMethod {
    fn from(arg: MethodArg) -> Self {
        match arg {
            MethodArg::Cosine => SimilarityMethod::Cosine,
            MethodArg::Pearson => SimilarityMethod::Pearson,
            MethodArg::Euclidean => SimilarityMethod::Euclidean,
            MethodArg::Jaccard => SimilarityMethod::Jaccard,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LookupArg {
    All,
    Tags,
    Languages,
    Developers,
    Publishers,
    Categories,
}

impl LookupArg {
    /// `None` for [`LookupArg::All`].
    pub fn kind(self) -> Option<LookupKind> {
        match self {
            LookupArg::All => None,
            LookupArg::Tags => Some(LookupKind::Tags),
            LookupArg::Languages => Some(LookupKind::Languages),
            LookupArg::Developers => Some(LookupKind::Developers),
            LookupArg::Publishers => Some(LookupKind::Publishers),
            LookupArg::Categories => Some(LookupKind::Categories),
        }
    }
}
