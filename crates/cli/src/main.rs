mod args;
mod output;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use serde_json::json;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gamefinder_core::preferences::{PriceBound, SystemSpecSetting};
use gamefinder_core::{
    load_config_or_default, metrics, normalize, validate_config, AssetResolver, CanonicalItem,
    FetchOutcome, HttpRecommendationClient, Mode, ModeController, PreferenceStore,
    RecommendationService, SortCriterion, SqliteLikedStorage, TypeFilter,
};

use args::{Cli, Command, ConstraintArgs};
use output::ResultReport;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let print_metrics = cli.metrics;

    if let Err(e) = run(cli).await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }

    if print_metrics {
        print!("{}", metrics::render());
    }
}

fn init_logging(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so stdout stays machine-readable.
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.json_logs);

    // Load configuration
    info!("Loading configuration from {:?}", cli.config);
    let mut config = load_config_or_default(&cli.config)
        .with_context(|| format!("Failed to load config from {:?}", cli.config))?;
    if let Some(url) = cli.service_url {
        config.service.base_url = url;
    }

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;
    info!("Service: {}", config.service.base_url);
    info!("Storage path: {:?}", config.storage.path);

    let service: Arc<dyn RecommendationService> = Arc::new(
        HttpRecommendationClient::new(&config.service)
            .context("Failed to create service client")?,
    );

    let storage = SqliteLikedStorage::new(&config.storage.path)
        .context("Failed to open liked-item storage")?;
    let store = PreferenceStore::open(Arc::new(storage), config.storage.liked_key.clone());

    let controller = ModeController::new(config.limits.clone(), service, store);
    let resolver = AssetResolver::new(config.assets.clone());

    let output = execute(&controller, &resolver, cli.command).await?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

async fn execute(
    controller: &ModeController,
    resolver: &AssetResolver,
    command: Command,
) -> Result<serde_json::Value> {
    let outcome = match command {
        Command::Health => {
            let health = controller
                .health()
                .await
                .context("Service health check failed")?;
            return Ok(serde_json::to_value(health)?);
        }
        Command::Lookup { kind } => {
            let value = match kind.kind() {
                Some(kind) => {
                    let mut map = serde_json::Map::new();
                    map.insert(kind.as_str().to_string(), json!(controller.lookup(kind).await));
                    serde_json::Value::Object(map)
                }
                None => serde_json::to_value(controller.lookups().await)?,
            };
            return Ok(value);
        }
        Command::Browse {
            page,
            sort,
            type_filter,
            query,
        } => browse(controller, page, sort.into(), type_filter.into(), query).await,
        Command::Liked => controller.select_mode(Mode::Liked).await,
        Command::Like { title } => {
            let item = find_item(controller, &title).await;
            controller.like(item).await;
            controller.select_mode(Mode::Liked).await
        }
        Command::Unlike { title } => {
            if !controller.unlike(&title).await {
                info!("{} was not liked", title);
            }
            controller.select_mode(Mode::Liked).await
        }
        Command::Recommend {
            strategy,
            method,
            constraints,
        } => {
            controller.set_similarity_method(method.into()).await;
            apply_constraints(controller, &constraints).await;
            controller.select_mode(strategy.into()).await
        }
        Command::Stats => controller.select_mode(Mode::Stats).await,
    };

    report(controller, resolver, &outcome).await
}

async fn browse(
    controller: &ModeController,
    page: u32,
    sort: SortCriterion,
    type_filter: TypeFilter,
    query: Option<String>,
) -> FetchOutcome {
    let mut outcome = controller.set_type_filter(type_filter).await;
    if let Some(query) = query {
        return controller.set_query(&query).await;
    }
    if sort != SortCriterion::default() {
        outcome = controller.set_sort(sort).await;
    }
    if page > 1 && outcome.is_applied() {
        outcome = controller.goto_page(page).await;
    }
    outcome
}

/// The catalog entry for `title`: an exact search hit, or a bare item when
/// the service has none.
async fn find_item(controller: &ModeController, title: &str) -> CanonicalItem {
    controller.set_query(title).await;
    let result = controller.result().await;
    result
        .items()
        .into_iter()
        .find(|item| item.title.eq_ignore_ascii_case(title))
        .cloned()
        .unwrap_or_else(|| normalize(&json!({ "title": title })))
}

async fn apply_constraints(controller: &ModeController, args: &ConstraintArgs) {
    controller
        .update_preferences(|prefs| {
            for tag in &args.tags {
                prefs.add_tag(tag);
            }
            for category in &args.categories {
                prefs.add_category(category);
            }
            for language in &args.languages {
                prefs.add_language(language);
            }
            for developer in &args.developers {
                prefs.add_developer(developer);
            }
            for publisher in &args.publishers {
                prefs.add_publisher(publisher);
            }
            if let Some(max) = args.max_price {
                prefs.set_price_bound(PriceBound::Max, max);
            }
            if let Some(min) = args.min_price {
                prefs.set_price_bound(PriceBound::Min, min);
            }
            if let Some(value) = args.min_sentiment {
                prefs.set_min_sentiment(value);
            }
            if let Some(value) = args.min_reviews {
                prefs.set_min_reviews(value);
            }
            if let Some(value) = args.min_popularity {
                prefs.set_min_popularity(value);
            }
            prefs.set_system_spec(SystemSpecSetting::MemoryGb(args.memory_gb));
            prefs.set_system_spec(SystemSpecSetting::StorageGb(args.storage_gb));
            prefs.set_system_spec(SystemSpecSetting::OsType(args.os.clone()));
            prefs.set_system_spec(SystemSpecSetting::SsdRequired(args.ssd.then_some(true)));
        })
        .await;
}

async fn report(
    controller: &ModeController,
    resolver: &AssetResolver,
    outcome: &FetchOutcome,
) -> Result<serde_json::Value> {
    let snapshot = controller.snapshot().await;
    let store = controller.preferences().await;
    let report = ResultReport::new(
        snapshot.mode,
        outcome,
        snapshot.notice,
        &snapshot.result,
        snapshot.pagination,
        resolver,
        store.liked(),
    );
    Ok(serde_json::to_value(report)?)
}
