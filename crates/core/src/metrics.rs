//! Prometheus metrics for the controller and the liked-item store.

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Registry holding every metric of this crate.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// Fetches by mode and outcome.
pub static FETCHES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("gamefinder_fetches_total", "Total mode fetches"),
        &["mode", "result"], // "applied", "failed", "refused", "discarded"
    )
    .unwrap()
});

/// Remote round-trip duration in seconds.
pub static FETCH_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "gamefinder_fetch_duration_seconds",
            "Duration of remote fetches",
        )
        .buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["mode"],
    )
    .unwrap()
});

/// Responses dropped because a newer request for the mode was issued.
pub static STALE_RESPONSES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "gamefinder_stale_responses_total",
            "Responses discarded as superseded",
        ),
        &["mode"],
    )
    .unwrap()
});

/// Failed liked-set writes.
pub static LIKED_PERSIST_FAILURES: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "gamefinder_liked_persist_failures_total",
        "Liked-set writes that failed",
    )
    .unwrap()
});

fn register_metrics(registry: &Registry) {
    let _ = registry.register(Box::new(FETCHES_TOTAL.clone()));
    let _ = registry.register(Box::new(FETCH_DURATION.clone()));
    let _ = registry.register(Box::new(STALE_RESPONSES.clone()));
    let _ = registry.register(Box::new(LIKED_PERSIST_FAILURES.clone()));
}

/// Text exposition of all registered metrics.
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&REGISTRY.gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_counters() {
        FETCHES_TOTAL.with_label_values(&["browse", "applied"]).inc();
        let text = render();
        assert!(text.contains("gamefinder_fetches_total"));
    }
}
