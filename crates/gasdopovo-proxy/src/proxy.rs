//! Core proxy logic

use anyhow::Result;
use gasdopovo_classifier::{Classifier, ResponseClassifier};
use gasdopovo_core::{Identifier, QueryOutcome};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::config::ProxyConfig;
use crate::upstream::{HttpUpstream, Upstream};

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ProxyConfig>,

    /// Source of result pages
    pub upstream: Arc<dyn Upstream>,

    /// Page classifier
    pub classifier: Arc<dyn Classifier>,

    /// Prometheus metrics handle for rendering, when a recorder is installed
    pub metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    /// Initialize application state from configuration
    pub fn new(config: ProxyConfig, metrics_handle: Option<PrometheusHandle>) -> Result<Self> {
        info!("Initializing application state");

        let classifier: ResponseClassifier = ResponseClassifier::new(config.markers.clone())?;
        let upstream = HttpUpstream::new(&config.upstream)?;
        info!("Upstream: {}", upstream.url());

        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            classifier: Arc::new(classifier),
            metrics_handle,
        })
    }

    /// Assemble state from parts, e.g. with a substitute upstream
    pub fn from_parts(
        config: ProxyConfig,
        upstream: Arc<dyn Upstream>,
        classifier: Arc<dyn Classifier>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            upstream,
            classifier,
            metrics_handle: None,
        }
    }
}

/// Clean the identifier, fetch the page and classify it
///
/// Input errors are returned before any network call. Transport errors are
/// returned as-is; they are never turned into an outcome.
pub async fn execute_lookup(state: &AppState, raw_identifier: &str) -> gasdopovo_core::Result<QueryOutcome> {
    let identifier = Identifier::parse(raw_identifier)?;
    debug!(identifier = %identifier, "Looking up identifier");

    let start = Instant::now();
    let html = match state.upstream.fetch(&identifier).await {
        Ok(html) => html,
        Err(e) => {
            metrics::counter!("gasdopovo_upstream_errors_total").increment(1);
            return Err(e);
        }
    };
    metrics::histogram!("gasdopovo_upstream_latency_us").record(start.elapsed().as_micros() as f64);

    let start = Instant::now();
    let outcome = state.classifier.classify(&html);
    metrics::histogram!("gasdopovo_classify_latency_us").record(start.elapsed().as_micros() as f64);
    metrics::counter!("gasdopovo_outcomes_total", "status" => outcome.status()).increment(1);

    info!(
        identifier = %identifier,
        status = outcome.status(),
        records = outcome.record_count(),
        "Lookup complete"
    );

    Ok(outcome)
}
