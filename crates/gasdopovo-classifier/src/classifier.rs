//! Response classifier

use crate::config::MarkerConfig;
use crate::document::{DocumentQuery, ScraperDocument};
use crate::rules::{CompiledMarkers, Rule};
use gasdopovo_core::{QueryOutcome, Result};
use std::marker::PhantomData;
use std::time::Instant;
use tracing::{debug, warn};

/// Trait for anything that can interpret an upstream page
///
/// Implementations must be pure: the same input always yields the same
/// outcome, and no input makes them fail.
pub trait Classifier: Send + Sync {
    /// Classify raw HTML
    fn classify(&self, html: &str) -> QueryOutcome;

    /// Get the classifier name
    fn name(&self) -> &str;
}

/// Result of a classification with diagnostics
#[derive(Debug, Clone)]
pub struct Classification {
    /// The interpreted outcome
    pub outcome: QueryOutcome,

    /// Rule that claimed the document, `None` when it fell through to `Unknown`
    pub rule: Option<Rule>,

    /// Latency in microseconds
    pub latency_us: u64,
}

/// Rule-based classifier for benefit lookup pages
///
/// Holds only compiled selectors and fixed strings, so one instance can be
/// shared freely across threads.
pub struct ResponseClassifier<D: DocumentQuery = ScraperDocument> {
    name: String,
    markers: CompiledMarkers<D::Selector>,
    _document: PhantomData<fn() -> D>,
}

impl<D: DocumentQuery> ResponseClassifier<D> {
    /// Create a classifier, compiling every selector up front
    pub fn new(config: MarkerConfig) -> Result<Self> {
        Ok(Self {
            name: "response_classifier".to_string(),
            markers: CompiledMarkers::compile::<D>(&config)?,
            _document: PhantomData,
        })
    }

    /// Override the classifier name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Classify raw HTML
    pub fn classify(&self, html: &str) -> QueryOutcome {
        self.classify_detailed(html).outcome
    }

    /// Classify raw HTML, reporting which rule matched and how long it took
    pub fn classify_detailed(&self, html: &str) -> Classification {
        let start = Instant::now();

        let document = D::parse(html);
        let root = document.root();

        let matched = Rule::ORDER
            .iter()
            .find_map(|rule| rule.evaluate(root, &self.markers).map(|outcome| (*rule, outcome)));

        let (rule, outcome) = match matched {
            Some((rule, outcome)) => (Some(rule), outcome),
            None => {
                warn!(bytes = html.len(), "Response matched no classification rule");
                (None, self.unknown(html))
            }
        };

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(
            rule = rule.map_or("none", |r| r.name()),
            status = outcome.status(),
            records = outcome.record_count(),
            latency_us,
            "Classified response"
        );

        Classification {
            outcome,
            rule,
            latency_us,
        }
    }

    /// Evaluate a single rule in isolation
    pub fn apply_rule(&self, rule: Rule, html: &str) -> Option<QueryOutcome> {
        let document = D::parse(html);
        rule.evaluate(document.root(), &self.markers)
    }

    fn unknown(&self, html: &str) -> QueryOutcome {
        QueryOutcome::Unknown {
            message: self.markers.messages.unknown.clone(),
            raw_html: html.to_string(),
        }
    }
}

impl Default for ResponseClassifier<ScraperDocument> {
    fn default() -> Self {
        Self::new(MarkerConfig::default()).expect("Default markers must compile")
    }
}

impl<D> Classifier for ResponseClassifier<D>
where
    D: DocumentQuery,
    D::Selector: Send + Sync,
{
    fn classify(&self, html: &str) -> QueryOutcome {
        self.classify_detailed(html).outcome
    }

    fn name(&self) -> &str {
        &self.name
    }
}
