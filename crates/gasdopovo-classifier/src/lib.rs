//! Gás do Povo Classifier
//!
//! Turns the loosely structured HTML returned by the benefit lookup page into
//! a typed [`QueryOutcome`](gasdopovo_core::QueryOutcome).
//!
//! Classification is an ordered list of rules, first match wins:
//! 1. Danger banner (not found, invalid identifier, or other upstream error)
//! 2. Benefit cards
//! 3. Success banner
//! 4. Loose data items anywhere in the page
//!
//! If no rule matches, the outcome is `Unknown` and carries the raw document.
//! Classification is pure and never fails.

pub mod classifier;
pub mod config;
pub mod document;
pub mod rules;

pub use classifier::{Classification, Classifier, ResponseClassifier};
pub use config::MarkerConfig;
pub use document::{DocumentQuery, ElementQuery, ScraperDocument, ScraperElement};
pub use rules::Rule;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::classifier::{Classification, Classifier, ResponseClassifier};
    pub use crate::config::MarkerConfig;
    pub use crate::rules::Rule;
    pub use gasdopovo_core::{BenefitRecord, QueryOutcome};
}
