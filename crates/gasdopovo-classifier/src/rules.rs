//! Ordered classification rules
//!
//! Each rule either claims the document by producing an outcome or passes.
//! Rules are tried in [`Rule::ORDER`]; the first claim wins. A document no
//! rule claims is `Unknown`, which the classifier handles itself.

use crate::config::{MarkerConfig, MessageSpec, PhraseSpec};
use crate::document::{collapse_whitespace, normalize_label, DocumentQuery, ElementQuery};
use gasdopovo_core::{Attributes, BenefitRecord, QueryOutcome, Result};

/// A single classification rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// Error banner: not found, invalid identifier, or other upstream error
    DangerBanner,
    /// One record per benefit card
    BenefitCards,
    /// Confirmation banner with no cards
    SuccessBanner,
    /// Data items anywhere in the page, folded into one record
    LooseDataItems,
}

impl Rule {
    /// Evaluation order
    ///
    /// Error banners come first because error pages can carry stray card
    /// markup. Card-scoped extraction precedes the whole-page scan so page
    /// chrome is not picked up when real cards exist.
    pub const ORDER: [Rule; 4] = [
        Rule::DangerBanner,
        Rule::BenefitCards,
        Rule::SuccessBanner,
        Rule::LooseDataItems,
    ];

    /// Stable name, used in logs and metrics
    pub fn name(&self) -> &'static str {
        match self {
            Self::DangerBanner => "danger_banner",
            Self::BenefitCards => "benefit_cards",
            Self::SuccessBanner => "success_banner",
            Self::LooseDataItems => "loose_data_items",
        }
    }

    /// Apply this rule to a document root
    pub(crate) fn evaluate<E: ElementQuery>(
        self,
        root: E,
        markers: &CompiledMarkers<E::Selector>,
    ) -> Option<QueryOutcome> {
        match self {
            Self::DangerBanner => danger_banner(root, markers),
            Self::BenefitCards => benefit_cards(root, markers),
            Self::SuccessBanner => success_banner(root, markers),
            Self::LooseDataItems => loose_data_items(root, markers),
        }
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Marker configuration with selectors compiled for one document backend
pub(crate) struct CompiledMarkers<S> {
    danger: S,
    success: S,
    card: S,
    card_title: S,
    expired_badge: S,
    origin: S,
    data_item: S,
    data_label: S,
    data_value: S,
    pub(crate) phrases: PhraseSpec,
    pub(crate) messages: MessageSpec,
}

impl<S> CompiledMarkers<S> {
    pub(crate) fn compile<D>(config: &MarkerConfig) -> Result<Self>
    where
        D: DocumentQuery<Selector = S>,
    {
        let s = &config.selectors;
        Ok(Self {
            danger: D::compile(&s.danger)?,
            success: D::compile(&s.success)?,
            card: D::compile(&s.card)?,
            card_title: D::compile(&s.card_title)?,
            expired_badge: D::compile(&s.expired_badge)?,
            origin: D::compile(&s.origin)?,
            data_item: D::compile(&s.data_item)?,
            data_label: D::compile(&s.data_label)?,
            data_value: D::compile(&s.data_value)?,
            phrases: config.phrases.clone(),
            messages: config.messages.clone(),
        })
    }
}

fn contains_phrase(text: &str, phrase: &str) -> bool {
    !phrase.is_empty() && text.contains(phrase)
}

fn danger_banner<E: ElementQuery>(root: E, m: &CompiledMarkers<E::Selector>) -> Option<QueryOutcome> {
    let text = root.find_first(&m.danger)?.text();
    if text.is_empty() {
        return None;
    }

    let outcome = if contains_phrase(&text, &m.phrases.not_found) {
        QueryOutcome::NotFound {
            message: m.messages.not_found.clone(),
        }
    } else if contains_phrase(&text, &m.phrases.invalid) {
        QueryOutcome::Invalid {
            message: m.messages.invalid.clone(),
        }
    } else {
        QueryOutcome::UpstreamError {
            message: collapse_whitespace(&text),
        }
    };

    Some(outcome)
}

fn benefit_cards<E: ElementQuery>(root: E, m: &CompiledMarkers<E::Selector>) -> Option<QueryOutcome> {
    let cards = root.find_all(&m.card);
    if cards.is_empty() {
        return None;
    }

    let records = cards.into_iter().map(|card| card_record(card, m)).collect();
    Some(QueryOutcome::records(records))
}

fn success_banner<E: ElementQuery>(root: E, m: &CompiledMarkers<E::Selector>) -> Option<QueryOutcome> {
    let text = root.find_first(&m.success)?.text();
    if text.is_empty() {
        return None;
    }

    Some(QueryOutcome::confirmation(collapse_whitespace(&text)))
}

fn loose_data_items<E: ElementQuery>(root: E, m: &CompiledMarkers<E::Selector>) -> Option<QueryOutcome> {
    let attributes = data_items(root, m);
    if attributes.is_empty() {
        return None;
    }

    Some(QueryOutcome::records(vec![BenefitRecord::from_attributes(attributes)]))
}

fn card_record<E: ElementQuery>(card: E, m: &CompiledMarkers<E::Selector>) -> BenefitRecord {
    BenefitRecord {
        title: non_empty_text(card, &m.card_title),
        expired: card.exists(&m.expired_badge),
        origin: non_empty_text(card, &m.origin),
        attributes: data_items(card, m),
    }
}

/// Label/value pairs of every data item under `scope`
fn data_items<E: ElementQuery>(scope: E, m: &CompiledMarkers<E::Selector>) -> Attributes {
    let mut attributes = Attributes::new();

    for item in scope.find_all(&m.data_item) {
        let label = item.find_first(&m.data_label).map(|e| e.text());
        let value = item.find_first(&m.data_value).map(|e| e.text());

        if let (Some(label), Some(value)) = (label, value) {
            attributes.insert(normalize_label(&label), value);
        }
    }

    attributes
}

fn non_empty_text<E: ElementQuery>(scope: E, selector: &E::Selector) -> Option<String> {
    scope
        .find_first(selector)
        .map(|e| e.text())
        .filter(|text| !text.is_empty())
}
