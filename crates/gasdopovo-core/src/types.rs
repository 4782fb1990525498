//! Core types for benefit lookups

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Interpretation of one upstream response
///
/// Exactly one variant is produced per classified document. Serialized as a
/// JSON object whose `status` field names the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The identifier has no record upstream
    NotFound { message: String },

    /// The upstream rejected the identifier as malformed
    Invalid { message: String },

    /// Any other error banner, with the upstream wording
    #[serde(rename = "error")]
    UpstreamError { message: String },

    /// One or more records, or a bare confirmation message
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,

        #[serde(rename = "beneficios", default)]
        records: Vec<BenefitRecord>,
    },

    /// Nothing recognisable; the raw document is kept for diagnosis
    Unknown {
        message: String,

        #[serde(rename = "html")]
        raw_html: String,
    },
}

impl QueryOutcome {
    /// Create a success outcome carrying records
    pub fn records(records: Vec<BenefitRecord>) -> Self {
        Self::Success {
            message: None,
            records,
        }
    }

    /// Create a success outcome carrying only a message
    pub fn confirmation(message: impl Into<String>) -> Self {
        Self::Success {
            message: Some(message.into()),
            records: Vec::new(),
        }
    }

    /// The `status` discriminant as serialized
    pub fn status(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "not_found",
            Self::Invalid { .. } => "invalid",
            Self::UpstreamError { .. } => "error",
            Self::Success { .. } => "success",
            Self::Unknown { .. } => "unknown",
        }
    }

    /// Whether this is a `Success` outcome
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of extracted records (zero for every non-success variant)
    pub fn record_count(&self) -> usize {
        match self {
            Self::Success { records, .. } => records.len(),
            _ => 0,
        }
    }

    /// Human-readable message, if the variant carries one
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::NotFound { message }
            | Self::Invalid { message }
            | Self::UpstreamError { message }
            | Self::Unknown { message, .. } => Some(message),
            Self::Success { message, .. } => message.as_deref(),
        }
    }
}

/// A single benefit entry extracted from the page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitRecord {
    /// Card heading; absent in whole-document fallback mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// An expiry badge was present on the card
    #[serde(rename = "isExpired", default)]
    pub expired: bool,

    /// Free-text provenance note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,

    /// Labelled data items, in document order
    #[serde(rename = "details", default)]
    pub attributes: Attributes,
}

impl BenefitRecord {
    /// Create a record holding only attributes
    pub fn from_attributes(attributes: Attributes) -> Self {
        Self {
            attributes,
            ..Default::default()
        }
    }
}

/// Ordered label → value mapping
///
/// Empty labels and values are never stored. A repeated label replaces the
/// earlier value and keeps the position where the label was first seen.
/// Equality compares pairs in order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(IndexMap<String, String>);

impl PartialEq for Attributes {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().eq(other.0.iter())
    }
}

impl Eq for Attributes {}

impl Attributes {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a pair after trimming both sides
    ///
    /// Returns `false` (and stores nothing) when either side is empty.
    pub fn insert(&mut self, label: impl AsRef<str>, value: impl AsRef<str>) -> bool {
        let label = label.as_ref().trim();
        let value = value.as_ref().trim();

        if label.is_empty() || value.is_empty() {
            return false;
        }

        self.0.insert(label.to_string(), value.to_string());
        true
    }

    /// Look up a value by label
    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).map(String::as_str)
    }

    /// Number of stored pairs
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no pairs are stored
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Labels in insertion order
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Self::new();
        for (label, value) in iter {
            attributes.insert(label, value);
        }
        attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attributes_drop_empty_sides() {
        let mut attrs = Attributes::new();
        assert!(attrs.insert("Status", "Ativo"));
        assert!(!attrs.insert("", "orphan value"));
        assert!(!attrs.insert("Orphan label", "   "));
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.get("Status"), Some("Ativo"));
    }

    #[test]
    fn test_attributes_last_write_wins_keeps_position() {
        let attrs: Attributes = vec![("A", "1"), ("B", "2"), ("A", "3")].into_iter().collect();
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get("A"), Some("3"));
        assert_eq!(attrs.labels().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_attributes_equality_is_ordered() {
        let ab: Attributes = vec![("A", "1"), ("B", "2")].into_iter().collect();
        let ba: Attributes = vec![("B", "2"), ("A", "1")].into_iter().collect();
        assert_ne!(ab, ba);
        assert_eq!(ab, vec![("A", "1"), ("B", "2")].into_iter().collect::<Attributes>());

        let record_ab = BenefitRecord::from_attributes(ab);
        let record_ba = BenefitRecord::from_attributes(ba);
        assert_ne!(record_ab, record_ba);
    }

    #[test]
    fn test_not_found_serialization() {
        let outcome = QueryOutcome::NotFound {
            message: "CPF não encontrado".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({ "status": "not_found", "message": "CPF não encontrado" }));
    }

    #[test]
    fn test_upstream_error_uses_error_status() {
        let outcome = QueryOutcome::UpstreamError {
            message: "Serviço indisponível".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["status"], "error");
        assert_eq!(outcome.status(), "error");
    }

    #[test]
    fn test_success_serialization_shape() {
        let mut attributes = Attributes::new();
        attributes.insert("Situação", "Ativo");
        attributes.insert("Valor", "R$ 100,00");

        let outcome = QueryOutcome::records(vec![BenefitRecord {
            title: Some("Auxílio Gás".to_string()),
            expired: true,
            origin: None,
            attributes,
        }]);

        let text = serde_json::to_string(&outcome).unwrap();
        assert_eq!(
            text,
            r#"{"status":"success","beneficios":[{"title":"Auxílio Gás","isExpired":true,"details":{"Situação":"Ativo","Valor":"R$ 100,00"}}]}"#
        );
    }

    #[test]
    fn test_confirmation_has_message_and_no_records() {
        let outcome = QueryOutcome::confirmation("Tudo certo");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value, json!({ "status": "success", "message": "Tudo certo", "beneficios": [] }));
        assert_eq!(outcome.record_count(), 0);
        assert!(outcome.is_success());
    }

    #[test]
    fn test_unknown_carries_html() {
        let outcome = QueryOutcome::Unknown {
            message: "sem interpretação".to_string(),
            raw_html: "<p>x</p>".to_string(),
        };
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["html"], "<p>x</p>");
        assert_eq!(outcome.message(), Some("sem interpretação"));
    }

    #[test]
    fn test_deserialize_round_trip() {
        let text = r#"{"status":"success","beneficios":[{"details":{"Status":"Ativo"}}]}"#;
        let outcome: QueryOutcome = serde_json::from_str(text).unwrap();
        match outcome {
            QueryOutcome::Success { message, records } => {
                assert!(message.is_none());
                assert_eq!(records.len(), 1);
                assert!(records[0].title.is_none());
                assert!(!records[0].expired);
                assert_eq!(records[0].attributes.get("Status"), Some("Ativo"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
}
