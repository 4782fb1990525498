//! Marker configuration for the classifier
//!
//! Selectors, marker phrases and canonical messages all default to what the
//! Gás do Povo lookup page uses. When the upstream markup shifts they can be
//! overridden from YAML without a rebuild.

use gasdopovo_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything the classifier looks for in a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarkerConfig {
    /// CSS selectors
    #[serde(default)]
    pub selectors: SelectorSpec,

    /// Phrases searched for in the danger banner
    #[serde(default)]
    pub phrases: PhraseSpec,

    /// Fixed messages returned instead of scraped text
    #[serde(default)]
    pub messages: MessageSpec,
}

impl MarkerConfig {
    /// Parse from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("failed to parse marker config: {}", e)))
    }

    /// Load from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}

/// CSS selectors for the page elements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorSpec {
    /// Error banner
    pub danger: String,

    /// Confirmation banner
    pub success: String,

    /// One benefit entry
    pub card: String,

    /// Heading within a card
    pub card_title: String,

    /// Expiry badge within a card
    pub expired_badge: String,

    /// Provenance note within a card
    pub origin: String,

    /// Label/value pair container
    pub data_item: String,

    /// Label within a data item
    pub data_label: String,

    /// Value within a data item
    pub data_value: String,
}

impl Default for SelectorSpec {
    fn default() -> Self {
        Self {
            danger: ".br-message.danger".to_string(),
            success: ".br-message.success".to_string(),
            card: ".beneficio-card".to_string(),
            card_title: ".beneficio-header h3".to_string(),
            expired_badge: ".badge-expirado".to_string(),
            origin: ".beneficio-origem".to_string(),
            data_item: ".dado-item".to_string(),
            data_label: ".dado-label".to_string(),
            data_value: ".dado-valor".to_string(),
        }
    }
}

/// Marker phrases, matched case-sensitively as substrings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhraseSpec {
    pub not_found: String,
    pub invalid: String,
}

impl Default for PhraseSpec {
    fn default() -> Self {
        Self {
            not_found: "CPF não encontrado".to_string(),
            invalid: "inválido".to_string(),
        }
    }
}

/// Canonical user-facing messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSpec {
    pub not_found: String,
    pub invalid: String,
    pub unknown: String,
}

impl Default for MessageSpec {
    fn default() -> Self {
        Self {
            not_found: "CPF não encontrado na base de dados do Gás do Povo.".to_string(),
            invalid: "CPF inválido.".to_string(),
            unknown: "Não foi possível interpretar a resposta do servidor.".to_string(),
        }
    }
}
