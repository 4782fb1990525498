//! Proxy configuration

use gasdopovo_classifier::MarkerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cli::{Cli, Commands};

/// Proxy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body, in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Upstream lookup endpoint
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Page markers used by the classifier
    #[serde(default)]
    pub markers: MarkerConfig,
}

impl ProxyConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        // Try to load from file, or use defaults
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            serde_yaml::from_str(&content)?
        } else {
            Self::default()
        };

        // Apply CLI overrides
        if let Some(upstream) = &cli.upstream {
            config.upstream.url = upstream.clone();
        }

        if let Some(Commands::Serve { listen, port }) = &cli.command {
            if let Some(listen) = listen {
                config.listen = listen.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }

        Ok(config)
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
            upstream: UpstreamConfig::default(),
            markers: MarkerConfig::default(),
        }
    }
}

/// Upstream lookup endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Form POST target
    pub url: String,

    /// User-Agent sent upstream
    pub user_agent: String,

    /// Referer header
    pub referer: Option<String>,

    /// Origin header
    pub origin: Option<String>,

    /// Whole-request timeout in seconds
    pub timeout_secs: u64,

    /// Permit plain HTTP (local testing only)
    pub allow_http: bool,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: "https://gasdopovo.mds.gov.br/consultar".to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            referer: Some("https://gasdopovo.mds.gov.br/".to_string()),
            origin: Some("https://gasdopovo.mds.gov.br".to_string()),
            timeout_secs: 30,
            allow_http: false,
        }
    }
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_body_bytes() -> usize {
    16 * 1024
}
