//! Upstream lookup client
//!
//! One form POST per query, no retries. Anything other than a 2xx answer with
//! a readable body is a transport error; the classifier never sees it.

use async_trait::async_trait;
use gasdopovo_core::{Error, Identifier, Result};
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::UpstreamConfig;

/// Source of raw result pages
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Submit the identifier and return the response body
    async fn fetch(&self, identifier: &Identifier) -> Result<String>;
}

/// Upstream reached over HTTP(S)
pub struct HttpUpstream {
    client: reqwest::Client,
    url: Url,
}

impl HttpUpstream {
    /// Build a client from configuration
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let url = validate_upstream_url(&config.url, config.allow_http)?;

        let mut headers = HeaderMap::new();
        if let Some(referer) = &config.referer {
            headers.insert(REFERER, header_value(referer)?);
        }
        if let Some(origin) = &config.origin {
            headers.insert(ORIGIN, header_value(origin)?);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, url })
    }

    /// The endpoint queries are posted to
    pub fn url(&self) -> &Url {
        &self.url
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn fetch(&self, identifier: &Identifier) -> Result<String> {
        debug!(identifier = %identifier, url = %self.url, "Posting lookup upstream");

        let response = self
            .client
            .post(self.url.clone())
            .form(&[("cpf", identifier.as_str())])
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Upstream returned failure status");
            return Err(Error::upstream(format!("HTTP {}", status)));
        }

        response.text().await.map_err(transport_error)
    }
}

fn transport_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        warn!("Upstream request timed out");
        Error::Timeout
    } else {
        warn!(error = %err, "Upstream request failed");
        Error::upstream(err.to_string())
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::from_str(value)
        .map_err(|e| Error::config(format!("invalid header value '{}': {}", value, e)))
}

/// Check the configured upstream URL
///
/// Only HTTPS is accepted unless `allow_http` is set, and a host is required.
pub fn validate_upstream_url(url_str: &str, allow_http: bool) -> Result<Url> {
    let url = Url::parse(url_str)
        .map_err(|e| Error::config(format!("invalid upstream URL '{}': {}", url_str, e)))?;

    match url.scheme() {
        "https" => {}
        "http" if allow_http => {}
        scheme => {
            return Err(Error::config(format!(
                "upstream URL scheme '{}' is not allowed, only HTTPS is permitted",
                scheme
            )))
        }
    }

    if url.host_str().is_none() {
        return Err(Error::config("upstream URL must have a host"));
    }

    Ok(url)
}
