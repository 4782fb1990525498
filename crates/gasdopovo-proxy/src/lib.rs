//! Gás do Povo Proxy
//!
//! Thin shell around the classifier: accepts a CPF over HTTP or the command
//! line, posts it to the upstream lookup page, and returns the classified
//! outcome as JSON.

pub mod cli;
pub mod config;
pub mod proxy;
pub mod routes;
pub mod upstream;

pub use cli::{Cli, Commands};
pub use config::{ProxyConfig, UpstreamConfig};
pub use proxy::AppState;
pub use routes::create_router;
pub use upstream::{HttpUpstream, Upstream};
