//! Search backends.
//!
//! - [`SerperSearch`] - serper.dev (POST JSON)
//! - [`SerpApiSearch`] - serpapi.com (GET query string)
//!
//! Exactly one backend is live per process; [`build_provider`] picks it from
//! configuration.

pub mod serpapi;
pub mod serper;

use std::sync::Arc;

pub use serpapi::SerpApiSearch;
pub use serper::SerperSearch;

use crate::config::{Config, SearchBackend};
use crate::domain::providers::{SearchError, SearchProvider};

/// Builds the configured search backend.
///
/// # Errors
///
/// [`SearchError::MissingCredential`] when the selected backend has no key.
pub fn build_provider(config: &Config) -> Result<Arc<dyn SearchProvider>, SearchError> {
    match config.search_backend {
        SearchBackend::Serper => {
            let timeout = config.search_timeout.unwrap_or(serper::SERPER_TIMEOUT);
            let mut provider = SerperSearch::new(config.serper_api_key.clone(), timeout)?;
            if let Some(endpoint) = &config.serper_endpoint {
                provider = provider.with_endpoint(endpoint);
            }
            Ok(Arc::new(provider))
        }
        SearchBackend::SerpApi => {
            let timeout = config.search_timeout.unwrap_or(serpapi::SERPAPI_TIMEOUT);
            let mut provider = SerpApiSearch::new(config.serpapi_api_key.clone(), timeout)?;
            if let Some(endpoint) = &config.serpapi_endpoint {
                provider = provider.with_endpoint(endpoint);
            }
            Ok(Arc::new(provider))
        }
    }
}

/// Keeps non-empty string links in order; anything else is skipped.
fn collect_links(links: impl Iterator<Item = Option<serde_json::Value>>) -> Vec<String> {
    links
        .filter_map(|link| match link {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s),
            _ => None,
        })
        .collect()
}
