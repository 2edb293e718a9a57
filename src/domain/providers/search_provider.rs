//! Search provider contract.

use async_trait::async_trait;

/// One search request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub count: usize,
    pub country: String,
    pub lang: String,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>, count: usize, country: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            count,
            country: country.into(),
            lang: "en".to_string(),
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }
}

/// Failures of a search backend.
///
/// Only [`SearchError::MissingCredential`] ever leaves a provider, and only
/// from its constructor. Everything else is logged and degrades to an empty
/// result list.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("{provider} API key is not configured")]
    MissingCredential { provider: &'static str },

    #[error("search provider rejected the credentials (HTTP {0})")]
    Unauthorized(u16),

    #[error("search provider rate limit reached")]
    RateLimited,

    #[error("search provider returned HTTP {0}")]
    Status(u16),

    #[error("search request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("malformed search response: {0}")]
    MalformedResponse(String),
}

impl SearchError {
    /// Classifies a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized(status),
            429 => Self::RateLimited,
            _ => Self::Status(status),
        }
    }
}

/// A search index returning candidate URLs.
///
/// # Implementations
///
/// - [`crate::infrastructure::search::SerperSearch`] - serper.dev
/// - [`crate::infrastructure::search::SerpApiSearch`] - serpapi.com
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns organic result links in ranking order.
    ///
    /// Duplicates are kept. Any backend failure yields an empty list.
    async fn search(&self, query: &SearchQuery) -> Vec<String>;

    /// Short backend name for logs and health output.
    fn name(&self) -> &'static str;
}
