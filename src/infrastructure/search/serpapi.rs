//! serpapi.com search backend.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::providers::{SearchError, SearchProvider, SearchQuery};

pub const SERPAPI_ENDPOINT: &str = "https://serpapi.com/search";
pub const SERPAPI_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    organic_results: Vec<SerpApiOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerpApiOrganic {
    #[serde(default)]
    link: Option<serde_json::Value>,
}

/// Google results through SerpApi.
pub struct SerpApiSearch {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl SerpApiSearch {
    /// Creates the client.
    ///
    /// # Errors
    ///
    /// [`SearchError::MissingCredential`] when no key is configured.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, SearchError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(SearchError::MissingCredential {
                provider: "serpapi",
            })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            endpoint: SERPAPI_ENDPOINT.to_string(),
            client,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn try_search(&self, query: &SearchQuery) -> Result<Vec<String>, SearchError> {
        let num = query.count.to_string();
        let country = query.country.to_lowercase();
        let params = [
            ("q", query.query.as_str()),
            ("engine", "google"),
            ("google_domain", "google.com"),
            ("hl", query.lang.as_str()),
            ("gl", country.as_str()),
            ("api_key", self.api_key.as_str()),
            ("num", num.as_str()),
        ];

        let response = self
            .client
            .get(&self.endpoint)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::from_status(status.as_u16()));
        }

        let text = response.text().await?;
        let parsed: SerpApiResponse = serde_json::from_str(&text)
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        Ok(super::collect_links(
            parsed.organic_results.into_iter().map(|item| item.link),
        ))
    }
}

#[async_trait]
impl SearchProvider for SerpApiSearch {
    async fn search(&self, query: &SearchQuery) -> Vec<String> {
        match self.try_search(query).await {
            Ok(links) => {
                tracing::debug!(query = %query.query, results = links.len(), "SerpApi search");
                links
            }
            Err(e) => {
                tracing::warn!(query = %query.query, "SerpApi search degraded to no results: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "serpapi"
    }
}
