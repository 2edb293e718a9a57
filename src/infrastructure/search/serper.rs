//! serper.dev search backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::providers::{SearchError, SearchProvider, SearchQuery};

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";
pub const SERPER_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
    gl: &'a str,
    hl: &'a str,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperOrganic>,
}

#[derive(Debug, Deserialize)]
struct SerperOrganic {
    #[serde(default)]
    link: Option<serde_json::Value>,
}

/// Google results through serper.dev.
pub struct SerperSearch {
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl SerperSearch {
    /// Creates the client.
    ///
    /// # Errors
    ///
    /// [`SearchError::MissingCredential`] when no key is configured.
    pub fn new(api_key: Option<String>, timeout: Duration) -> Result<Self, SearchError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(SearchError::MissingCredential { provider: "serper" })?;

        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            endpoint: SERPER_ENDPOINT.to_string(),
            client,
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn try_search(&self, query: &SearchQuery) -> Result<Vec<String>, SearchError> {
        let body = SerperRequest {
            q: &query.query,
            num: query.count,
            gl: &query.country,
            hl: &query.lang,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::from_status(status.as_u16()));
        }

        let text = response.text().await?;
        let parsed: SerperResponse = serde_json::from_str(&text)
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        Ok(super::collect_links(
            parsed.organic.into_iter().map(|item| item.link),
        ))
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    async fn search(&self, query: &SearchQuery) -> Vec<String> {
        match self.try_search(query).await {
            Ok(links) => {
                tracing::debug!(query = %query.query, results = links.len(), "Serper search");
                links
            }
            Err(e) => {
                tracing::warn!(query = %query.query, "Serper search degraded to no results: {}", e);
                Vec::new()
            }
        }
    }

    fn name(&self) -> &'static str {
        "serper"
    }
}
