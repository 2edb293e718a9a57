//! Redirect-following HTTP resolver.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use std::time::Duration;

use crate::domain::entities::Resolution;
use crate::domain::entities::resolution::push_unique;
use crate::domain::providers::{ResolveOptions, UrlResolver};

pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(25);
pub const MAX_REDIRECTS: usize = 10;

/// Issues a GET and reports the URL of the last response in the redirect chain.
///
/// The status of that last response is irrelevant: a 404 behind a redirector
/// still identifies where the redirector points. Network failures, timeouts
/// and redirect loops fall back to the source URL.
pub struct HttpResolver {
    client: reqwest::Client,
}

impl HttpResolver {
    /// Builds the resolver with its own client.
    ///
    /// # Errors
    ///
    /// Fails only when the TLS backend cannot be initialised.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .redirect(Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UrlResolver for HttpResolver {
    async fn resolve(&self, url: &str, _options: &ResolveOptions) -> Resolution {
        match self.client.get(url).send().await {
            Ok(response) => {
                let final_url = response.url().to_string();
                let mut chain = vec![url.to_string()];
                push_unique(&mut chain, &final_url);

                tracing::debug!(
                    source_url = %url,
                    final_url = %final_url,
                    status = response.status().as_u16(),
                    "HTTP resolution"
                );
                Resolution::reached(url, &final_url, chain)
            }
            Err(e) => {
                tracing::warn!(source_url = %url, "HTTP resolution fell back to source: {}", e);
                Resolution::failed(url, e.to_string())
            }
        }
    }
}
