//! Interactive (browser-driven) resolution service.
//!
//! Backs the on-demand endpoints: single URL resolution, batch resolution for
//! one merchant, and search-then-resolve. Nothing here is persisted.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::entities::Resolution;
use crate::domain::providers::{ResolveOptions, SearchProvider, SearchQuery, UrlResolver};

/// One resolved URL attributed to a merchant.
#[derive(Debug, Clone, Serialize)]
pub struct MerchantResolution {
    pub merchant: String,
    #[serde(flatten)]
    pub resolution: Resolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Search parameters of an interactive collection.
#[derive(Debug, Clone)]
pub struct InteractiveSearch {
    pub merchant: String,
    pub keywords: Vec<String>,
    pub country: String,
    pub lang: String,
    pub limit: usize,
}

impl InteractiveSearch {
    /// `merchant`, then every keyword, then the country, space separated.
    pub fn query(&self) -> String {
        std::iter::once(self.merchant.as_str())
            .chain(self.keywords.iter().map(String::as_str))
            .chain(std::iter::once(self.country.as_str()))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Resolves URLs through the interactive resolver, one at a time.
pub struct InteractiveService {
    search: Arc<dyn SearchProvider>,
    resolver: Arc<dyn UrlResolver>,
    defaults: ResolveOptions,
}

impl InteractiveService {
    pub fn new(
        search: Arc<dyn SearchProvider>,
        resolver: Arc<dyn UrlResolver>,
        defaults: ResolveOptions,
    ) -> Self {
        Self {
            search,
            resolver,
            defaults,
        }
    }

    /// Default options, with per-request overrides applied by the caller.
    pub fn defaults(&self) -> &ResolveOptions {
        &self.defaults
    }

    /// Name of the live search backend.
    pub fn search_backend(&self) -> &'static str {
        self.search.name()
    }

    pub async fn resolve_url(&self, url: &str, options: &ResolveOptions) -> Resolution {
        self.resolver.resolve(url, options).await
    }

    /// Resolves `urls` in order for one merchant.
    pub async fn resolve_batch(
        &self,
        merchant: &str,
        urls: &[String],
        options: &ResolveOptions,
    ) -> Vec<MerchantResolution> {
        let mut items = Vec::with_capacity(urls.len());
        for url in urls {
            let resolution = self.resolver.resolve(url, options).await;
            items.push(MerchantResolution {
                merchant: merchant.to_string(),
                resolution,
                query: None,
            });
        }
        items
    }

    /// Searches, then resolves every candidate in provider order.
    pub async fn collect(
        &self,
        request: &InteractiveSearch,
        options: &ResolveOptions,
    ) -> Vec<MerchantResolution> {
        let query = request.query();
        let search = SearchQuery::new(query.clone(), request.limit, request.country.clone())
            .with_lang(request.lang.clone());

        let urls = self.search.search(&search).await;
        if urls.is_empty() {
            tracing::info!(query = %query, "Interactive collection found no candidates");
            return Vec::new();
        }

        let mut items = self.resolve_batch(&request.merchant, &urls, options).await;
        for item in &mut items {
            item.query = Some(query.clone());
        }

        tracing::info!(
            merchant = %request.merchant,
            query = %query,
            count = items.len(),
            "Interactive collection finished"
        );

        items
    }
}
