//! DTOs for the interactive resolution endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::api::dto::COUNTRY_CODE_REGEX;
use crate::application::services::{InteractiveSearch, MerchantResolution};
use crate::domain::entities::Resolution;
use crate::domain::entities::merchant::DEFAULT_COUNTRY;
use crate::domain::providers::ResolveOptions;
use crate::utils::url::parse_http_url;

/// Default number of search results resolved by an interactive collection.
pub const DEFAULT_INTERACTIVE_LIMIT: usize = 10;

fn http_url(url: &str) -> Result<(), ValidationError> {
    parse_http_url(url).map(|_| ()).map_err(|e| {
        let mut error = ValidationError::new("http_url");
        error.message = Some(e.to_string().into());
        error
    })
}

fn http_urls(urls: &[String]) -> Result<(), ValidationError> {
    urls.iter().try_for_each(|url| http_url(url))
}

/// Request to resolve a single URL in the browser.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveUrlRequest {
    #[validate(custom(function = "http_url"))]
    pub url: String,

    /// Navigation budget in seconds (default: 8).
    #[validate(range(min = 1, max = 120))]
    pub wait_seconds: Option<u64>,

    /// Button texts to probe instead of the defaults.
    pub click_texts: Option<Vec<String>>,
}

/// Request to resolve several URLs of one merchant.
#[derive(Debug, Deserialize, Validate)]
pub struct ResolveBatchRequest {
    #[validate(length(min = 1, max = 100))]
    pub merchant: String,

    #[validate(length(min = 1, max = 100), custom(function = "http_urls"))]
    pub urls: Vec<String>,

    #[validate(range(min = 1, max = 120))]
    pub wait_seconds: Option<u64>,

    pub click_texts: Option<Vec<String>>,
}

/// Request to search for a merchant and resolve every hit in the browser.
#[derive(Debug, Deserialize, Validate)]
pub struct InteractiveRequest {
    #[validate(length(min = 1, max = 100))]
    pub merchant: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[validate(regex(path = "*COUNTRY_CODE_REGEX"))]
    pub country: Option<String>,

    #[validate(length(min = 1, max = 10))]
    pub lang: Option<String>,

    #[validate(range(min = 1, max = 100))]
    pub limit: Option<usize>,

    pub click_texts: Option<Vec<String>>,

    #[validate(range(min = 1, max = 120))]
    pub wait_seconds: Option<u64>,
}

impl InteractiveRequest {
    /// Resolution options with request overrides applied over `defaults`.
    pub fn options(&self, defaults: &ResolveOptions) -> ResolveOptions {
        defaults.merged(self.wait_seconds, self.click_texts.clone())
    }

    pub fn search(&self) -> InteractiveSearch {
        InteractiveSearch {
            merchant: self.merchant.trim().to_string(),
            keywords: self
                .keywords
                .iter()
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty())
                .collect(),
            country: self
                .country
                .clone()
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            lang: self.lang.clone().unwrap_or_else(|| "en".to_string()),
            limit: self.limit.unwrap_or(DEFAULT_INTERACTIVE_LIMIT),
        }
    }
}

/// Outcome of resolving one URL.
///
/// On failure `final_url` is the start URL and `error` says why.
#[derive(Debug, Serialize)]
pub struct ResolvedUrl {
    pub start_url: String,
    pub final_url: String,
    pub redirects: Vec<String>,
    pub ok: bool,
    pub error: Option<String>,
}

impl From<Resolution> for ResolvedUrl {
    fn from(resolution: Resolution) -> Self {
        Self {
            start_url: resolution.source_url,
            final_url: resolution.final_url,
            redirects: resolution.redirect_chain,
            ok: resolution.ok,
            error: resolution.error,
        }
    }
}

/// A [`ResolvedUrl`] attributed to a merchant.
#[derive(Debug, Serialize)]
pub struct MerchantResolvedUrl {
    pub merchant: String,
    #[serde(flatten)]
    pub resolved: ResolvedUrl,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

impl From<MerchantResolution> for MerchantResolvedUrl {
    fn from(item: MerchantResolution) -> Self {
        Self {
            merchant: item.merchant,
            resolved: item.resolution.into(),
            query: item.query,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct InteractiveResponse {
    pub ok: bool,
    pub merchant: String,
    pub count: usize,
    pub items: Vec<MerchantResolvedUrl>,
}
