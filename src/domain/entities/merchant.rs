//! Merchant configuration value object.

use serde::{Deserialize, Serialize};

/// Country used when a merchant entry omits one.
pub const DEFAULT_COUNTRY: &str = "in";

/// One merchant to search mirrors for.
///
/// Immutable for the duration of a run. Built at the boundary (API request,
/// config file, built-in defaults); the collector only ever sees this form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantConfig {
    pub merchant: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub brand_pattern: Option<String>,
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl MerchantConfig {
    /// Creates a merchant config.
    pub fn new(
        merchant: impl Into<String>,
        country: impl Into<String>,
        keywords: Vec<String>,
        brand_pattern: Option<String>,
    ) -> Self {
        Self {
            merchant: merchant.into(),
            country: country.into(),
            keywords,
            brand_pattern,
        }
    }

    /// Number of results each keyword may ask the search provider for.
    ///
    /// Never below 1, whatever the keyword count.
    pub fn per_keyword_quota(&self, limit: usize) -> usize {
        (limit / self.keywords.len().max(1)).max(1)
    }

    /// Returns true when the config can be processed at all.
    pub fn is_usable(&self) -> bool {
        !self.merchant.trim().is_empty() && !self.country.trim().is_empty()
    }
}

/// Built-in merchant list used by full collection runs.
pub fn default_merchants() -> Vec<MerchantConfig> {
    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    vec![
        MerchantConfig::new(
            "dafabet",
            "in",
            kw(&["cricket betting", "sports betting"]),
            Some("dafabet".into()),
        ),
        MerchantConfig::new(
            "1xbet",
            "in",
            kw(&["cricket betting", "betting"]),
            Some("1xbet".into()),
        ),
        MerchantConfig::new(
            "stake",
            "in",
            kw(&["cricket betting", "sports"]),
            Some("stake".into()),
        ),
        MerchantConfig::new("1win", "in", kw(&["cricket betting"]), Some("1win".into())),
        MerchantConfig::new(
            "bc game",
            "in",
            kw(&["cricket betting"]),
            Some("bcgame".into()),
        ),
    ]
}
