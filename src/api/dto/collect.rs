//! DTOs for the background collection endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::COUNTRY_CODE_REGEX;
use crate::domain::entities::{MerchantConfig, ResolveStrategy};
use crate::domain::entities::merchant::DEFAULT_COUNTRY;

/// Request to collect mirrors for every built-in merchant.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CollectAllRequest {
    /// Per-merchant budget (default: 50).
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,
}

/// Request to collect mirrors for an explicit merchant list.
#[derive(Debug, Deserialize, Validate)]
pub struct CollectBatchRequest {
    #[validate(length(min = 1, max = 100), nested)]
    pub items: Vec<BatchItem>,

    /// Per-merchant budget (default: 10).
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<usize>,

    /// Follow HTTP redirects (default) or record candidates as found.
    pub follow_redirects: Option<bool>,

    /// Resolve candidates in a headless browser and click through
    /// interstitials (default: false). Implies following redirects.
    pub interactive: Option<bool>,
}

impl CollectBatchRequest {
    pub fn strategy(&self) -> ResolveStrategy {
        ResolveStrategy::for_run(
            self.follow_redirects.unwrap_or(true),
            self.interactive.unwrap_or(false),
        )
    }
}

/// One merchant entry of a batch.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct BatchItem {
    #[validate(length(min = 1, max = 100))]
    pub merchant: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    #[validate(regex(path = "*COUNTRY_CODE_REGEX"))]
    pub country: Option<String>,

    /// Accepted for compatibility; runs always search in English.
    pub lang: Option<String>,

    pub brand_pattern: Option<String>,
}

impl From<BatchItem> for MerchantConfig {
    fn from(item: BatchItem) -> Self {
        let keywords = item
            .keywords
            .into_iter()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .collect();

        MerchantConfig::new(
            item.merchant.trim(),
            item.country
                .map(|c| c.trim().to_string())
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            keywords,
            item.brand_pattern.filter(|p| !p.trim().is_empty()),
        )
    }
}

/// Acknowledgement that a job was queued.
#[derive(Debug, Serialize)]
pub struct EnqueuedResponse {
    pub ok: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_batch_item_normalization() {
        let item: BatchItem = serde_json::from_value(json!({
            "merchant": " stake ",
            "keywords": ["cricket betting", "  ", "stake mirror"],
            "brand_pattern": ""
        }))
        .unwrap();

        let config = MerchantConfig::from(item);

        assert_eq!(config.merchant, "stake");
        assert_eq!(config.country, "in");
        assert_eq!(config.keywords, vec!["cricket betting", "stake mirror"]);
        assert_eq!(config.brand_pattern, None);
    }

    #[test]
    fn test_batch_request_validation() {
        let empty: CollectBatchRequest = serde_json::from_value(json!({"items": []})).unwrap();
        assert!(empty.validate().is_err());

        let nameless: CollectBatchRequest =
            serde_json::from_value(json!({"items": [{"merchant": ""}]})).unwrap();
        assert!(nameless.validate().is_err());

        let bad_country: CollectBatchRequest = serde_json::from_value(
            json!({"items": [{"merchant": "stake", "country": "india"}]}),
        )
        .unwrap();
        assert!(bad_country.validate().is_err());

        let zero_limit: CollectBatchRequest =
            serde_json::from_value(json!({"items": [{"merchant": "stake"}], "limit": 0}))
                .unwrap();
        assert!(zero_limit.validate().is_err());

        let ok: CollectBatchRequest =
            serde_json::from_value(json!({"items": [{"merchant": "stake"}]})).unwrap();
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_batch_request_strategy() {
        let strategy = |value| {
            serde_json::from_value::<CollectBatchRequest>(value)
                .unwrap()
                .strategy()
        };

        assert_eq!(strategy(json!({"items": []})), ResolveStrategy::Http);
        assert_eq!(
            strategy(json!({"items": [], "follow_redirects": false})),
            ResolveStrategy::Passive
        );
        assert_eq!(
            strategy(json!({"items": [], "follow_redirects": false, "interactive": true})),
            ResolveStrategy::Browser
        );
    }
}
