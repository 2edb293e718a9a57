//! Query parameters for stored mirror listing.

use serde::Deserialize;
use serde_with::{DisplayFromStr, NoneAsEmptyString, serde_as};
use validator::Validate;

use crate::domain::entities::MirrorFilter;

pub const DEFAULT_MIRRORS_LIMIT: i64 = 100;

/// `GET /mirrors` query string.
///
/// Empty `country=` / `merchant=` values mean "no filter".
#[serde_as]
#[derive(Debug, Default, Deserialize, Validate)]
pub struct MirrorsQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    #[validate(range(min = 1, max = 1000))]
    pub limit: Option<i64>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub country: Option<String>,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub merchant: Option<String>,
}

impl MirrorsQuery {
    pub fn filter(self) -> MirrorFilter {
        MirrorFilter::new(self.limit.unwrap_or(DEFAULT_MIRRORS_LIMIT))
            .with_merchant(self.merchant)
            .with_country(self.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> MirrorsQuery {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults() {
        let filter = parse(json!({})).filter();
        assert_eq!(filter.limit, DEFAULT_MIRRORS_LIMIT);
        assert!(filter.merchant.is_none());
        assert!(filter.country.is_none());
    }

    #[test]
    fn test_empty_values_are_no_filter() {
        let filter = parse(json!({"country": "", "merchant": "1win", "limit": "5"})).filter();
        assert_eq!(filter.limit, 5);
        assert_eq!(filter.merchant.as_deref(), Some("1win"));
        assert!(filter.country.is_none());
    }

    #[test]
    fn test_limit_bounds() {
        assert!(parse(json!({"limit": "0"})).validate().is_err());
        assert!(parse(json!({"limit": "1001"})).validate().is_err());
        assert!(parse(json!({"limit": "1000"})).validate().is_ok());
    }
}
