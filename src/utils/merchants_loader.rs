//! Merchant configuration file parsing.
//!
//! The file is a JSON array of merchant objects:
//!
//! ```json
//! [
//!   { "merchant": "stake", "country": "in", "keywords": ["cricket betting"], "brand_pattern": "stake" },
//!   { "merchant": "1win", "keywords": ["cricket betting"] }
//! ]
//! ```

use std::path::Path;

use crate::domain::entities::MerchantConfig;

#[derive(Debug, thiserror::Error)]
pub enum MerchantsFileError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("merchant config must be a JSON array")]
    NotAnArray,

    #[error("invalid merchant entry: {0}")]
    InvalidEntry(#[from] serde_json::Error),

    #[error("merchant entry #{0} has an empty merchant name or country")]
    Unusable(usize),
}

/// Parses merchant configs from JSON text.
///
/// # Errors
///
/// Fails when the document is not an array, when an entry does not match the
/// merchant shape, or when an entry has a blank merchant name or country.
pub fn parse_merchants(json: &str) -> Result<Vec<MerchantConfig>, MerchantsFileError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    if !value.is_array() {
        return Err(MerchantsFileError::NotAnArray);
    }

    let configs: Vec<MerchantConfig> = serde_json::from_value(value)?;
    if let Some(idx) = configs.iter().position(|c| !c.is_usable()) {
        return Err(MerchantsFileError::Unusable(idx));
    }

    Ok(configs)
}

/// Reads and parses a merchant config file.
pub fn load_merchants(path: impl AsRef<Path>) -> Result<Vec<MerchantConfig>, MerchantsFileError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| MerchantsFileError::Io {
        path: path.display().to_string(),
        source,
    })?;

    parse_merchants(&text)
}
