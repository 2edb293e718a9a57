//! Mirror record entity and upsert types.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted mirror finding.
///
/// Looked up by `(merchant, country, keyword, source_url)`.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Mirror {
    pub id: i64,
    pub merchant: String,
    pub country: String,
    pub keyword: String,
    pub source_url: String,
    pub source_domain: String,
    pub final_url: String,
    pub final_domain: String,
    pub is_redirector: bool,
    pub is_mirror: bool,
    pub cta_found: bool,
    pub first_seen_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

/// Natural lookup key of a mirror record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorKey {
    pub merchant: String,
    pub country: String,
    pub keyword: String,
    pub source_url: String,
}

/// Input for creating or refreshing a mirror record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMirror {
    pub key: MirrorKey,
    pub source_domain: String,
    pub final_url: String,
    pub final_domain: String,
    pub is_redirector: bool,
    pub is_mirror: bool,
    pub cta_found: bool,
}

/// Result of a single upsert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
    /// The write was rolled back (constraint violation or storage fault).
    Discarded,
}

impl UpsertOutcome {
    pub fn created(self) -> bool {
        self == Self::Created
    }

    pub fn updated(self) -> bool {
        self == Self::Updated
    }
}

/// Filter for listing stored mirrors.
#[derive(Debug, Clone, Default)]
pub struct MirrorFilter {
    pub merchant: Option<String>,
    pub country: Option<String>,
    pub limit: i64,
}

impl MirrorFilter {
    pub fn new(limit: i64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    pub fn with_merchant(mut self, merchant: Option<String>) -> Self {
        self.merchant = merchant;
        self
    }

    pub fn with_country(mut self, country: Option<String>) -> Self {
        self.country = country;
        self
    }
}

/// Aggregate counts over all stored mirrors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MirrorStats {
    pub total: i64,
    pub mirrors: i64,
    pub redirectors: i64,
    pub per_merchant: Vec<MerchantCount>,
}

/// Number of stored records for one merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct MerchantCount {
    pub merchant: String,
    pub count: i64,
}
