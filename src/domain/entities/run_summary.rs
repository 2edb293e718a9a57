//! Aggregate result of one collection run.

use serde::Serialize;

use crate::domain::entities::ResolveStrategy;

/// Which entrypoint produced a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    All,
    Batch,
}

/// Created/updated totals for a single merchant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MerchantTally {
    pub created: usize,
    pub updated: usize,
    /// URLs whose upsert was discarded.
    pub discarded: usize,
}

impl MerchantTally {
    /// Records counted against the merchant budget.
    pub fn used(&self) -> usize {
        self.created + self.updated
    }
}

/// Summary returned by the collector entrypoints.
///
/// Always produced, whatever failed during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub status: &'static str,
    pub mode: RunMode,
    pub created: usize,
    pub updated: usize,
    pub merchants_count: usize,
    pub limit: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_redirects: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<ResolveStrategy>,
}

impl RunSummary {
    pub fn new(mode: RunMode, merchants_count: usize, limit: usize) -> Self {
        Self {
            status: "ok",
            mode,
            created: 0,
            updated: 0,
            merchants_count,
            limit,
            follow_redirects: None,
            strategy: None,
        }
    }

    pub fn with_strategy(mut self, strategy: ResolveStrategy) -> Self {
        self.follow_redirects = Some(strategy.follows_redirects());
        self.strategy = Some(strategy);
        self
    }

    pub fn add(&mut self, tally: MerchantTally) {
        self.created += tally.created;
        self.updated += tally.updated;
    }
}
