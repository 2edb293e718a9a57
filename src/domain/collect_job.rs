//! Background collection job model.

use crate::domain::entities::{MerchantConfig, ResolveStrategy};

/// A collection run requested by the API and executed by the background worker.
///
/// Sent over a bounded channel so the request returns immediately; the
/// invoker never observes the outcome.
///
/// # Usage Flow
///
/// 1. Created in a collect handler from the validated request
/// 2. Sent to the job channel with `try_send`
/// 3. Executed by [`crate::application::collect_worker::run_collect_worker`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectJob {
    /// Run over the built-in merchant list in passive mode.
    All { limit: usize },
    /// Run over caller-supplied merchants.
    Batch {
        configs: Vec<MerchantConfig>,
        limit: usize,
        strategy: ResolveStrategy,
    },
}

impl CollectJob {
    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CollectJob::All { .. } => "all",
            CollectJob::Batch { .. } => "batch",
        }
    }
}
