//! No-network resolver.

use async_trait::async_trait;

use crate::domain::entities::Resolution;
use crate::domain::providers::{ResolveOptions, UrlResolver};

/// Treats every candidate as its own destination.
///
/// Used by full collection runs, which favour throughput over redirect detail.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassiveResolver;

#[async_trait]
impl UrlResolver for PassiveResolver {
    async fn resolve(&self, url: &str, _options: &ResolveOptions) -> Resolution {
        Resolution::unresolved(url)
    }
}
