//! URL resolver contract.

use async_trait::async_trait;

use crate::domain::entities::Resolution;

/// Button texts probed after an interactive page load, in order.
pub const DEFAULT_CLICK_TEXTS: [&str; 5] = ["Continue", "I agree", "Agree", "Accept", "Proceed"];

/// Per-call options. Only the interactive resolver reads them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOptions {
    /// Navigation budget in seconds.
    pub wait_seconds: u64,
    pub click_texts: Vec<String>,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            wait_seconds: 8,
            click_texts: DEFAULT_CLICK_TEXTS.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl ResolveOptions {
    /// Overrides defaults with whatever a request supplied.
    ///
    /// An empty click list counts as "not supplied".
    pub fn merged(&self, wait_seconds: Option<u64>, click_texts: Option<Vec<String>>) -> Self {
        Self {
            wait_seconds: wait_seconds.unwrap_or(self.wait_seconds),
            click_texts: click_texts
                .filter(|texts| !texts.is_empty())
                .unwrap_or_else(|| self.click_texts.clone()),
        }
    }
}

/// Follows a candidate URL to its final destination.
///
/// Never fails: unreachable URLs resolve to themselves with `ok = false`.
///
/// # Implementations
///
/// - [`crate::infrastructure::resolver::PassiveResolver`] - no network
/// - [`crate::infrastructure::resolver::HttpResolver`] - redirect-following GET
/// - [`crate::infrastructure::resolver::BrowserResolver`] - headless Chromium
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlResolver: Send + Sync {
    async fn resolve(&self, url: &str, options: &ResolveOptions) -> Resolution;
}
