//! URL resolution result.

use serde::Serialize;

use crate::utils::url::domain_of;

/// How a candidate URL is followed to its destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolveStrategy {
    /// No network call; the candidate is its own destination.
    Passive,
    /// GET with automatic redirect following.
    Http,
    /// Headless browser navigation with consent-button probing.
    Browser,
}

impl ResolveStrategy {
    /// Maps the run flags of a batch onto a strategy.
    ///
    /// `interactive` wins over `follow_redirects`: a browser always follows
    /// redirects.
    pub fn for_run(follow_redirects: bool, interactive: bool) -> Self {
        match (follow_redirects, interactive) {
            (_, true) => Self::Browser,
            (true, false) => Self::Http,
            (false, false) => Self::Passive,
        }
    }

    pub fn follows_redirects(self) -> bool {
        !matches!(self, Self::Passive)
    }
}

/// Where a candidate URL ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Resolution {
    pub source_url: String,
    pub source_domain: String,
    pub final_url: String,
    pub final_domain: String,
    pub is_redirector: bool,
    /// Navigated URLs in order, without duplicates. Never empty.
    pub redirect_chain: Vec<String>,
    /// Whether a consent/call-to-action button was clicked.
    pub cta_clicked: bool,
    pub ok: bool,
    pub error: Option<String>,
}

impl Resolution {
    /// Builds a successful resolution from the URL that was finally reached.
    pub fn reached(source_url: &str, final_url: &str, redirect_chain: Vec<String>) -> Self {
        let source_domain = domain_of(source_url);
        let final_domain = domain_of(final_url);
        let is_redirector = !final_domain.is_empty() && final_domain != source_domain;

        let redirect_chain = if redirect_chain.is_empty() {
            vec![source_url.to_string()]
        } else {
            redirect_chain
        };

        Self {
            source_url: source_url.to_string(),
            source_domain,
            final_url: final_url.to_string(),
            final_domain,
            is_redirector,
            redirect_chain,
            cta_clicked: false,
            ok: true,
            error: None,
        }
    }

    /// The candidate treated as its own destination (passive mode).
    pub fn unresolved(source_url: &str) -> Self {
        Self::reached(source_url, source_url, Vec::new())
    }

    /// Fallback when resolution failed without reaching any page.
    pub fn failed(source_url: &str, error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Self::unresolved(source_url)
        }
    }

    pub fn with_cta_clicked(mut self, clicked: bool) -> Self {
        self.cta_clicked = clicked;
        self
    }
}

/// Appends `url` to a redirect chain unless it is empty or already present.
pub fn push_unique(chain: &mut Vec<String>, url: &str) {
    if !url.is_empty() && !chain.iter().any(|u| u == url) {
        chain.push(url.to_string());
    }
}
