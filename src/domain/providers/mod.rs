//! Contracts for the external systems the pipeline talks to.
//!
//! - [`SearchProvider`] - candidate URL discovery
//! - [`UrlResolver`] - destination resolution
//!
//! Implementations live in `crate::infrastructure::{search, resolver}`.

pub mod search_provider;
pub mod url_resolver;

pub use search_provider::{SearchError, SearchProvider, SearchQuery};
pub use url_resolver::{DEFAULT_CLICK_TEXTS, ResolveOptions, UrlResolver};

#[cfg(test)]
pub use search_provider::MockSearchProvider;
#[cfg(test)]
pub use url_resolver::MockUrlResolver;
