//! Candidate URL resolvers.
//!
//! - [`PassiveResolver`] - no network, the candidate is the destination
//! - [`HttpResolver`] - GET with automatic redirect following
//! - [`BrowserResolver`] - headless Chromium with consent-button probing

pub mod browser;
pub mod http;
pub mod passive;

pub use browser::{BrowserError, BrowserResolver};
pub use http::HttpResolver;
pub use passive::PassiveResolver;
