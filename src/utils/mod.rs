//! Utility functions shared across layers.
//!
//! - [`url`] - Domain extraction and URL validation
//! - [`merchants_loader`] - Merchant configuration file parsing

pub mod merchants_loader;
pub mod url;
