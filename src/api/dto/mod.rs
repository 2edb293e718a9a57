//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod collect;
pub mod health;
pub mod mirrors;
pub mod resolve;

use regex::Regex;
use std::sync::LazyLock;

/// Two-letter country code, as search APIs take it for `gl`.
pub(crate) static COUNTRY_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z]{2}$").unwrap());
