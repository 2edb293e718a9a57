//! # Mirror Collector
//!
//! Discovers merchant mirror domains: searches the web for merchant keywords,
//! follows every hit to where it really lands, classifies the destination and
//! keeps an idempotent record of each finding in SQLite.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Entities, classifier, provider and repository traits
//! - **Application Layer** ([`application`]) - Collection runs and interactive resolution
//! - **Infrastructure Layer** ([`infrastructure`]) - SQLite, search APIs, resolvers
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Pipeline
//!
//! ```text
//! SearchProvider -> UrlResolver -> classifier -> MirrorRepository::upsert
//! ```
//!
//! Every failure is contained at the smallest unit (one search, one URL, one
//! write); a run always returns its summary.
//!
//! ## Quick Start
//!
//! ```bash
//! export DATABASE_URL="sqlite://mirrors.db?mode=rwc"
//! export SERPER_API_KEY="..."
//!
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{CollectorService, InteractiveService, MirrorService};
    pub use crate::domain::entities::{MerchantConfig, Mirror, Resolution, RunSummary};
    pub use crate::error::AppError;
    pub use crate::state::AppState;
}
