//! Domain layer containing business entities and contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures (merchants, mirrors, resolutions, summaries)
//! - [`repositories`] - Storage trait definitions
//! - [`providers`] - Search and resolution trait definitions
//! - [`classifier`] - Brand matching of resolved domains
//! - [`collect_job`] - Background collection job model
//!
//! # Design Principles
//!
//! - Domain layer has no dependencies on infrastructure or presentation layers
//! - Traits define contracts implemented by the infrastructure layer
//! - Pipeline orchestration lives in [`crate::application::services`]
//!
//! # Collection Flow
//!
//! 1. [`providers::SearchProvider`] returns candidate URLs for a merchant keyword
//! 2. [`providers::UrlResolver`] follows each candidate to its destination
//! 3. [`classifier::is_mirror`] matches the destination against the brand
//! 4. [`repositories::MirrorRepository`] upserts the finding

pub mod classifier;
pub mod collect_job;
pub mod entities;
pub mod providers;
pub mod repositories;
