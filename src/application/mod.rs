//! Application layer services implementing the collection pipeline.
//!
//! This layer orchestrates domain contracts (search, resolution, storage) and
//! exposes a clean API for HTTP handlers, the admin CLI and the background
//! worker.
//!
//! # Available Services
//!
//! - [`services::collector_service::CollectorService`] - Full and batch collection runs
//! - [`services::interactive_service::InteractiveService`] - Browser-driven resolution on demand
//! - [`services::mirror_service::MirrorService`] - Stored mirror listing and stats
//!
//! [`collect_worker`] drains the background job queue.

pub mod collect_worker;
pub mod services;
