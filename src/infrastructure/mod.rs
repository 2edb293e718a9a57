//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`persistence`] - SQLite repository implementations
//! - [`search`] - Search API clients (serper.dev, SerpApi)
//! - [`resolver`] - Passive, HTTP and headless-browser URL resolvers

pub mod persistence;
pub mod resolver;
pub mod search;
