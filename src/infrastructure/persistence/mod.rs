//! SQLite repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx runtime
//! queries mapped through `FromRow`.
//!
//! # Repositories
//!
//! - [`SqliteMirrorRepository`] - Mirror upsert, lookup and listing

pub mod sqlite_mirror_repository;

pub use sqlite_mirror_repository::SqliteMirrorRepository;
