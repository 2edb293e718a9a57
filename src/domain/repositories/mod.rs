//! Repository trait definitions for the domain layer.
//!
//! Traits define the storage contract; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`MirrorRepository`] - Mirror record upsert and listing

pub mod mirror_repository;

pub use mirror_repository::MirrorRepository;

#[cfg(test)]
pub use mirror_repository::MockMirrorRepository;
