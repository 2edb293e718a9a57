//! Repository trait for mirror record storage.

use crate::domain::entities::{
    Mirror, MirrorFilter, MirrorKey, MirrorStats, NewMirror, UpsertOutcome,
};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for mirror records.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::SqliteMirrorRepository`] - SQLite implementation
/// - Test mocks available with `cfg(test)`
///
/// # Examples
///
/// See integration tests: `tests/repository_mirror.rs`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MirrorRepository: Send + Sync {
    /// Creates or refreshes the record identified by `new_mirror.key`.
    ///
    /// The lookup and the write share one transaction. A storage failure
    /// (constraint violation, I/O error) rolls the transaction back and
    /// yields [`UpsertOutcome::Discarded`]; it is never returned as an error.
    async fn upsert(&self, new_mirror: NewMirror) -> UpsertOutcome;

    /// Finds a record by its natural key.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_key(&self, key: &MirrorKey) -> Result<Option<Mirror>, AppError>;

    /// Lists records, most recently seen first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, filter: MirrorFilter) -> Result<Vec<Mirror>, AppError>;

    /// Counts records matching the merchant/country part of `filter`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self, filter: MirrorFilter) -> Result<i64, AppError>;

    /// Totals over the whole table, merchants ordered by record count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn stats(&self) -> Result<MirrorStats, AppError>;

    /// Checks that the database answers.
    async fn health_check(&self) -> bool;
}
