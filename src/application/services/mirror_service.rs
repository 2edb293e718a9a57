//! Read access to stored mirrors.

use std::sync::Arc;

use crate::domain::entities::{Mirror, MirrorFilter, MirrorStats};
use crate::domain::repositories::MirrorRepository;
use crate::error::AppError;

/// Service for listing and summarising stored mirror records.
pub struct MirrorService<R: MirrorRepository> {
    repository: Arc<R>,
}

impl<R: MirrorRepository> MirrorService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Lists records, most recently seen first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self, filter: MirrorFilter) -> Result<Vec<Mirror>, AppError> {
        self.repository.list(filter).await
    }

    /// Counts records matching the merchant/country filter, ignoring the limit.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn count(&self, filter: MirrorFilter) -> Result<i64, AppError> {
        self.repository.count(filter).await
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn stats(&self) -> Result<MirrorStats, AppError> {
        self.repository.stats().await
    }

    pub async fn health_check(&self) -> bool {
        self.repository.health_check().await
    }
}
