//! SQLite implementation of the mirror repository.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use std::sync::Arc;

use crate::domain::entities::{
    MerchantCount, Mirror, MirrorFilter, MirrorKey, MirrorStats, NewMirror, UpsertOutcome,
};
use crate::domain::repositories::MirrorRepository;
use crate::error::AppError;

const MIRROR_COLUMNS: &str = "id, merchant, country, keyword, source_url, source_domain, \
     final_url, final_domain, is_redirector, is_mirror, cta_found, first_seen_at, last_seen_at";

/// SQLite repository for mirror records.
///
/// Each upsert runs its lookup and write inside one transaction, so a
/// concurrent run never observes a half-written record.
pub struct SqliteMirrorRepository {
    pool: Arc<SqlitePool>,
}

impl SqliteMirrorRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<SqlitePool>) -> Self {
        Self { pool }
    }

    async fn try_upsert(&self, new_mirror: &NewMirror) -> Result<UpsertOutcome, sqlx::Error> {
        let key = &new_mirror.key;
        let now = Utc::now();

        // Dropping `tx` on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        let existing: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT id FROM mirrors
            WHERE merchant = ?1 AND country = ?2 AND keyword = ?3 AND source_url = ?4
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(&key.merchant)
        .bind(&key.country)
        .bind(&key.keyword)
        .bind(&key.source_url)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            Some(id) => {
                sqlx::query(
                    r#"
                    UPDATE mirrors
                    SET final_url = ?1, final_domain = ?2,
                        is_redirector = ?3, is_mirror = ?4, cta_found = ?5, last_seen_at = ?6
                    WHERE id = ?7
                    "#,
                )
                .bind(&new_mirror.final_url)
                .bind(&new_mirror.final_domain)
                .bind(new_mirror.is_redirector)
                .bind(new_mirror.is_mirror)
                .bind(new_mirror.cta_found)
                .bind(now)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                UpsertOutcome::Updated
            }
            None => {
                sqlx::query(
                    r#"
                    INSERT INTO mirrors (
                        merchant, country, keyword, source_url, source_domain,
                        final_url, final_domain, is_redirector, is_mirror, cta_found,
                        first_seen_at, last_seen_at
                    )
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
                    "#,
                )
                .bind(&key.merchant)
                .bind(&key.country)
                .bind(&key.keyword)
                .bind(&key.source_url)
                .bind(&new_mirror.source_domain)
                .bind(&new_mirror.final_url)
                .bind(&new_mirror.final_domain)
                .bind(new_mirror.is_redirector)
                .bind(new_mirror.is_mirror)
                .bind(new_mirror.cta_found)
                .bind(now)
                .execute(&mut *tx)
                .await?;

                UpsertOutcome::Created
            }
        };

        tx.commit().await?;
        Ok(outcome)
    }
}

#[async_trait]
impl MirrorRepository for SqliteMirrorRepository {
    async fn upsert(&self, new_mirror: NewMirror) -> UpsertOutcome {
        match self.try_upsert(&new_mirror).await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(
                    merchant = %new_mirror.key.merchant,
                    keyword = %new_mirror.key.keyword,
                    source_url = %new_mirror.key.source_url,
                    final_domain = %new_mirror.final_domain,
                    "Mirror upsert discarded: {}",
                    e
                );
                UpsertOutcome::Discarded
            }
        }
    }

    async fn find_by_key(&self, key: &MirrorKey) -> Result<Option<Mirror>, AppError> {
        let sql = format!(
            "SELECT {MIRROR_COLUMNS} FROM mirrors \
             WHERE merchant = ?1 AND country = ?2 AND keyword = ?3 AND source_url = ?4 \
             ORDER BY id LIMIT 1"
        );

        let row = sqlx::query_as::<_, Mirror>(&sql)
            .bind(&key.merchant)
            .bind(&key.country)
            .bind(&key.keyword)
            .bind(&key.source_url)
            .fetch_optional(self.pool.as_ref())
            .await?;

        Ok(row)
    }

    async fn list(&self, filter: MirrorFilter) -> Result<Vec<Mirror>, AppError> {
        let sql = format!(
            "SELECT {MIRROR_COLUMNS} FROM mirrors \
             WHERE (?1 IS NULL OR merchant = ?1) AND (?2 IS NULL OR country = ?2) \
             ORDER BY last_seen_at DESC, id DESC \
             LIMIT ?3"
        );

        let rows = sqlx::query_as::<_, Mirror>(&sql)
            .bind(filter.merchant)
            .bind(filter.country)
            .bind(filter.limit)
            .fetch_all(self.pool.as_ref())
            .await?;

        Ok(rows)
    }

    async fn count(&self, filter: MirrorFilter) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM mirrors
            WHERE (?1 IS NULL OR merchant = ?1) AND (?2 IS NULL OR country = ?2)
            "#,
        )
        .bind(filter.merchant)
        .bind(filter.country)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn stats(&self) -> Result<MirrorStats, AppError> {
        let (total, mirrors, redirectors): (i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT
                COUNT(*),
                COALESCE(SUM(CASE WHEN is_mirror THEN 1 ELSE 0 END), 0),
                COALESCE(SUM(CASE WHEN is_redirector THEN 1 ELSE 0 END), 0)
            FROM mirrors
            "#,
        )
        .fetch_one(self.pool.as_ref())
        .await?;

        let per_merchant = sqlx::query_as::<_, MerchantCount>(
            r#"
            SELECT merchant, COUNT(*) AS count
            FROM mirrors
            GROUP BY merchant
            ORDER BY count DESC, merchant
            "#,
        )
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(MirrorStats {
            total,
            mirrors,
            redirectors,
            per_merchant,
        })
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
