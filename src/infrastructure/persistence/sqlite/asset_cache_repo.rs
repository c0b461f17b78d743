//! SQLite Asset Cache Repository
//!
//! (kind, fingerprint) → reference 的持久映射。
//! 唯一约束在表结构上声明；插入冲突映射为 `CacheError::Duplicate`，
//! 由编排器决定是否吞掉。无淘汰、无 TTL：条目长期保留。

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{AssetCachePort, AssetKind, CacheError};

/// SQLite 素材缓存
pub struct SqliteAssetCache {
    pool: DbPool,
}

impl SqliteAssetCache {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssetCachePort for SqliteAssetCache {
    async fn lookup(
        &self,
        kind: AssetKind,
        fingerprint: &str,
    ) -> Result<Option<String>, CacheError> {
        let row: Option<(String,)> = sqlx::query_as(
            "SELECT reference FROM asset_cache WHERE kind = ? AND fingerprint = ?",
        )
        .bind(kind.as_str())
        .bind(fingerprint)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        Ok(row.map(|(reference,)| reference))
    }

    async fn store(
        &self,
        kind: AssetKind,
        fingerprint: &str,
        reference: &str,
    ) -> Result<(), CacheError> {
        let result = sqlx::query(
            r#"
            INSERT INTO asset_cache (id, kind, fingerprint, reference, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(kind.as_str())
        .bind(fingerprint)
        .bind(reference)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => {
                tracing::debug!(
                    kind = %kind,
                    fingerprint = %fingerprint,
                    reference_len = reference.len(),
                    "Asset reference cached"
                );
                Ok(())
            }
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                CacheError::Duplicate(format!("{}:{}", kind, fingerprint)),
            ),
            Err(e) => Err(CacheError::DatabaseError(e.to_string())),
        }
    }

    async fn count(&self) -> Result<u64, CacheError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM asset_cache")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| CacheError::DatabaseError(e.to_string()))?;

        Ok(count as u64)
    }
}
