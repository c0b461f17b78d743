//! SQLite Story Repository
//!
//! 场景列表整体序列化为 JSON 存入 scenes 列

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{
    RepositoryError, StoryRecord, StoryRepositoryPort, StorySummary,
};
use crate::domain::story::Scene;

/// SQLite Story Repository
pub struct SqliteStoryRepository {
    pool: DbPool,
}

impl SqliteStoryRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct StoryRow {
    id: String,
    account_id: String,
    title: String,
    scenes: String,
    created_at: String,
}

impl TryFrom<StoryRow> for StoryRecord {
    type Error = RepositoryError;

    fn try_from(row: StoryRow) -> Result<Self, Self::Error> {
        let scenes: Vec<Scene> = serde_json::from_str(&row.scenes)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        Ok(StoryRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            account_id: Uuid::parse_str(&row.account_id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            title: row.title,
            scenes,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    async fn save(&self, story: &StoryRecord) -> Result<(), RepositoryError> {
        let scenes_json = serde_json::to_string(&story.scenes)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO stories (id, account_id, title, scenes, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                scenes = excluded.scenes
            "#,
        )
        .bind(story.id.to_string())
        .bind(story.account_id.to_string())
        .bind(&story.title)
        .bind(scenes_json)
        .bind(story.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoryRecord>, RepositoryError> {
        let row: Option<StoryRow> = sqlx::query_as(
            "SELECT id, account_id, title, scenes, created_at FROM stories WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(StoryRecord::try_from).transpose()
    }

    async fn list_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<StorySummary>, RepositoryError> {
        let rows: Vec<StoryRow> = sqlx::query_as(
            r#"
            SELECT id, account_id, title, scenes, created_at FROM stories
            WHERE account_id = ? ORDER BY created_at DESC
            "#,
        )
        .bind(account_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                let record = StoryRecord::try_from(row)?;
                Ok(StorySummary {
                    id: record.id,
                    title: record.title,
                    scene_count: record.scenes.len(),
                    created_at: record.created_at,
                })
            })
            .collect()
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM stories WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        Ok(())
    }
}
