//! SQLite Account Repository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::DbPool;
use crate::application::ports::{AccountRecord, AccountRepositoryPort, RepositoryError};

/// SQLite Account Repository
pub struct SqliteAccountRepository {
    pool: DbPool,
}

impl SqliteAccountRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct AccountRow {
    id: String,
    username: String,
    credential_hash: String,
    created_at: String,
}

impl TryFrom<AccountRow> for AccountRecord {
    type Error = RepositoryError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(AccountRecord {
            id: Uuid::parse_str(&row.id)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?,
            username: row.username,
            credential_hash: row.credential_hash,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map_err(|e| RepositoryError::SerializationError(e.to_string()))?
                .with_timezone(&Utc),
        })
    }
}

#[async_trait]
impl AccountRepositoryPort for SqliteAccountRepository {
    async fn create(&self, account: &AccountRecord) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r#"
            INSERT INTO accounts (id, username, credential_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(account.id.to_string())
        .bind(&account.username)
        .bind(&account.credential_hash)
        .bind(account.created_at.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                RepositoryError::Duplicate(format!("username: {}", account.username)),
            ),
            Err(e) => Err(RepositoryError::DatabaseError(e.to_string())),
        }
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, username, credential_hash, created_at FROM accounts WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(AccountRecord::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountRecord>, RepositoryError> {
        let row: Option<AccountRow> = sqlx::query_as(
            "SELECT id, username, credential_hash, created_at FROM accounts WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

        row.map(AccountRecord::try_from).transpose()
    }
}
