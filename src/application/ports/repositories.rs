//! Repository Ports - 出站端口
//!
//! 定义数据持久化的抽象接口
//! 具体实现在 infrastructure 层（SQLite）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::story::Scene;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Duplicate entity: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ============================================================================
// Account Repository
// ============================================================================

/// 账户实体（用于持久化）
#[derive(Debug, Clone)]
pub struct AccountRecord {
    pub id: Uuid,
    /// 全局唯一用户名
    pub username: String,
    /// 凭证哈希（认证协议本身在系统边界之外，这里只保存稳定哈希）
    pub credential_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Account Repository Port
#[async_trait]
pub trait AccountRepositoryPort: Send + Sync {
    /// 创建账户；用户名已存在时返回 `RepositoryError::Duplicate`
    async fn create(&self, account: &AccountRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AccountRecord>, RepositoryError>;

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<AccountRecord>, RepositoryError>;
}

// ============================================================================
// Story Repository
// ============================================================================

/// 故事实体（用于持久化）
///
/// 场景列表整体序列化为 JSON 存入单列
#[derive(Debug, Clone)]
pub struct StoryRecord {
    pub id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    pub scenes: Vec<Scene>,
    pub created_at: DateTime<Utc>,
}

/// 故事列表摘要（不含场景内容）
#[derive(Debug, Clone)]
pub struct StorySummary {
    pub id: Uuid,
    pub title: String,
    pub scene_count: usize,
    pub created_at: DateTime<Utc>,
}

/// Story Repository Port
#[async_trait]
pub trait StoryRepositoryPort: Send + Sync {
    async fn save(&self, story: &StoryRecord) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<StoryRecord>, RepositoryError>;

    async fn list_by_account(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<StorySummary>, RepositoryError>;

    async fn delete(&self, id: Uuid) -> Result<(), RepositoryError>;
}
