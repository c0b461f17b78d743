//! Session Manager Port - 故事会话生命周期管理
//!
//! 生成的故事在保存前存活于内存会话中：场景随素材解析被原地更新，
//! 保存时整体序列化持久化。具体实现在 infrastructure/memory 层。

use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::story::Scene;

/// Session Manager 错误
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("Session already exists: {0}")]
    AlreadyExists(String),

    #[error("Scene index out of range: {0}")]
    SceneOutOfRange(usize),
}

/// 故事会话（in-memory）
#[derive(Debug, Clone)]
pub struct StorySession {
    pub id: String,
    /// 生成该故事所用的原始提示词
    pub prompt: String,
    pub scenes: Vec<Scene>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl StorySession {
    pub fn new(prompt: impl Into<String>, scenes: Vec<Scene>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            prompt: prompt.into(),
            scenes,
            created_at: now,
            last_activity: now,
        }
    }
}

/// Session Manager Port
///
/// 管理故事会话的生命周期，所有状态存储在内存中。
/// 场景在会话存续期内只增不删。
pub trait SessionManagerPort: Send + Sync {
    /// 创建新会话
    fn create(&self, session: StorySession) -> Result<String, SessionError>;

    /// 获取会话
    fn get(&self, id: &str) -> Result<StorySession, SessionError>;

    /// 将已解析的图像引用写入指定场景
    fn set_scene_image(&self, id: &str, index: usize, url: &str) -> Result<(), SessionError>;

    /// 将已解析的音频引用写入指定场景
    fn set_scene_audio(&self, id: &str, index: usize, url: &str) -> Result<(), SessionError>;

    /// 关闭会话
    fn close(&self, id: &str) -> Result<(), SessionError>;

    /// 更新最后活动时间
    fn touch(&self, id: &str);

    /// 获取所有过期会话的 ID
    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String>;

    /// 获取所有会话 ID
    fn list_all(&self) -> Vec<String>;
}
