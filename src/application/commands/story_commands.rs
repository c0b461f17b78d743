//! Story Commands

use uuid::Uuid;

/// 根据提示词生成故事结构（创建会话）
#[derive(Debug, Clone)]
pub struct GenerateStory {
    pub prompt: String,
}

/// 将会话中的故事持久化到账户名下
#[derive(Debug, Clone)]
pub struct SaveStory {
    pub session_id: String,
    pub account_id: Uuid,
    pub title: String,
}

/// 删除已保存的故事
#[derive(Debug, Clone)]
pub struct DeleteStory {
    pub story_id: Uuid,
}
