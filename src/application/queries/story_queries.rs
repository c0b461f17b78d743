//! Story Queries

use uuid::Uuid;

/// 获取故事详情查询
#[derive(Debug, Clone)]
pub struct GetStory {
    pub story_id: Uuid,
}

/// 列出账户名下所有故事查询
#[derive(Debug, Clone)]
pub struct ListStories {
    pub account_id: Uuid,
}
