//! Story Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{StoryRecord, StoryRepositoryPort, StorySummary};
use crate::application::queries::story_queries::{GetStory, ListStories};

/// GetStory Handler - 获取故事详情（含场景）
pub struct GetStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl GetStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: GetStory) -> Result<StoryRecord, ApplicationError> {
        self.story_repo
            .find_by_id(query.story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", query.story_id))
    }
}

/// ListStories Handler - 列出账户名下的故事摘要
pub struct ListStoriesHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl ListStoriesHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, query: ListStories) -> Result<Vec<StorySummary>, ApplicationError> {
        Ok(self.story_repo.list_by_account(query.account_id).await?)
    }
}
