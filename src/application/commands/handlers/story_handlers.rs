//! Story Command Handlers

use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::{DeleteStory, GenerateStory, SaveStory};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    AccountRepositoryPort, GenerativeModelPort, SessionManagerPort, StoryRecord,
    StoryRepositoryPort, StorySession,
};
use crate::domain::story::{Scene, Story, Title};

// ============================================================================
// GenerateStory (Step 1: structure generation, session creation)
// ============================================================================

/// 故事生成响应
#[derive(Debug, Clone)]
pub struct GenerateStoryResponse {
    pub session_id: String,
    pub scenes: Vec<Scene>,
}

/// GenerateStory Handler - 生成故事结构并创建会话
pub struct GenerateStoryHandler {
    genai: Arc<dyn GenerativeModelPort>,
    sessions: Arc<dyn SessionManagerPort>,
}

impl GenerateStoryHandler {
    pub fn new(
        genai: Arc<dyn GenerativeModelPort>,
        sessions: Arc<dyn SessionManagerPort>,
    ) -> Self {
        Self { genai, sessions }
    }

    pub async fn handle(
        &self,
        command: GenerateStory,
    ) -> Result<GenerateStoryResponse, ApplicationError> {
        if command.prompt.is_empty() {
            return Err(ApplicationError::validation("prompt is required"));
        }

        let drafts = self.genai.generate_scenes(&command.prompt).await?;

        // 空序列（包括服务返回的 JSON 无法解析的情况）是终态失败
        if drafts.is_empty() {
            return Err(ApplicationError::NoPayload("scene"));
        }

        let scenes: Vec<Scene> = drafts
            .into_iter()
            .enumerate()
            .filter_map(|(index, draft)| {
                Scene::new(index, draft.text, draft.image_prompt, draft.audio_prompt).ok()
            })
            .collect();

        if scenes.is_empty() {
            return Err(ApplicationError::NoPayload("scene"));
        }

        let scene_count = scenes.len();
        let session = StorySession::new(command.prompt.clone(), scenes.clone());
        let session_id = self.sessions.create(session)?;

        tracing::info!(
            session_id = %session_id,
            scene_count = scene_count,
            "Story structure generated"
        );

        Ok(GenerateStoryResponse { session_id, scenes })
    }
}

// ============================================================================
// SaveStory
// ============================================================================

/// 故事保存响应
#[derive(Debug, Clone)]
pub struct SaveStoryResponse {
    pub story_id: Uuid,
    pub title: String,
    pub scene_count: usize,
}

/// SaveStory Handler - 将会话中的故事持久化
pub struct SaveStoryHandler {
    sessions: Arc<dyn SessionManagerPort>,
    story_repo: Arc<dyn StoryRepositoryPort>,
    account_repo: Arc<dyn AccountRepositoryPort>,
}

impl SaveStoryHandler {
    pub fn new(
        sessions: Arc<dyn SessionManagerPort>,
        story_repo: Arc<dyn StoryRepositoryPort>,
        account_repo: Arc<dyn AccountRepositoryPort>,
    ) -> Self {
        Self {
            sessions,
            story_repo,
            account_repo,
        }
    }

    pub async fn handle(&self, command: SaveStory) -> Result<SaveStoryResponse, ApplicationError> {
        let title =
            Title::new(command.title.as_str()).map_err(|e| ApplicationError::validation(e))?;

        // 账户必须存在
        self.account_repo
            .find_by_id(command.account_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Account", command.account_id))?;

        let session = self.sessions.get(&command.session_id)?;

        // 素材未全部解析也允许保存，仅提示
        let aggregate = Story::from_scenes(title, session.scenes);
        if !aggregate.is_complete() {
            tracing::warn!(
                session_id = %command.session_id,
                "Saving story with unresolved scene assets"
            );
        }

        let story = StoryRecord {
            id: Uuid::new_v4(),
            account_id: command.account_id,
            title: command.title.clone(),
            scenes: aggregate.scenes().to_vec(),
            created_at: Utc::now(),
        };

        let scene_count = story.scenes.len();
        self.story_repo.save(&story).await?;

        // 保存后会话继续存活，刷新活跃时间
        self.sessions.touch(&command.session_id);

        tracing::info!(
            story_id = %story.id,
            account_id = %command.account_id,
            title = %command.title,
            scene_count = scene_count,
            "Story saved"
        );

        Ok(SaveStoryResponse {
            story_id: story.id,
            title: command.title,
            scene_count,
        })
    }
}

// ============================================================================
// DeleteStory
// ============================================================================

/// DeleteStory Handler
pub struct DeleteStoryHandler {
    story_repo: Arc<dyn StoryRepositoryPort>,
}

impl DeleteStoryHandler {
    pub fn new(story_repo: Arc<dyn StoryRepositoryPort>) -> Self {
        Self { story_repo }
    }

    pub async fn handle(&self, command: DeleteStory) -> Result<(), ApplicationError> {
        let story_id = command.story_id;

        // 检查故事是否存在
        let story = self
            .story_repo
            .find_by_id(story_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Story", story_id))?;

        self.story_repo.delete(story_id).await?;

        tracing::info!(
            story_id = %story_id,
            title = %story.title,
            "Story deleted"
        );

        Ok(())
    }
}
