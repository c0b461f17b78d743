//! Application State
//!
//! 包含所有 Command/Query Handlers 的应用状态

use std::sync::Arc;

use crate::application::{
    // Command handlers
    DeleteStoryHandler, GenerateAudioHandler, GenerateImageHandler, GenerateStoryHandler,
    MediaGenConfig, RegisterAccountHandler, SaveStoryHandler,
    // Query handlers
    GetStoryHandler, ListStoriesHandler,
    // Ports
    AccountRepositoryPort, AssetCachePort, GenerativeModelPort, SessionManagerPort,
    StoryRepositoryPort,
};

/// 应用状态
///
/// 依赖全部在启动时显式构造注入，无模块级全局客户端/存储句柄
pub struct AppState {
    // ========== Ports ==========
    pub genai: Arc<dyn GenerativeModelPort>,
    pub asset_cache: Arc<dyn AssetCachePort>,
    pub session_manager: Arc<dyn SessionManagerPort>,
    pub account_repo: Arc<dyn AccountRepositoryPort>,
    pub story_repo: Arc<dyn StoryRepositoryPort>,

    // ========== Command Handlers ==========
    pub generate_story_handler: GenerateStoryHandler,
    pub generate_image_handler: GenerateImageHandler,
    pub generate_audio_handler: GenerateAudioHandler,
    pub save_story_handler: SaveStoryHandler,
    pub delete_story_handler: DeleteStoryHandler,
    pub register_account_handler: RegisterAccountHandler,

    // ========== Query Handlers ==========
    pub get_story_handler: GetStoryHandler,
    pub list_stories_handler: ListStoriesHandler,
}

impl AppState {
    /// 创建应用状态
    pub fn new(
        genai: Arc<dyn GenerativeModelPort>,
        asset_cache: Arc<dyn AssetCachePort>,
        session_manager: Arc<dyn SessionManagerPort>,
        account_repo: Arc<dyn AccountRepositoryPort>,
        story_repo: Arc<dyn StoryRepositoryPort>,
        media_config: MediaGenConfig,
    ) -> Self {
        Self {
            // Ports
            genai: genai.clone(),
            asset_cache: asset_cache.clone(),
            session_manager: session_manager.clone(),
            account_repo: account_repo.clone(),
            story_repo: story_repo.clone(),

            // Command handlers
            generate_story_handler: GenerateStoryHandler::new(
                genai.clone(),
                session_manager.clone(),
            ),
            generate_image_handler: GenerateImageHandler::new(
                genai.clone(),
                asset_cache.clone(),
                session_manager.clone(),
                media_config.clone(),
            ),
            generate_audio_handler: GenerateAudioHandler::new(
                genai.clone(),
                asset_cache.clone(),
                session_manager.clone(),
                media_config,
            ),
            save_story_handler: SaveStoryHandler::new(
                session_manager.clone(),
                story_repo.clone(),
                account_repo.clone(),
            ),
            delete_story_handler: DeleteStoryHandler::new(story_repo.clone()),
            register_account_handler: RegisterAccountHandler::new(account_repo.clone()),

            // Query handlers
            get_story_handler: GetStoryHandler::new(story_repo.clone()),
            list_stories_handler: ListStoriesHandler::new(story_repo.clone()),
        }
    }
}
