//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（GenerativeModel、AssetCache、Repository、SessionManager）
//! - commands: CQRS 命令及处理器（素材生成编排器在此）
//! - queries: CQRS 查询及处理器
//! - error: 应用层错误定义

pub mod commands;
pub mod error;
pub mod ports;
pub mod queries;

// Re-exports
pub use commands::{
    // Account commands
    RegisterAccount,
    // Asset commands
    GenerateAudio,
    GenerateImage,
    // Story commands
    DeleteStory,
    GenerateStory,
    SaveStory,
    // Handlers
    handlers::{
        DeleteStoryHandler, GenerateAudioHandler, GenerateAudioResponse, GenerateImageHandler,
        GenerateImageResponse, GenerateStoryHandler, GenerateStoryResponse, MediaGenConfig,
        RegisterAccountHandler, RegisterAccountResponse, SaveStoryHandler, SaveStoryResponse,
    },
};

pub use error::ApplicationError;

pub use ports::{
    // Asset cache
    audio_identity,
    fingerprint,
    AssetCacheEntry,
    AssetCachePort,
    AssetKind,
    CacheError,
    // Generative model
    GenError,
    GenerativeModelPort,
    InlinePayload,
    MediaResponse,
    ResponseCandidate,
    ResponsePart,
    SceneDraft,
    // Repositories
    AccountRecord,
    AccountRepositoryPort,
    RepositoryError,
    StoryRecord,
    StoryRepositoryPort,
    StorySummary,
    // Session manager
    SessionError,
    SessionManagerPort,
    StorySession,
};

pub use queries::{
    // Story queries
    GetStory,
    ListStories,
    // Handlers
    handlers::{GetStoryHandler, ListStoriesHandler},
};
