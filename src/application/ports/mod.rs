//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod asset_cache;
mod generative;
mod repositories;
mod session_manager;

pub use asset_cache::{
    audio_identity, fingerprint, AssetCacheEntry, AssetCachePort, AssetKind, CacheError,
};
pub use generative::{
    GenError, GenerativeModelPort, InlinePayload, MediaResponse, ResponseCandidate, ResponsePart,
    SceneDraft,
};
pub use repositories::{
    AccountRecord, AccountRepositoryPort, RepositoryError, StoryRecord, StoryRepositoryPort,
    StorySummary,
};
pub use session_manager::{SessionError, SessionManagerPort, StorySession};
