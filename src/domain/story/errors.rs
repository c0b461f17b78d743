//! Story Context - Errors

use thiserror::Error;

use super::StoryId;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("故事不存在: {0}")]
    NotFound(StoryId),

    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的场景: {0}")]
    InvalidScene(String),

    #[error("存储错误: {0}")]
    StorageError(String),
}
