//! 应用层错误定义
//!
//! 统一的命令/查询错误类型

use thiserror::Error;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 资源未找到
    #[error("{resource_type} not found: {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// 生成服务响应中没有可用载荷（映射为 404 类结果，不缓存、不重试）
    #[error("No {0} payload in model response")]
    NoPayload(&'static str),

    /// 验证错误
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 资源冲突（如用户名已存在）
    #[error("Conflict: {0}")]
    Conflict(String),

    /// 外部生成服务错误（原始消息保留用于诊断）
    #[error("External service error: {0}")]
    ExternalServiceError(String),

    /// 仓储错误
    #[error("Repository error: {0}")]
    RepositoryError(String),

    /// 存储错误
    #[error("Storage error: {0}")]
    StorageError(String),

    /// 内部错误
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApplicationError {
    /// 创建 NotFound 错误
    pub fn not_found(resource_type: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// 创建验证错误
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// 创建冲突错误
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    /// 创建内部错误
    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalError(message.into())
    }
}

impl From<crate::application::ports::RepositoryError> for ApplicationError {
    fn from(err: crate::application::ports::RepositoryError) -> Self {
        use crate::application::ports::RepositoryError;
        match err {
            RepositoryError::Duplicate(msg) => Self::Conflict(msg),
            other => Self::RepositoryError(other.to_string()),
        }
    }
}

impl From<crate::application::ports::GenError> for ApplicationError {
    fn from(err: crate::application::ports::GenError) -> Self {
        Self::ExternalServiceError(err.to_string())
    }
}

impl From<crate::application::ports::SessionError> for ApplicationError {
    fn from(err: crate::application::ports::SessionError) -> Self {
        use crate::application::ports::SessionError;
        match err {
            SessionError::NotFound(id) => Self::NotFound {
                resource_type: "Session",
                id,
            },
            other => Self::InternalError(other.to_string()),
        }
    }
}
