//! HTTP Error Handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// 统一错误响应格式
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errno: i32,
    pub error: String,
    pub data: Option<()>,
}

impl ErrorResponse {
    pub fn new(errno: i32, error: impl Into<String>) -> Self {
        Self {
            errno,
            error: error.into(),
            data: None,
        }
    }
}

/// 错误码定义
pub mod errno {
    pub const BAD_REQUEST: i32 = 400;
    pub const NOT_FOUND: i32 = 404;
    pub const CONFLICT: i32 = 409;
    pub const INTERNAL_ERROR: i32 = 500;
}

/// API 错误
///
/// errno 与 HTTP 状态码一致：
/// - 生成服务无可用载荷 → 404
/// - 外部服务/内部错误 → 500
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Conflict(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match &self {
            ApiError::NotFound(msg) => {
                tracing::warn!(errno = errno::NOT_FOUND, error = %msg, "Resource not found");
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse::new(errno::NOT_FOUND, msg.clone()),
                )
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!(errno = errno::BAD_REQUEST, error = %msg, "Bad request");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new(errno::BAD_REQUEST, msg.clone()),
                )
            }
            ApiError::Conflict(msg) => {
                tracing::warn!(errno = errno::CONFLICT, error = %msg, "Resource conflict");
                (
                    StatusCode::CONFLICT,
                    ErrorResponse::new(errno::CONFLICT, msg.clone()),
                )
            }
            ApiError::Internal(msg) => {
                tracing::error!(errno = errno::INTERNAL_ERROR, error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(errno::INTERNAL_ERROR, msg.clone()),
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

impl From<crate::application::ApplicationError> for ApiError {
    fn from(e: crate::application::ApplicationError) -> Self {
        use crate::application::ApplicationError;
        match e {
            ApplicationError::NotFound { resource_type, id } => {
                ApiError::NotFound(format!("{} not found: {}", resource_type, id))
            }
            ApplicationError::NoPayload(kind) => {
                ApiError::NotFound(format!("No {} payload in model response", kind))
            }
            ApplicationError::ValidationError(msg) => ApiError::BadRequest(msg),
            ApplicationError::Conflict(msg) => ApiError::Conflict(msg),
            // 外部服务失败对客户端呈现为不透明的内部错误
            ApplicationError::ExternalServiceError(msg) => ApiError::Internal(msg),
            ApplicationError::RepositoryError(msg) => ApiError::Internal(msg),
            ApplicationError::StorageError(msg) => ApiError::Internal(msg),
            ApplicationError::InternalError(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<crate::application::RepositoryError> for ApiError {
    fn from(e: crate::application::RepositoryError) -> Self {
        use crate::application::RepositoryError;
        match e {
            RepositoryError::NotFound(msg) => ApiError::NotFound(msg),
            RepositoryError::Duplicate(msg) => ApiError::Conflict(msg),
            _ => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ApplicationError;

    #[test]
    fn test_no_payload_maps_to_not_found() {
        let api: ApiError = ApplicationError::NoPayload("image").into();
        assert!(matches!(api, ApiError::NotFound(_)));
    }

    #[test]
    fn test_external_service_error_maps_to_internal() {
        let api: ApiError =
            ApplicationError::ExternalServiceError("HTTP 503: overloaded".into()).into();
        assert!(matches!(api, ApiError::Internal(_)));
    }

    #[test]
    fn test_conflict_maps_to_conflict() {
        let api: ApiError = ApplicationError::Conflict("username: bob".into()).into();
        assert!(matches!(api, ApiError::Conflict(_)));
    }
}
