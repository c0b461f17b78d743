//! Account Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::RegisterAccount;
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAccountResponseDto {
    pub account_id: Uuid,
    pub username: String,
}

pub async fn register_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterAccountRequest>,
) -> Result<Json<ApiResponse<RegisterAccountResponseDto>>, ApiError> {
    let command = RegisterAccount {
        username: req.username,
        password: req.password,
    };

    let result = state.register_account_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(RegisterAccountResponseDto {
        account_id: result.account_id,
        username: result.username,
    })))
}
