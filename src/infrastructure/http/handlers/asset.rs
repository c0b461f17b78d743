//! Asset Handlers - 素材生成 API
//!
//! POST /api/image {imagePrompt} → {imageUrl}
//! POST /api/audio {text, audioPrompt} → {audioUrl}
//!
//! 均返回 404（无可用载荷）/ 500（外部或内部错误）

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::application::{GenerateAudio, GenerateImage};
use crate::infrastructure::http::dto::ApiResponse;
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Generate Image
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    pub image_prompt: String,
    /// 可选：把解析结果记录到该会话的场景上
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub scene_index: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageResponseDto {
    pub image_url: String,
    pub cached: bool,
}

pub async fn generate_image(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateImageRequest>,
) -> Result<Json<ApiResponse<GenerateImageResponseDto>>, ApiError> {
    let command = GenerateImage {
        image_prompt: req.image_prompt,
        session_id: req.session_id,
        scene_index: req.scene_index,
    };

    let result = state.generate_image_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(GenerateImageResponseDto {
        image_url: result.image_url,
        cached: result.cached,
    })))
}

// ============================================================================
// Generate Audio
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioRequest {
    pub text: String,
    pub audio_prompt: String,
    /// 可选：把解析结果记录到该会话的场景上
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub scene_index: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateAudioResponseDto {
    pub audio_url: String,
    pub cached: bool,
}

pub async fn generate_audio(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateAudioRequest>,
) -> Result<Json<ApiResponse<GenerateAudioResponseDto>>, ApiError> {
    let command = GenerateAudio {
        text: req.text,
        audio_prompt: req.audio_prompt,
        session_id: req.session_id,
        scene_index: req.scene_index,
    };

    let result = state.generate_audio_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(GenerateAudioResponseDto {
        audio_url: result.audio_url,
        cached: result.cached,
    })))
}
