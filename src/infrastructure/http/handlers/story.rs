//! Story Handlers

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::{DeleteStory, GenerateStory, GetStory, ListStories, SaveStory};
use crate::infrastructure::http::dto::{ApiResponse, Empty, SceneDto};
use crate::infrastructure::http::error::ApiError;
use crate::infrastructure::http::state::AppState;

// ============================================================================
// Generate Story
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStoryResponseDto {
    pub session_id: String,
    pub scenes: Vec<SceneDto>,
}

pub async fn generate_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GenerateStoryRequest>,
) -> Result<Json<ApiResponse<GenerateStoryResponseDto>>, ApiError> {
    let command = GenerateStory { prompt: req.prompt };

    let result = state.generate_story_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(GenerateStoryResponseDto {
        session_id: result.session_id,
        scenes: result.scenes.iter().map(SceneDto::from).collect(),
    })))
}

// ============================================================================
// Save Story
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStoryRequest {
    pub session_id: String,
    pub account_id: Uuid,
    pub title: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStoryResponseDto {
    pub story_id: Uuid,
    pub title: String,
    pub scene_count: usize,
}

pub async fn save_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SaveStoryRequest>,
) -> Result<Json<ApiResponse<SaveStoryResponseDto>>, ApiError> {
    let command = SaveStory {
        session_id: req.session_id,
        account_id: req.account_id,
        title: req.title,
    };

    let result = state.save_story_handler.handle(command).await?;

    Ok(Json(ApiResponse::success(SaveStoryResponseDto {
        story_id: result.story_id,
        title: result.title,
        scene_count: result.scene_count,
    })))
}

// ============================================================================
// Get Story
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetStoryRequest {
    pub story_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryResponseDto {
    pub story_id: Uuid,
    pub account_id: Uuid,
    pub title: String,
    pub scenes: Vec<SceneDto>,
    pub created_at: String,
}

pub async fn get_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<GetStoryRequest>,
) -> Result<Json<ApiResponse<StoryResponseDto>>, ApiError> {
    let query = GetStory {
        story_id: req.story_id,
    };

    let record = state.get_story_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(StoryResponseDto {
        story_id: record.id,
        account_id: record.account_id,
        title: record.title,
        scenes: record.scenes.iter().map(SceneDto::from).collect(),
        created_at: record.created_at.to_rfc3339(),
    })))
}

// ============================================================================
// List Stories
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStoriesRequest {
    pub account_id: Uuid,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StorySummaryDto {
    pub story_id: Uuid,
    pub title: String,
    pub scene_count: usize,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStoriesResponseDto {
    pub stories: Vec<StorySummaryDto>,
}

pub async fn list_stories(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ListStoriesRequest>,
) -> Result<Json<ApiResponse<ListStoriesResponseDto>>, ApiError> {
    let query = ListStories {
        account_id: req.account_id,
    };

    let summaries = state.list_stories_handler.handle(query).await?;

    Ok(Json(ApiResponse::success(ListStoriesResponseDto {
        stories: summaries
            .into_iter()
            .map(|s| StorySummaryDto {
                story_id: s.id,
                title: s.title,
                scene_count: s.scene_count,
                created_at: s.created_at.to_rfc3339(),
            })
            .collect(),
    })))
}

// ============================================================================
// Delete Story
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteStoryRequest {
    pub story_id: Uuid,
}

pub async fn delete_story(
    State(state): State<Arc<AppState>>,
    Json(req): Json<DeleteStoryRequest>,
) -> Result<Json<ApiResponse<Empty>>, ApiError> {
    let command = DeleteStory {
        story_id: req.story_id,
    };

    state.delete_story_handler.handle(command).await?;

    Ok(Json(ApiResponse::ok()))
}
