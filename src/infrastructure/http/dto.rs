//! Data Transfer Objects
//!
//! 对外 JSON 字段统一 camelCase（与前端契约一致）

use serde::Serialize;

use crate::domain::story::Scene;

// ============================================================================
// 统一响应结构
// ============================================================================

/// 统一 API 响应格式
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub errno: i32,
    pub error: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 成功响应
    pub fn success(data: T) -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(data),
        }
    }
}

/// 空数据响应
#[derive(Debug, Serialize)]
pub struct Empty {}

impl ApiResponse<Empty> {
    /// 成功但无数据
    pub fn ok() -> Self {
        Self {
            errno: 0,
            error: String::new(),
            data: Some(Empty {}),
        }
    }
}

// ============================================================================
// Scene DTO
// ============================================================================

/// 场景 DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDto {
    pub index: usize,
    pub text: String,
    pub image_prompt: String,
    pub audio_prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl From<&Scene> for SceneDto {
    fn from(scene: &Scene) -> Self {
        Self {
            index: scene.index(),
            text: scene.text().to_string(),
            image_prompt: scene.image_prompt().to_string(),
            audio_prompt: scene.audio_prompt().to_string(),
            image_url: scene.image_url().map(str::to_string),
            audio_url: scene.audio_url().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_dto_serializes_camel_case() {
        let mut scene = Scene::new(0, "t".into(), "i".into(), "a".into()).unwrap();
        scene.set_image_url("data:image/png;base64,AA==");

        let json = serde_json::to_value(SceneDto::from(&scene)).unwrap();
        assert_eq!(json["imagePrompt"], "i");
        assert_eq!(json["audioPrompt"], "a");
        assert_eq!(json["imageUrl"], "data:image/png;base64,AA==");
        // 未解析的素材字段不序列化
        assert!(json.get("audioUrl").is_none());
    }
}
