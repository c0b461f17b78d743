//! Gemini Client - 调用 Gemini generateContent HTTP API
//!
//! 实现 GenerativeModelPort trait，通过 HTTP 调用生成式模型服务
//!
//! 外部 API:
//! POST {base_url}/v1beta/models/{model}:generateContent
//! Request: JSON（camelCase），contents.parts 携带提示词
//! Response: candidates[].content.parts[]，二进制载荷为 inlineData（base64）

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{
    GenError, GenerativeModelPort, InlinePayload, MediaResponse, ResponseCandidate, ResponsePart,
    SceneDraft,
};

/// 故事结构生成提示词模板
///
/// 要求严格 JSON 数组输出；字段名与前端契约一致（camelCase）
const STORY_PROMPT_TEMPLATE: &str = "\
You are a storyteller. Based on the user's idea, write a short story split \
into 4 to 6 scenes. Respond with ONLY a JSON array, no other text. Each \
element must have exactly these string fields: \"text\" (the narrative for \
the scene), \"imagePrompt\" (a vivid visual description for an illustration), \
\"audioPrompt\" (a short narration instruction, e.g. tone of voice).\n\
User's idea: ";

// ============================================================================
// Wire 类型（请求）
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<SpeechConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SpeechConfig {
    voice_config: VoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceConfig {
    prebuilt_voice_config: PrebuiltVoiceConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PrebuiltVoiceConfig {
    voice_name: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: String,
}

impl GenerateContentRequest {
    fn from_prompt(prompt: impl Into<String>, config: Option<GenerationConfig>) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.into(),
                }],
            }],
            generation_config: config,
        }
    }
}

// ============================================================================
// Wire 类型（响应）
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<WireCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireCandidate {
    content: Option<WireContent>,
}

#[derive(Debug, Deserialize)]
struct WireContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    text: Option<String>,
    inline_data: Option<WireInlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireInlineData {
    mime_type: String,
    /// base64 编码的二进制数据
    data: String,
}

impl GenerateContentResponse {
    /// wire 信封 → 端口信封（解码 base64）
    fn into_media_response(self) -> Result<MediaResponse, GenError> {
        let mut candidates = Vec::with_capacity(self.candidates.len());

        for candidate in self.candidates {
            let wire_parts = candidate.content.map(|c| c.parts).unwrap_or_default();
            let mut parts = Vec::with_capacity(wire_parts.len());

            for part in wire_parts {
                if let Some(inline) = part.inline_data {
                    let data = BASE64.decode(inline.data.as_bytes()).map_err(|e| {
                        GenError::InvalidResponse(format!("Invalid base64 payload: {}", e))
                    })?;
                    parts.push(ResponsePart::Inline(InlinePayload {
                        mime_type: inline.mime_type,
                        data,
                    }));
                } else if let Some(text) = part.text {
                    parts.push(ResponsePart::Text(text));
                }
            }

            candidates.push(ResponseCandidate { parts });
        }

        Ok(MediaResponse { candidates })
    }

    /// 拼接第一个候选的全部文本块
    fn first_candidate_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// 客户端
// ============================================================================

/// Gemini 客户端配置
#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// API key（通过 x-goog-api-key 请求头发送）
    pub api_key: String,
    /// 故事结构生成模型
    pub story_model: String,
    /// 图像生成模型
    pub image_model: String,
    /// 语音生成模型
    pub tts_model: String,
    /// 请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: String::new(),
            story_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image-preview".to_string(),
            tts_model: "gemini-2.5-flash-preview-tts".to_string(),
            timeout_secs: 120,
        }
    }
}

/// Gemini 客户端
///
/// 超时由 HTTP 客户端统一承担；编排层不再附加超时。
/// 调用失败不重试，由调用方决定是否重新发起。
pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: GeminiClientConfig) -> Result<Self, GenError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url, model
        )
    }

    async fn generate(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, GenError> {
        let url = self.generate_url(model);

        tracing::debug!(url = %url, model = %model, "Sending generateContent request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", self.config.api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenError::Timeout
                } else if e.is_connect() {
                    GenError::NetworkError(format!("Cannot connect to model service: {}", e))
                } else {
                    GenError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GenError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|e| GenError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl GenerativeModelPort for GeminiClient {
    async fn generate_scenes(&self, prompt: &str) -> Result<Vec<SceneDraft>, GenError> {
        let full_prompt = format!("{}{}", STORY_PROMPT_TEMPLATE, prompt);
        let request = GenerateContentRequest::from_prompt(
            full_prompt,
            Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                ..Default::default()
            }),
        );

        let response = self.generate(&self.config.story_model, &request).await?;
        let text = response.first_candidate_text();
        let scenes = parse_scenes(&text);

        tracing::info!(
            prompt_len = prompt.len(),
            scene_count = scenes.len(),
            "Story structure generation completed"
        );

        Ok(scenes)
    }

    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<MediaResponse, GenError> {
        let request = GenerateContentRequest::from_prompt(
            prompt,
            Some(GenerationConfig {
                response_modalities: Some(vec!["TEXT".to_string(), "IMAGE".to_string()]),
                image_config: Some(ImageConfig {
                    aspect_ratio: aspect_ratio.to_string(),
                }),
                ..Default::default()
            }),
        );

        let response = self.generate(&self.config.image_model, &request).await?;

        tracing::info!(
            prompt_len = prompt.len(),
            candidate_count = response.candidates.len(),
            "Image generation completed"
        );

        response.into_media_response()
    }

    async fn generate_speech(
        &self,
        instruction: &str,
        text: &str,
        voice: &str,
    ) -> Result<MediaResponse, GenError> {
        let request = GenerateContentRequest::from_prompt(
            format!("{}: {}", instruction, text),
            Some(GenerationConfig {
                response_modalities: Some(vec!["AUDIO".to_string()]),
                speech_config: Some(SpeechConfig {
                    voice_config: VoiceConfig {
                        prebuilt_voice_config: PrebuiltVoiceConfig {
                            voice_name: voice.to_string(),
                        },
                    },
                }),
                ..Default::default()
            }),
        );

        let response = self.generate(&self.config.tts_model, &request).await?;

        tracing::info!(
            text_len = text.len(),
            voice = %voice,
            candidate_count = response.candidates.len(),
            "Speech generation completed"
        );

        response.into_media_response()
    }
}

// ============================================================================
// 故事结构 JSON 解析
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SceneDraftWire {
    text: String,
    image_prompt: String,
    audio_prompt: String,
}

/// 解析模型返回的场景 JSON 数组
///
/// 模型偶尔会把 JSON 包进 Markdown 代码块，先剥掉围栏再解析。
/// 无法解析时产出空序列（终态失败由调用方判定），而非错误。
fn parse_scenes(raw: &str) -> Vec<SceneDraft> {
    let trimmed = strip_code_fence(raw.trim());

    match serde_json::from_str::<Vec<SceneDraftWire>>(trimmed) {
        Ok(drafts) => drafts
            .into_iter()
            .map(|d| SceneDraft {
                text: d.text,
                image_prompt: d.image_prompt,
                audio_prompt: d.audio_prompt,
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, raw_len = raw.len(), "Failed to parse scene JSON");
            Vec::new()
        }
    }
}

/// 剥掉 ``` 或 ```json 围栏
fn strip_code_fence(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches(['\r', '\n'])
        .strip_suffix("```")
        .map(str::trim_end)
        .unwrap_or(text)
}
