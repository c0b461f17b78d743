//! Generative Model Port - 生成式模型服务抽象
//!
//! 定义对外部生成式 AI 服务（文本 / 图像 / 语音）的抽象接口，
//! 具体实现在 infrastructure/adapters 层。
//!
//! 响应信封使用显式的 candidate/part 结构：适配器负责解析服务的
//! 原始 JSON 并解码内联 base64 数据，编排器通过类型化的提取函数
//! 取出第一个内联载荷，载荷缺失是一个类型化的结果而非异常。

use async_trait::async_trait;
use thiserror::Error;

/// 生成服务错误
///
/// 载荷缺失不在此列：空响应由信封的提取函数以 `None` 表达。
#[derive(Debug, Error)]
pub enum GenError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 故事结构生成产出的场景草稿
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneDraft {
    /// 旁白文本
    pub text: String,
    /// 图像生成提示词
    pub image_prompt: String,
    /// 朗读指令
    pub audio_prompt: String,
}

/// 内联二进制载荷（适配器已完成 base64 解码）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlinePayload {
    /// 服务声明的 MIME 类型，如 `image/png`、`audio/L16;codec=pcm;rate=24000`
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// 响应内容块
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponsePart {
    Text(String),
    Inline(InlinePayload),
}

/// 响应候选
#[derive(Debug, Clone, Default)]
pub struct ResponseCandidate {
    pub parts: Vec<ResponsePart>,
}

/// 图像/语音生成响应信封
#[derive(Debug, Clone, Default)]
pub struct MediaResponse {
    pub candidates: Vec<ResponseCandidate>,
}

impl MediaResponse {
    /// 提取第一个候选中的第一个内联二进制载荷
    ///
    /// 策略：只看第一个候选；其余候选即使携带数据也被忽略。
    /// 无任何内联载荷时返回 `None`（调用方映射为 404 类结果）。
    pub fn into_first_inline_payload(self) -> Option<InlinePayload> {
        self.candidates
            .into_iter()
            .next()?
            .parts
            .into_iter()
            .find_map(|part| match part {
                ResponsePart::Inline(payload) => Some(payload),
                ResponsePart::Text(_) => None,
            })
    }
}

/// Generative Model Port
///
/// 外部生成式 AI 服务的抽象接口。超时由适配器的 HTTP 客户端负责，
/// 此处不附加额外超时；调用一旦发出即运行至完成或失败，不做取消。
#[async_trait]
pub trait GenerativeModelPort: Send + Sync {
    /// 根据用户提示词生成多场景故事结构
    ///
    /// 服务返回无法解析的 JSON 时产出空序列（由调用方判定为终态失败），
    /// 而非解析错误。
    async fn generate_scenes(&self, prompt: &str) -> Result<Vec<SceneDraft>, GenError>;

    /// 生成场景图像（固定宽高比提示）
    async fn generate_image(
        &self,
        prompt: &str,
        aspect_ratio: &str,
    ) -> Result<MediaResponse, GenError>;

    /// 生成旁白语音（固定音色，请求音频模态输出）
    async fn generate_speech(
        &self,
        instruction: &str,
        text: &str,
        voice: &str,
    ) -> Result<MediaResponse, GenError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(mime: &str, data: &[u8]) -> ResponsePart {
        ResponsePart::Inline(InlinePayload {
            mime_type: mime.to_string(),
            data: data.to_vec(),
        })
    }

    #[test]
    fn test_first_inline_payload_skips_text_parts() {
        let resp = MediaResponse {
            candidates: vec![ResponseCandidate {
                parts: vec![
                    ResponsePart::Text("caption".into()),
                    inline("image/png", &[1, 2, 3]),
                    inline("image/png", &[9, 9, 9]),
                ],
            }],
        };

        let payload = resp.into_first_inline_payload().unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_only_first_candidate_is_considered() {
        let resp = MediaResponse {
            candidates: vec![
                ResponseCandidate {
                    parts: vec![ResponsePart::Text("no data here".into())],
                },
                ResponseCandidate {
                    parts: vec![inline("image/png", &[1])],
                },
            ],
        };

        assert!(resp.into_first_inline_payload().is_none());
    }

    #[test]
    fn test_empty_response_yields_none() {
        assert!(MediaResponse::default().into_first_inline_payload().is_none());
    }
}
