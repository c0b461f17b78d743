//! Fake GenAI Client - 用于测试/本地开发的生成服务客户端
//!
//! 不调用外部服务，返回确定性的固定内容

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::application::ports::{
    GenError, GenerativeModelPort, InlinePayload, MediaResponse, ResponseCandidate, ResponsePart,
    SceneDraft,
};

/// Fake GenAI Client 配置
#[derive(Debug, Clone)]
pub struct FakeGenAiClientConfig {
    /// 固定返回的场景数
    pub scene_count: usize,
    /// 模拟的推理延迟（毫秒）
    pub latency_ms: u64,
}

impl Default for FakeGenAiClientConfig {
    fn default() -> Self {
        Self {
            scene_count: 4,
            latency_ms: 200,
        }
    }
}

/// Fake GenAI Client
///
/// 图像返回固定字节的 `image/png` 载荷，语音返回 0.1 秒静音的
/// `audio/L16;codec=pcm;rate=24000` 载荷，故事返回固定场景序列。
/// 各方法带调用计数，便于测试断言缓存行为。
pub struct FakeGenAiClient {
    config: FakeGenAiClientConfig,
    scene_calls: AtomicUsize,
    image_calls: AtomicUsize,
    speech_calls: AtomicUsize,
}

impl FakeGenAiClient {
    pub fn new(config: FakeGenAiClientConfig) -> Self {
        tracing::info!(
            scene_count = config.scene_count,
            "FakeGenAiClient initialized"
        );
        Self {
            config,
            scene_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            speech_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(FakeGenAiClientConfig::default())
    }

    pub fn scene_calls(&self) -> usize {
        self.scene_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn speech_calls(&self) -> usize {
        self.speech_calls.load(Ordering::SeqCst)
    }

    async fn simulate_latency(&self) {
        if self.config.latency_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(self.config.latency_ms)).await;
        }
    }

    fn single_inline_response(mime_type: &str, data: Vec<u8>) -> MediaResponse {
        MediaResponse {
            candidates: vec![ResponseCandidate {
                parts: vec![ResponsePart::Inline(InlinePayload {
                    mime_type: mime_type.to_string(),
                    data,
                })],
            }],
        }
    }
}

#[async_trait]
impl GenerativeModelPort for FakeGenAiClient {
    async fn generate_scenes(&self, prompt: &str) -> Result<Vec<SceneDraft>, GenError> {
        self.scene_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        Ok((0..self.config.scene_count)
            .map(|i| SceneDraft {
                text: format!("Scene {} of a story about: {}", i + 1, prompt),
                image_prompt: format!("Illustration for scene {}: {}", i + 1, prompt),
                audio_prompt: "Narrate warmly".to_string(),
            })
            .collect())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        _aspect_ratio: &str,
    ) -> Result<MediaResponse, GenError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        tracing::debug!(prompt_len = prompt.len(), "FakeGenAiClient: fixed image");

        // PNG 魔数开头的占位字节，仅用于联调
        let data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
        Ok(Self::single_inline_response("image/png", data))
    }

    async fn generate_speech(
        &self,
        _instruction: &str,
        text: &str,
        _voice: &str,
    ) -> Result<MediaResponse, GenError> {
        self.speech_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;

        tracing::debug!(text_len = text.len(), "FakeGenAiClient: fixed audio");

        // 0.1 秒 24kHz 16bit 静音
        let data = vec![0u8; 2400 * 2];
        Ok(Self::single_inline_response(
            "audio/L16;codec=pcm;rate=24000",
            data,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> FakeGenAiClient {
        FakeGenAiClient::new(FakeGenAiClientConfig {
            scene_count: 3,
            latency_ms: 0,
        })
    }

    #[tokio::test]
    async fn test_fixed_scene_count_and_call_counter() {
        let client = client();
        let scenes = client.generate_scenes("a dragon").await.unwrap();
        assert_eq!(scenes.len(), 3);
        assert_eq!(client.scene_calls(), 1);
    }

    #[tokio::test]
    async fn test_speech_payload_is_raw_pcm() {
        let client = client();
        let media = client.generate_speech("calm", "text", "Kore").await.unwrap();
        let payload = media.into_first_inline_payload().unwrap();
        assert_eq!(payload.mime_type, "audio/L16;codec=pcm;rate=24000");
        assert_eq!(payload.data.len(), 4800);
    }
}
