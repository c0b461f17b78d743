//! Asset Command Handlers - 素材生成编排
//!
//! 每个素材请求独立走一遍状态机:
//! 缓存点查 →（命中）返回缓存引用
//! →（未命中）调用外部生成服务 → 提取内联载荷 → [PCM 打包为 WAV]
//! → 写入缓存 → 返回引用
//!
//! 点查与写入之间没有事务包裹：两个并发的首次请求可能都未命中、
//! 都调用生成服务、都尝试写入，存储层唯一约束让第二次写入变成
//! 良性冲突，编排器吞掉冲突并返回自己计算的引用。

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::sync::Arc;

use crate::application::commands::{GenerateAudio, GenerateImage};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    audio_identity, fingerprint, AssetCachePort, AssetKind, CacheError, GenerativeModelPort,
    SessionManagerPort,
};
use crate::domain::wav_data_uri;

/// TTS 服务返回裸 PCM 时采用的采样率（Hz）
///
/// 服务未在响应中声明实际采样率，这里按其原生输出的固定值写入
/// WAV 头；若服务更换原生采样率，该值需要同步调整。
const PCM_SAMPLE_RATE_HZ: u32 = 24_000;

/// 素材生成参数（宽高比与音色在部署层固定）
#[derive(Debug, Clone)]
pub struct MediaGenConfig {
    /// 图像宽高比提示，如 "16:9"
    pub aspect_ratio: String,
    /// TTS 音色标识
    pub voice: String,
}

impl Default for MediaGenConfig {
    fn default() -> Self {
        Self {
            aspect_ratio: "16:9".to_string(),
            voice: "Kore".to_string(),
        }
    }
}

/// 将二进制载荷编码为内联 data URI
fn data_uri(mime_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, BASE64.encode(data))
}

/// 判断载荷 MIME 是否为裸 PCM（需打包为 WAV 才可播放）
///
/// TTS 服务以 `audio/L16;codec=pcm;rate=24000` 一类的 MIME 返回裸采样
fn is_raw_pcm(mime_type: &str) -> bool {
    mime_type.starts_with("audio/L16") || mime_type.to_ascii_lowercase().contains("pcm")
}

/// 写入缓存，吞掉并发产生的重复键冲突
///
/// 已有条目与本次计算的引用同样有效，冲突不向调用方暴露。
async fn store_reference(
    cache: &dyn AssetCachePort,
    kind: AssetKind,
    fp: &str,
    reference: &str,
) -> Result<(), ApplicationError> {
    match cache.store(kind, fp, reference).await {
        Ok(()) => Ok(()),
        Err(CacheError::Duplicate(_)) => {
            tracing::debug!(
                kind = %kind,
                fingerprint = %fp,
                "Asset already cached by a concurrent request"
            );
            Ok(())
        }
        Err(e) => Err(ApplicationError::StorageError(e.to_string())),
    }
}

/// 把解析结果记录到会话场景上（请求方提供了会话定位时）
///
/// 素材本身已成功解析，会话侧的记录失败只告警、不影响返回
fn record_to_session(
    sessions: &dyn SessionManagerPort,
    session_id: Option<&str>,
    scene_index: Option<usize>,
    kind: AssetKind,
    reference: &str,
) {
    let (Some(id), Some(index)) = (session_id, scene_index) else {
        return;
    };

    let result = match kind {
        AssetKind::Image => sessions.set_scene_image(id, index, reference),
        AssetKind::Audio => sessions.set_scene_audio(id, index, reference),
    };

    if let Err(e) = result {
        tracing::warn!(
            session_id = %id,
            scene_index = index,
            kind = %kind,
            error = %e,
            "Failed to record resolved asset on session scene"
        );
    }
}

// ============================================================================
// GenerateImage
// ============================================================================

/// 图像生成响应
#[derive(Debug, Clone)]
pub struct GenerateImageResponse {
    pub image_url: String,
    /// 是否来自缓存（诊断用）
    pub cached: bool,
}

/// GenerateImage Handler - 图像生成编排器
pub struct GenerateImageHandler {
    genai: Arc<dyn GenerativeModelPort>,
    asset_cache: Arc<dyn AssetCachePort>,
    sessions: Arc<dyn SessionManagerPort>,
    config: MediaGenConfig,
}

impl GenerateImageHandler {
    pub fn new(
        genai: Arc<dyn GenerativeModelPort>,
        asset_cache: Arc<dyn AssetCachePort>,
        sessions: Arc<dyn SessionManagerPort>,
        config: MediaGenConfig,
    ) -> Self {
        Self {
            genai,
            asset_cache,
            sessions,
            config,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateImage,
    ) -> Result<GenerateImageResponse, ApplicationError> {
        if command.image_prompt.is_empty() {
            return Err(ApplicationError::validation("imagePrompt is required"));
        }

        // 指纹对提示词逐字计算，不做归一化
        let fp = fingerprint(&command.image_prompt);

        if let Some(reference) = self
            .asset_cache
            .lookup(AssetKind::Image, &fp)
            .await
            .map_err(|e| ApplicationError::StorageError(e.to_string()))?
        {
            tracing::debug!(fingerprint = %fp, "Image cache hit");
            record_to_session(
                self.sessions.as_ref(),
                command.session_id.as_deref(),
                command.scene_index,
                AssetKind::Image,
                &reference,
            );
            return Ok(GenerateImageResponse {
                image_url: reference,
                cached: true,
            });
        }

        let response = self
            .genai
            .generate_image(&command.image_prompt, &self.config.aspect_ratio)
            .await?;

        let payload = response
            .into_first_inline_payload()
            .ok_or(ApplicationError::NoPayload("image"))?;

        let reference = data_uri(&payload.mime_type, &payload.data);

        store_reference(self.asset_cache.as_ref(), AssetKind::Image, &fp, &reference).await?;

        tracing::info!(
            fingerprint = %fp,
            mime_type = %payload.mime_type,
            payload_size = payload.data.len(),
            "Image generated and cached"
        );

        record_to_session(
            self.sessions.as_ref(),
            command.session_id.as_deref(),
            command.scene_index,
            AssetKind::Image,
            &reference,
        );

        Ok(GenerateImageResponse {
            image_url: reference,
            cached: false,
        })
    }
}

// ============================================================================
// GenerateAudio
// ============================================================================

/// 音频生成响应
#[derive(Debug, Clone)]
pub struct GenerateAudioResponse {
    pub audio_url: String,
    /// 是否来自缓存（诊断用）
    pub cached: bool,
}

/// GenerateAudio Handler - 音频生成编排器
pub struct GenerateAudioHandler {
    genai: Arc<dyn GenerativeModelPort>,
    asset_cache: Arc<dyn AssetCachePort>,
    sessions: Arc<dyn SessionManagerPort>,
    config: MediaGenConfig,
}

impl GenerateAudioHandler {
    pub fn new(
        genai: Arc<dyn GenerativeModelPort>,
        asset_cache: Arc<dyn AssetCachePort>,
        sessions: Arc<dyn SessionManagerPort>,
        config: MediaGenConfig,
    ) -> Self {
        Self {
            genai,
            asset_cache,
            sessions,
            config,
        }
    }

    pub async fn handle(
        &self,
        command: GenerateAudio,
    ) -> Result<GenerateAudioResponse, ApplicationError> {
        if command.text.is_empty() {
            return Err(ApplicationError::validation("text is required"));
        }
        if command.audio_prompt.is_empty() {
            return Err(ApplicationError::validation("audioPrompt is required"));
        }

        // 标识串 = "朗读指令:旁白文本"，指令或文本任一变化都会改变指纹
        let identity = audio_identity(&command.audio_prompt, &command.text);
        let fp = fingerprint(&identity);

        if let Some(reference) = self
            .asset_cache
            .lookup(AssetKind::Audio, &fp)
            .await
            .map_err(|e| ApplicationError::StorageError(e.to_string()))?
        {
            tracing::debug!(fingerprint = %fp, "Audio cache hit");
            record_to_session(
                self.sessions.as_ref(),
                command.session_id.as_deref(),
                command.scene_index,
                AssetKind::Audio,
                &reference,
            );
            return Ok(GenerateAudioResponse {
                audio_url: reference,
                cached: true,
            });
        }

        let response = self
            .genai
            .generate_speech(&command.audio_prompt, &command.text, &self.config.voice)
            .await?;

        let payload = response
            .into_first_inline_payload()
            .ok_or(ApplicationError::NoPayload("audio"))?;

        // 裸 PCM 打包为 WAV；已编码格式原样内联
        let reference = if is_raw_pcm(&payload.mime_type) {
            wav_data_uri(&payload.data, PCM_SAMPLE_RATE_HZ)
        } else {
            data_uri(&payload.mime_type, &payload.data)
        };

        store_reference(self.asset_cache.as_ref(), AssetKind::Audio, &fp, &reference).await?;

        tracing::info!(
            fingerprint = %fp,
            mime_type = %payload.mime_type,
            payload_size = payload.data.len(),
            "Audio generated and cached"
        );

        record_to_session(
            self.sessions.as_ref(),
            command.session_id.as_deref(),
            command.scene_index,
            AssetKind::Audio,
            &reference,
        );

        Ok(GenerateAudioResponse {
            audio_url: reference,
            cached: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        GenError, InlinePayload, MediaResponse, ResponseCandidate, ResponsePart, SceneDraft,
        SessionError, StorySession,
    };
    use async_trait::async_trait;
    use dashmap::DashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 可配置响应的生成服务替身，带调用计数
    struct FakeModel {
        media: MediaResponse,
        image_calls: AtomicUsize,
        speech_calls: AtomicUsize,
    }

    impl FakeModel {
        fn with_media(media: MediaResponse) -> Self {
            Self {
                media,
                image_calls: AtomicUsize::new(0),
                speech_calls: AtomicUsize::new(0),
            }
        }

        fn with_inline(mime: &str, data: &[u8]) -> Self {
            Self::with_media(MediaResponse {
                candidates: vec![ResponseCandidate {
                    parts: vec![ResponsePart::Inline(InlinePayload {
                        mime_type: mime.to_string(),
                        data: data.to_vec(),
                    })],
                }],
            })
        }

        fn empty() -> Self {
            Self::with_media(MediaResponse::default())
        }
    }

    #[async_trait]
    impl GenerativeModelPort for FakeModel {
        async fn generate_scenes(&self, _prompt: &str) -> Result<Vec<SceneDraft>, GenError> {
            Ok(Vec::new())
        }

        async fn generate_image(
            &self,
            _prompt: &str,
            _aspect_ratio: &str,
        ) -> Result<MediaResponse, GenError> {
            self.image_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.media.clone())
        }

        async fn generate_speech(
            &self,
            _instruction: &str,
            _text: &str,
            _voice: &str,
        ) -> Result<MediaResponse, GenError> {
            self.speech_calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.media.clone())
        }
    }

    /// 内存缓存替身，可强制 store 返回重复键冲突
    #[derive(Default)]
    struct MemoryCache {
        entries: DashMap<(AssetKind, String), String>,
        force_duplicate: bool,
    }

    impl MemoryCache {
        fn forcing_duplicate() -> Self {
            Self {
                entries: DashMap::new(),
                force_duplicate: true,
            }
        }
    }

    #[async_trait]
    impl AssetCachePort for MemoryCache {
        async fn lookup(
            &self,
            kind: AssetKind,
            fp: &str,
        ) -> Result<Option<String>, CacheError> {
            Ok(self
                .entries
                .get(&(kind, fp.to_string()))
                .map(|r| r.value().clone()))
        }

        async fn store(
            &self,
            kind: AssetKind,
            fp: &str,
            reference: &str,
        ) -> Result<(), CacheError> {
            if self.force_duplicate {
                return Err(CacheError::Duplicate(format!("{}:{}", kind, fp)));
            }
            let key = (kind, fp.to_string());
            if self.entries.contains_key(&key) {
                return Err(CacheError::Duplicate(format!("{}:{}", kind, fp)));
            }
            self.entries.insert(key, reference.to_string());
            Ok(())
        }

        async fn count(&self) -> Result<u64, CacheError> {
            Ok(self.entries.len() as u64)
        }
    }

    /// 会话替身：记录写入的场景素材引用
    #[derive(Default)]
    struct RecordingSessions {
        images: DashMap<(String, usize), String>,
        audios: DashMap<(String, usize), String>,
    }

    impl SessionManagerPort for RecordingSessions {
        fn create(&self, session: StorySession) -> Result<String, SessionError> {
            Ok(session.id)
        }

        fn get(&self, id: &str) -> Result<StorySession, SessionError> {
            Err(SessionError::NotFound(id.to_string()))
        }

        fn set_scene_image(
            &self,
            id: &str,
            index: usize,
            url: &str,
        ) -> Result<(), SessionError> {
            self.images.insert((id.to_string(), index), url.to_string());
            Ok(())
        }

        fn set_scene_audio(
            &self,
            id: &str,
            index: usize,
            url: &str,
        ) -> Result<(), SessionError> {
            self.audios.insert((id.to_string(), index), url.to_string());
            Ok(())
        }

        fn close(&self, _id: &str) -> Result<(), SessionError> {
            Ok(())
        }

        fn touch(&self, _id: &str) {}

        fn get_expired_sessions(&self, _idle_timeout_secs: u64) -> Vec<String> {
            Vec::new()
        }

        fn list_all(&self) -> Vec<String> {
            Vec::new()
        }
    }

    fn audio_handler(
        model: Arc<FakeModel>,
        cache: Arc<MemoryCache>,
    ) -> GenerateAudioHandler {
        GenerateAudioHandler::new(
            model,
            cache,
            Arc::new(RecordingSessions::default()),
            MediaGenConfig::default(),
        )
    }

    fn image_handler(
        model: Arc<FakeModel>,
        cache: Arc<MemoryCache>,
    ) -> GenerateImageHandler {
        GenerateImageHandler::new(
            model,
            cache,
            Arc::new(RecordingSessions::default()),
            MediaGenConfig::default(),
        )
    }

    fn audio_command(text: &str, prompt: &str) -> GenerateAudio {
        GenerateAudio {
            text: text.to_string(),
            audio_prompt: prompt.to_string(),
            session_id: None,
            scene_index: None,
        }
    }

    #[tokio::test]
    async fn test_audio_miss_generates_wav_and_caches_by_identity_hash() {
        let model = Arc::new(FakeModel::with_inline(
            "audio/L16;codec=pcm;rate=24000",
            &[0x01, 0x02, 0x03, 0x04],
        ));
        let cache = Arc::new(MemoryCache::default());
        let handler = audio_handler(model.clone(), cache.clone());

        let result = handler
            .handle(audio_command("The dragon woke up.", "Speak excitedly"))
            .await
            .unwrap();

        assert!(!result.cached);
        assert!(result.audio_url.starts_with("data:audio/wav;base64,"));
        assert_eq!(model.speech_calls.load(Ordering::SeqCst), 1);

        // 缓存 key = md5("Speak excitedly:The dragon woke up.")
        let fp = fingerprint("Speak excitedly:The dragon woke up.");
        let cached = cache.lookup(AssetKind::Audio, &fp).await.unwrap();
        assert_eq!(cached.as_deref(), Some(result.audio_url.as_str()));
    }

    #[tokio::test]
    async fn test_second_identical_audio_request_hits_cache() {
        let model = Arc::new(FakeModel::with_inline(
            "audio/L16;codec=pcm;rate=24000",
            &[0u8; 32],
        ));
        let cache = Arc::new(MemoryCache::default());
        let handler = audio_handler(model.clone(), cache);

        let first = handler
            .handle(audio_command("The dragon woke up.", "Speak excitedly"))
            .await
            .unwrap();
        let second = handler
            .handle(audio_command("The dragon woke up.", "Speak excitedly"))
            .await
            .unwrap();

        assert!(second.cached);
        assert_eq!(first.audio_url, second.audio_url);
        // 第二次请求不再调用生成服务
        assert_eq!(model.speech_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_first_time_requests_agree_and_cache_once() {
        let model = Arc::new(FakeModel::with_inline(
            "audio/L16;codec=pcm;rate=24000",
            &[7u8; 64],
        ));
        let cache = Arc::new(MemoryCache::default());
        let handler = Arc::new(audio_handler(model, cache.clone()));

        let h1 = handler.clone();
        let h2 = handler.clone();
        let (a, b) = tokio::join!(
            h1.handle(audio_command("The dragon woke up.", "Speak excitedly")),
            h2.handle(audio_command("The dragon woke up.", "Speak excitedly")),
        );

        // 两个请求都成功，引用相等（各自独立计算也一致）
        let a = a.unwrap();
        let b = b.unwrap();
        assert_eq!(a.audio_url, b.audio_url);
        // 缓存最终只有一行
        assert_eq!(cache.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_pre_encoded_audio_passes_through() {
        let model = Arc::new(FakeModel::with_inline("audio/mp3", &[0xFF, 0xFB, 0x90]));
        let cache = Arc::new(MemoryCache::default());
        let handler = audio_handler(model, cache);

        let result = handler.handle(audio_command("text", "calm")).await.unwrap();
        assert!(result.audio_url.starts_with("data:audio/mp3;base64,"));
    }

    #[tokio::test]
    async fn test_image_no_candidates_is_no_payload_and_not_cached() {
        let model = Arc::new(FakeModel::empty());
        let cache = Arc::new(MemoryCache::default());
        let handler = image_handler(model, cache.clone());

        let err = handler
            .handle(GenerateImage {
                image_prompt: "a dragon".to_string(),
                session_id: None,
                scene_index: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::NoPayload("image")));
        assert_eq!(cache.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_store_conflict_is_swallowed() {
        let model = Arc::new(FakeModel::with_inline("image/png", &[1, 2, 3]));
        let cache = Arc::new(MemoryCache::forcing_duplicate());
        let handler = image_handler(model, cache);

        // 并发请求已写入同一 key：本请求仍返回自己计算的引用
        let result = handler
            .handle(GenerateImage {
                image_prompt: "a dragon".to_string(),
                session_id: None,
                scene_index: None,
            })
            .await
            .unwrap();

        assert!(result.image_url.starts_with("data:image/png;base64,"));
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected_before_any_work() {
        let model = Arc::new(FakeModel::with_inline("image/png", &[1]));
        let cache = Arc::new(MemoryCache::default());
        let handler = image_handler(model.clone(), cache);

        let err = handler
            .handle(GenerateImage {
                image_prompt: String::new(),
                session_id: None,
                scene_index: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, ApplicationError::ValidationError(_)));
        assert_eq!(model.image_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resolved_image_recorded_on_session_scene() {
        let model = Arc::new(FakeModel::with_inline("image/png", &[5, 6]));
        let cache = Arc::new(MemoryCache::default());
        let sessions = Arc::new(RecordingSessions::default());
        let handler = GenerateImageHandler::new(
            model,
            cache,
            sessions.clone(),
            MediaGenConfig::default(),
        );

        let result = handler
            .handle(GenerateImage {
                image_prompt: "a dragon".to_string(),
                session_id: Some("sess-1".to_string()),
                scene_index: Some(2),
            })
            .await
            .unwrap();

        let recorded = sessions
            .images
            .get(&("sess-1".to_string(), 2))
            .map(|r| r.value().clone());
        assert_eq!(recorded.as_deref(), Some(result.image_url.as_str()));
    }

    #[tokio::test]
    async fn test_resolved_audio_recorded_on_session_scene() {
        let model = Arc::new(FakeModel::with_inline("audio/pcm", &[0u8; 16]));
        let cache = Arc::new(MemoryCache::default());
        let sessions = Arc::new(RecordingSessions::default());
        let handler = GenerateAudioHandler::new(
            model,
            cache,
            sessions.clone(),
            MediaGenConfig::default(),
        );

        let result = handler
            .handle(GenerateAudio {
                text: "The dragon woke up.".to_string(),
                audio_prompt: "Speak excitedly".to_string(),
                session_id: Some("sess-1".to_string()),
                scene_index: Some(0),
            })
            .await
            .unwrap();

        let recorded = sessions
            .audios
            .get(&("sess-1".to_string(), 0))
            .map(|r| r.value().clone());
        assert_eq!(recorded.as_deref(), Some(result.audio_url.as_str()));
    }

    #[test]
    fn test_raw_pcm_mime_detection() {
        assert!(is_raw_pcm("audio/L16;codec=pcm;rate=24000"));
        assert!(is_raw_pcm("audio/pcm"));
        assert!(!is_raw_pcm("audio/mp3"));
        assert!(!is_raw_pcm("audio/ogg"));
    }
}
