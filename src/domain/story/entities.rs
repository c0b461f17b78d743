//! Story Context - Entities

use serde::{Deserialize, Serialize};

/// 场景 - 幻灯片播放的最小单位
///
/// 不变量:
/// - index 在 Story 内唯一且有序
/// - text 不可为空
///
/// 生命周期: 由故事结构生成创建（此时无已解析素材），素材逐个解析后
/// 原地填充 image_url / audio_url，场景本身不会被删除。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scene {
    /// 场景索引（在故事中的顺序）
    index: usize,
    /// 旁白文本
    text: String,
    /// 图像生成提示词
    image_prompt: String,
    /// 旁白朗读指令（语气/风格）
    audio_prompt: String,
    /// 已解析的图像引用（URL 或 data URI）
    image_url: Option<String>,
    /// 已解析的音频引用（URL 或 data URI）
    audio_url: Option<String>,
}

impl Scene {
    pub fn new(
        index: usize,
        text: String,
        image_prompt: String,
        audio_prompt: String,
    ) -> Result<Self, &'static str> {
        if text.is_empty() {
            return Err("场景文本不能为空");
        }
        Ok(Self {
            index,
            text,
            image_prompt,
            audio_prompt,
            image_url: None,
            audio_url: None,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn image_prompt(&self) -> &str {
        &self.image_prompt
    }

    pub fn audio_prompt(&self) -> &str {
        &self.audio_prompt
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn audio_url(&self) -> Option<&str> {
        self.audio_url.as_deref()
    }

    /// 记录已解析的图像引用
    pub fn set_image_url(&mut self, url: impl Into<String>) {
        self.image_url = Some(url.into());
    }

    /// 记录已解析的音频引用
    pub fn set_audio_url(&mut self, url: impl Into<String>) {
        self.audio_url = Some(url.into());
    }

    /// 场景是否完整（图像与音频均已解析）
    pub fn is_complete(&self) -> bool {
        self.image_url.is_some() && self.audio_url.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        Scene::new(
            0,
            "The dragon woke up.".to_string(),
            "a dragon waking in a cave".to_string(),
            "Speak excitedly".to_string(),
        )
        .unwrap()
    }

    #[test]
    fn test_scene_rejects_empty_text() {
        assert!(Scene::new(0, String::new(), "p".into(), "a".into()).is_err());
    }

    #[test]
    fn test_scene_complete_only_with_both_assets() {
        let mut s = scene();
        assert!(!s.is_complete());

        s.set_image_url("data:image/png;base64,AAAA");
        assert!(!s.is_complete());

        s.set_audio_url("data:audio/wav;base64,AAAA");
        assert!(s.is_complete());
    }
}
