//! Asset Commands - 素材生成请求

/// 生成（或命中缓存返回）场景图像
#[derive(Debug, Clone)]
pub struct GenerateImage {
    /// 图像提示词，指纹的输入，逐字使用
    pub image_prompt: String,
    /// 可选：把解析结果记录到该会话的场景上
    pub session_id: Option<String>,
    pub scene_index: Option<usize>,
}

/// 生成（或命中缓存返回）场景旁白音频
#[derive(Debug, Clone)]
pub struct GenerateAudio {
    /// 旁白文本
    pub text: String,
    /// 朗读指令（语气/风格）
    pub audio_prompt: String,
    /// 可选：把解析结果记录到该会话的场景上
    pub session_id: Option<String>,
    pub scene_index: Option<usize>,
}
