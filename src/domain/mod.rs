//! Domain Layer - 领域层
//!
//! 包含:
//! - Story Context: 故事与场景管理
//! - WAV 编码器: PCM → WAV 容器组装（纯函数）

pub mod story;

// 共享的 WAV 编码器
mod wav_encoder;

pub use wav_encoder::{wav_data_uri, wav_from_pcm};
