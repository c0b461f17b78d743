//! Asset Cache Port - 生成素材缓存
//!
//! 定义内容寻址素材缓存的抽象接口，具体实现使用 SQLite。
//! 缓存 key 为 (素材类别, 请求指纹)，存储层保证其唯一。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Asset Cache 错误
#[derive(Debug, Error)]
pub enum CacheError {
    /// (kind, fingerprint) 已存在。并发请求各自生成同一素材时第二次
    /// 写入会触发该错误，编排器将其视为良性冲突吞掉。
    #[error("Cache entry already exists: {0}")]
    Duplicate(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

/// 素材类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// 场景图像
    Image,
    /// 场景旁白音频
    Audio,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Audio => "audio",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "image" => Some(AssetKind::Image),
            "audio" => Some(AssetKind::Audio),
            _ => None,
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 缓存条目
#[derive(Debug, Clone)]
pub struct AssetCacheEntry {
    pub kind: AssetKind,
    pub fingerprint: String,
    /// 远程 URL 或 `data:<mime>;base64,...` 内联引用
    pub reference: String,
    /// 仅供参考，不参与任何逻辑
    pub created_at: DateTime<Utc>,
}

/// Asset Cache Port
///
/// 基于请求指纹的持久缓存:
/// - key: (kind, md5(identity))
/// - 无淘汰、无 TTL、无容量上限：生成素材低基数、可复用，全部长期保留
#[async_trait]
pub trait AssetCachePort: Send + Sync {
    /// 点查缓存引用，无副作用
    async fn lookup(
        &self,
        kind: AssetKind,
        fingerprint: &str,
    ) -> Result<Option<String>, CacheError>;

    /// 插入新条目
    ///
    /// (kind, fingerprint) 已存在时返回 `CacheError::Duplicate`，
    /// 不覆盖已有引用。
    async fn store(
        &self,
        kind: AssetKind,
        fingerprint: &str,
        reference: &str,
    ) -> Result<(), CacheError>;

    /// 当前条目总数（启动日志 / 观测用）
    async fn count(&self) -> Result<u64, CacheError>;
}

/// 计算生成请求的指纹
///
/// 对请求的语义标识串做 MD5，输出 32 位小写十六进制。
/// 不做任何归一化：大小写或空白的差异产生不同指纹，
/// 两个逻辑等价但字面不同的请求会各自调用生成服务并分别缓存。
pub fn fingerprint(identity: &str) -> String {
    let digest = md5::compute(identity.as_bytes());
    format!("{:x}", digest)
}

/// 构造音频请求的标识串
///
/// 朗读指令与旁白文本以单个冒号拼接。拼接存在已知歧义：
/// "a:b" + "c" 与 "a" + "b:c" 产生同一标识串。
pub fn audio_identity(instruction: &str, text: &str) -> String {
    format!("{}:{}", instruction, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_known_digest() {
        // MD5 空串的标准摘要
        assert_eq!(fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(fingerprint("").len(), 32);
    }

    #[test]
    fn test_fingerprint_deterministic() {
        assert_eq!(fingerprint("a dragon"), fingerprint("a dragon"));
    }

    #[test]
    fn test_fingerprint_case_sensitive() {
        assert_ne!(fingerprint("A"), fingerprint("a"));
        assert_ne!(fingerprint("x"), fingerprint("x "));
    }

    #[test]
    fn test_audio_identity_format() {
        assert_eq!(
            audio_identity("Speak excitedly", "The dragon woke up."),
            "Speak excitedly:The dragon woke up."
        );
    }

    #[test]
    fn test_audio_identity_concatenation_ambiguity_accepted() {
        // 已知歧义：不同的 (指令, 文本) 组合可拼出同一标识串
        assert_eq!(audio_identity("a:b", "c"), audio_identity("a", "b:c"));
    }

    #[test]
    fn test_asset_kind_round_trip() {
        assert_eq!(AssetKind::from_str("image"), Some(AssetKind::Image));
        assert_eq!(AssetKind::from_str("audio"), Some(AssetKind::Audio));
        assert_eq!(AssetKind::from_str("video"), None);
        assert_eq!(AssetKind::Image.as_str(), "image");
    }
}
