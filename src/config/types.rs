//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

/// 应用主配置
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,

    /// 生成式模型服务配置
    #[serde(default)]
    pub genai: GenAiConfig,

    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseConfig,

    /// 会话 GC 配置
    #[serde(default)]
    pub gc: GcConfig,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            genai: GenAiConfig::default(),
            database: DatabaseConfig::default(),
            gc: GcConfig::default(),
            log: LogConfig::default(),
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,

    /// 静态文件服务配置
    #[serde(default)]
    pub static_files: StaticFilesConfig,
}

/// 静态文件服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct StaticFilesConfig {
    /// 是否启用静态文件服务
    #[serde(default = "default_static_enabled")]
    pub enabled: bool,

    /// 静态文件目录
    #[serde(default = "default_static_dir")]
    pub dir: PathBuf,
}

fn default_static_enabled() -> bool {
    false
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            enabled: default_static_enabled(),
            dir: default_static_dir(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5070
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_files: StaticFilesConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 获取服务器地址
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// 生成式模型服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct GenAiConfig {
    /// 服务基础 URL
    #[serde(default = "default_genai_base_url")]
    pub base_url: String,

    /// API key
    #[serde(default)]
    pub api_key: String,

    /// 故事结构生成模型
    #[serde(default = "default_story_model")]
    pub story_model: String,

    /// 图像生成模型
    #[serde(default = "default_image_model")]
    pub image_model: String,

    /// 语音生成模型
    #[serde(default = "default_tts_model")]
    pub tts_model: String,

    /// TTS 固定音色
    #[serde(default = "default_voice")]
    pub voice: String,

    /// 图像固定宽高比
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_genai_timeout")]
    pub timeout_secs: u64,

    /// 使用确定性 fake 客户端替代远程服务（本地联调用）
    #[serde(default)]
    pub use_fake: bool,
}

fn default_genai_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_story_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_image_model() -> String {
    "gemini-2.5-flash-image-preview".to_string()
}

fn default_tts_model() -> String {
    "gemini-2.5-flash-preview-tts".to_string()
}

fn default_voice() -> String {
    "Kore".to_string()
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_genai_timeout() -> u64 {
    120
}

impl Default for GenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_genai_base_url(),
            api_key: String::new(),
            story_model: default_story_model(),
            image_model: default_image_model(),
            tts_model: default_tts_model(),
            voice: default_voice(),
            aspect_ratio: default_aspect_ratio(),
            timeout_secs: default_genai_timeout(),
            use_fake: false,
        }
    }
}

/// 数据库配置
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// 数据库文件路径
    #[serde(default = "default_db_path")]
    pub path: String,

    /// 最大连接数
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> String {
    "data/fabula.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

impl DatabaseConfig {
    /// 获取数据库 URL
    pub fn database_url(&self) -> String {
        format!("sqlite:{}?mode=rwc", self.path)
    }
}

/// 会话 GC 配置
#[derive(Debug, Clone, Deserialize)]
pub struct GcConfig {
    /// 是否启用空闲会话回收
    #[serde(default = "default_gc_enabled")]
    pub enabled: bool,

    /// 回收间隔（秒）
    #[serde(default = "default_gc_interval")]
    pub interval_secs: u64,

    /// 会话空闲过期时间（秒）
    #[serde(default = "default_session_expire")]
    pub session_expire_secs: u64,
}

fn default_gc_enabled() -> bool {
    true
}

fn default_gc_interval() -> u64 {
    3600
}

fn default_session_expire() -> u64 {
    86400
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            enabled: default_gc_enabled(),
            interval_secs: default_gc_interval(),
            session_expire_secs: default_session_expire(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别 (trace/debug/info/warn/error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
