//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（config.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["config", "config.local"];

/// 加载应用配置
///
/// 按优先级从高到低合并配置：
/// 1. 环境变量（前缀 `FABULA_`，层级分隔符 `__`）
/// 2. 配置文件（config.toml 或 config.local.toml）
/// 3. 默认值
///
/// # 环境变量示例
/// - `FABULA_SERVER__HOST=127.0.0.1`
/// - `FABULA_SERVER__PORT=8080`
/// - `FABULA_GENAI__API_KEY=...`
/// - `FABULA_DATABASE__PATH=/data/fabula.db`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 首先设置默认值（最低优先级）
    builder = builder
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 5070)?
        .set_default("genai.base_url", "https://generativelanguage.googleapis.com")?
        .set_default("genai.api_key", "")?
        .set_default("genai.story_model", "gemini-2.5-flash")?
        .set_default("genai.image_model", "gemini-2.5-flash-image-preview")?
        .set_default("genai.tts_model", "gemini-2.5-flash-preview-tts")?
        .set_default("genai.voice", "Kore")?
        .set_default("genai.aspect_ratio", "16:9")?
        .set_default("genai.timeout_secs", 120)?
        .set_default("genai.use_fake", false)?
        .set_default("database.path", "data/fabula.db")?
        .set_default("database.max_connections", 5)?
        .set_default("gc.enabled", true)?
        .set_default("gc.interval_secs", 3600)?
        .set_default("gc.session_expire_secs", 86400)?
        .set_default("log.level", "info")?;

    // 2. 添加配置文件（如果存在）
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        // 搜索默认配置文件
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 添加环境变量（最高优先级）
    // 前缀: FABULA_
    // 层级分隔符: __ (双下划线)
    // 例如: FABULA_GENAI__API_KEY=...
    builder = builder.add_source(
        Environment::with_prefix("FABULA")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    // 4. 构建配置
    let config = builder.build()?;

    // 5. 反序列化为 AppConfig
    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::ParseError(format!("Failed to deserialize config: {}", e)))?;

    // 6. 验证配置
    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    // 验证端口范围
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "Server port cannot be 0".to_string(),
        ));
    }

    // 验证生成服务 URL
    if config.genai.base_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "GenAI base URL cannot be empty".to_string(),
        ));
    }

    // 远程服务必须有 API key；fake 客户端不需要
    if !config.genai.use_fake && config.genai.api_key.is_empty() {
        return Err(ConfigError::ValidationError(
            "GenAI API key cannot be empty (set FABULA_GENAI__API_KEY or genai.use_fake)"
                .to_string(),
        ));
    }

    // 验证数据库路径
    if config.database.path.is_empty() {
        return Err(ConfigError::ValidationError(
            "Database path cannot be empty".to_string(),
        ));
    }

    // 验证 GC 配置
    if config.gc.enabled && config.gc.interval_secs == 0 {
        return Err(ConfigError::ValidationError(
            "GC interval cannot be 0 when GC is enabled".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Application Configuration ===");
    tracing::info!("Server: {}:{}", config.server.host, config.server.port);
    tracing::info!("GenAI Base URL: {}", config.genai.base_url);
    tracing::info!("GenAI Story Model: {}", config.genai.story_model);
    tracing::info!("GenAI Image Model: {}", config.genai.image_model);
    tracing::info!("GenAI TTS Model: {}", config.genai.tts_model);
    tracing::info!("GenAI Voice: {}", config.genai.voice);
    tracing::info!("GenAI Timeout: {}s", config.genai.timeout_secs);
    tracing::info!("GenAI Fake Client: {}", config.genai.use_fake);
    tracing::info!("Database: {}", config.database.path);
    tracing::info!(
        "Database Max Connections: {}",
        config.database.max_connections
    );
    tracing::info!("GC Enabled: {}", config.gc.enabled);
    if config.gc.enabled {
        tracing::info!("GC Interval: {}s", config.gc.interval_secs);
        tracing::info!("Session Expire: {}s", config.gc.session_expire_secs);
    }
    tracing::info!("Log Level: {}", config.log.level);
    tracing::info!("=================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 5070);
        assert_eq!(config.genai.voice, "Kore");
        assert_eq!(config.genai.aspect_ratio, "16:9");
    }

    #[test]
    fn test_validation_passes_for_fake_client_without_key() {
        let mut config = AppConfig::default();
        config.genai.use_fake = true;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_missing_api_key() {
        let config = AppConfig::default();
        // 默认：远程服务 + 空 key
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_port() {
        let mut config = AppConfig::default();
        config.server.port = 0;
        config.genai.use_fake = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_db_path() {
        let mut config = AppConfig::default();
        config.genai.use_fake = true;
        config.database.path = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[server]\nport = 6100\n\n[genai]\nuse_fake = true\nvoice = \"Puck\""
        )
        .unwrap();

        let config = load_config_from_path(Some(&path)).unwrap();
        assert_eq!(config.server.port, 6100);
        assert_eq!(config.genai.voice, "Puck");
        // 未覆盖的键保持默认
        assert_eq!(config.database.max_connections, 5);
    }
}
