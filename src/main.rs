//! Fabula - AI 故事幻灯片生成系统
//!
//! - Domain: story/ (Bounded Context) + WAV 编码器
//! - Application: commands, queries, ports
//! - Infrastructure: http, memory, persistence, adapters

use std::sync::Arc;

use fabula::application::{
    AssetCachePort, GenerativeModelPort, MediaGenConfig, SessionManagerPort,
};
use fabula::config::{load_config, print_config};
use fabula::infrastructure::adapters::{
    FakeGenAiClient, FakeGenAiClientConfig, GeminiClient, GeminiClientConfig,
};
use fabula::infrastructure::http::{AppState, HttpServer, ServerConfig};
use fabula::infrastructure::memory::InMemorySessionManager;
use fabula::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteAccountRepository, SqliteAssetCache,
    SqliteStoryRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},fabula={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Fabula - AI 故事幻灯片生成系统");
    print_config(&config);

    // 确保数据目录存在
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let account_repo = Arc::new(SqliteAccountRepository::new(pool.clone()));
    let story_repo = Arc::new(SqliteStoryRepository::new(pool.clone()));

    // 创建素材缓存
    let asset_cache = Arc::new(SqliteAssetCache::new(pool.clone()));
    match asset_cache.count().await {
        Ok(count) => tracing::info!(entries = count, "Asset cache ready"),
        Err(e) => tracing::warn!(error = %e, "Failed to read asset cache size"),
    }

    // 创建生成式模型客户端
    let genai: Arc<dyn GenerativeModelPort> = if config.genai.use_fake {
        // 确定性 fake 客户端（本地联调用，不调用远程服务）
        Arc::new(FakeGenAiClient::new(FakeGenAiClientConfig::default()))
    } else {
        let genai_config = GeminiClientConfig {
            base_url: config.genai.base_url.clone(),
            api_key: config.genai.api_key.clone(),
            story_model: config.genai.story_model.clone(),
            image_model: config.genai.image_model.clone(),
            tts_model: config.genai.tts_model.clone(),
            timeout_secs: config.genai.timeout_secs,
        };
        Arc::new(GeminiClient::new(genai_config)?)
    };

    // 创建内存 Session 管理器
    let session_manager: Arc<dyn SessionManagerPort> = Arc::new(InMemorySessionManager::new());

    // 空闲会话回收
    if config.gc.enabled {
        let sessions = session_manager.clone();
        let interval_secs = config.gc.interval_secs;
        let expire_secs = config.gc.session_expire_secs;
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));
            ticker.tick().await; // 首次 tick 立即返回，跳过
            loop {
                ticker.tick().await;
                let expired = sessions.get_expired_sessions(expire_secs);
                for id in expired {
                    if sessions.close(&id).is_ok() {
                        tracing::info!(session_id = %id, "Expired story session collected");
                    }
                }
                tracing::debug!(
                    active_sessions = sessions.list_all().len(),
                    "Session GC tick completed"
                );
            }
        });
    }

    // 素材生成参数（固定宽高比 / 音色）
    let media_config = MediaGenConfig {
        aspect_ratio: config.genai.aspect_ratio.clone(),
        voice: config.genai.voice.clone(),
    };

    // 创建 HTTP 服务器
    let mut server_config = ServerConfig::new(&config.server.host, config.server.port);
    if config.server.static_files.enabled {
        server_config = server_config.with_static_dir(&config.server.static_files.dir);
    }

    let state = AppState::new(
        genai,
        asset_cache,
        session_manager,
        account_repo,
        story_repo,
        media_config,
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
