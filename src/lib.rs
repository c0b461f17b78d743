//! Fabula - AI 故事幻灯片生成系统
//!
//! 架构设计: DDD + CQRS + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Story Context: 故事与场景管理
//! - WAV 编码器: PCM → WAV 容器组装
//!
//! 应用层 (application/):
//! - Ports: 端口定义（GenerativeModel, AssetCache, Repositories, SessionManager）
//! - Commands: CQRS 命令处理器（素材生成编排器在此）
//! - Queries: CQRS 查询处理器
//!
//! 基础设施层 (infrastructure/):
//! - HTTP: RESTful API
//! - Memory: SessionManager 内存实现
//! - Persistence: SQLite 存储（账户、故事、素材缓存）
//! - Adapters: Gemini Client / Fake Client

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
