//! Persistence Layer - 数据持久化
//!
//! SQLite 存储实现（账户、故事、素材缓存）

pub mod sqlite;

pub use self::sqlite::SqliteAssetCache;
