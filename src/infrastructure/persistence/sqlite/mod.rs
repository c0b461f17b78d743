//! SQLite Persistence

mod account_repo;
mod asset_cache_repo;
mod database;
mod story_repo;

pub use account_repo::SqliteAccountRepository;
pub use asset_cache_repo::SqliteAssetCache;
pub use database::{create_pool, run_migrations, DatabaseConfig, DbPool};
pub use story_repo::SqliteStoryRepository;
