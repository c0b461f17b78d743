//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping             GET   健康检查
//! - /api/story            POST  生成故事结构（创建会话）
//! - /api/story/save       POST  保存故事到账户
//! - /api/story/get        POST  获取故事详情
//! - /api/story/list       POST  列出账户名下故事
//! - /api/story/delete     POST  删除故事
//! - /api/image            POST  生成场景图像（缓存命中直接返回）
//! - /api/audio            POST  生成场景旁白音频（缓存命中直接返回）
//! - /api/account/register POST  注册账户

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .nest("/story", story_routes())
        .nest("/account", account_routes())
        .route("/image", post(handlers::generate_image))
        .route("/audio", post(handlers::generate_audio))
}

/// Story 路由
fn story_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::generate_story))
        .route("/save", post(handlers::save_story))
        .route("/get", post(handlers::get_story))
        .route("/list", post(handlers::list_stories))
        .route("/delete", post(handlers::delete_story))
}

/// Account 路由
fn account_routes() -> Router<Arc<AppState>> {
    Router::new().route("/register", post(handlers::register_account))
}
