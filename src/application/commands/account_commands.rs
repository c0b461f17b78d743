//! Account Commands

/// 注册账户
#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub username: String,
    pub password: String,
}
