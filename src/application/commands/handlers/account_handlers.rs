//! Account Command Handlers

use chrono::Utc;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::commands::RegisterAccount;
use crate::application::error::ApplicationError;
use crate::application::ports::{AccountRecord, AccountRepositoryPort};

/// 账户注册响应
#[derive(Debug, Clone)]
pub struct RegisterAccountResponse {
    pub account_id: Uuid,
    pub username: String,
}

/// RegisterAccount Handler
pub struct RegisterAccountHandler {
    account_repo: Arc<dyn AccountRepositoryPort>,
}

impl RegisterAccountHandler {
    pub fn new(account_repo: Arc<dyn AccountRepositoryPort>) -> Self {
        Self { account_repo }
    }

    pub async fn handle(
        &self,
        command: RegisterAccount,
    ) -> Result<RegisterAccountResponse, ApplicationError> {
        if command.username.is_empty() {
            return Err(ApplicationError::validation("username is required"));
        }
        if command.password.is_empty() {
            return Err(ApplicationError::validation("password is required"));
        }

        let account = AccountRecord {
            id: Uuid::new_v4(),
            username: command.username.clone(),
            credential_hash: hash_credential(&command.password),
            created_at: Utc::now(),
        };

        // 用户名唯一由存储层约束保证，重复映射为 Conflict
        self.account_repo.create(&account).await?;

        tracing::info!(
            account_id = %account.id,
            username = %command.username,
            "Account registered"
        );

        Ok(RegisterAccountResponse {
            account_id: account.id,
            username: command.username,
        })
    }
}

/// 计算凭证哈希（SHA-256 十六进制）
fn hash_credential(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{:x}", digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_credential_deterministic() {
        assert_eq!(hash_credential("secret"), hash_credential("secret"));
        assert_ne!(hash_credential("secret"), hash_credential("Secret"));
        assert_eq!(hash_credential("secret").len(), 64);
    }
}
