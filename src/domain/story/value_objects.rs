//! Story Context - Value Objects

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 故事唯一标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StoryId(Uuid);

impl StoryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for StoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 故事标题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title(String);

impl Title {
    pub fn new(title: impl Into<String>) -> Result<Self, &'static str> {
        let title = title.into();
        if title.is_empty() {
            return Err("标题不能为空");
        }
        if title.len() > 200 {
            return Err("标题长度不能超过200字符");
        }
        Ok(Self(title))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_rejects_empty() {
        assert!(Title::new("").is_err());
    }

    #[test]
    fn test_title_rejects_overlong() {
        assert!(Title::new("a".repeat(201)).is_err());
        assert!(Title::new("a".repeat(200)).is_ok());
    }
}
