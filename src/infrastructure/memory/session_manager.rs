//! In-Memory Session Manager Implementation

use chrono::Utc;
use dashmap::DashMap;
use std::sync::Arc;

use crate::application::ports::{SessionError, SessionManagerPort, StorySession};

/// 内存故事会话管理器
pub struct InMemorySessionManager {
    sessions: DashMap<String, StorySession>,
}

impl InMemorySessionManager {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for InMemorySessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManagerPort for InMemorySessionManager {
    fn create(&self, session: StorySession) -> Result<String, SessionError> {
        let session_id = session.id.clone();
        if self.sessions.contains_key(&session_id) {
            return Err(SessionError::AlreadyExists(session_id));
        }
        self.sessions.insert(session_id.clone(), session);
        tracing::info!(session_id = %session_id, "Story session created");
        Ok(session_id)
    }

    fn get(&self, id: &str) -> Result<StorySession, SessionError> {
        self.sessions
            .get(id)
            .map(|s| s.clone())
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn set_scene_image(&self, id: &str, index: usize, url: &str) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let scene = session
            .scenes
            .get_mut(index)
            .ok_or(SessionError::SceneOutOfRange(index))?;
        scene.set_image_url(url);
        session.last_activity = Utc::now();
        tracing::debug!(session_id = %id, scene_index = index, "Scene image resolved");
        Ok(())
    }

    fn set_scene_audio(&self, id: &str, index: usize, url: &str) -> Result<(), SessionError> {
        let mut session = self
            .sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))?;
        let scene = session
            .scenes
            .get_mut(index)
            .ok_or(SessionError::SceneOutOfRange(index))?;
        scene.set_audio_url(url);
        session.last_activity = Utc::now();
        tracing::debug!(session_id = %id, scene_index = index, "Scene audio resolved");
        Ok(())
    }

    fn close(&self, id: &str) -> Result<(), SessionError> {
        self.sessions
            .remove(id)
            .map(|_| {
                tracing::info!(session_id = %id, "Story session closed");
            })
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }

    fn touch(&self, id: &str) {
        if let Some(mut session) = self.sessions.get_mut(id) {
            session.last_activity = Utc::now();
        }
    }

    fn get_expired_sessions(&self, idle_timeout_secs: u64) -> Vec<String> {
        let now = Utc::now();
        let timeout = chrono::Duration::seconds(idle_timeout_secs as i64);

        self.sessions
            .iter()
            .filter_map(|entry| {
                let elapsed = now - entry.last_activity;
                if elapsed > timeout {
                    Some(entry.key().clone())
                } else {
                    None
                }
            })
            .collect()
    }

    fn list_all(&self) -> Vec<String> {
        self.sessions.iter().map(|e| e.key().clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::story::Scene;

    fn session() -> StorySession {
        let scenes = vec![
            Scene::new(0, "one".into(), "p0".into(), "calm".into()).unwrap(),
            Scene::new(1, "two".into(), "p1".into(), "calm".into()).unwrap(),
        ];
        StorySession::new("a dragon story", scenes)
    }

    #[test]
    fn test_create_get_close() {
        let manager = InMemorySessionManager::new();
        let id = manager.create(session()).unwrap();

        let loaded = manager.get(&id).unwrap();
        assert_eq!(loaded.scenes.len(), 2);

        manager.close(&id).unwrap();
        assert!(manager.get(&id).is_err());
    }

    #[test]
    fn test_scene_assets_mutated_in_place() {
        let manager = InMemorySessionManager::new();
        let id = manager.create(session()).unwrap();

        manager
            .set_scene_image(&id, 0, "data:image/png;base64,AA==")
            .unwrap();
        manager
            .set_scene_audio(&id, 0, "data:audio/wav;base64,AA==")
            .unwrap();

        let loaded = manager.get(&id).unwrap();
        assert!(loaded.scenes[0].is_complete());
        assert!(!loaded.scenes[1].is_complete());
    }

    #[test]
    fn test_scene_index_out_of_range() {
        let manager = InMemorySessionManager::new();
        let id = manager.create(session()).unwrap();

        let err = manager.set_scene_image(&id, 5, "u").unwrap_err();
        assert!(matches!(err, SessionError::SceneOutOfRange(5)));
    }

    #[test]
    fn test_expired_sessions_listed() {
        let manager = InMemorySessionManager::new();
        let id = manager.create(session()).unwrap();

        // idle_timeout = 0 时刚创建的会话立即过期
        std::thread::sleep(std::time::Duration::from_millis(10));
        let expired = manager.get_expired_sessions(0);
        assert_eq!(expired, vec![id]);

        let not_expired = manager.get_expired_sessions(3600);
        assert!(not_expired.is_empty());
    }
}
