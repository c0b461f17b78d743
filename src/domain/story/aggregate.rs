//! Story Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Scene, StoryId, Title};

/// Story 聚合根
///
/// 不变量:
/// - Scene 顺序不可变，索引连续
/// - 场景只增改素材引用，不会被删除
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    id: StoryId,
    title: Title,
    scenes: Vec<Scene>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Story {
    /// 从已生成的场景列表创建故事
    pub fn from_scenes(title: Title, scenes: Vec<Scene>) -> Self {
        let now = Utc::now();
        Self {
            id: StoryId::new(),
            title,
            scenes,
            created_at: now,
            updated_at: now,
        }
    }

    // Getters
    pub fn id(&self) -> &StoryId {
        &self.id
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn get_scene(&self, index: usize) -> Option<&Scene> {
        self.scenes.get(index)
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// 记录某个场景已解析的图像引用
    pub fn attach_image(&mut self, index: usize, url: impl Into<String>) -> bool {
        match self.scenes.get_mut(index) {
            Some(scene) => {
                scene.set_image_url(url);
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// 记录某个场景已解析的音频引用
    pub fn attach_audio(&mut self, index: usize, url: impl Into<String>) -> bool {
        match self.scenes.get_mut(index) {
            Some(scene) => {
                scene.set_audio_url(url);
                self.updated_at = Utc::now();
                true
            }
            None => false,
        }
    }

    /// 故事是否完整（所有场景素材均已解析）
    pub fn is_complete(&self) -> bool {
        !self.scenes.is_empty() && self.scenes.iter().all(Scene::is_complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story() -> Story {
        let scenes = vec![
            Scene::new(0, "第一幕".into(), "p0".into(), "calm".into()).unwrap(),
            Scene::new(1, "第二幕".into(), "p1".into(), "excited".into()).unwrap(),
        ];
        Story::from_scenes(Title::new("龙的觉醒").unwrap(), scenes)
    }

    #[test]
    fn test_attach_assets_until_complete() {
        let mut s = story();
        assert!(!s.is_complete());

        assert!(s.attach_image(0, "u"));
        assert!(s.attach_audio(0, "u"));
        assert!(s.attach_image(1, "u"));
        assert!(!s.is_complete());

        assert!(s.attach_audio(1, "u"));
        assert!(s.is_complete());
    }

    #[test]
    fn test_attach_out_of_range_returns_false() {
        let mut s = story();
        assert!(!s.attach_image(9, "u"));
    }
}
