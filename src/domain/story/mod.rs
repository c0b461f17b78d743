//! Story Context - 故事限界上下文
//!
//! 职责:
//! - 故事聚合管理
//! - 场景实体与素材解析生命周期

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::Story;
pub use entities::Scene;
pub use errors::StoryError;
pub use value_objects::{StoryId, Title};
