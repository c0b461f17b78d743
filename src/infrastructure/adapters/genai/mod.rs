//! GenAI Adapters - 生成式模型服务客户端

mod fake_client;
mod gemini_client;

pub use fake_client::{FakeGenAiClient, FakeGenAiClientConfig};
pub use gemini_client::{GeminiClient, GeminiClientConfig};
