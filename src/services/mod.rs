pub mod assistant;
pub mod llm_client;

// Re-export for convenience
pub use assistant::{AssistantService, ReplyError};
pub use llm_client::{ChatMessage, LlmClient, LlmClientError, OpenAiCompatibleClient};
