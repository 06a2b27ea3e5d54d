//! DSTL Chat - conversation store and LLM reply backend

pub mod api;
pub mod config;
pub mod models;
pub mod services;
pub mod storage;

// Re-export main types for convenience
pub use crate::api::dto::*;
pub use crate::api::{build_app, create_router, ApiError, AppState};
pub use crate::config::Config;
pub use crate::models::internal::{Conversation, Message, NewMessage};
pub use crate::services::{AssistantService, LlmClient, OpenAiCompatibleClient};
pub use crate::storage::{init_db, seed_db, ConversationRepository, SeaOrmConversationRepository};
