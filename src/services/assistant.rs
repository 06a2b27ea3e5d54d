use std::sync::Arc;

use crate::models::internal::{Message, NewMessage};
use crate::services::llm_client::{ChatMessage, LlmClient, LlmClientError};
use crate::storage::repository::{ConversationRepository, RepositoryError};

#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("No messages in conversation to build a prompt from.")]
    EmptyHistory,
    #[error("LLM call failed")]
    Llm(#[source] LlmClientError),
}

/// Generates assistant replies from a conversation's stored history.
pub struct AssistantService {
    repo: Arc<dyn ConversationRepository>,
    llm: Arc<dyn LlmClient>,
    system_prompt: String,
}

impl AssistantService {
    pub fn new(
        repo: Arc<dyn ConversationRepository>,
        llm: Arc<dyn LlmClient>,
        system_prompt: String,
    ) -> Self {
        Self {
            repo,
            llm,
            system_prompt,
        }
    }

    /// History as sent to the model: the system instruction, then every
    /// stored message oldest first.
    pub fn build_prompt(&self, history: &[Message]) -> Vec<ChatMessage> {
        std::iter::once(ChatMessage::new("system", self.system_prompt.as_str()))
            .chain(
                history
                    .iter()
                    .map(|m| ChatMessage::new(m.role.as_str(), m.content.as_str())),
            )
            .collect()
    }

    /// Asks the LLM for the next message and stores it as an assistant message.
    ///
    /// Nothing is written unless the LLM call succeeds.
    pub async fn reply(&self, conversation_id: i32) -> Result<Message, ReplyError> {
        let history = self.repo.get_conversation_messages(conversation_id).await?;
        if history.is_empty() {
            return Err(ReplyError::EmptyHistory);
        }

        let prompt = self.build_prompt(&history);
        tracing::info!(
            conversation_id,
            messages = prompt.len(),
            "Requesting LLM reply"
        );

        let text = self.llm.generate(&prompt).await.map_err(ReplyError::Llm)?;

        let stored = self
            .repo
            .create_message(conversation_id, NewMessage::assistant(text))
            .await?;

        Ok(stored)
    }
}
