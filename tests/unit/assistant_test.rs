use async_trait::async_trait;
use dstl_chat::{
    models::internal::NewMessage,
    services::{
        assistant::{AssistantService, ReplyError},
        llm_client::{ChatMessage, LlmClient, LlmClientError},
    },
    storage::{init_db, ConversationRepository, RepositoryError, SeaOrmConversationRepository},
};
use std::sync::Arc;

mockall::mock! {
    pub Llm {}

    #[async_trait]
    impl LlmClient for Llm {
        async fn generate(&self, messages: &[ChatMessage]) -> Result<String, LlmClientError>;
    }
}

const PROMPT: &str = "You are a helpful assistant for the DSTL Chat App.";

async fn setup(llm: MockLlm) -> (Arc<SeaOrmConversationRepository>, AssistantService) {
    let db = init_db("sqlite::memory:", 1).await.unwrap();
    let repo = Arc::new(SeaOrmConversationRepository::new(db));
    let service = AssistantService::new(repo.clone(), Arc::new(llm), PROMPT.to_string());
    (repo, service)
}

fn message(role: &str, content: &str) -> NewMessage {
    NewMessage {
        role: role.to_string(),
        content: content.to_string(),
    }
}

#[tokio::test]
async fn test_reply_prepends_system_prompt_and_stores_answer() {
    let mut llm = MockLlm::new();
    llm.expect_generate()
        .withf(|messages| {
            messages.len() == 3
                && messages[0] == ChatMessage::new("system", PROMPT)
                && messages[1] == ChatMessage::new("user", "What is Rust?")
                && messages[2] == ChatMessage::new("assistant", "A language.")
        })
        .times(1)
        .returning(|_| Ok("A systems language.".to_string()));

    let (repo, service) = setup(llm).await;
    let conv = repo.create_conversation(None).await.unwrap();
    repo.create_message(conv.id, message("user", "What is Rust?"))
        .await
        .unwrap();
    repo.create_message(conv.id, message("assistant", "A language."))
        .await
        .unwrap();

    let reply = service.reply(conv.id).await.unwrap();
    assert_eq!(reply.role, "assistant");
    assert_eq!(reply.content, "A systems language.");
    assert_eq!(reply.conversation_id, conv.id);

    let history = repo.get_conversation_messages(conv.id).await.unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history.last().unwrap().id, reply.id);
}

#[tokio::test]
async fn test_reply_on_empty_conversation() {
    let mut llm = MockLlm::new();
    llm.expect_generate().never();

    let (repo, service) = setup(llm).await;
    let conv = repo.create_conversation(None).await.unwrap();

    let err = service.reply(conv.id).await.unwrap_err();
    assert!(matches!(err, ReplyError::EmptyHistory));
    assert!(repo.get_conversation_messages(conv.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_reply_on_missing_conversation() {
    let mut llm = MockLlm::new();
    llm.expect_generate().never();

    let (_repo, service) = setup(llm).await;

    let err = service.reply(7).await.unwrap_err();
    assert!(matches!(
        err,
        ReplyError::Repository(RepositoryError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_reply_keeps_llm_error_as_source() {
    let mut llm = MockLlm::new();
    llm.expect_generate()
        .times(1)
        .returning(|_| Err(LlmClientError::InvalidResponse("no choices returned".to_string())));

    let (repo, service) = setup(llm).await;
    let conv = repo.create_conversation(None).await.unwrap();
    repo.create_message(conv.id, message("user", "hi")).await.unwrap();

    let err = service.reply(conv.id).await.unwrap_err();
    assert_eq!(err.to_string(), "LLM call failed");

    let source = std::error::Error::source(&err).unwrap();
    assert!(source.to_string().contains("no choices returned"));

    assert_eq!(repo.get_conversation_messages(conv.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_build_prompt_without_history() {
    let mut llm = MockLlm::new();
    llm.expect_generate().never();

    let (_repo, service) = setup(llm).await;

    let prompt = service.build_prompt(&[]);
    assert_eq!(prompt, vec![ChatMessage::new("system", PROMPT)]);
}
