use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use validator::Validate;

use crate::api::dto::*;
use crate::api::error::ApiError;
use crate::api::extract::{ApiJson, ApiPath, ApiQuery};
use crate::config::Config;
use crate::services::assistant::AssistantService;
use crate::storage::repository::ConversationRepository;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub repo: Arc<dyn ConversationRepository>,
    pub assistant: Arc<AssistantService>,
}

#[utoipa::path(
    post,
    path = "/conversations/",
    tag = "conversations",
    request_body = CreateConversationRequest,
    responses(
        (status = 200, description = "Conversation created", body = ConversationResponse)
    )
)]
pub async fn create_conversation(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateConversationRequest>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let conversation = state.repo.create_conversation(req.title).await?;
    Ok(Json(conversation.into()))
}

#[utoipa::path(
    get,
    path = "/conversations/",
    tag = "conversations",
    params(PaginationParams),
    responses(
        (status = 200, description = "A page of conversations", body = [ConversationResponse]),
        (status = 400, description = "Malformed offset or limit", body = ErrorResponse)
    )
)]
pub async fn list_conversations(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PaginationParams>,
) -> Result<Json<Vec<ConversationResponse>>, ApiError> {
    let conversations = state
        .repo
        .list_conversations(params.offset(), params.limit())
        .await?;

    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/conversations/{id}",
    tag = "conversations",
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation with its messages, oldest first", body = ConversationWithMessagesResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    )
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ConversationWithMessagesResponse>, ApiError> {
    let (conversation, messages) = state.repo.get_conversation_with_messages(id).await?;

    Ok(Json(ConversationWithMessagesResponse {
        id: conversation.id,
        title: conversation.title,
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/conversations/{id}",
    tag = "conversations",
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Conversation and its messages deleted", body = DeleteResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    )
)]
pub async fn delete_conversation(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.repo.delete(id).await?;
    Ok(Json(DeleteResponse { ok: true }))
}

#[utoipa::path(
    get,
    path = "/conversations/{id}/messages",
    tag = "messages",
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Messages, oldest first", body = [MessageResponse]),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    )
)]
pub async fn list_messages(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<Vec<MessageResponse>>, ApiError> {
    let messages = state.repo.get_conversation_messages(id).await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/conversations/{id}/messages",
    tag = "messages",
    params(("id" = i32, Path, description = "Conversation id")),
    request_body = CreateMessageRequest,
    responses(
        (status = 200, description = "Stored message", body = MessageResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse),
        (status = 422, description = "Empty role or content", body = ErrorResponse)
    )
)]
pub async fn create_message(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<CreateMessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    req.validate()?;
    let message = state.repo.create_message(id, req.into()).await?;
    Ok(Json(message.into()))
}

#[utoipa::path(
    post,
    path = "/conversations/{id}/llm_reply",
    tag = "messages",
    params(("id" = i32, Path, description = "Conversation id")),
    responses(
        (status = 200, description = "Stored assistant reply", body = MessageResponse),
        (status = 400, description = "Conversation has no messages", body = ErrorResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse),
        (status = 500, description = "LLM call failed", body = ErrorResponse)
    )
)]
pub async fn llm_reply(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<MessageResponse>, ApiError> {
    let message = state.assistant.reply(id).await?;
    Ok(Json(message.into()))
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    let conversations = state.repo.count_conversations().await?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        conversations,
    }))
}

/// REST routes. Collection routes answer with and without a trailing slash.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/conversations",
            post(create_conversation).get(list_conversations),
        )
        .route(
            "/conversations/",
            post(create_conversation).get(list_conversations),
        )
        .route(
            "/conversations/{id}",
            get(get_conversation).delete(delete_conversation),
        )
        .route(
            "/conversations/{id}/messages",
            get(list_messages).post(create_message),
        )
        .route("/conversations/{id}/llm_reply", post(llm_reply))
        .route("/health", get(health))
        .with_state(state)
}
