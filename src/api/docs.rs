use utoipa::OpenApi;

use crate::api::dto::*;
use crate::api::routes;

#[derive(OpenApi)]
#[openapi(
    info(title = "DSTL Chat API", description = "Conversations, messages and LLM replies"),
    paths(
        routes::create_conversation,
        routes::list_conversations,
        routes::get_conversation,
        routes::delete_conversation,
        routes::list_messages,
        routes::create_message,
        routes::llm_reply,
        routes::health,
    ),
    components(schemas(
        CreateConversationRequest,
        CreateMessageRequest,
        ConversationResponse,
        ConversationWithMessagesResponse,
        MessageResponse,
        DeleteResponse,
        HealthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "conversations", description = "Conversation CRUD"),
        (name = "messages", description = "Messages and assistant replies"),
        (name = "health", description = "Liveness"),
    )
)]
pub struct ApiDoc;
