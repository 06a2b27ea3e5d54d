use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    prelude::*, DatabaseTransaction, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use tokio::sync::Mutex;

use crate::models::internal::{default_title, Conversation, Message, NewMessage};
use crate::storage::entities::{conversations, messages};

const MAX_SQL_BOUND: u64 = i64::MAX as u64;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    DbError(#[from] sea_orm::DbErr),
    #[error("Entity not found: {0}")]
    NotFound(String),
}

impl RepositoryError {
    fn conversation_not_found(id: i32) -> Self {
        RepositoryError::NotFound(format!("conversation {}", id))
    }
}

// ============================================
// TRAIT DEFINITION
// ============================================
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Creates a conversation. A missing or blank title becomes
    /// `"Conversation {id}"` once the id is assigned.
    async fn create_conversation(
        &self,
        title: Option<String>,
    ) -> Result<Conversation, RepositoryError>;

    async fn list_conversations(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Conversation>, RepositoryError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Conversation>, RepositoryError>;

    async fn get_conversation_with_messages(
        &self,
        id: i32,
    ) -> Result<(Conversation, Vec<Message>), RepositoryError>;

    /// Messages of a conversation, oldest first.
    async fn get_conversation_messages(
        &self,
        conversation_id: i32,
    ) -> Result<Vec<Message>, RepositoryError>;

    async fn create_message(
        &self,
        conversation_id: i32,
        message: NewMessage,
    ) -> Result<Message, RepositoryError>;

    /// Deletes the conversation's messages, then the conversation itself.
    async fn delete(&self, id: i32) -> Result<(), RepositoryError>;

    async fn count_conversations(&self) -> Result<u64, RepositoryError>;
}

// ============================================
// IMPLEMENTATION STRUCT
// ============================================
/// Write transactions hold `write_lock` for their whole lifetime. A deferred
/// SQLite transaction that reads before it writes cannot upgrade its lock
/// while another pooled connection is writing, so writers are queued here
/// instead of failing with `SQLITE_BUSY`.
pub struct SeaOrmConversationRepository {
    db: DatabaseConnection,
    write_lock: Mutex<()>,
}

impl SeaOrmConversationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            write_lock: Mutex::new(()),
        }
    }

    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn require_conversation(
        txn: &DatabaseTransaction,
        id: i32,
    ) -> Result<conversations::Model, RepositoryError> {
        conversations::Entity::find_by_id(id)
            .one(txn)
            .await?
            .ok_or_else(|| RepositoryError::conversation_not_found(id))
    }

    async fn ordered_messages<C: ConnectionTrait>(
        conn: &C,
        conversation_id: i32,
    ) -> Result<Vec<Message>, RepositoryError> {
        let models = messages::Entity::find()
            .filter(messages::Column::ConversationId.eq(conversation_id))
            .order_by_asc(messages::Column::CreatedAt)
            .order_by_asc(messages::Column::Id)
            .all(conn)
            .await?;

        Ok(models.into_iter().map(Message::from).collect())
    }
}

// ============================================
// TRAIT IMPLEMENTATION
// ============================================
#[async_trait]
impl ConversationRepository for SeaOrmConversationRepository {
    async fn create_conversation(
        &self,
        title: Option<String>,
    ) -> Result<Conversation, RepositoryError> {
        let title = title.filter(|t| !t.trim().is_empty());
        let _write = self.write_lock.lock().await;
        let txn = self.db.begin().await?;

        let mut model = conversations::ActiveModel {
            title: Set(title),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        if model.title.is_none() {
            let id = model.id;
            let mut active: conversations::ActiveModel = model.into();
            active.title = Set(Some(default_title(id)));
            model = active.update(&txn).await?;
        }

        txn.commit().await?;
        tracing::info!("Created conversation: {}", model.id);

        Ok(Conversation::from(model))
    }

    async fn list_conversations(
        &self,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Conversation>, RepositoryError> {
        // SQLite binds LIMIT/OFFSET as signed 64-bit integers
        let models = conversations::Entity::find()
            .order_by_asc(conversations::Column::Id)
            .offset(offset.min(MAX_SQL_BOUND))
            .limit(limit.min(MAX_SQL_BOUND))
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Conversation::from).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Conversation>, RepositoryError> {
        let model = conversations::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Conversation::from))
    }

    async fn get_conversation_with_messages(
        &self,
        id: i32,
    ) -> Result<(Conversation, Vec<Message>), RepositoryError> {
        let txn = self.db.begin().await?;
        let conversation = Self::require_conversation(&txn, id).await?;
        let messages = Self::ordered_messages(&txn, id).await?;
        txn.commit().await?;

        Ok((Conversation::from(conversation), messages))
    }

    async fn get_conversation_messages(
        &self,
        conversation_id: i32,
    ) -> Result<Vec<Message>, RepositoryError> {
        let txn = self.db.begin().await?;
        Self::require_conversation(&txn, conversation_id).await?;
        let messages = Self::ordered_messages(&txn, conversation_id).await?;
        txn.commit().await?;

        Ok(messages)
    }

    async fn create_message(
        &self,
        conversation_id: i32,
        message: NewMessage,
    ) -> Result<Message, RepositoryError> {
        let _write = self.write_lock.lock().await;
        let txn = self.db.begin().await?;
        Self::require_conversation(&txn, conversation_id).await?;

        let model = messages::ActiveModel {
            conversation_id: Set(conversation_id),
            role: Set(message.role),
            content: Set(message.content),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        tracing::debug!(
            "Stored {} message {} in conversation {}",
            model.role,
            model.id,
            conversation_id
        );

        Ok(Message::from(model))
    }

    async fn delete(&self, id: i32) -> Result<(), RepositoryError> {
        let _write = self.write_lock.lock().await;
        let txn = self.db.begin().await?;
        Self::require_conversation(&txn, id).await?;

        let removed = messages::Entity::delete_many()
            .filter(messages::Column::ConversationId.eq(id))
            .exec(&txn)
            .await?;

        conversations::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(
            "Deleted conversation {} and {} messages",
            id,
            removed.rows_affected
        );
        Ok(())
    }

    async fn count_conversations(&self) -> Result<u64, RepositoryError> {
        let count = conversations::Entity::find().count(&self.db).await?;
        Ok(count)
    }
}
