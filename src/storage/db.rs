use chrono::Utc;
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, Set, TransactionTrait,
};

use crate::storage::entities::{conversations, messages};

pub const SEED_CONVERSATION_TITLE: &str = "Welcome";
pub const SEED_ASSISTANT_MESSAGE: &str =
    "Hi! I'm the DSTL chat assistant. Start a new conversation and ask me anything.";

/// Connects to the SQLite database and brings the schema up to date.
///
/// File databases (`sqlite://path`) get their parent directory and file created
/// on first use. `sqlite::memory:` is pinned to a single pooled connection,
/// since every new SQLite connection would otherwise open its own empty database.
pub async fn init_db(database_url: &str, max_connections: u32) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", database_url);

    let mut options = ConnectOptions::new(database_url.to_owned());
    options.sqlx_logging(false);

    if database_url == "sqlite::memory:" {
        options.max_connections(1).min_connections(1);
    } else if let Some(path_str) = database_url.strip_prefix("sqlite://") {
        let path_str = path_str.split('?').next().unwrap_or(path_str);
        let path = std::path::Path::new(path_str);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| DbErr::Custom(format!("Failed to create DB directory: {}", e)))?;
                tracing::info!("Created database directory: {}", parent.display());
            }
        }

        if !path.exists() {
            std::fs::File::create(path)
                .map_err(|e| DbErr::Custom(format!("Failed to create DB file: {}", e)))?;
            tracing::info!("Created database file: {}", path.display());
        }

        options.max_connections(max_connections);
    } else {
        return Err(DbErr::Custom("Invalid SQLite URL format".to_string()));
    }

    let db = Database::connect(options)
        .await
        .map_err(|e| DbErr::Custom(format!("Connection failed: {}", e)))?;

    tracing::info!("Applying migrations...");
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Inserts the welcome conversation when the database holds no conversations.
///
/// Returns `true` when rows were written.
pub async fn seed_db(db: &DatabaseConnection) -> Result<bool, DbErr> {
    if conversations::Entity::find().count(db).await? > 0 {
        tracing::debug!("Database already has conversations, skipping seed");
        return Ok(false);
    }

    let now = Utc::now();
    let txn = db.begin().await?;

    let conversation = conversations::ActiveModel {
        title: Set(Some(SEED_CONVERSATION_TITLE.to_string())),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    messages::ActiveModel {
        conversation_id: Set(conversation.id),
        role: Set("assistant".to_string()),
        content: Set(SEED_ASSISTANT_MESSAGE.to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    tracing::info!("Seeded welcome conversation {}", conversation.id);

    Ok(true)
}
