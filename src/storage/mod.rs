pub mod db;
pub mod entities;
pub mod repository;

pub use db::{init_db, seed_db};
pub use entities::{conversations, messages};
pub use repository::{ConversationRepository, RepositoryError, SeaOrmConversationRepository};
