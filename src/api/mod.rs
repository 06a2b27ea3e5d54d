pub mod docs;
pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use routes::{create_router, AppState};
pub use server::build_app;
