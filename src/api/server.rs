//! Assembles the full application router and runs the HTTP server.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::docs::ApiDoc;
use crate::api::routes::{create_router, AppState};

/// Mount point of the frontend bundle in production.
pub const STATIC_MOUNT: &str = "/app";

/// Any origin, method and header. Credentials are not advertised since
/// browsers reject them alongside a wildcard origin.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// REST routes plus OpenAPI docs, CORS and request tracing. In production the
/// built frontend is served from `static_dir` under `/app`.
pub fn build_app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut app = create_router(state)
        .merge(SwaggerUi::new("/docs").url("/openapi.json", ApiDoc::openapi()));

    if config.is_production() {
        tracing::info!(
            "Serving frontend from {} at {}",
            config.static_dir,
            STATIC_MOUNT
        );
        app = app.nest_service(
            STATIC_MOUNT,
            ServeDir::new(&config.static_dir).append_index_html_on_directories(true),
        );
    }

    app.layer(cors_layer()).layer(TraceLayer::new_for_http())
}

/// Serves `app` on `addr` until `shutdown_signal` completes.
pub async fn run_server<F>(app: Router, addr: SocketAddr, shutdown_signal: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await
}
