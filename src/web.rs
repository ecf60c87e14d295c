use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

use crate::{GlobeError, api};

pub async fn run(overlay: api::SharedOverlay, port: u16, static_dir: &str) -> Result<(), GlobeError> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .nest("/api", api::router(overlay))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| GlobeError::server(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Overlay server running at http://localhost:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}
