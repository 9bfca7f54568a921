//! HTTP layer: axum controllers over the domain pipeline operations.

use axum::http::{header::CONTENT_TYPE, HeaderValue, Method};
use log::*;
use tower_http::cors::{AllowOrigin, CorsLayer};

mod controller;
pub mod error;
mod params;
pub mod router;

pub use error::Error;
pub use service::AppState;

/// Binds the configured interface/port and serves the API until shutdown.
pub async fn init_server(app_state: AppState) -> std::io::Result<()> {
    let config = app_state.config.clone();

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring unparseable CORS origin: {origin}");
                None
            }
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE])
        .allow_credentials(true)
        .allow_origin(AllowOrigin::list(origins));

    let router = router::define_routes(app_state).layer(cors);

    let host = config.interface.as_deref().unwrap_or("127.0.0.1");
    let address = format!("{}:{}", host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!("Listening on http://{address}");
    axum::serve(listener, router).await
}
