//! HTTP API for the zonefeed map frontend.
//!
//! The router is stateless: every handler builds its response from scratch,
//! so it can be cloned into any number of server tasks. Cross-origin requests
//! are allowed from any origin because the frontend is served separately.
#![forbid(unsafe_code)]

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod handlers;

/// Path of the priority list endpoint.
pub const PRIORITY_LIST_PATH: &str = "/api/priority-list";

/// Build the API router with tracing and permissive CORS.
///
/// # Examples
/// ```no_run
/// # async fn serve() -> std::io::Result<()> {
/// let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
/// axum::serve(listener, zonefeed_api::router()).await
/// # }
/// ```
#[must_use]
pub fn router() -> Router {
    Router::new()
        .route(PRIORITY_LIST_PATH, get(handlers::priority::priority_list_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
