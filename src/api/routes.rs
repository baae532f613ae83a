use axum::{middleware, routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Browsing
        .route("/popular", get(handlers::popular))
        .route("/search", get(handlers::search))
        .route("/album/:album_name", get(handlers::by_album))
        // Genres
        .route("/genres", get(handlers::genres))
        .route("/songs_by_genre", get(handlers::songs_by_genre))
        // Recommendations
        .route("/recommend/:track_id", get(handlers::recommend))
        // Innermost first: the trace span is created after the request ID
        // middleware has stamped the request.
        .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
