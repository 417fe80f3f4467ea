//! Search API - JSON endpoints over the product search core
//!
//! Provides REST endpoints for:
//! - Vector, text, image and hybrid search
//! - SKU lookup and facet options
//! - Session-scoped searches with paging

use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod error;
pub mod handlers;
pub mod models;
pub mod state;

pub use state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    // CORS configuration for web clients
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // Stateless search endpoints
        .route("/search/vector", post(handlers::vector_search))
        .route("/search/text", post(handlers::text_search))
        .route("/search/image", post(handlers::image_search))
        .route("/search/hybrid", post(handlers::hybrid_search))
        .route("/sku/:sku", get(handlers::get_sku))
        .route("/facets", get(handlers::facets))
        // Session endpoints
        .route("/sessions/:id/search", post(handlers::session_search))
        .route("/sessions/:id/page", post(handlers::session_turn))
        .route("/sessions/:id", delete(handlers::end_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
