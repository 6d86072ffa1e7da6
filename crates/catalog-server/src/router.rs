//! Axum router construction.
//!
//! Assembles every route into a single [`Router`] with permissive CORS and
//! per-request tracing.

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete router.
///
/// Routes are listed in the module docs of [`handlers`]. Listing, lookup,
/// and search answer on both the English and Spanish paths that deployed
/// clients use; the category endpoints only ever existed in Spanish. CORS
/// allows any origin because the API is public and read-only.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/api/status", get(handlers::status))
        .route("/api/products", get(handlers::list_products))
        .route("/api/productos", get(handlers::list_products))
        .route("/api/products/{id}", get(handlers::get_product))
        .route("/api/productos/{id}", get(handlers::get_product))
        .route(
            "/api/productos/categoria/{categoria}",
            get(handlers::products_by_category),
        )
        .route("/api/search", get(handlers::search))
        .route("/api/buscar", get(handlers::search))
        .route("/api/categorias", get(handlers::list_categories))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
