//! HTTP surface: router construction plus the handlers behind it.

pub mod handlers;
pub mod page;

use std::sync::Arc;

use axum::http::Method;
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::catalog::Catalog;

/// Shared, read-only handler state.
pub type AppState = Arc<Catalog>;

/// Build the full axum router with all routes and middleware.
pub fn build_router(catalog: AppState) -> Router {
    Router::new()
        .route("/", get(page::index))
        .route("/health", get(handlers::health))
        .route("/get_pathogens/:category", get(handlers::get_pathogens))
        .route("/get_details/:category/:pathogen", get(handlers::get_details))
        .layer(
            ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods([Method::GET]),
            ),
        )
        .with_state(catalog)
}
