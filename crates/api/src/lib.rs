//! HTTP API layer with Axum routes.
//!
//! This crate provides:
//! - REST API routes for transactions, payments, and balance reads
//! - The actor extractor for audit attribution
//! - JSON error responses with machine-readable codes

pub mod actor;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use kasira_shared::config::LedgerConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Ledger configuration: currency and posting account codes.
    pub ledger: Arc<LedgerConfig>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
