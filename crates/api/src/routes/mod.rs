//! API route definitions.

use axum::Json;
use axum::http::StatusCode;
use axum::{Router, response::IntoResponse, response::Response};
use serde_json::json;

use crate::AppState;

pub mod accounts;
pub mod health;
pub mod payments;
pub mod transactions;

/// Creates the API router with all routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(transactions::routes())
        .merge(payments::routes())
}

/// Builds the uniform JSON error body.
pub(crate) fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message
        })),
    )
        .into_response()
}
