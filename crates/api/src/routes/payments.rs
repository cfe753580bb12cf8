//! Payment and allocation routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use kasira_db::PaymentRepository;
use kasira_db::repositories::{AllocateInput, CreatePaymentInput, PaymentStoreError};

use crate::AppState;
use crate::actor::Actor;
use crate::routes::error_response;

/// Creates the payment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/payments", post(create_payment))
        .route("/payments/{id}", get(get_payment))
        .route("/payments/{id}/allocations", post(allocate))
        .route("/payments/{id}/allocations/{allocation_id}", delete(deallocate))
}

fn repo(state: &AppState) -> PaymentRepository {
    PaymentRepository::new(state.db.clone())
}

/// POST `/payments` - Record a payment.
async fn create_payment(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(payload): Json<CreatePaymentInput>,
) -> impl IntoResponse {
    match repo(&state).create(&payload, &actor).await {
        Ok(payment) => {
            info!(payment_id = %payment.id, "Payment recorded");
            (StatusCode::CREATED, Json(json!({ "payment": payment }))).into_response()
        }
        Err(e) => payment_error_response(&e),
    }
}

/// GET `/payments/{id}` - A payment with its allocations.
async fn get_payment(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match repo(&state).get_with_allocations(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => payment_error_response(&e),
    }
}

/// POST `/payments/{id}/allocations` - Allocate part of a payment to a
/// posted transaction.
async fn allocate(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
    Json(payload): Json<AllocateInput>,
) -> impl IntoResponse {
    match repo(&state).allocate(id, &payload, &actor).await {
        Ok(allocation) => {
            info!(payment_id = %id, allocation_id = %allocation.id, "Payment allocated");
            (StatusCode::CREATED, Json(json!({ "allocation": allocation }))).into_response()
        }
        Err(e) => payment_error_response(&e),
    }
}

/// DELETE `/payments/{id}/allocations/{allocation_id}` - Remove an
/// allocation, freeing its amount on both sides.
async fn deallocate(
    State(state): State<AppState>,
    Path((id, allocation_id)): Path<(Uuid, Uuid)>,
) -> impl IntoResponse {
    match repo(&state).deallocate(id, allocation_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => payment_error_response(&e),
    }
}

fn payment_error_response(err: &PaymentStoreError) -> axum::response::Response {
    let status = match err {
        PaymentStoreError::PaymentNotFound(_)
        | PaymentStoreError::TransactionNotFound(_)
        | PaymentStoreError::AllocationNotFound(_) => StatusCode::NOT_FOUND,
        PaymentStoreError::Payment(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PaymentStoreError::Validation(_) => StatusCode::BAD_REQUEST,
        PaymentStoreError::Contention => StatusCode::CONFLICT,
        PaymentStoreError::Database(_) => {
            error!(error = %err, "Payment operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.error_code(), &err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    use kasira_core::payment::PaymentError;

    #[rstest]
    #[case::payment_missing(PaymentStoreError::PaymentNotFound(Uuid::nil()), StatusCode::NOT_FOUND)]
    #[case::allocation_missing(
        PaymentStoreError::AllocationNotFound(Uuid::nil()),
        StatusCode::NOT_FOUND
    )]
    #[case::cap_violation(
        PaymentStoreError::Payment(PaymentError::TransactionOverAllocation {
            available: dec!(5),
            requested: dec!(10),
        }),
        StatusCode::UNPROCESSABLE_ENTITY
    )]
    #[case::not_posted(
        PaymentStoreError::Validation("not posted".to_string()),
        StatusCode::BAD_REQUEST
    )]
    #[case::contention(PaymentStoreError::Contention, StatusCode::CONFLICT)]
    fn test_payment_error_status(#[case] err: PaymentStoreError, #[case] expected: StatusCode) {
        assert_eq!(payment_error_response(&err).status(), expected);
    }
}
