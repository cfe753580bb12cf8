//! Transaction lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use kasira_core::lifecycle::{TransactionKind, TransactionStatus};
use kasira_db::repositories::{
    CreateAdjustmentInput, CreatePurchaseInput, CreateSaleInput, TransactionFilter,
    TransactionRepository, TransactionStoreError,
};
use kasira_shared::types::PageRequest;

use crate::AppState;
use crate::actor::Actor;
use crate::routes::error_response;

/// Creates the transaction routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", post(create_transaction).get(list_transactions))
        .route("/transactions/{id}", get(get_transaction))
        .route("/transactions/{id}/post", post(post_transaction))
        .route("/transactions/{id}/cancel", post(cancel_transaction))
        .route("/transactions/{id}/settlement", get(transaction_settlement))
}

/// Request body for creating a draft transaction, tagged by kind.
#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CreateTransactionRequest {
    /// Stock received from a supplier.
    Purchase(CreatePurchaseInput),
    /// Stock sold to a customer.
    Sale(CreateSaleInput),
    /// Caller-supplied balanced journal lines.
    Adjustment(CreateAdjustmentInput),
}

/// Query parameters for listing transactions.
#[derive(Debug, Deserialize)]
pub struct ListTransactionsQuery {
    /// Filter by lifecycle status.
    pub status: Option<TransactionStatus>,
    /// Filter by kind.
    pub kind: Option<TransactionKind>,
    /// Inclusive lower bound on entry date (YYYY-MM-DD).
    pub from: Option<NaiveDate>,
    /// Inclusive upper bound on entry date (YYYY-MM-DD).
    pub to: Option<NaiveDate>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Number of items per page.
    pub per_page: Option<u32>,
}

fn repo(state: &AppState) -> TransactionRepository {
    TransactionRepository::new(state.db.clone(), state.ledger.accounts.clone())
}

/// POST `/transactions` - Create a draft purchase, sale, or adjustment.
async fn create_transaction(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(payload): Json<CreateTransactionRequest>,
) -> impl IntoResponse {
    let repo = repo(&state);
    let result = match &payload {
        CreateTransactionRequest::Purchase(input) => repo.create_purchase(input, &actor).await,
        CreateTransactionRequest::Sale(input) => repo.create_sale(input, &actor).await,
        CreateTransactionRequest::Adjustment(input) => repo.create_adjustment(input, &actor).await,
    };

    match result {
        Ok(header) => {
            info!(transaction_id = %header.id, "Draft transaction created");
            (StatusCode::CREATED, Json(json!({ "transaction": header }))).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET `/transactions` - List transactions with filters.
async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<ListTransactionsQuery>,
) -> impl IntoResponse {
    let filter = TransactionFilter {
        status: query.status,
        kind: query.kind,
        from: query.from,
        to: query.to,
    };
    let defaults = PageRequest::default();
    let page = PageRequest {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };
    match repo(&state).list(&filter, &page).await {
        Ok(page) => (StatusCode::OK, Json(page)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// GET `/transactions/{id}` - One transaction with its derived total.
async fn get_transaction(State(state): State<AppState>, Path(id): Path<Uuid>) -> impl IntoResponse {
    match repo(&state).get(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => store_error_response(&e),
    }
}

/// POST `/transactions/{id}/post` - Post a draft transaction.
async fn post_transaction(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match repo(&state).post(id, &actor).await {
        Ok(header) => {
            info!(transaction_id = %id, "Transaction posted");
            (StatusCode::OK, Json(json!({ "transaction": header }))).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// POST `/transactions/{id}/cancel` - Cancel a draft or posted transaction.
async fn cancel_transaction(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    match repo(&state).cancel(id, &actor).await {
        Ok(header) => {
            info!(transaction_id = %id, "Transaction cancelled");
            (StatusCode::OK, Json(json!({ "transaction": header }))).into_response()
        }
        Err(e) => store_error_response(&e),
    }
}

/// GET `/transactions/{id}/settlement` - Derived settlement position.
async fn transaction_settlement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let repo = kasira_db::BalanceRepository::new(state.db.clone(), state.ledger.currency);
    match repo.transaction_settlement(id).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => crate::routes::accounts::balance_error_response(&e),
    }
}

pub(crate) fn store_error_response(err: &TransactionStoreError) -> axum::response::Response {
    let status = match err {
        TransactionStoreError::NotFound(_) => StatusCode::NOT_FOUND,
        TransactionStoreError::Lifecycle(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TransactionStoreError::Validation(_) => StatusCode::BAD_REQUEST,
        TransactionStoreError::Contention => StatusCode::CONFLICT,
        TransactionStoreError::Chart(_) | TransactionStoreError::Database(_) => {
            error!(error = %err, "Transaction operation failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.error_code(), &err.to_string())
}
