//! Chart of accounts and balance routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use kasira_db::repositories::{BalanceError, BalanceRepository, ChartError};
use kasira_db::AccountRepository;

use crate::AppState;
use crate::routes::error_response;

/// Creates the account routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/accounts", get(list_accounts))
        .route("/accounts/{id}/balance", get(account_balance))
}

/// Query parameters for listing accounts.
#[derive(Debug, Deserialize)]
pub struct ListAccountsQuery {
    /// Include accounts no longer accepting postings.
    #[serde(default)]
    pub include_inactive: bool,
}

/// Query parameters for a balance read.
#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    /// Inclusive cutoff date (YYYY-MM-DD); all entries when absent.
    pub as_of: Option<NaiveDate>,
}

/// GET `/accounts` - List the chart of accounts.
async fn list_accounts(
    State(state): State<AppState>,
    Query(query): Query<ListAccountsQuery>,
) -> impl IntoResponse {
    let repo = AccountRepository::new(state.db.clone());
    match repo.list(query.include_inactive).await {
        Ok(accounts) => (StatusCode::OK, Json(json!({ "accounts": accounts }))).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to list accounts");
            chart_error_response(&e)
        }
    }
}

/// GET `/accounts/{id}/balance` - Derived balance as of a date.
async fn account_balance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<BalanceQuery>,
) -> impl IntoResponse {
    let repo = BalanceRepository::new(state.db.clone(), state.ledger.currency);
    match repo.account_balance(id, query.as_of).await {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(e) => balance_error_response(&e),
    }
}

fn chart_error_response(err: &ChartError) -> axum::response::Response {
    match err {
        ChartError::MissingPostingAccount(_) | ChartError::Chart(_) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "CHART_ERROR",
            &err.to_string(),
        ),
        ChartError::Database(e) => {
            error!(error = %e, "Database error");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An error occurred",
            )
        }
    }
}

pub(crate) fn balance_error_response(err: &BalanceError) -> axum::response::Response {
    let status = match err {
        BalanceError::AccountNotFound(_) | BalanceError::TransactionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        BalanceError::Chart(_) | BalanceError::Database(_) => {
            error!(error = %err, "Balance read failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    error_response(status, err.error_code(), &err.to_string())
}
