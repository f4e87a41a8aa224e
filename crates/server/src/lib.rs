use axum::{Json, http::StatusCode, response::IntoResponse};
use ledger::LedgerError;

use serde::Serialize;
pub use server::{ServerState, router, run_with_listener, spawn_with_listener};
use uuid::Uuid;

mod accounts;
mod bills;
mod budgets;
mod expenses;
mod exports;
mod server;
mod transactions;

pub mod types {
    pub mod account {
        pub use api_types::account::{AccountKind, AccountListResponse, AccountNew, AccountView};
    }

    pub mod budget {
        pub use api_types::budget::{
            BudgetListResponse, BudgetNew, BudgetView, SpendDelta, SpendDeltaQuery,
        };
    }

    pub mod expense {
        pub use api_types::expense::{ExpenseListResponse, ExpenseNew, ExpenseView};
    }

    pub mod transaction {
        pub use api_types::transaction::{
            TransactionCreated, TransactionKind, TransactionListResponse, TransactionNew,
            TransactionUpdate, TransactionView,
        };
    }

    pub mod bill {
        pub use api_types::bill::BillProcessed;
    }
}

pub enum ServerError {
    Ledger(LedgerError),
    Generic(String),
}

#[derive(Serialize)]
struct Error {
    error: String,
}

fn status_for_ledger_error(err: &LedgerError) -> StatusCode {
    match err {
        LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
        LedgerError::Conflict(_) => StatusCode::CONFLICT,
        LedgerError::InvalidArgument(_) | LedgerError::ExtractionFailed(_) => {
            StatusCode::BAD_REQUEST
        }
        LedgerError::Upstream(_) => StatusCode::BAD_GATEWAY,
        LedgerError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
        LedgerError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_ledger_error(err: LedgerError) -> String {
    match err {
        LedgerError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Ledger(err) => (status_for_ledger_error(&err), message_for_ledger_error(err)),
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
        };

        (status, Json(Error { error })).into_response()
    }
}

impl From<LedgerError> for ServerError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

/// Ids travel as opaque string tokens; one that does not name a stored
/// record is a plain 404.
fn parse_id(value: &str, what: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(value)
        .map_err(|_| ServerError::Ledger(LedgerError::NotFound(format!("{what} {value}"))))
}
