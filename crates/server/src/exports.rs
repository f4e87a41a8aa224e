//! Transaction export API endpoint.
//!
//! Exports the capped transaction list as CSV text or as a PDF rendered by
//! the injected renderer. An empty list is a 404 before the format is even
//! considered, matching the order clients observe.

use axum::{
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::{ServerError, server::ServerState};
use ledger::{LedgerError, transactions_csv, transactions_html};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    format: String,
}

pub async fn export(
    State(state): State<ServerState>,
    Query(query): Query<ExportQuery>,
) -> Result<Response, ServerError> {
    let transactions = state.ledger.transactions().await?;
    if transactions.is_empty() {
        return Err(ServerError::Ledger(LedgerError::NotFound(
            "transactions to export".to_string(),
        )));
    }

    match query.format.as_str() {
        "csv" => {
            let csv = transactions_csv(&transactions)?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=transactions.csv",
                    ),
                ],
                csv,
            )
                .into_response())
        }
        "pdf" => {
            let html = transactions_html(&transactions);
            let pdf = state.pdf.render(&html).await?;
            Ok((
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "application/pdf"),
                    (
                        header::CONTENT_DISPOSITION,
                        "attachment; filename=transactions.pdf",
                    ),
                ],
                pdf,
            )
                .into_response())
        }
        other => Err(ServerError::Ledger(LedgerError::InvalidArgument(format!(
            "invalid format '{other}', use 'csv' or 'pdf'"
        )))),
    }
}
