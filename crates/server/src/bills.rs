//! Bill upload API endpoint.
//!
//! Raw image bytes go through the OCR seam, the total is extracted from the
//! recognized text, and a bill-derived transaction is stored. Budget totals
//! are deliberately left untouched on this path.

use api_types::bill::BillProcessed;
use api_types::transaction::{TransactionKind as ApiKind, TransactionView};
use axum::{Json, body::Bytes, extract::State, http::StatusCode};

use crate::{ServerError, server::ServerState};
use ledger::{LedgerError, TransactionKind, extract_total};

pub async fn upload(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<(StatusCode, Json<BillProcessed>), ServerError> {
    if body.is_empty() {
        return Err(ServerError::Ledger(LedgerError::InvalidArgument(
            "empty image upload".to_string(),
        )));
    }

    let text = state.ocr.recognize(&body).await?;
    let amount = extract_total(&text)?;
    let tx = state.ledger.add_bill_transaction(amount).await?;

    let view = TransactionView {
        id: tx.id.to_string(),
        kind: match tx.kind {
            TransactionKind::Income => ApiKind::Income,
            TransactionKind::Expense => ApiKind::Expense,
        },
        amount_minor: tx.amount.cents(),
        category: tx.category,
        occurred_at: tx.occurred_at,
        payment_method: tx.payment_method,
        description: tx.description,
        is_recurring: tx.is_recurring,
    };

    Ok((StatusCode::CREATED, Json(BillProcessed { transaction: view })))
}
