//! Transactions API endpoints.

use api_types::transaction::{
    TransactionCreated, TransactionKind as ApiKind, TransactionListResponse, TransactionNew,
    TransactionUpdate, TransactionView,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{ServerError, parse_id, server::ServerState};
use ledger::{MoneyCents, Transaction, TransactionKind};

fn map_kind(kind: TransactionKind) -> ApiKind {
    match kind {
        TransactionKind::Income => ApiKind::Income,
        TransactionKind::Expense => ApiKind::Expense,
    }
}

fn map_transaction(tx: Transaction) -> TransactionView {
    TransactionView {
        id: tx.id.to_string(),
        kind: map_kind(tx.kind),
        amount_minor: tx.amount.cents(),
        category: tx.category,
        occurred_at: tx.occurred_at,
        payment_method: tx.payment_method,
        description: tx.description,
        is_recurring: tx.is_recurring,
    }
}

fn build_transaction(payload: TransactionNew) -> Result<Transaction, ServerError> {
    let kind = match payload.kind {
        ApiKind::Income => TransactionKind::Income,
        ApiKind::Expense => TransactionKind::Expense,
    };
    let tx = Transaction::new(
        kind,
        MoneyCents::new(payload.amount_minor),
        payload.category,
        payload.occurred_at.unwrap_or_else(Utc::now),
        payload.payment_method,
        payload.description,
        payload.is_recurring.unwrap_or(false),
    )?;
    Ok(tx)
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionCreated>), ServerError> {
    let tx = build_transaction(payload)?;
    let tx = state.ledger.add_transaction(tx).await?;

    Ok((
        StatusCode::CREATED,
        Json(TransactionCreated {
            id: tx.id.to_string(),
        }),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let transactions = state
        .ledger
        .transactions()
        .await?
        .into_iter()
        .map(map_transaction)
        .collect();

    Ok(Json(TransactionListResponse { transactions }))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<TransactionView>, ServerError> {
    let id = parse_id(&id, "transaction")?;
    let tx = state.ledger.transaction(id).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let id = parse_id(&id, "transaction")?;
    let mut tx = build_transaction(payload)?;
    tx.id = id;
    state.ledger.update_transaction(id, &tx).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "transaction")?;
    state.ledger.delete_transaction(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
