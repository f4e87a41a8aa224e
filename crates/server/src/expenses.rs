//! Expense API endpoints.

use api_types::expense::{ExpenseListResponse, ExpenseNew, ExpenseView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, parse_id, server::ServerState};
use ledger::{Expense, MoneyCents};

fn map_expense(expense: Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id.to_string(),
        title: expense.title,
        amount_minor: expense.amount.cents(),
        category: expense.category,
        occurred_at: expense.occurred_at,
        notes: expense.notes,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let expense = Expense::new(
        &payload.title,
        MoneyCents::new(payload.amount_minor),
        &payload.category,
        payload.occurred_at,
        payload.notes,
    )?;
    let expense = state.ledger.add_expense(expense).await?;

    Ok((StatusCode::CREATED, Json(map_expense(expense))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ExpenseListResponse>, ServerError> {
    let expenses = state
        .ledger
        .expenses()
        .await?
        .into_iter()
        .map(map_expense)
        .collect();

    Ok(Json(ExpenseListResponse { expenses }))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "expense")?;
    state.ledger.delete_expense(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
