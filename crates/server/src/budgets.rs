//! Budget ledger API endpoints.
//!
//! Both spend-update paths route through the ledger's atomic increment, so
//! concurrent submissions against the same category cannot lose an update.

use api_types::budget::{BudgetListResponse, BudgetNew, BudgetView, SpendDelta, SpendDeltaQuery};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{ServerError, server::ServerState};
use ledger::{Budget, MoneyCents};

fn map_budget(budget: Budget) -> BudgetView {
    BudgetView {
        id: budget.id.to_string(),
        category: budget.category,
        limit_minor: budget.limit.cents(),
        spent_minor: budget.spent.cents(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .ledger
        .create_budget(&payload.category, MoneyCents::new(payload.limit_minor))
        .await?;

    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<BudgetListResponse>, ServerError> {
    let budgets = state
        .ledger
        .budgets()
        .await?
        .into_iter()
        .map(map_budget)
        .collect();

    Ok(Json(BudgetListResponse { budgets }))
}

/// `PUT /budgets/{category}?amount_minor=` - add to a budget's spend total.
pub async fn add_spend_by_path(
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Query(query): Query<SpendDeltaQuery>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .ledger
        .apply_spend_delta(&category, MoneyCents::new(query.amount_minor))
        .await?;

    Ok(Json(map_budget(budget)))
}

/// `POST /budgets/update_spent` - same operation, category and delta in the
/// body.
pub async fn add_spend(
    State(state): State<ServerState>,
    Json(payload): Json<SpendDelta>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state
        .ledger
        .apply_spend_delta(&payload.category, MoneyCents::new(payload.amount_minor))
        .await?;

    Ok(Json(map_budget(budget)))
}
