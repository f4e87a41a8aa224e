//! Account registry API endpoints.
//!
//! Plain CRUD; accounts have no cross-entity invariants.

use api_types::account::{AccountKind as ApiKind, AccountListResponse, AccountNew, AccountView};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, parse_id, server::ServerState};
use ledger::{Account, AccountKind, MoneyCents};

fn map_kind(kind: AccountKind) -> ApiKind {
    match kind {
        AccountKind::Bank => ApiKind::Bank,
        AccountKind::Credit => ApiKind::Credit,
        AccountKind::Investment => ApiKind::Investment,
    }
}

fn map_account(account: Account) -> AccountView {
    AccountView {
        id: account.id.to_string(),
        name: account.name,
        institution: account.institution,
        kind: map_kind(account.kind),
        balance_minor: account.balance.cents(),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let kind = match payload.kind {
        ApiKind::Bank => AccountKind::Bank,
        ApiKind::Credit => AccountKind::Credit,
        ApiKind::Investment => AccountKind::Investment,
    };
    let account = state
        .ledger
        .add_account(Account::new(
            &payload.name,
            &payload.institution,
            kind,
            MoneyCents::new(payload.balance_minor),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(map_account(account))))
}

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<AccountListResponse>, ServerError> {
    let accounts = state
        .ledger
        .accounts()
        .await?
        .into_iter()
        .map(map_account)
        .collect();

    Ok(Json(AccountListResponse { accounts }))
}

pub async fn get_one(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<AccountView>, ServerError> {
    let id = parse_id(&id, "account")?;
    let account = state.ledger.account(id).await?;
    Ok(Json(map_account(account)))
}

pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let id = parse_id(&id, "account")?;
    state.ledger.delete_account(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
