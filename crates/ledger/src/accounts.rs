//! Financial account primitives.
//!
//! Accounts are an independent registry with no referential link to
//! transactions.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Bank,
    Credit,
    Investment,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Credit => "credit",
            Self::Investment => "investment",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bank" => Ok(Self::Bank),
            "credit" => Ok(Self::Credit),
            "investment" => Ok(Self::Investment),
            other => Err(LedgerError::InvalidArgument(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub institution: String,
    pub kind: AccountKind,
    pub balance: MoneyCents,
}

impl Account {
    pub fn new(name: &str, institution: &str, kind: AccountKind, balance: MoneyCents) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            institution: institution.to_string(),
            kind,
            balance,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub institution: String,
    pub kind: String,
    pub balance_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Account> for ActiveModel {
    fn from(account: &Account) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            name: ActiveValue::Set(account.name.clone()),
            institution: ActiveValue::Set(account.institution.clone()),
            kind: ActiveValue::Set(account.kind.as_str().to_string()),
            balance_minor: ActiveValue::Set(account.balance.cents()),
        }
    }
}

impl TryFrom<Model> for Account {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("account not exists".to_string()))?,
            name: model.name,
            institution: model.institution,
            kind: AccountKind::try_from(model.kind.as_str())?,
            balance: MoneyCents::new(model.balance_minor),
        })
    }
}
