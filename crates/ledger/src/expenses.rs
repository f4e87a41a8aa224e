//! Expense primitives.
//!
//! Expenses are immutable once stored; the only mutation is deletion.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount: MoneyCents,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
    pub notes: Option<String>,
}

impl Expense {
    pub fn new(
        title: &str,
        amount: MoneyCents,
        category: &str,
        occurred_at: Option<DateTime<Utc>>,
        notes: Option<String>,
    ) -> Result<Self, LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidArgument(
                "amount must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            amount,
            category: category.to_string(),
            occurred_at: occurred_at.unwrap_or_else(Utc::now),
            notes,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub title: String,
    pub amount_minor: i64,
    pub category: String,
    pub occurred_at: DateTimeUtc,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Expense> for ActiveModel {
    fn from(expense: &Expense) -> Self {
        Self {
            id: ActiveValue::Set(expense.id.to_string()),
            title: ActiveValue::Set(expense.title.clone()),
            amount_minor: ActiveValue::Set(expense.amount.cents()),
            category: ActiveValue::Set(expense.category.clone()),
            occurred_at: ActiveValue::Set(expense.occurred_at),
            notes: ActiveValue::Set(expense.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Expense {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("expense not exists".to_string()))?,
            title: model.title,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            occurred_at: model.occurred_at,
            notes: model.notes,
        })
    }
}
