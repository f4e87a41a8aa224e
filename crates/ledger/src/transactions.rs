//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense event. Optional fields are
//! defaulted here, at the boundary where data enters the system: a missing
//! category becomes [`UNKNOWN_CATEGORY`] at creation time, never patched at
//! read time.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents};

/// Category recorded when a client omits one.
pub const UNKNOWN_CATEGORY: &str = "Unknown";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = LedgerError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(LedgerError::InvalidArgument(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    pub category: String,
    pub occurred_at: DateTime<Utc>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub is_recurring: bool,
}

impl Transaction {
    pub fn new(
        kind: TransactionKind,
        amount: MoneyCents,
        category: Option<String>,
        occurred_at: DateTime<Utc>,
        payment_method: Option<String>,
        description: Option<String>,
        is_recurring: bool,
    ) -> Result<Self, LedgerError> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidArgument(
                "amount must be >= 0".to_string(),
            ));
        }
        let category = match category {
            Some(category) if !category.trim().is_empty() => category,
            _ => UNKNOWN_CATEGORY.to_string(),
        };
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            amount,
            category,
            occurred_at,
            payment_method,
            description,
            is_recurring,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub category: String,
    pub occurred_at: DateTimeUtc,
    pub payment_method: Option<String>,
    pub description: Option<String>,
    pub is_recurring: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            is_recurring: ActiveValue::Set(tx.is_recurring),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("transaction not exists".to_string()))?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount: MoneyCents::new(model.amount_minor),
            category: model.category,
            occurred_at: model.occurred_at,
            payment_method: model.payment_method,
            description: model.description,
            is_recurring: model.is_recurring,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_category_defaults_to_unknown() {
        let tx = Transaction::new(
            TransactionKind::Expense,
            MoneyCents::new(100),
            None,
            Utc::now(),
            None,
            None,
            false,
        )
        .unwrap();
        assert_eq!(tx.category, UNKNOWN_CATEGORY);

        let blank = Transaction::new(
            TransactionKind::Expense,
            MoneyCents::new(100),
            Some("  ".to_string()),
            Utc::now(),
            None,
            None,
            false,
        )
        .unwrap();
        assert_eq!(blank.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let result = Transaction::new(
            TransactionKind::Income,
            MoneyCents::new(-1),
            None,
            Utc::now(),
            None,
            None,
            false,
        );
        assert!(result.is_err());
    }
}
