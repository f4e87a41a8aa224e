//! Budget primitives.
//!
//! A `Budget` pairs a per-category spending limit with a running total of
//! spend against it. The category is stored normalized (trimmed, lowercased)
//! and is unique, so matching is a case-insensitive exact match.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{LedgerError, MoneyCents};

/// Normalized form of a budget category.
///
/// All lookups and writes go through this so `" Groceries "` and
/// `"groceries"` refer to the same budget.
pub fn normalize_category(category: &str) -> String {
    category.trim().to_lowercase()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub category: String,
    pub limit: MoneyCents,
    pub spent: MoneyCents,
}

impl Budget {
    pub fn new(category: &str, limit: MoneyCents) -> Result<Self, LedgerError> {
        let category = normalize_category(category);
        if category.is_empty() {
            return Err(LedgerError::InvalidArgument(
                "category must not be empty".to_string(),
            ));
        }
        if limit.is_negative() {
            return Err(LedgerError::InvalidArgument(
                "budget limit must be >= 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            category,
            limit,
            spent: MoneyCents::ZERO,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category: String,
    pub limit_minor: i64,
    pub spent_minor: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            category: ActiveValue::Set(budget.category.clone()),
            limit_minor: ActiveValue::Set(budget.limit.cents()),
            spent_minor: ActiveValue::Set(budget.spent.cents()),
        }
    }
}

impl TryFrom<Model> for Budget {
    type Error = LedgerError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| LedgerError::NotFound("budget not exists".to_string()))?,
            category: model.category,
            limit: MoneyCents::new(model.limit_minor),
            spent: MoneyCents::new(model.spent_minor),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_normalizes_category() {
        let budget = Budget::new(" Groceries ", MoneyCents::new(10_000)).unwrap();
        assert_eq!(budget.category, "groceries");
        assert_eq!(budget.spent, MoneyCents::ZERO);
    }

    #[test]
    fn new_rejects_empty_category_and_negative_limit() {
        assert!(Budget::new("   ", MoneyCents::new(100)).is_err());
        assert!(Budget::new("food", MoneyCents::new(-1)).is_err());
    }
}
