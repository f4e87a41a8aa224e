use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountKind {
        Bank,
        Credit,
        Investment,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub institution: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
    }

    /// Account ids are opaque string tokens; clients must not interpret
    /// them.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: String,
        pub name: String,
        pub institution: String,
        pub kind: AccountKind,
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountListResponse {
        pub accounts: Vec<AccountView>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category: String,
        pub limit_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: String,
        /// Normalized (trimmed, lowercased) category.
        pub category: String,
        pub limit_minor: i64,
        pub spent_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetListResponse {
        pub budgets: Vec<BudgetView>,
    }

    /// Body of `POST /budgets/update_spent`: a signed delta added to the
    /// category's running spend total.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendDelta {
        pub category: String,
        pub amount_minor: i64,
    }

    /// Query of `PUT /budgets/{category}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SpendDeltaQuery {
        pub amount_minor: i64,
    }
}

pub mod expense {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        /// Defaults to the creation time when omitted.
        pub occurred_at: Option<DateTime<Utc>>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub title: String,
        pub amount_minor: i64,
        pub category: String,
        pub occurred_at: DateTime<Utc>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseListResponse {
        pub expenses: Vec<ExpenseView>,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub kind: TransactionKind,
        pub amount_minor: i64,
        /// Defaults to "Unknown" when omitted or blank.
        pub category: Option<String>,
        /// Defaults to the creation time when omitted.
        pub occurred_at: Option<DateTime<Utc>>,
        pub payment_method: Option<String>,
        pub description: Option<String>,
        pub is_recurring: Option<bool>,
    }

    /// Full-replace body of `PUT /transactions/{id}`.
    pub type TransactionUpdate = TransactionNew;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionCreated {
        pub id: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: String,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub category: String,
        pub occurred_at: DateTime<Utc>,
        pub payment_method: Option<String>,
        pub description: Option<String>,
        pub is_recurring: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
    }
}

pub mod bill {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillProcessed {
        pub transaction: transaction::TransactionView,
    }
}
