pub use accounts::{Account, AccountKind};
pub use budgets::{Budget, normalize_category};
pub use error::LedgerError;
pub use expenses::Expense;
pub use export::{PdfRenderer, WkhtmltopdfRenderer, transactions_csv, transactions_html};
pub use money::MoneyCents;
pub use ocr::{Ocr, TesseractOcr, extract_total};
pub use transactions::{Transaction, TransactionKind, UNKNOWN_CATEGORY};

use chrono::Utc;
use sea_orm::{
    ActiveValue, ConnectionTrait, QueryOrder, QuerySelect, SqlErr, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

mod accounts;
mod budgets;
mod error;
mod expenses;
mod export;
mod money;
mod ocr;
mod transactions;

type ResultLedger<T> = Result<T, LedgerError>;

/// Reads are capped at a fixed page size; there is no pagination cursor.
const PAGE_LIMIT: u64 = 100;

/// Category assigned to every bill-derived transaction.
pub const BILL_CATEGORY: &str = "Shopping";
/// Description assigned to every bill-derived transaction.
pub const BILL_DESCRIPTION: &str = "Shopping Bill";

/// The subsystem that keeps budget running totals synchronized with spend
/// events, plus the plain CRUD the routes are built on.
///
/// Holds an explicitly injected database handle; there is no global
/// connection state.
#[derive(Clone, Debug)]
pub struct Ledger {
    database: DatabaseConnection,
}

impl Ledger {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }

    /// Creates a budget for a category.
    ///
    /// The category is normalized (trimmed, lowercased) before the write;
    /// a budget already covering the normalized category is a
    /// [`LedgerError::Conflict`].
    pub async fn create_budget(&self, category: &str, limit: MoneyCents) -> ResultLedger<Budget> {
        let budget = Budget::new(category, limit)?;

        let existing = budgets::Entity::find()
            .filter(budgets::Column::Category.eq(budget.category.clone()))
            .one(&self.database)
            .await?;
        if existing.is_some() {
            return Err(LedgerError::Conflict(budget.category));
        }

        // Concurrent creates can race past the check; the unique index on
        // category is the backstop.
        match budgets::ActiveModel::from(&budget).insert(&self.database).await {
            Ok(_) => Ok(budget),
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                Err(LedgerError::Conflict(budget.category))
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Returns all budgets.
    pub async fn budgets(&self) -> ResultLedger<Vec<Budget>> {
        budgets::Entity::find()
            .order_by_asc(budgets::Column::Category)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Budget::try_from)
            .collect()
    }

    /// Adds a signed delta to a budget's running spend total.
    ///
    /// The increment is a single atomic SQL update, so concurrent deltas on
    /// the same category never lose a write. A missing budget is a
    /// [`LedgerError::NotFound`] and performs no mutation. Negative deltas
    /// are accepted as credits/reversals.
    pub async fn apply_spend_delta(
        &self,
        category: &str,
        delta: MoneyCents,
    ) -> ResultLedger<Budget> {
        let normalized = normalize_category(category);
        let rows = increment_spent(&self.database, &normalized, delta).await?;
        if rows == 0 {
            return Err(LedgerError::NotFound(format!(
                "budget for category '{category}'"
            )));
        }

        let model = budgets::Entity::find()
            .filter(budgets::Column::Category.eq(normalized))
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("budget for category '{category}'")))?;
        Budget::try_from(model)
    }

    /// Stores a transaction.
    ///
    /// Expense-kind transactions also bump the matching budget's spend total
    /// in the same database transaction; a category with no budget is
    /// tolerated and logged, it does not fail the insert.
    pub async fn add_transaction(&self, tx: Transaction) -> ResultLedger<Transaction> {
        let db_tx = self.database.begin().await?;
        transactions::ActiveModel::from(&tx).insert(&db_tx).await?;

        if tx.kind == TransactionKind::Expense {
            let category = normalize_category(&tx.category);
            let rows = increment_spent(&db_tx, &category, tx.amount).await?;
            if rows == 0 {
                tracing::debug!(category = %tx.category, "no budget to sync for expense");
            }
        }

        db_tx.commit().await?;
        Ok(tx)
    }

    /// Stores a bill-derived transaction.
    ///
    /// Bills are always categorized as [`BILL_CATEGORY`] and deliberately do
    /// not touch budget totals.
    pub async fn add_bill_transaction(&self, amount: MoneyCents) -> ResultLedger<Transaction> {
        let tx = Transaction::new(
            TransactionKind::Expense,
            amount,
            Some(BILL_CATEGORY.to_string()),
            Utc::now(),
            None,
            Some(BILL_DESCRIPTION.to_string()),
            false,
        )?;
        transactions::ActiveModel::from(&tx).insert(&self.database).await?;
        Ok(tx)
    }

    /// Returns recent transactions, newest first, capped at the page limit.
    pub async fn transactions(&self) -> ResultLedger<Vec<Transaction>> {
        transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt)
            .limit(PAGE_LIMIT)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Transaction::try_from)
            .collect()
    }

    /// Returns one transaction by id.
    pub async fn transaction(&self, id: Uuid) -> ResultLedger<Transaction> {
        let model = transactions::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {id}")))?;
        Transaction::try_from(model)
    }

    /// Replaces a transaction's fields. The budget totals are not re-synced
    /// on update.
    pub async fn update_transaction(&self, id: Uuid, tx: &Transaction) -> ResultLedger<()> {
        let update = transactions::ActiveModel {
            id: ActiveValue::NotSet,
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            category: ActiveValue::Set(tx.category.clone()),
            occurred_at: ActiveValue::Set(tx.occurred_at),
            payment_method: ActiveValue::Set(tx.payment_method.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            is_recurring: ActiveValue::Set(tx.is_recurring),
        };

        let result = transactions::Entity::update_many()
            .set(update)
            .filter(transactions::Column::Id.eq(id.to_string()))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::NotFound(format!("transaction {id}")));
        }
        Ok(())
    }

    /// Deletes a transaction by id.
    pub async fn delete_transaction(&self, id: Uuid) -> ResultLedger<()> {
        let result = transactions::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::NotFound(format!("transaction {id}")));
        }
        Ok(())
    }

    /// Stores an expense. Expenses are immutable once stored.
    pub async fn add_expense(&self, expense: Expense) -> ResultLedger<Expense> {
        expenses::ActiveModel::from(&expense).insert(&self.database).await?;
        Ok(expense)
    }

    /// Returns recent expenses, newest first, capped at the page limit.
    pub async fn expenses(&self) -> ResultLedger<Vec<Expense>> {
        expenses::Entity::find()
            .order_by_desc(expenses::Column::OccurredAt)
            .limit(PAGE_LIMIT)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Expense::try_from)
            .collect()
    }

    /// Deletes an expense by id.
    pub async fn delete_expense(&self, id: Uuid) -> ResultLedger<()> {
        let result = expenses::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::NotFound(format!("expense {id}")));
        }
        Ok(())
    }

    /// Stores an account.
    pub async fn add_account(&self, account: Account) -> ResultLedger<Account> {
        accounts::ActiveModel::from(&account).insert(&self.database).await?;
        Ok(account)
    }

    /// Returns accounts, capped at the page limit.
    pub async fn accounts(&self) -> ResultLedger<Vec<Account>> {
        accounts::Entity::find()
            .limit(PAGE_LIMIT)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Account::try_from)
            .collect()
    }

    /// Returns one account by id.
    pub async fn account(&self, id: Uuid) -> ResultLedger<Account> {
        let model = accounts::Entity::find_by_id(id.to_string())
            .one(&self.database)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("account {id}")))?;
        Account::try_from(model)
    }

    /// Deletes an account by id.
    pub async fn delete_account(&self, id: Uuid) -> ResultLedger<()> {
        let result = accounts::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(LedgerError::NotFound(format!("account {id}")));
        }
        Ok(())
    }
}

/// Atomic `spent = spent + delta` against the normalized category.
///
/// Returns the number of matched rows; 0 means no budget covers the
/// category and nothing was written.
async fn increment_spent<C: ConnectionTrait>(
    conn: &C,
    normalized_category: &str,
    delta: MoneyCents,
) -> ResultLedger<u64> {
    let result = budgets::Entity::update_many()
        .col_expr(
            budgets::Column::SpentMinor,
            Expr::col(budgets::Column::SpentMinor).add(delta.cents()),
        )
        .filter(budgets::Column::Category.eq(normalized_category))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
