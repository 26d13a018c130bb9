use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::domain::{
    Cents, Expense, ExpenseFilter, Month, budget_alert, category_summary, filter_expenses,
    monthly_summary, top_categories, total,
};
use crate::storage::{BudgetStore, LedgerStore};

use super::AppError;

/// Application service providing high-level operations over the expense ledger.
/// This is the primary interface for any client (CLI, TUI, etc.).
///
/// The service owns the ledger explicitly: it loads both files at open,
/// mutates in memory, and every mutation is written through by the store.
pub struct ExpenseService {
    ledger: LedgerStore,
    budget_store: BudgetStore,
    budget_cents: Cents,
}

/// A ledger record together with its stable identity: the row position
/// in the full ledger at the time of the query. Deletes address this index.
#[derive(Debug, Clone)]
pub struct ExpenseEntry {
    pub index: usize,
    pub expense: Expense,
}

/// Budget compliance for a filtered view of the ledger.
pub struct BudgetReport {
    pub budget_cents: Cents,
    pub monthly: BTreeMap<Month, Cents>,
    /// Months whose spend exceeds the budget, ascending. Empty = compliant
    /// (or alerting disabled when the budget is zero).
    pub exceeded: Vec<Month>,
}

impl ExpenseService {
    /// Open the service, loading the ledger and the budget setting.
    /// Missing files mean an empty ledger and no budget.
    pub fn open(
        ledger_path: impl Into<PathBuf>,
        budget_path: impl Into<PathBuf>,
    ) -> Result<Self, AppError> {
        let ledger = LedgerStore::open(ledger_path)?;
        let budget_store = BudgetStore::new(budget_path);
        let budget_cents = budget_store.load()?;
        Ok(Self {
            ledger,
            budget_store,
            budget_cents,
        })
    }

    // ========================
    // Ledger mutations
    // ========================

    /// Validate and append a single expense; the ledger file is rewritten.
    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        category: String,
        amount_cents: Cents,
        description: String,
    ) -> Result<Expense, AppError> {
        let expense = Expense::new(date, category, amount_cents, description)?;
        self.ledger.append(expense.clone())?;
        Ok(expense)
    }

    /// Merge a batch of already-parsed records (from an import) with a
    /// single write-through at the end.
    pub fn merge_expenses(&mut self, expenses: Vec<Expense>) -> Result<usize, AppError> {
        let count = expenses.len();
        self.ledger.merge(expenses)?;
        Ok(count)
    }

    /// Delete the record at the given row index.
    /// Unknown identities are a no-op: `Ok(None)`, nothing persisted.
    pub fn delete_expense(&mut self, index: usize) -> Result<Option<Expense>, AppError> {
        Ok(self.ledger.remove(index)?)
    }

    // ========================
    // Queries (pure, derived on demand)
    // ========================

    pub fn expenses(&self) -> &[Expense] {
        self.ledger.expenses()
    }

    pub fn is_empty(&self) -> bool {
        self.ledger.is_empty()
    }

    /// The filtered view, each record paired with its row identity.
    pub fn list_expenses(&self, filter: &ExpenseFilter) -> Vec<ExpenseEntry> {
        self.ledger
            .expenses()
            .iter()
            .enumerate()
            .filter(|(_, e)| filter.matches(e))
            .map(|(index, expense)| ExpenseEntry {
                index,
                expense: expense.clone(),
            })
            .collect()
    }

    pub fn total(&self, filter: &ExpenseFilter) -> Cents {
        total(filter_expenses(self.ledger.expenses(), filter))
    }

    pub fn monthly_summary(&self, filter: &ExpenseFilter) -> BTreeMap<Month, Cents> {
        monthly_summary(filter_expenses(self.ledger.expenses(), filter))
    }

    pub fn category_summary(&self, filter: &ExpenseFilter) -> HashMap<String, Cents> {
        category_summary(filter_expenses(self.ledger.expenses(), filter))
    }

    pub fn top_categories(&self, filter: &ExpenseFilter, n: usize) -> Vec<(String, Cents)> {
        top_categories(filter_expenses(self.ledger.expenses(), filter), n)
    }

    // ========================
    // Budget operations
    // ========================

    pub fn budget(&self) -> Cents {
        self.budget_cents
    }

    /// Persist a new budget ceiling. Zero disables alerting.
    pub fn set_budget(&mut self, budget_cents: Cents) -> Result<(), AppError> {
        if budget_cents < 0 {
            return Err(AppError::InvalidBudget(budget_cents));
        }
        self.budget_store.save(budget_cents)?;
        self.budget_cents = budget_cents;
        Ok(())
    }

    /// Monthly summary plus budget compliance for the filtered view.
    pub fn budget_report(&self, filter: &ExpenseFilter) -> BudgetReport {
        let monthly = self.monthly_summary(filter);
        let exceeded = budget_alert(&monthly, self.budget_cents);
        BudgetReport {
            budget_cents: self.budget_cents,
            monthly,
            exceeded,
        }
    }
}
