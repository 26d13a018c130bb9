use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{Expense, format_cents, parse_cents, parse_expense_date};

/// Column order of the ledger file.
pub const LEDGER_HEADERS: [&str; 4] = ["Date", "Category", "Amount", "Description"];

/// File-backed expense ledger.
///
/// The whole file is read once at open; every mutation rewrites the whole
/// file. There is no locking: the tool is single-user by design, and the
/// write-through is deliberately explicit rather than batched.
pub struct LedgerStore {
    path: PathBuf,
    expenses: Vec<Expense>,
}

impl LedgerStore {
    /// Open a ledger file, loading all records into memory.
    /// A missing file is an empty ledger; the file is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let expenses = if path.exists() {
            load_ledger_file(&path)
                .with_context(|| format!("Failed to load ledger file: {}", path.display()))?
        } else {
            Vec::new()
        };
        Ok(Self { path, expenses })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records in insertion order. A record's identity is its position here.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Append a single record and persist.
    pub fn append(&mut self, expense: Expense) -> Result<()> {
        self.expenses.push(expense);
        self.persist()
    }

    /// Merge a batch of records (order not significant) with a single persist.
    pub fn merge(&mut self, expenses: Vec<Expense>) -> Result<()> {
        if expenses.is_empty() {
            return Ok(());
        }
        self.expenses.extend(expenses);
        self.persist()
    }

    /// Remove the record at `index`. An out-of-range index is a no-op and
    /// returns `None`; nothing is persisted in that case.
    pub fn remove(&mut self, index: usize) -> Result<Option<Expense>> {
        if index >= self.expenses.len() {
            return Ok(None);
        }
        let removed = self.expenses.remove(index);
        self.persist()?;
        Ok(Some(removed))
    }

    /// Rewrite the whole ledger file from memory.
    fn persist(&self) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.path)
            .with_context(|| format!("Failed to write ledger file: {}", self.path.display()))?;

        writer.write_record(LEDGER_HEADERS)?;
        for expense in &self.expenses {
            writer.write_record([
                expense.date.format("%Y-%m-%d").to_string(),
                expense.category.clone(),
                format_cents(expense.amount_cents),
                expense.description.clone(),
            ])?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn load_ledger_file(path: &Path) -> Result<Vec<Expense>> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut expenses = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let line = row + 2; // header + 1-based
        let record = result.with_context(|| format!("Malformed CSV at line {}", line))?;

        let date = parse_expense_date(record.get(0).unwrap_or(""))
            .with_context(|| format!("Invalid date at line {}", line))?;
        let category = record.get(1).unwrap_or("").to_string();
        let amount_cents = parse_cents(record.get(2).unwrap_or(""))
            .with_context(|| format!("Invalid amount at line {}", line))?;
        let description = record.get(3).unwrap_or("").to_string();

        let expense = Expense::new(date, category, amount_cents, description)
            .with_context(|| format!("Invalid expense at line {}", line))?;
        expenses.push(expense);
    }

    Ok(expenses)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use tempfile::TempDir;

    use super::*;

    fn expense(date: &str, category: &str, cents: i64) -> Expense {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Expense::new(date, category, cents, "test").unwrap()
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let store = LedgerStore::open(temp.path().join("expenses.csv")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_then_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("expenses.csv");

        let mut store = LedgerStore::open(&path).unwrap();
        store.append(expense("2024-01-05", "Food", 10000)).unwrap();
        store.append(expense("2024-02-01", "Transport", 3000)).unwrap();

        let reloaded = LedgerStore::open(&path).unwrap();
        assert_eq!(reloaded.expenses(), store.expenses());
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("expenses.csv");

        let mut store = LedgerStore::open(&path).unwrap();
        store.append(expense("2024-01-05", "Food", 10000)).unwrap();

        assert!(store.remove(5).unwrap().is_none());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_remove_last_record_leaves_empty_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("expenses.csv");

        let mut store = LedgerStore::open(&path).unwrap();
        store.append(expense("2024-01-05", "Food", 10000)).unwrap();
        let removed = store.remove(0).unwrap();

        assert_eq!(removed.unwrap().category, "Food");
        assert!(store.is_empty());

        let reloaded = LedgerStore::open(&path).unwrap();
        assert!(reloaded.is_empty());
    }
}
