use std::io::Read;

use anyhow::{Result, bail};

use crate::application::ExpenseService;
use crate::domain::{DEFAULT_DESCRIPTION, Expense, parse_cents, parse_expense_date};

/// Result of an import operation.
///
/// Rows with unparseable dates or amounts are dropped rather than aborting
/// the import; the dropped count is surfaced here instead of per-row errors.
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub imported: usize,
    pub dropped: usize,
}

/// Importer for merging externally supplied CSV data into the ledger.
pub struct Importer<'a> {
    service: &'a mut ExpenseService,
}

impl<'a> Importer<'a> {
    pub fn new(service: &'a mut ExpenseService) -> Self {
        Self { service }
    }

    /// Import expenses from CSV.
    ///
    /// Columns are located by header name: `Date`, `Category` and `Amount`
    /// are required, `Description` is optional and defaults to a placeholder.
    /// The merged batch is persisted with a single write-through.
    pub fn import_expenses_csv<R: Read>(&mut self, reader: R) -> Result<ImportResult> {
        let mut csv_reader = csv::Reader::from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let date_col = find_column(&headers, "Date")?;
        let category_col = find_column(&headers, "Category")?;
        let amount_col = find_column(&headers, "Amount")?;
        let description_col = headers.iter().position(|h| h.trim() == "Description");

        let mut parsed = Vec::new();
        let mut dropped = 0;

        for result in csv_reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };

            let date = match parse_expense_date(record.get(date_col).unwrap_or("")) {
                Ok(d) => d,
                Err(_) => {
                    dropped += 1;
                    continue;
                }
            };

            let amount_cents = match parse_cents(record.get(amount_col).unwrap_or("")) {
                Ok(a) if a >= 0 => a,
                _ => {
                    dropped += 1;
                    continue;
                }
            };

            let category = record.get(category_col).unwrap_or("").to_string();
            let description = description_col
                .and_then(|col| record.get(col))
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(DEFAULT_DESCRIPTION)
                .to_string();

            // Amount already checked non-negative, so this cannot fail.
            if let Ok(expense) = Expense::new(date, category, amount_cents, description) {
                parsed.push(expense);
            }
        }

        let imported = self.service.merge_expenses(parsed)?;
        Ok(ImportResult { imported, dropped })
    }
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    match headers.iter().position(|h| h.trim() == name) {
        Some(index) => Ok(index),
        None => bail!("Missing required column '{}' in import file", name),
    }
}
