use std::io::Write;

use anyhow::Result;

use crate::application::ExpenseService;
use crate::domain::{ExpenseFilter, format_cents};
use crate::storage::LEDGER_HEADERS;

/// Exporter for writing the currently filtered records as a CSV report.
pub struct Exporter<'a> {
    service: &'a ExpenseService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a ExpenseService) -> Self {
        Self { service }
    }

    /// Export the filtered expenses to CSV. Returns the number of rows written.
    pub fn export_expenses_csv<W: Write>(
        &self,
        writer: W,
        filter: &ExpenseFilter,
    ) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(LEDGER_HEADERS)?;

        let mut count = 0;
        for entry in self.service.list_expenses(filter) {
            let expense = &entry.expense;
            csv_writer.write_record([
                expense.date.format("%Y-%m-%d").to_string(),
                expense.category.clone(),
                format_cents(expense.amount_cents),
                expense.description.clone(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }
}
