// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::NaiveDate;
use impensa::application::ExpenseService;
use tempfile::TempDir;

/// Helper to create a test service backed by temporary ledger/budget files
pub fn test_service() -> Result<(ExpenseService, TempDir)> {
    let temp_dir = TempDir::new()?;
    let service = open_in(&temp_dir)?;
    Ok((service, temp_dir))
}

/// Re-open the service on the same files, simulating a process restart
pub fn open_in(temp_dir: &TempDir) -> Result<ExpenseService> {
    let ledger_path = temp_dir.path().join("expenses_data.csv");
    let budget_path = temp_dir.path().join("budget.json");
    Ok(ExpenseService::open(ledger_path, budget_path)?)
}

/// Helper to parse a date string into NaiveDate
pub fn parse_date(date_str: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap()
}

/// Test fixture: the standard three-record ledger
/// (Food 100.00, Food 50.00, Transport 30.00)
pub struct SampleLedger;

impl SampleLedger {
    pub fn seed(service: &mut ExpenseService) -> Result<()> {
        service.add_expense(
            parse_date("2024-01-05"),
            "Food".into(),
            10000,
            "Groceries".into(),
        )?;
        service.add_expense(
            parse_date("2024-01-20"),
            "Food".into(),
            5000,
            "Dinner out".into(),
        )?;
        service.add_expense(
            parse_date("2024-02-01"),
            "Transport".into(),
            3000,
            "Bus pass".into(),
        )?;
        Ok(())
    }
}
