use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Cents;

/// Placeholder used when an imported row carries no description.
pub const DEFAULT_DESCRIPTION: &str = "No Description";

/// A single expense record.
/// Categories are free-form labels and are deliberately not normalized:
/// "Food" and "food " are distinct categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expense {
    pub date: NaiveDate,
    pub category: String,
    /// Amount in cents, always non-negative.
    pub amount_cents: Cents,
    pub description: String,
}

impl Expense {
    /// Create a validated expense. Fails if the amount is negative.
    pub fn new(
        date: NaiveDate,
        category: impl Into<String>,
        amount_cents: Cents,
        description: impl Into<String>,
    ) -> Result<Self, ExpenseError> {
        if amount_cents < 0 {
            return Err(ExpenseError::NegativeAmount { amount_cents });
        }
        Ok(Self {
            date,
            category: category.into(),
            amount_cents,
            description: description.into(),
        })
    }
}

/// Parse an expense date string.
/// Accepts ISO dates ("2024-01-05"), slashed dates ("2024/01/05", "05/01/2024")
/// and datetime strings with an ISO date prefix.
pub fn parse_expense_date(input: &str) -> Result<NaiveDate, ExpenseError> {
    let input = input.trim();

    for format in ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Ok(date);
        }
    }

    // "2024-01-05 00:00:00" and friends: take the date prefix.
    if let Some(prefix) = input.get(..10) {
        if let Ok(date) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return Ok(date);
        }
    }

    Err(ExpenseError::InvalidDate {
        input: input.to_string(),
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseError {
    NegativeAmount { amount_cents: Cents },
    InvalidDate { input: String },
}

impl std::fmt::Display for ExpenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseError::NegativeAmount { amount_cents } => {
                write!(f, "Expense amount must be non-negative, got {} cents", amount_cents)
            }
            ExpenseError::InvalidDate { input } => {
                write!(f, "Not a valid calendar date: '{}'", input)
            }
        }
    }
}

impl std::error::Error for ExpenseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_create_expense() {
        let expense = Expense::new(date("2024-01-05"), "Food", 10000, "Dinner").unwrap();
        assert_eq!(expense.category, "Food");
        assert_eq!(expense.amount_cents, 10000);
    }

    #[test]
    fn test_zero_amount_is_valid() {
        assert!(Expense::new(date("2024-01-05"), "Food", 0, "").is_ok());
    }

    #[test]
    fn test_negative_amount_rejected() {
        let result = Expense::new(date("2024-01-05"), "Food", -100, "");
        assert!(matches!(
            result,
            Err(ExpenseError::NegativeAmount { amount_cents: -100 })
        ));
    }

    #[test]
    fn test_parse_expense_date_formats() {
        assert_eq!(parse_expense_date("2024-01-05"), Ok(date("2024-01-05")));
        assert_eq!(parse_expense_date("2024/01/05"), Ok(date("2024-01-05")));
        assert_eq!(parse_expense_date("05/01/2024"), Ok(date("2024-01-05")));
        assert_eq!(
            parse_expense_date("2024-01-05 00:00:00"),
            Ok(date("2024-01-05"))
        );
        assert_eq!(parse_expense_date("  2024-01-05 "), Ok(date("2024-01-05")));
    }

    #[test]
    fn test_parse_expense_date_invalid() {
        assert!(parse_expense_date("not a date").is_err());
        assert!(parse_expense_date("2024-13-01").is_err());
        assert!(parse_expense_date("2024-02-30").is_err());
        assert!(parse_expense_date("").is_err());
    }
}
