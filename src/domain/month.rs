use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A calendar month key for grouping expenses.
/// Ordered chronologically: (year, month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    pub year: i32,
    pub month: u32,
}

impl Month {
    pub fn new(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month must be in 1..=12");
        Self { year, month }
    }

    /// The month a given date falls in.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_of_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(Month::of(date), Month::new(2024, 1));
    }

    #[test]
    fn test_month_display() {
        assert_eq!(Month::new(2024, 1).to_string(), "2024-01");
        assert_eq!(Month::new(2024, 12).to_string(), "2024-12");
    }

    #[test]
    fn test_month_ordering() {
        assert!(Month::new(2023, 12) < Month::new(2024, 1));
        assert!(Month::new(2024, 1) < Month::new(2024, 2));
    }

    #[test]
    #[should_panic(expected = "month must be in 1..=12")]
    fn test_month_rejects_out_of_range() {
        Month::new(2024, 13);
    }
}
