use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::NaiveDate;

use super::{Cents, Expense, Month};

/// Filter predicate for a ledger view: an inclusive date range plus a
/// category set. An empty category set matches every category.
#[derive(Debug, Clone, Default)]
pub struct ExpenseFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub categories: HashSet<String>,
}

impl ExpenseFilter {
    pub fn matches(&self, expense: &Expense) -> bool {
        if let Some(from) = self.from {
            if expense.date < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if expense.date > to {
                return false;
            }
        }
        self.categories.is_empty() || self.categories.contains(&expense.category)
    }
}

/// Select the expenses matching the filter. Pure: preserves order, no mutation.
pub fn filter_expenses<'a>(expenses: &'a [Expense], filter: &ExpenseFilter) -> Vec<&'a Expense> {
    expenses.iter().filter(|e| filter.matches(e)).collect()
}

/// Sum all amounts.
pub fn total<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Cents {
    expenses.into_iter().map(|e| e.amount_cents).sum()
}

/// Group expenses by calendar month and sum the amounts.
/// The map iterates in ascending month order.
pub fn monthly_summary<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> BTreeMap<Month, Cents> {
    let mut summary = BTreeMap::new();
    for expense in expenses {
        *summary.entry(Month::of(expense.date)).or_insert(0) += expense.amount_cents;
    }
    summary
}

/// Group expenses by category (exact label, no normalization) and sum the amounts.
pub fn category_summary<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
) -> HashMap<String, Cents> {
    let mut summary = HashMap::new();
    for expense in expenses {
        *summary.entry(expense.category.clone()).or_insert(0) += expense.amount_cents;
    }
    summary
}

/// Top `n` categories by total spend, descending.
/// Ties are broken by category name so the order is deterministic.
pub fn top_categories<'a>(
    expenses: impl IntoIterator<Item = &'a Expense>,
    n: usize,
) -> Vec<(String, Cents)> {
    let mut ranked: Vec<(String, Cents)> = category_summary(expenses).into_iter().collect();
    ranked.sort_by(|(name_a, total_a), (name_b, total_b)| {
        total_b.cmp(total_a).then_with(|| name_a.cmp(name_b))
    });
    ranked.truncate(n);
    ranked
}

/// The months whose total strictly exceeds the budget, ascending.
/// A budget of zero disables alerting: the result is always empty.
pub fn budget_alert(monthly: &BTreeMap<Month, Cents>, budget: Cents) -> Vec<Month> {
    if budget <= 0 {
        return Vec::new();
    }
    monthly
        .iter()
        .filter(|&(_, &spent)| spent > budget)
        .map(|(&month, _)| month)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expense(date: &str, category: &str, units: i64) -> Expense {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Expense::new(date, category, units * 100, "").unwrap()
    }

    fn sample_ledger() -> Vec<Expense> {
        vec![
            expense("2024-01-05", "Food", 100),
            expense("2024-01-20", "Food", 50),
            expense("2024-02-01", "Transport", 30),
        ]
    }

    #[test]
    fn test_empty_ledger_aggregations() {
        let empty: Vec<Expense> = Vec::new();
        assert!(monthly_summary(&empty).is_empty());
        assert!(category_summary(&empty).is_empty());
        assert!(top_categories(&empty, 5).is_empty());
        assert_eq!(total(&empty), 0);
    }

    #[test]
    fn test_monthly_summary_scenario() {
        let ledger = sample_ledger();
        let summary = monthly_summary(&ledger);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[&Month::new(2024, 1)], 15000);
        assert_eq!(summary[&Month::new(2024, 2)], 3000);

        // BTreeMap iterates ascending by month
        let months: Vec<Month> = summary.keys().copied().collect();
        assert_eq!(months, vec![Month::new(2024, 1), Month::new(2024, 2)]);
    }

    #[test]
    fn test_monthly_totals_match_grand_total() {
        let ledger = sample_ledger();
        let grand_total: Cents = monthly_summary(&ledger).values().sum();
        assert_eq!(grand_total, total(&ledger));
    }

    #[test]
    fn test_budget_alert_scenario() {
        let ledger = sample_ledger();
        let summary = monthly_summary(&ledger);

        let exceeded = budget_alert(&summary, 12000);
        assert_eq!(exceeded, vec![Month::new(2024, 1)]);
    }

    #[test]
    fn test_budget_alert_zero_budget_disables_alerts() {
        let ledger = sample_ledger();
        let summary = monthly_summary(&ledger);
        assert!(budget_alert(&summary, 0).is_empty());
    }

    #[test]
    fn test_budget_alert_exact_spend_is_compliant() {
        let summary = monthly_summary(&sample_ledger());
        // January totals exactly 150.00: not an overrun
        assert!(budget_alert(&summary, 15000).is_empty());
    }

    #[test]
    fn test_filter_date_range_inclusive() {
        let ledger = sample_ledger();
        let filter = ExpenseFilter {
            from: Some(NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2024, 1, 20).unwrap()),
            categories: HashSet::new(),
        };

        let filtered = filter_expenses(&ledger, &filter);
        assert_eq!(filtered.len(), 2);
        assert_eq!(total(filtered.into_iter()), 15000);
    }

    #[test]
    fn test_filter_by_category() {
        let ledger = sample_ledger();
        let filter = ExpenseFilter {
            categories: HashSet::from(["Transport".to_string()]),
            ..Default::default()
        };

        let filtered = filter_expenses(&ledger, &filter);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].category, "Transport");
    }

    #[test]
    fn test_filter_is_idempotent() {
        let ledger = sample_ledger();
        let filter = ExpenseFilter {
            from: Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            to: Some(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()),
            categories: HashSet::from(["Food".to_string()]),
        };

        let once: Vec<Expense> = filter_expenses(&ledger, &filter)
            .into_iter()
            .cloned()
            .collect();
        let twice: Vec<Expense> = filter_expenses(&once, &filter)
            .into_iter()
            .cloned()
            .collect();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_categories_are_case_sensitive() {
        let ledger = vec![
            expense("2024-01-05", "Food", 10),
            expense("2024-01-06", "food", 20),
        ];
        let summary = category_summary(&ledger);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary["Food"], 1000);
        assert_eq!(summary["food"], 2000);
    }

    #[test]
    fn test_top_categories_ranking() {
        let ledger = vec![
            expense("2024-01-01", "Rent", 800),
            expense("2024-01-02", "Food", 300),
            expense("2024-01-03", "Transport", 100),
            expense("2024-01-04", "Food", 200),
        ];

        let top = top_categories(&ledger, 2);
        assert_eq!(
            top,
            vec![("Rent".to_string(), 80000), ("Food".to_string(), 50000)]
        );
    }

    #[test]
    fn test_top_categories_ties_break_by_name() {
        let ledger = vec![
            expense("2024-01-01", "B", 100),
            expense("2024-01-02", "A", 100),
        ];

        let top = top_categories(&ledger, 5);
        assert_eq!(
            top,
            vec![("A".to_string(), 10000), ("B".to_string(), 10000)]
        );
    }
}
