// Spend aggregation
// Derived, ephemeral totals recomputed on demand from the live record set.

use std::collections::BTreeMap;

use crate::loader::{Direction, Transaction};

/// Summed debit spend for one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

/// Group Debit records by their current category and sum amounts, sorted
/// descending by total.
///
/// Grouping goes through a BTreeMap so equal totals come out in category-name
/// order under the stable sort: repeated calls on identical input are
/// deterministic.
pub fn debit_totals(records: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: BTreeMap<&str, f64> = BTreeMap::new();

    for record in records {
        if record.direction == Direction::Debit {
            *groups.entry(record.category.as_str()).or_insert(0.0) += record.amount;
        }
    }

    let mut totals: Vec<CategoryTotal> = groups
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();

    // sort_by is stable, so name order survives among equal totals
    totals.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));

    totals
}

/// Single scalar: sum of all Credit amounts (no grouping).
pub fn credit_total(records: &[Transaction]) -> f64 {
    records
        .iter()
        .filter(|r| r.direction == Direction::Credit)
        .map(|r| r.amount)
        .sum()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(details: &str, amount: f64, direction: Direction, category: &str) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            details: details.to_string(),
            amount,
            direction,
            category: category.to_string(),
        }
    }

    #[test]
    fn test_debit_totals_group_and_sort_descending() {
        let records = vec![
            record("Spotify", 9.99, Direction::Debit, "Subscriptions"),
            record("Netflix", 15.49, Direction::Debit, "Subscriptions"),
            record("Trader Joes", 82.10, Direction::Debit, "Groceries"),
            record("Salary", 2500.0, Direction::Credit, "Uncategorized"),
        ];

        let totals = debit_totals(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[0].category, "Groceries");
        assert!((totals[0].total - 82.10).abs() < 1e-9);
        assert_eq!(totals[1].category, "Subscriptions");
        assert!((totals[1].total - 25.48).abs() < 1e-9);
    }

    #[test]
    fn test_debit_conservation() {
        let records = vec![
            record("A", 1.25, Direction::Debit, "X"),
            record("B", 2.75, Direction::Debit, "Y"),
            record("C", 4.00, Direction::Debit, "X"),
            record("D", 100.0, Direction::Credit, "Z"),
        ];

        let debit_sum: f64 = records
            .iter()
            .filter(|r| r.direction == Direction::Debit)
            .map(|r| r.amount)
            .sum();
        let grouped_sum: f64 = debit_totals(&records).iter().map(|t| t.total).sum();

        assert!((debit_sum - grouped_sum).abs() < 1e-9);
    }

    #[test]
    fn test_ties_break_deterministically_by_name() {
        let records = vec![
            record("b", 5.0, Direction::Debit, "Beta"),
            record("a", 5.0, Direction::Debit, "Alpha"),
        ];

        let totals = debit_totals(&records);
        assert_eq!(totals[0].category, "Alpha");
        assert_eq!(totals[1].category, "Beta");

        // Deterministic across calls
        assert_eq!(debit_totals(&records), totals);
    }

    #[test]
    fn test_credit_total_is_a_plain_sum() {
        let records = vec![
            record("Salary", 2500.0, Direction::Credit, "Uncategorized"),
            record("Refund", 19.99, Direction::Credit, "Uncategorized"),
            record("Rent", 1200.0, Direction::Debit, "Housing"),
        ];

        assert!((credit_total(&records) - 2519.99).abs() < 1e-9);
    }

    #[test]
    fn test_empty_record_set() {
        assert!(debit_totals(&[]).is_empty());
        assert_eq!(credit_total(&[]), 0.0);
    }
}
