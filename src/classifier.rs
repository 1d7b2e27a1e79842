// Keyword classifier
// Pure over a snapshot of the category book; never mutates the store.

use crate::loader::Transaction;
use crate::store::{CategoryBook, UNCATEGORIZED};

/// Assign a category to every record by exact keyword match.
///
/// Categories are visited in the book's insertion order, skipping the
/// reserved category and any category with no keywords. A record whose
/// lowercased, trimmed Details equals one of a category's normalized keywords
/// takes that category's name, and a later category match overwrites an
/// earlier one. With the same keyword under two categories the later entry
/// wins; whether such collisions are intended behavior is an open product
/// question, so the overwrite semantics are kept as-is rather than resolved
/// here.
///
/// Matching is exact string equality after normalization, not substring or
/// fuzzy matching.
pub fn classify(mut records: Vec<Transaction>, book: &CategoryBook) -> Vec<Transaction> {
    for entry in book.iter() {
        if entry.name == UNCATEGORIZED || entry.keywords.is_empty() {
            continue;
        }

        // Normalize each category's keywords once, not per record
        let keywords: Vec<String> = entry
            .keywords
            .iter()
            .map(|k| k.trim().to_lowercase())
            .collect();

        for record in records.iter_mut() {
            let details = record.details.trim().to_lowercase();
            if keywords.iter().any(|k| *k == details) {
                record.category = entry.name.clone();
            }
        }
    }

    records
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Direction;
    use crate::store::CategoryEntry;
    use chrono::NaiveDate;

    fn record(details: &str) -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
            details: details.to_string(),
            amount: 9.99,
            direction: Direction::Debit,
            category: UNCATEGORIZED.to_string(),
        }
    }

    fn book(entries: &[(&str, &[&str])]) -> CategoryBook {
        let mut categories = vec![CategoryEntry {
            name: UNCATEGORIZED.to_string(),
            keywords: Vec::new(),
        }];
        categories.extend(entries.iter().map(|(name, keywords)| CategoryEntry {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }));
        CategoryBook { categories }
    }

    #[test]
    fn test_exact_keyword_match_assigns_category() {
        let book = book(&[("Subscriptions", &["spotify"])]);
        let records = classify(vec![record("Spotify")], &book);
        assert_eq!(records[0].category, "Subscriptions");
    }

    #[test]
    fn test_match_is_case_insensitive_and_trimmed() {
        let book = book(&[("Subscriptions", &["  SPOTIFY "])]);
        let records = classify(vec![record("  spotify ")], &book);
        assert_eq!(records[0].category, "Subscriptions");
    }

    #[test]
    fn test_last_match_wins_across_categories() {
        // Same keyword under two categories: the later entry in book order
        // takes the record.
        let book = book(&[("A", &["coffee"]), ("B", &["coffee"])]);
        let records = classify(vec![record("Coffee ")], &book);
        assert_eq!(records[0].category, "B");
    }

    #[test]
    fn test_unmatched_details_stay_uncategorized() {
        let book = book(&[("Subscriptions", &["spotify"])]);
        let records = classify(vec![record("Corner Bakery")], &book);
        assert_eq!(records[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_no_substring_matching() {
        let book = book(&[("Subscriptions", &["spotify"])]);
        let records = classify(vec![record("Spotify Premium")], &book);
        assert_eq!(records[0].category, UNCATEGORIZED);
    }

    #[test]
    fn test_empty_keyword_categories_are_skipped() {
        let book = book(&[("Empty", &[]), ("Subscriptions", &["spotify"])]);
        let records = classify(vec![record("Spotify")], &book);
        assert_eq!(records[0].category, "Subscriptions");
    }
}
