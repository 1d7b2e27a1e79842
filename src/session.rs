// Session state and edit reconciliation
// The session exclusively owns the current transaction set; it is rebuilt
// wholesale on each new upload. Only keyword side effects reach the store.

use crate::classifier::classify;
use crate::loader::Transaction;
use crate::store::CategoryStore;

/// A user's category reassignment for one row.
#[derive(Debug, Clone)]
pub struct CategoryEdit {
    /// Index into the session's record set.
    pub row: usize,
    pub category: String,
}

#[derive(Default)]
pub struct Session {
    transactions: Vec<Transaction>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    /// Replace the record set with a freshly loaded upload, classified
    /// against the current book snapshot.
    pub fn load(&mut self, records: Vec<Transaction>, store: &CategoryStore) {
        self.transactions = classify(records, store.book());
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    /// Reconcile a user-edited copy of the record set against the stored one.
    ///
    /// For every row whose category differs, the in-memory record is updated
    /// first and the row's Details is then fed to the store as a keyword for
    /// the new category. Unchanged rows trigger no store writes. A store
    /// failure on one row never blocks later rows: `add_keyword` degrades
    /// internally. Returns the number of rows changed.
    pub fn reconcile(&mut self, edited: &[Transaction], store: &mut CategoryStore) -> usize {
        let mut changed = 0;

        for (record, edit) in self.transactions.iter_mut().zip(edited) {
            if record.category == edit.category {
                continue;
            }

            record.category = edit.category.clone();
            store.add_keyword(&edit.category, &record.details);
            changed += 1;
        }

        changed
    }

    /// Apply point edits (row index + new category), same contract as
    /// `reconcile`. Out-of-range rows are skipped.
    pub fn apply_edits(&mut self, edits: &[CategoryEdit], store: &mut CategoryStore) -> usize {
        let mut changed = 0;

        for edit in edits {
            let Some(record) = self.transactions.get_mut(edit.row) else {
                log::warn!("ignoring edit for out-of-range row {}", edit.row);
                continue;
            };
            if record.category == edit.category {
                continue;
            }

            record.category = edit.category.clone();
            store.add_keyword(&edit.category, &record.details);
            changed += 1;
        }

        changed
    }
}

// ============================================================================
// TESTS
// ============================================================================
